mod support;

use rowmap::Node;
use support::*;

use pretty_assertions::assert_eq;

fn base_unit() -> Node {
    mapper("X").child(result_map("base", "Author").child(result("username", "col_name")))
}

fn child_unit() -> Node {
    mapper("Y").child(
        result_map("child", "Author")
            .attr("extends", "X.base")
            .child(result("bio", "col_age")),
    )
}

#[test]
fn child_inherits_parent_bindings() {
    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &base_unit()).unwrap();
    compiler.compile_unit("y.xml", &child_unit()).unwrap();

    let compiled = compiler.finish().unwrap();
    let registry = compiled.registry();

    assert_eq!(columns(registry, "Y.child"), ["col_name", "col_age"]);
    assert_eq!(registry.result_map("Y.child").unwrap().extends(), Some("X.base"));
    assert!(compiled.is_complete());
}

#[test]
fn child_loaded_before_parent_resolves_at_the_next_checkpoint() {
    let mut compiler = compiler();

    compiler.compile_unit("y.xml", &child_unit()).unwrap();
    assert_eq!(compiler.pending().result_maps, ["Y.child"]);
    assert!(compiler.registry().result_map("Y.child").is_none());

    compiler.compile_unit("x.xml", &base_unit()).unwrap();
    assert!(compiler.pending().is_empty());
    assert_eq!(columns(compiler.registry(), "Y.child"), ["col_name", "col_age"]);
}

#[test]
fn redeclared_binding_replaces_inherited_one() {
    let unit = mapper("X")
        .child(
            result_map("base", "Author")
                .child(id("id", "author_id"))
                .child(result("username", "username")),
        )
        .child(
            result_map("child", "Author")
                .attr("extends", "base")
                .child(result("username", "author_username"))
                .child(result("email", "author_email")),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let registry = compiler.registry();
    assert_eq!(
        columns(registry, "X.child"),
        ["author_id", "author_username", "author_email"]
    );

    let child = registry.result_map("X.child").unwrap();
    assert_eq!(
        child.mapping_for("username").unwrap().column_name(),
        Some("author_username")
    );
    assert_eq!(child.id_mappings().count(), 1);
}

#[test]
fn plain_binding_does_not_replace_inherited_id_binding() {
    let unit = mapper("X")
        .child(
            result_map("base", "Author")
                .child(id("id", "author_id"))
                .child(result("username", "u")),
        )
        .child(
            result_map("child", "Author")
                .attr("extends", "base")
                .child(result("id", "other_id")),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let child = compiler.registry().result_map("X.child").unwrap();

    let bindings: Vec<_> = child
        .mappings()
        .iter()
        .map(|m| (m.property().unwrap(), m.column_name().unwrap(), m.is_id()))
        .collect();
    assert_eq!(
        bindings,
        [
            ("id", "author_id", true),
            ("username", "u", false),
            ("id", "other_id", false),
        ]
    );

    let id_columns: Vec<_> = child.id_mappings().map(|m| m.column_name().unwrap()).collect();
    assert_eq!(id_columns, ["author_id"]);
}

#[test]
fn child_of_a_subtype_validates_against_its_own_type() {
    let unit = mapper("X")
        .child(result_map("post", "Post").child(id("id", "post_id")))
        .child(
            result_map("draft", "DraftPost")
                .attr("extends", "post")
                .child(result("reason", "draft_reason")),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(columns(compiler.registry(), "X.draft"), ["post_id", "draft_reason"]);
}

#[test]
fn own_constructor_replaces_inherited_arguments() {
    let arg = |name: &str, column: &str| Node::new("arg").attr("name", name).attr("column", column);

    let unit = mapper("X")
        .child(
            result_map("base", "ImmutableAuthor").child(
                Node::new("constructor")
                    .child(arg("id", "id"))
                    .child(arg("username", "username")),
            ),
        )
        .child(
            result_map("child", "ImmutableAuthor").attr("extends", "base").child(
                Node::new("constructor")
                    .child(arg("id", "author_id"))
                    .child(arg("username", "author_username")),
            ),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(
        columns(compiler.registry(), "X.child"),
        ["author_id", "author_username"]
    );
}

// ---------------------------------------------------------------------------
// Duplicate ids
// ---------------------------------------------------------------------------

fn waiting_copy() -> Node {
    result_map("a", "Author")
        .attr("extends", "Z.m")
        .child(result("bio", "bio"))
}

fn registered_copy() -> Node {
    result_map("a", "Author").child(id("id", "id"))
}

#[test]
fn duplicate_of_a_registered_map_is_rejected_when_parked() {
    let unit = mapper("X").child(registered_copy()).child(waiting_copy());

    let mut compiler = compiler();
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(err.is_duplicate_id(), "{err}");
    assert!(compiler.pending().result_maps.is_empty());
}

#[test]
fn duplicate_of_a_parked_map_is_rejected() {
    let unit = mapper("X").child(waiting_copy()).child(registered_copy());

    let mut compiler = compiler();
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(err.is_duplicate_id(), "{err}");
    assert!(compiler.registry().result_map("X.a").is_none());
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[test]
fn extends_cycle_within_a_unit_is_rejected() {
    let unit = mapper("X")
        .child(result_map("a", "Author").attr("extends", "b"))
        .child(result_map("b", "Author").attr("extends", "a"));

    let mut compiler = compiler();
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(err.is_extends_cycle(), "{err}");
    assert!(err.to_string().contains("X.a -> X.b -> X.a"), "{err}");
}

#[test]
fn self_extension_is_rejected() {
    let unit = mapper("X").child(result_map("a", "Author").attr("extends", "a"));

    let mut compiler = compiler();
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(err.is_extends_cycle(), "{err}");
}

#[test]
fn extends_cycle_across_units_is_rejected() {
    let x = mapper("X").child(result_map("a", "Author").attr("extends", "Y.b"));
    let y = mapper("Y").child(result_map("b", "Author").attr("extends", "X.a"));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &x).unwrap();

    let err = compiler.compile_unit("y.xml", &y).unwrap_err();
    assert!(err.is_extends_cycle(), "{err}");
}

// ---------------------------------------------------------------------------
// Unresolved parents
// ---------------------------------------------------------------------------

#[test]
fn missing_parent_stays_pending() {
    let mut compiler = compiler();
    compiler.compile_unit("y.xml", &child_unit()).unwrap();

    let compiled = compiler.finish().unwrap();
    assert_eq!(compiled.pending().result_maps, ["Y.child"]);

    let err = compiled.ensure_complete().unwrap_err();
    assert!(err.is_unresolved_references());
    assert!(err.to_string().contains("result map `Y.child`"), "{err}");
}

#[test]
fn nested_draft_waits_without_holding_back_its_parent() {
    let unit = mapper("Y").child(
        result_map("post", "Post").child(id("id", "post_id")).child(
            Node::new("association")
                .attr("property", "author")
                .attr("extends", "X.author")
                .child(result("bio", "author_bio")),
        ),
    );

    let mut compiler = compiler();
    compiler.compile_unit("y.xml", &unit).unwrap();

    assert!(compiler.registry().has_result_map("Y.post"));
    assert_eq!(compiler.pending().result_maps, ["Y.post-author"]);

    let author = mapper("X").child(result_map("author", "Author").child(id("id", "author_id")));
    compiler.compile_unit("x.xml", &author).unwrap();

    assert_eq!(columns(compiler.registry(), "Y.post-author"), ["author_id", "author_bio"]);
}
