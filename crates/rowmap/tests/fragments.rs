mod support;

use rowmap::{Node, Settings};
use support::*;

use pretty_assertions::assert_eq;

fn sql(id: &str, text: &str) -> Node {
    Node::new("sql").attr("id", id).with_text(text)
}

fn include(refid: &str) -> Node {
    Node::new("include").attr("refid", refid)
}

fn property(name: &str, value: &str) -> Node {
    Node::new("property").attr("name", name).attr("value", value)
}

/// Text of the statement body's children, in order.
fn body_text(registry: &rowmap::Registry, id: &str) -> Vec<String> {
    registry
        .statement(id)
        .unwrap_or_else(|| panic!("statement `{id}` is not registered"))
        .body
        .children
        .iter()
        .map(|child| child.text.clone().unwrap_or_default())
        .collect()
}

#[test]
fn include_is_replaced_by_the_fragment() {
    let unit = mapper("X")
        .child(sql("cols", "id, username"))
        .child(select("all").attr("resultType", "int").child(include("cols")));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let registry = compiler.registry();
    let body = &registry.statement("X.all").unwrap().body;

    assert_eq!(body.children.len(), 1);
    assert!(body.children[0].is("sql"));
    assert_eq!(body_text(registry, "X.all"), ["id, username"]);
    assert!(compiler.fragments().contains("X.cols"));
}

#[test]
fn include_properties_are_substituted() {
    let unit = mapper("X")
        .child(sql("cols", "${alias}.id, ${alias}.username, ${missing}"))
        .child(
            select("all")
                .attr("resultType", "int")
                .child(include("cols").child(property("alias", "a"))),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(
        body_text(compiler.registry(), "X.all"),
        ["a.id, a.username, ${missing}"]
    );
}

#[test]
fn refid_may_be_a_placeholder() {
    let unit = mapper("X")
        .child(sql("pg_cols", "id"))
        .child(sql("outer", "").child(include("${dialect}_cols")))
        .child(
            select("all")
                .attr("resultType", "int")
                .child(include("outer").child(property("dialect", "pg"))),
        );

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let body = &compiler.registry().statement("X.all").unwrap().body;
    let outer = &body.children[0];
    assert_eq!(outer.children[0].text.as_deref(), Some("id"));
}

#[test]
fn self_including_fragment_is_rejected() {
    let unit = mapper("X")
        .child(sql("loop", "").child(include("loop")))
        .child(select("all").attr("resultType", "int").child(include("loop")));

    let mut compiler = compiler();
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(!err.is_incomplete(), "{err}");
    assert!(err.to_string().contains("X.all"), "{err}");
}

#[test]
fn fragment_from_another_unit_resolves_at_finish() {
    let y = mapper("Y").child(
        select("all")
            .attr("resultType", "int")
            .child(include("X.cols")),
    );
    let x = mapper("X").child(sql("cols", "id"));

    let mut compiler = compiler();
    compiler.compile_unit("y.xml", &y).unwrap();
    assert_eq!(compiler.pending().statements, ["Y.all"]);

    compiler.compile_unit("x.xml", &x).unwrap();
    assert!(compiler.registry().statement("Y.all").is_none());

    let registry = compiler.finish().unwrap().ensure_complete().unwrap();
    assert_eq!(body_text(&registry, "Y.all"), ["id"]);
}

#[test]
fn first_untagged_fragment_wins() {
    let unit = mapper("X")
        .child(sql("cols", "first"))
        .child(sql("cols", "second"))
        .child(select("all").attr("resultType", "int").child(include("cols")));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(body_text(compiler.registry(), "X.all"), ["first"]);
}

// ---------------------------------------------------------------------------
// Dialects
// ---------------------------------------------------------------------------

#[test]
fn dialect_fragment_is_preferred() {
    let unit = mapper("X")
        .child(sql("cols", "generic"))
        .child(sql("cols", "postgres").attr("databaseId", "pg"))
        .child(sql("cols", "mysql").attr("databaseId", "mysql"))
        .child(select("all").attr("resultType", "int").child(include("cols")));

    let mut compiler = compiler_with(Settings::default().database_id("pg"));
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(body_text(compiler.registry(), "X.all"), ["postgres"]);

    let fragment = compiler.fragments().get("X.cols").unwrap();
    assert_eq!(fragment.database_id.as_deref(), Some("pg"));
}

#[test]
fn other_dialects_are_ignored() {
    let unit = mapper("X")
        .child(sql("cols", "mysql").attr("databaseId", "mysql"))
        .child(select("all").attr("resultType", "int").child(include("cols")));

    let mut compiler = compiler_with(Settings::default().database_id("pg"));
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert!(compiler.fragments().is_empty());
    assert_eq!(compiler.pending().statements, ["X.all"]);
}

#[test]
fn without_a_dialect_tagged_fragments_are_ignored() {
    let unit = mapper("X")
        .child(sql("cols", "postgres").attr("databaseId", "pg"))
        .child(sql("cols", "generic"))
        .child(select("all").attr("resultType", "int").child(include("cols")));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(body_text(compiler.registry(), "X.all"), ["generic"]);
}
