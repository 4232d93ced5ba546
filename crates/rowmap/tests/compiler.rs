mod support;

use rowmap::{AliasRegistry, Compiler, MetaCache, Node};
use support::*;

use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn root_must_be_a_mapper() {
    let mut compiler = compiler();
    let err = compiler
        .compile_unit("x.xml", &Node::new("configuration"))
        .unwrap_err();

    assert!(err.to_string().contains("x.xml"), "{err}");
    assert!(err.to_string().contains("<mapper>"), "{err}");
}

#[test]
fn namespace_is_required() {
    let mut compiler = compiler();

    let err = compiler
        .compile_unit("x.xml", &Node::new("mapper"))
        .unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");

    let err = compiler
        .compile_unit("y.xml", &Node::new("mapper").attr("namespace", " "))
        .unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");
}

#[test]
fn a_resource_is_compiled_once() {
    let unit = mapper("X").child(select("find").attr("resultType", "int"));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    // Compiling the same resource again would otherwise fail on the
    // duplicate namespace.
    compiler.compile_unit("x.xml", &unit).unwrap();

    let registry = compiler.registry();
    assert!(registry.is_loaded("x.xml"));
    assert_eq!(registry.loaded_resources().collect::<Vec<_>>(), ["x.xml"]);
    assert_eq!(registry.statements().count(), 1);
}

#[test]
fn namespace_declared_by_two_resources() {
    let mut compiler = compiler();
    compiler.compile_unit("a.xml", &mapper("X")).unwrap();

    let err = compiler.compile_unit("b.xml", &mapper("X")).unwrap_err();
    assert!(err.is_duplicate_id(), "{err}");
}

#[test]
fn units_record_their_resource() {
    let mut compiler = compiler();
    compiler.compile_unit("blog/author.xml", &mapper("Author")).unwrap();

    let unit = compiler.registry().unit("Author").unwrap();
    assert_eq!(unit.resource, "blog/author.xml");
    assert!(unit.cache.is_none());
    assert!(unit.cache_ref.is_none());
}

// ---------------------------------------------------------------------------
// Finishing a run
// ---------------------------------------------------------------------------

#[test]
fn ensure_complete_returns_the_registry() {
    let unit = mapper("X").child(result_map("author", "Author").child(id("id", "id")));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let registry = compiler.finish().unwrap().ensure_complete().unwrap();
    assert!(registry.has_result_map("X.author"));
}

#[test]
fn ensure_complete_lists_everything_pending() {
    let unit = mapper("Y")
        .child(Node::new("cache-ref").attr("namespace", "Z"))
        .child(
            result_map("draft", "DraftPost")
                .attr("extends", "X.post")
                .child(result("reason", "reason")),
        )
        .child(select("find").attr("resultMap", "draft"));

    let mut compiler = compiler();
    compiler.compile_unit("y.xml", &unit).unwrap();

    let compiled = compiler.finish().unwrap();
    assert!(!compiled.is_complete());
    assert_eq!(compiled.pending().len(), 3);

    let err = compiled.ensure_complete().unwrap_err();
    assert!(err.is_unresolved_references(), "{err}");

    let message = err.to_string();
    assert!(message.contains("result map `Y.draft`"), "{message}");
    assert!(message.contains("cache-ref from `Y` to `Z`"), "{message}");
    assert!(message.contains("statement `Y.find`"), "{message}");
}

#[test]
fn registry_serializes_to_json() {
    let unit = mapper("X")
        .child(Node::new("cache"))
        .child(result_map("author", "Author").child(id("id", "id")));

    let mut compiler = compiler();
    compiler.compile_unit("x.xml", &unit).unwrap();

    let registry = compiler.finish().unwrap().into_registry();
    let json = serde_json::to_value(&registry).unwrap();

    assert_eq!(json["result_maps"]["X.author"]["id"], "X.author");
    assert_eq!(json["caches"]["X"]["implementation"], "PerpetualCache");
    assert_eq!(json["units"]["X"]["resource"], "x.xml");
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[test]
fn meta_cache_is_shared_between_compilers() {
    init_tracing();
    let meta = Arc::new(MetaCache::new());

    for namespace in ["X", "Y"] {
        let mut compiler = Compiler::builder()
            .catalog(catalog())
            .meta_cache(meta.clone())
            .build();

        let unit = mapper(namespace).child(result_map("author", "Author").child(id("id", "id")));
        compiler.compile_unit("unit.xml", &unit).unwrap();
    }

    assert!(!meta.is_empty());
    let author = meta
        .metadata_for(&catalog(), &"Author".into())
        .unwrap();
    assert!(author.has_setter("username"));
}

#[test]
fn custom_aliases() {
    init_tracing();
    let mut aliases = AliasRegistry::new();
    aliases.register("writer", "Author").unwrap();

    let mut compiler = Compiler::builder()
        .catalog(catalog())
        .aliases(aliases)
        .build();

    let unit = mapper("X").child(result_map("author", "writer").child(id("id", "id")));
    compiler.compile_unit("x.xml", &unit).unwrap();

    assert_eq!(
        compiler.registry().result_map("X.author").unwrap().ty().as_str(),
        "Author"
    );
}

#[test]
fn default_catalog_has_only_builtins() {
    init_tracing();
    let mut compiler = Compiler::builder().build();

    let unit = mapper("X").child(result_map("author", "Author"));
    let err = compiler.compile_unit("x.xml", &unit).unwrap_err();

    assert!(err.is_unknown_type(), "{err}");
}
