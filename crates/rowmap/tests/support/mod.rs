#![allow(dead_code)]

use rowmap::types::TypeDescriptor;
use rowmap::{Compiler, Node, Settings, TypeCatalog};

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call from every
/// test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A small blogging domain.
pub fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::with_builtins();

    for descriptor in [
        TypeDescriptor::bean("Author")
            .property("id", "int")
            .property("username", "String")
            .property("email", "String")
            .property("bio", "String"),
        TypeDescriptor::bean("Tag")
            .property("id", "int")
            .property("name", "String"),
        TypeDescriptor::bean("Comment")
            .property("id", "int")
            .property("body", "String"),
        TypeDescriptor::bean("Post")
            .property("id", "int")
            .property("subject", "String")
            .property("author", "Author")
            .property("tags", "List")
            .property("comments", "List"),
        TypeDescriptor::bean("DraftPost")
            .extends("Post")
            .property("reason", "String"),
        TypeDescriptor::bean("Blog")
            .property("id", "int")
            .property("title", "String")
            .property("author", "Author")
            .property("posts", "List"),
        TypeDescriptor::new("ImmutableAuthor", rowmap::types::TypeKind::Bean)
            .named_constructor(&[("id", "int"), ("username", "String")])
            .getter("id", "int")
            .getter("username", "String"),
        TypeDescriptor::bean("Vehicle")
            .property("id", "int")
            .property("vin", "String"),
        TypeDescriptor::bean("Car")
            .extends("Vehicle")
            .property("doorCount", "int"),
        TypeDescriptor::bean("Truck")
            .extends("Vehicle")
            .property("boxSize", "int")
            .property("driver", "Author"),
    ] {
        catalog.insert(descriptor);
    }

    catalog
}

pub fn compiler() -> Compiler {
    compiler_with(Settings::default())
}

pub fn compiler_with(settings: Settings) -> Compiler {
    init_tracing();
    Compiler::builder()
        .settings(settings)
        .catalog(catalog())
        .build()
}

pub fn mapper(namespace: &str) -> Node {
    Node::new("mapper").attr("namespace", namespace)
}

pub fn result_map(id: &str, ty: &str) -> Node {
    Node::new("resultMap").attr("id", id).attr("type", ty)
}

pub fn id(property: &str, column: &str) -> Node {
    Node::new("id").attr("property", property).attr("column", column)
}

pub fn result(property: &str, column: &str) -> Node {
    Node::new("result")
        .attr("property", property)
        .attr("column", column)
}

pub fn select(id: &str) -> Node {
    Node::new("select").attr("id", id)
}

/// Columns of a result map's bindings, in order.
pub fn columns(compiler_registry: &rowmap::Registry, id: &str) -> Vec<String> {
    compiler_registry
        .result_map(id)
        .unwrap_or_else(|| panic!("result map `{id}` is not registered"))
        .mappings()
        .iter()
        .map(|mapping| mapping.column_name().unwrap_or_default().to_string())
        .collect()
}
