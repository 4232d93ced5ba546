use rowmap_core::types::{TypeDescriptor, TypeKind};
use rowmap_core::{AliasRegistry, TypeCatalog, TypeName};

use pretty_assertions::assert_eq;

fn ty(name: &str) -> TypeName {
    TypeName::from(name)
}

#[test]
fn builtin_aliases_resolve_case_insensitively() {
    let aliases = AliasRegistry::new();

    assert_eq!(aliases.resolve("string"), Some(TypeName::from("String")));
    assert_eq!(aliases.resolve("HashMap"), Some(TypeName::from("HashMap")));
    assert_eq!(aliases.resolve("LRU"), Some(TypeName::from("LruCache")));
    assert_eq!(aliases.resolve("_int"), Some(TypeName::from("int")));
    assert_eq!(aliases.resolve("nope"), None);
}

#[test]
fn registering_a_conflicting_alias_fails() {
    let mut aliases = AliasRegistry::new();

    aliases.register("Author", "blog.Author").unwrap();
    aliases.register("author", "blog.Author").unwrap();

    let err = aliases.register("AUTHOR", "shop.Author").unwrap_err();
    assert!(err.is_invalid_mapping());
}

#[test]
fn resolve_type_falls_back_to_the_catalog() {
    let mut catalog = TypeCatalog::with_builtins();
    catalog.register(TypeDescriptor::bean("blog.Post")).unwrap();

    let aliases = AliasRegistry::new();

    assert_eq!(
        aliases.resolve_type(&catalog, "blog.Post").unwrap(),
        TypeName::from("blog.Post")
    );
    assert_eq!(
        aliases.resolve_type(&catalog, "int").unwrap(),
        TypeName::from("Integer")
    );
    assert!(aliases
        .resolve_type(&catalog, "blog.Missing")
        .unwrap_err()
        .is_unknown_type());
}

#[test]
fn empty_registry_has_no_aliases() {
    assert_eq!(AliasRegistry::empty().aliases().count(), 0);
}

#[test]
fn catalog_rejects_duplicate_types() {
    let mut catalog = TypeCatalog::new();
    catalog.register(TypeDescriptor::bean("Post")).unwrap();

    assert!(catalog
        .register(TypeDescriptor::bean("Post"))
        .unwrap_err()
        .is_duplicate_id());
}

#[test]
fn assignability_follows_superclasses_and_interfaces() {
    let mut catalog = TypeCatalog::with_builtins();
    catalog.register(TypeDescriptor::bean("Animal")).unwrap();
    catalog
        .register(TypeDescriptor::bean("Dog").extends("Animal").implements("Comparable"))
        .unwrap();
    catalog.register(TypeDescriptor::interface("Comparable")).unwrap();

    assert!(catalog.is_assignable(&ty("Animal"), &ty("Dog")));
    assert!(catalog.is_assignable(&ty("Comparable"), &ty("Dog")));
    assert!(catalog.is_assignable(&ty("Object"), &ty("Dog")));
    assert!(!catalog.is_assignable(&ty("Dog"), &ty("Animal")));
    assert!(!catalog.is_assignable(&ty("Object"), &ty("int")));
    assert!(catalog.is_assignable(&ty("Collection"), &ty("ArrayList")));
}

#[test]
fn unknown_types_are_scalars() {
    let catalog = TypeCatalog::with_builtins();

    assert_eq!(catalog.kind(&TypeName::from("HashMap")), TypeKind::Map);
    assert_eq!(catalog.kind(&TypeName::from("ArrayList")), TypeKind::Collection);
    assert_eq!(catalog.kind(&TypeName::from("Mystery")), TypeKind::Scalar);
}
