//! Type identifiers and the host-supplied description of target types.

mod alias;
pub use alias::AliasRegistry;

mod catalog;
pub use catalog::TypeCatalog;

mod descriptor;
pub use descriptor::{Constructor, FieldDecl, Method, Param, TypeDescriptor, TypeKind};

mod name;
pub use name::TypeName;
