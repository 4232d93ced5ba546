//! Property metadata: which properties a type can read and write, and their
//! types.

mod cache;
pub use cache::MetaCache;

mod metadata;
pub use metadata::TypeMetadata;

pub mod property;

use crate::types::{TypeCatalog, TypeKind, TypeName};
use crate::Result;
use std::sync::Arc;

/// Answers property questions about catalog types, including dotted paths
/// such as `author.address.city`.
#[derive(Debug, Clone, Copy)]
pub struct Introspector<'a> {
    catalog: &'a TypeCatalog,
    cache: &'a MetaCache,
}

impl<'a> Introspector<'a> {
    pub fn new(catalog: &'a TypeCatalog, cache: &'a MetaCache) -> Self {
        Self { catalog, cache }
    }

    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    pub fn metadata(&self, ty: &TypeName) -> Result<Arc<TypeMetadata>> {
        self.cache.metadata_for(self.catalog, ty)
    }

    pub fn kind(&self, ty: &TypeName) -> TypeKind {
        self.catalog.kind(ty)
    }

    pub fn has_setter(&self, ty: &TypeName, path: &str) -> Result<bool> {
        Ok(self.setter_type(ty, path)?.is_some())
    }

    pub fn has_getter(&self, ty: &TypeName, path: &str) -> Result<bool> {
        Ok(self.getter_type(ty, path)?.is_some())
    }

    /// The type accepted when writing `path` on `ty`, or `None` if any
    /// segment is not writable.
    ///
    /// Intermediate segments are navigated through their getter type, since
    /// they are read before the last segment is written.
    pub fn setter_type(&self, ty: &TypeName, path: &str) -> Result<Option<TypeName>> {
        let (head, rest) = property::split_path(path);
        let metadata = self.metadata(ty)?;

        match rest {
            None => Ok(metadata.setter_type(head).cloned()),
            Some(rest) => match metadata.getter_type(head) {
                Some(child) => self.setter_type(child, rest),
                None => Ok(None),
            },
        }
    }

    /// The type produced when reading `path` on `ty`, or `None` if any
    /// segment is not readable.
    pub fn getter_type(&self, ty: &TypeName, path: &str) -> Result<Option<TypeName>> {
        let (head, rest) = property::split_path(path);
        let metadata = self.metadata(ty)?;

        match (metadata.getter_type(head), rest) {
            (Some(child), None) => Ok(Some(child.clone())),
            (Some(child), Some(rest)) => self.getter_type(child, rest),
            (None, _) => Ok(None),
        }
    }
}
