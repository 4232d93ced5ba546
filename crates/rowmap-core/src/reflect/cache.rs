use super::TypeMetadata;
use crate::types::{TypeCatalog, TypeName};
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Lazily populated, shared store of [`TypeMetadata`].
///
/// Metadata is built on first request and reused afterwards. Two threads
/// asking for the same uncached type may both build it; the first insert wins
/// and both builds are identical, so the race is harmless.
#[derive(Debug, Default)]
pub struct MetaCache {
    entries: RwLock<HashMap<TypeName, Arc<TypeMetadata>>>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metadata for `ty`, building it if needed.
    pub fn metadata_for(&self, catalog: &TypeCatalog, ty: &TypeName) -> Result<Arc<TypeMetadata>> {
        if let Some(metadata) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(metadata.clone());
        }

        let built = Arc::new(TypeMetadata::build(catalog, ty)?);
        tracing::trace!(ty = %ty, "built property metadata");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(ty.clone()).or_insert(built).clone())
    }

    /// Number of types with cached metadata.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
