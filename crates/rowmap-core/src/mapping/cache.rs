use crate::types::TypeName;
use indexmap::IndexMap;
use serde::Serialize;

/// A cache declared by a unit.
///
/// Only the declaration is recorded; eviction and storage are implemented
/// elsewhere. Units share one instance through `Arc<Cache>`: a unit that
/// references another unit's cache holds the same allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cache {
    /// Namespace of the declaring unit.
    pub id: String,

    pub implementation: TypeName,

    /// Eviction decorator wrapped around the implementation.
    pub eviction: TypeName,

    /// Milliseconds between automatic flushes.
    pub flush_interval: Option<u64>,

    /// Capacity.
    pub size: Option<u32>,

    /// When set, callers receive copies of cached values.
    pub read_write: bool,

    pub blocking: bool,

    pub properties: IndexMap<String, String>,
}

impl Cache {
    /// Alias of the default implementation.
    pub const DEFAULT_IMPLEMENTATION: &'static str = "perpetual";

    /// Alias of the default eviction decorator.
    pub const DEFAULT_EVICTION: &'static str = "lru";

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_read_only(&self) -> bool {
        !self.read_write
    }
}
