use crate::compiler::Context;

use rowmap_core::{Error, Result};

/// A unit waiting to share another unit's cache.
#[derive(Debug, Clone)]
pub(crate) struct CacheRefResolver {
    pub(crate) namespace: String,
    pub(crate) target: String,
}

impl CacheRefResolver {
    pub(crate) fn new(namespace: impl Into<String>, target: impl Into<String>) -> Self {
        CacheRefResolver {
            namespace: namespace.into(),
            target: target.into(),
        }
    }

    /// Attaches the target unit's cache to the requesting unit. Incomplete
    /// until the target unit has declared its cache.
    pub(crate) fn resolve(&self, cx: &mut Context<'_>) -> Result<()> {
        let cache = cx.registry.cache(&self.target).cloned().ok_or_else(|| {
            Error::incomplete(format!(
                "no cache declared by `{}`, referenced from `{}`",
                self.target, self.namespace
            ))
        })?;

        let unit = cx
            .registry
            .unit_mut(&self.namespace)
            .ok_or_else(|| Error::invalid_mapping(format!("unknown mapping unit `{}`", self.namespace)))?;

        unit.cache = Some(cache);
        unit.unresolved_cache_ref = false;
        Ok(())
    }
}
