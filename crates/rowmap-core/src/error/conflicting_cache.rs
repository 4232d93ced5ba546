use super::Error;

/// Error when a unit both declares its own cache and references another
/// unit's cache.
#[derive(Debug)]
pub(super) struct ConflictingCacheError {
    namespace: Box<str>,
    target: Box<str>,
}

impl std::error::Error for ConflictingCacheError {}

impl core::fmt::Display for ConflictingCacheError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unit `{}` declares a cache and also references the cache of `{}`",
            self.namespace, self.target
        )
    }
}

impl Error {
    /// Creates a conflicting cache error.
    pub fn conflicting_cache(namespace: impl Into<String>, target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConflictingCache(ConflictingCacheError {
            namespace: namespace.into().into(),
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error is a conflicting cache error.
    pub fn is_conflicting_cache(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::ConflictingCache(_))
    }
}
