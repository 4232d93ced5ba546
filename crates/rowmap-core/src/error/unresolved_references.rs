use super::Error;

/// Error reported when a host asks for a complete model but some declarations
/// are still waiting on dependencies that never appeared.
#[derive(Debug)]
pub(super) struct UnresolvedReferencesError {
    pending: Vec<String>,
}

impl std::error::Error for UnresolvedReferencesError {}

impl core::fmt::Display for UnresolvedReferencesError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} declaration(s) could not be resolved: {}",
            self.pending.len(),
            self.pending.join(", ")
        )
    }
}

impl Error {
    /// Creates an unresolved references error listing the pending
    /// declarations.
    pub fn unresolved_references(pending: Vec<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvedReferences(
            UnresolvedReferencesError { pending },
        ))
    }

    /// Returns `true` if this error is an unresolved references error.
    pub fn is_unresolved_references(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnresolvedReferences(_))
    }
}
