use super::Error;

/// Deferral signal: the declaration depends on something that has not been
/// loaded yet.
///
/// This is the only recoverable error kind. The compiler catches it, parks the
/// declaration on the worklist, and retries it at the next checkpoint. It never
/// escapes a compilation run.
#[derive(Debug)]
pub(super) struct IncompleteError {
    missing: Box<str>,
}

impl std::error::Error for IncompleteError {}

impl core::fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "incomplete: {}", self.missing)
    }
}

impl Error {
    /// Creates an incomplete (deferral) signal describing what is missing.
    pub fn incomplete(missing: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Incomplete(IncompleteError {
            missing: missing.into().into(),
        }))
    }

    /// Returns `true` if this error is a deferral signal rather than a
    /// configuration error.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Incomplete(_))
    }
}
