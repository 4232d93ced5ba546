use super::Error;

/// Error when two declarations of the same kind share a qualified id.
#[derive(Debug)]
pub(super) struct DuplicateIdError {
    what: &'static str,
    id: Box<str>,
}

impl std::error::Error for DuplicateIdError {}

impl core::fmt::Display for DuplicateIdError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate {} id `{}`", self.what, self.id)
    }
}

impl Error {
    /// Creates a duplicate id error. `what` names the declaration kind, e.g.
    /// `"result map"` or `"statement"`.
    pub fn duplicate_id(what: &'static str, id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateId(DuplicateIdError {
            what,
            id: id.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate id error.
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::DuplicateId(_))
    }
}
