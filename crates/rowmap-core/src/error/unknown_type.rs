use super::Error;

/// Error when a type name is neither a registered alias nor a type known to
/// the catalog.
#[derive(Debug)]
pub(super) struct UnknownTypeError {
    name: Box<str>,
}

impl std::error::Error for UnknownTypeError {}

impl core::fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "could not resolve type `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown type error.
    pub fn unknown_type(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownType(UnknownTypeError {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown type error.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnknownType(_))
    }
}
