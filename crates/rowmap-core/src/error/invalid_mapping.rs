use super::Error;

/// Error when a declaration is malformed.
///
/// This covers missing required attributes, attribute values that cannot be
/// parsed, conflicting attributes on one binding (`select` together with
/// `resultMap`), discriminators without a column, and similar problems that
/// can be detected by looking at a single declaration.
#[derive(Debug)]
pub(super) struct InvalidMappingError {
    message: Box<str>,
}

impl std::error::Error for InvalidMappingError {}

impl core::fmt::Display for InvalidMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMapping(InvalidMappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidMapping(_))
    }
}
