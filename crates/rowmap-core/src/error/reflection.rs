use super::Error;

/// Error raised while building or querying property metadata.
///
/// This occurs when:
/// - a type declares overloaded getters with ambiguous return types
/// - a type declares overloaded setters with unrelated parameter types
/// - a binding names a property that has no setter on the target type
/// - a constructor mapping matches no declared constructor
#[derive(Debug)]
pub(super) struct ReflectionError {
    message: Box<str>,
}

impl std::error::Error for ReflectionError {}

impl core::fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "reflection: {}", self.message)
    }
}

impl Error {
    /// Creates a reflection error.
    pub fn reflection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Reflection(ReflectionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a reflection error.
    pub fn is_reflection(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Reflection(_))
    }
}
