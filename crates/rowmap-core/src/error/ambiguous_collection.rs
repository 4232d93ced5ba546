use super::Error;

/// Error when a nested collection gives no way to determine its value type.
///
/// Raised when a `collection` element has neither a `resultMap` nor a
/// `javaType` attribute and the enclosing type has no settable property with
/// the collection's name.
#[derive(Debug)]
pub(super) struct AmbiguousCollectionError {
    property: Box<str>,
}

impl std::error::Error for AmbiguousCollectionError {}

impl core::fmt::Display for AmbiguousCollectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous collection type for property `{}`; specify `javaType` or `resultMap`",
            self.property
        )
    }
}

impl Error {
    /// Creates an ambiguous collection error for the named property.
    pub fn ambiguous_collection(property: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::AmbiguousCollection(
            AmbiguousCollectionError {
                property: property.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an ambiguous collection error.
    pub fn is_ambiguous_collection(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::AmbiguousCollection(_))
    }
}
