use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// A resolved type identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root of every type hierarchy. Used when nothing more specific can
    /// be determined for a binding.
    pub fn object() -> Self {
        Self::new("Object")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_object(&self) -> bool {
        self.0 == "Object"
    }

    /// Primitive types use lower-case names (`int`, `boolean`, ...).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.0.as_str(),
            "boolean" | "byte" | "short" | "int" | "long" | "float" | "double" | "char"
        )
    }
}

impl From<&str> for TypeName {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<String> for TypeName {
    fn from(src: String) -> Self {
        Self(src)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}
