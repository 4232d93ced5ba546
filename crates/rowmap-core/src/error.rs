mod adhoc;
mod ambiguous_collection;
mod conflicting_cache;
mod duplicate_id;
mod extends_cycle;
mod incomplete;
mod invalid_mapping;
mod reflection;
mod unknown_type;
mod unresolved_references;

use adhoc::AdhocError;
use ambiguous_collection::AmbiguousCollectionError;
use conflicting_cache::ConflictingCacheError;
use duplicate_id::DuplicateIdError;
use extends_cycle::ExtendsCycleError;
use incomplete::IncompleteError;
use invalid_mapping::InvalidMappingError;
use reflection::ReflectionError;
use std::sync::Arc;
use unknown_type::UnknownTypeError;
use unresolved_references::UnresolvedReferencesError;

/// Returns early with an ad-hoc configuration error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc configuration error.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while compiling mapping declarations.
///
/// Two families of errors exist. The *incomplete* signal (see
/// [`Error::is_incomplete`]) means a declaration depends on something that has
/// not been loaded yet; the compiler catches it and defers the declaration.
/// Every other kind is a configuration error that aborts the compilation run.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root
    /// cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) if inner.cause.is_none() => inner.kind,
                Ok(inner) => ErrorKind::Adhoc(AdhocError::new(inner.kind.to_string())),
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    pub(crate) fn root(&self) -> &Error {
        let mut root = self;
        for err in self.chain() {
            root = err;
        }
        root
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            // Outermost context first, root cause last.
            f.debug_list()
                .entries(self.chain().map(|err| err.kind()))
                .finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Incomplete(IncompleteError),
    InvalidMapping(InvalidMappingError),
    DuplicateId(DuplicateIdError),
    ExtendsCycle(ExtendsCycleError),
    AmbiguousCollection(AmbiguousCollectionError),
    ConflictingCache(ConflictingCacheError),
    UnknownType(UnknownTypeError),
    Reflection(ReflectionError),
    UnresolvedReferences(UnresolvedReferencesError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Incomplete(err) => core::fmt::Display::fmt(err, f),
            InvalidMapping(err) => core::fmt::Display::fmt(err, f),
            DuplicateId(err) => core::fmt::Display::fmt(err, f),
            ExtendsCycle(err) => core::fmt::Display::fmt(err, f),
            AmbiguousCollection(err) => core::fmt::Display::fmt(err, f),
            ConflictingCache(err) => core::fmt::Display::fmt(err, f),
            UnknownType(err) => core::fmt::Display::fmt(err, f),
            Reflection(err) => core::fmt::Display::fmt(err, f),
            UnresolvedReferences(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown rowmap error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

impl IntoError for &str {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_one_word() {
        assert_eq!(core::mem::size_of::<Error>(), core::mem::size_of::<usize>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("bad attribute: {}", "fetchType"));
        assert_eq!(err.to_string(), "bad attribute: fetchType");
    }

    #[test]
    fn error_chain_display() {
        let err = Error::duplicate_id("result map", "blog.detail")
            .context(err!("result map `blog.detail`"))
            .context(err!("unit `blog` (blog.xml)"));

        assert_eq!(
            err.to_string(),
            "unit `blog` (blog.xml): result map `blog.detail`: \
             duplicate result map id `blog.detail`"
        );
        assert!(err.is_duplicate_id());
    }

    #[test]
    fn alternate_debug_lists_the_chain() {
        let err = Error::incomplete("fragment `blog.cols` is not loaded yet")
            .context("in statement `blog.find`");

        let debug = format!("{err:#?}");
        assert!(debug.find("statement").unwrap() < debug.find("fragment").unwrap());
    }

    #[test]
    fn incomplete_survives_context() {
        let err = Error::incomplete("result map `blog.base` is not loaded yet")
            .context("while composing `blog.detail`");

        assert!(err.is_incomplete());
        assert!(!err.is_extends_cycle());
    }

    #[test]
    fn wraps_anyhow_errors() {
        let err: Error = anyhow::anyhow!("catalog unavailable").into();
        assert_eq!(err.to_string(), "catalog unavailable");
        assert!(!err.is_incomplete());
    }
}
