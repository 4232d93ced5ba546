#[macro_use]
mod error;
pub use error::{Error, IntoError};

pub mod decl;
pub use decl::Node;

pub mod mapping;

pub mod reflect;
pub use reflect::{Introspector, MetaCache, TypeMetadata};

mod registry;
pub use registry::{Registry, UnitState};

mod settings;
pub use settings::{AutoMappingBehavior, Settings};

pub mod types;
pub use types::{AliasRegistry, TypeCatalog, TypeName};

/// A Result type alias that uses rowmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
