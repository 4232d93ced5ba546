//! Descriptors produced by the compiler.

mod cache;
pub use cache::Cache;

mod discriminator;
pub use discriminator::Discriminator;

mod parameter_map;
pub use parameter_map::{ParameterMap, ParameterMapping, ParameterMode};

pub mod result_map;
pub use result_map::ResultMap;

mod result_mapping;
pub use result_mapping::{Binding, BindingKey, ResultFlags, ResultMapping};

mod statement;
pub use statement::{CommandKind, ResultSetType, Statement, StatementKind};
