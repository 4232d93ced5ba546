mod assistant;

mod cache_ref;

mod compiler;
pub use compiler::{Builder, Compiled, Compiler};

mod compose;

mod fragments;
pub use fragments::{Fragment, FragmentPool};

mod statement;

mod unit;

mod worklist;
pub use worklist::Pending;

pub use rowmap_core::{
    bail, decl, err, mapping, reflect, types, AliasRegistry, AutoMappingBehavior, Error,
    MetaCache, Node, Registry, Result, Settings, TypeCatalog, TypeName,
};
