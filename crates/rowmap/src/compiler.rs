use crate::fragments::FragmentPool;
use crate::unit::UnitCompiler;
use crate::worklist::{Pending, Worklist};

use rowmap_core::{
    err, AliasRegistry, Error, Introspector, MetaCache, Node, Registry, Result, Settings,
    TypeCatalog,
};

use std::sync::Arc;

/// Compiles mapping units into a [`Registry`].
///
/// One compiler owns one compilation run. Units are added in any order with
/// [`Compiler::compile_unit`]; declarations that refer to something not yet
/// loaded are parked and retried after every unit and once more by
/// [`Compiler::finish`].
#[derive(Debug)]
pub struct Compiler {
    settings: Settings,
    aliases: AliasRegistry,
    catalog: TypeCatalog,
    meta: Arc<MetaCache>,
    registry: Registry,
    fragments: FragmentPool,
    worklist: Worklist,
}

#[derive(Debug, Default)]
pub struct Builder {
    settings: Option<Settings>,
    aliases: Option<AliasRegistry>,
    catalog: Option<TypeCatalog>,
    meta: Option<Arc<MetaCache>>,
}

/// The outcome of a compilation run.
#[derive(Debug)]
pub struct Compiled {
    registry: Registry,
    pending: Pending,
}

/// Everything a declaration needs while it is compiled or retried.
pub(crate) struct Context<'a> {
    pub(crate) settings: &'a Settings,
    pub(crate) aliases: &'a AliasRegistry,
    pub(crate) introspector: Introspector<'a>,
    pub(crate) registry: &'a mut Registry,
    pub(crate) fragments: &'a mut FragmentPool,
}

impl Compiler {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Descriptors registered so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn fragments(&self) -> &FragmentPool {
        &self.fragments
    }

    /// Declarations currently waiting on a dependency.
    pub fn pending(&self) -> Pending {
        self.worklist.report()
    }

    /// Compiles the unit rooted at `root`, loaded from `resource`, then
    /// retries parked result maps and cache references.
    ///
    /// A resource that was already compiled is not parsed again.
    pub fn compile_unit(&mut self, resource: &str, root: &Node) -> Result<()> {
        let (mut cx, worklist) = self.split();

        if cx.registry.mark_loaded(resource) {
            UnitCompiler::new(&mut cx, worklist, resource)
                .compile(root)
                .map_err(|e| e.context(err!("failed to compile mapping unit `{}`", resource)))?;
        } else {
            tracing::debug!(resource, "mapping unit already loaded; skipping");
        }

        worklist.retry_result_maps(&mut cx)?;
        worklist.retry_cache_refs(&mut cx)?;
        Ok(())
    }

    /// Retries every parked declaration once and returns the compiled model.
    ///
    /// Declarations that still cannot resolve are reported through
    /// [`Compiled::pending`] rather than failing the run.
    pub fn finish(mut self) -> Result<Compiled> {
        let (mut cx, worklist) = self.split();

        worklist.retry_result_maps(&mut cx)?;
        worklist.retry_cache_refs(&mut cx)?;
        worklist.retry_statements(&mut cx)?;

        let pending = worklist.report();
        if !pending.is_empty() {
            tracing::warn!(
                result_maps = pending.result_maps.len(),
                cache_refs = pending.cache_refs.len(),
                statements = pending.statements.len(),
                "declarations still pending after the final checkpoint"
            );
        }

        Ok(Compiled {
            registry: self.registry,
            pending,
        })
    }

    fn split(&mut self) -> (Context<'_>, &Worklist) {
        let cx = Context {
            settings: &self.settings,
            aliases: &self.aliases,
            introspector: Introspector::new(&self.catalog, &self.meta),
            registry: &mut self.registry,
            fragments: &mut self.fragments,
        };

        (cx, &self.worklist)
    }
}

impl Builder {
    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = Some(settings);
        self
    }

    /// Replaces the default alias registry.
    pub fn aliases(&mut self, aliases: AliasRegistry) -> &mut Self {
        self.aliases = Some(aliases);
        self
    }

    /// Types the declarations may bind to. Defaults to
    /// [`TypeCatalog::with_builtins`].
    pub fn catalog(&mut self, catalog: TypeCatalog) -> &mut Self {
        self.catalog = Some(catalog);
        self
    }

    /// Shares property metadata with other compilers.
    pub fn meta_cache(&mut self, meta: Arc<MetaCache>) -> &mut Self {
        self.meta = Some(meta);
        self
    }

    pub fn build(&mut self) -> Compiler {
        let settings = self.settings.take().unwrap_or_default();
        let fragments = FragmentPool::new(settings.database_id.clone());

        Compiler {
            settings,
            aliases: self.aliases.take().unwrap_or_default(),
            catalog: self.catalog.take().unwrap_or_else(TypeCatalog::with_builtins),
            meta: self.meta.take().unwrap_or_default(),
            registry: Registry::new(),
            fragments,
            worklist: Worklist::default(),
        }
    }
}

impl Compiled {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Declarations that never resolved.
    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the registry, or an error listing every declaration that
    /// never resolved.
    pub fn ensure_complete(self) -> Result<Registry> {
        if self.pending.is_empty() {
            Ok(self.registry)
        } else {
            Err(Error::unresolved_references(self.pending.describe()))
        }
    }
}
