use crate::assistant::Assistant;
use crate::cache_ref::CacheRefResolver;
use crate::compiler::Context;
use crate::compose::Composer;
use crate::fragments::Fragment;
use crate::statement::StatementResolver;
use crate::worklist::Worklist;

use rowmap_core::decl::Node;
use rowmap_core::{bail, Error, Result};

use std::collections::HashSet;

const STATEMENT_ELEMENTS: [&str; 4] = ["select", "insert", "update", "delete"];

/// Compiles the declarations of one mapping unit.
pub(crate) struct UnitCompiler<'a, 'cx> {
    cx: &'a mut Context<'cx>,
    worklist: &'a Worklist,
    resource: &'a str,
}

impl<'a, 'cx> UnitCompiler<'a, 'cx> {
    pub(crate) fn new(cx: &'a mut Context<'cx>, worklist: &'a Worklist, resource: &'a str) -> Self {
        UnitCompiler {
            cx,
            worklist,
            resource,
        }
    }

    pub(crate) fn compile(&mut self, root: &Node) -> Result<()> {
        if !root.is("mapper") {
            bail!("a mapping unit must have a <mapper> root, found <{}>", root.name());
        }

        let assistant = Assistant::new(root.attribute("namespace").unwrap_or_default())?;
        let namespace = assistant.namespace();

        tracing::debug!(namespace, resource = self.resource, "compiling mapping unit");
        self.cx.registry.add_unit(namespace, self.resource)?;

        let cache = root.first_child("cache");
        let cache_ref = root.first_child("cache-ref");

        if let (Some(_), Some(cache_ref)) = (cache, cache_ref) {
            let target = cache_ref.attribute("namespace").unwrap_or_default();
            return Err(Error::conflicting_cache(namespace, target));
        }

        if let Some(cache) = cache {
            self.cache(&assistant, cache)?;
        }

        if let Some(cache_ref) = cache_ref {
            self.cache_ref(&assistant, cache_ref)?;
        }

        for node in root.children_named("parameterMap") {
            let parameter_map = assistant.parameter_map(self.cx, node)?;
            self.cx.registry.add_parameter_map(parameter_map)?;
        }

        for (position, node) in root.children_named("resultMap").enumerate() {
            self.result_map(&assistant, node, position)?;
        }

        let database_id = self.cx.settings.database_id.clone();

        if database_id.is_some() {
            self.fragments(&assistant, root, database_id.as_deref())?;
        }
        self.fragments(&assistant, root, None)?;

        let mut dialect_specific = HashSet::new();
        if database_id.is_some() {
            self.statements(&assistant, root, database_id.as_deref(), &mut dialect_specific)?;
        }
        self.statements(&assistant, root, None, &mut dialect_specific)?;

        Ok(())
    }

    fn cache(&mut self, assistant: &Assistant, node: &Node) -> Result<()> {
        let cache = assistant.new_cache(self.cx, node)?;
        self.cx.registry.add_cache(cache.clone())?;

        if let Some(unit) = self.cx.registry.unit_mut(assistant.namespace()) {
            unit.cache = Some(cache);
        }

        Ok(())
    }

    fn cache_ref(&mut self, assistant: &Assistant, node: &Node) -> Result<()> {
        let namespace = assistant.namespace();
        let target = node.required_attribute("namespace")?;

        if target == namespace {
            bail!("mapping unit `{}` cannot reference its own cache", namespace);
        }

        self.cx.registry.add_cache_ref(namespace, target);
        if let Some(unit) = self.cx.registry.unit_mut(namespace) {
            unit.cache_ref = Some(target.to_string());
        }

        let resolver = CacheRefResolver::new(namespace, target);
        match resolver.resolve(self.cx) {
            Ok(()) => Ok(()),
            Err(e) if e.is_incomplete() => {
                if let Some(unit) = self.cx.registry.unit_mut(namespace) {
                    unit.unresolved_cache_ref = true;
                }
                self.worklist.enqueue_cache_ref(resolver);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn result_map(&mut self, assistant: &Assistant, node: &Node, position: usize) -> Result<()> {
        let mut composer = Composer::new(self.cx, assistant);
        composer.compose_top_level(node, position)?;

        for draft in composer.into_drafts() {
            if self.worklist.is_result_map_parked(&draft.id) {
                return Err(Error::duplicate_id("result map", &draft.id));
            }

            match draft.resolve(self.cx) {
                Ok(()) => {}
                Err(e) if e.is_incomplete() => self.worklist.enqueue_result_map(draft, self.cx.registry)?,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Adds the `<sql>` fragments tagged with `database_id`, or the untagged
    /// ones when `database_id` is `None`.
    fn fragments(&mut self, assistant: &Assistant, root: &Node, database_id: Option<&str>) -> Result<()> {
        for node in root.children_named("sql") {
            if node.attribute("databaseId") != database_id {
                continue;
            }

            let id = assistant.apply_namespace(node.required_attribute("id")?, false)?;
            self.cx.fragments.insert(Fragment {
                id,
                database_id: database_id.map(str::to_string),
                node: node.clone(),
            });
        }

        Ok(())
    }

    /// Builds the statements tagged with `database_id`, or the untagged ones
    /// when `database_id` is `None`. An untagged statement is skipped when a
    /// statement with the same id was declared for the configured dialect.
    fn statements(
        &mut self,
        assistant: &Assistant,
        root: &Node,
        database_id: Option<&str>,
        dialect_specific: &mut HashSet<String>,
    ) -> Result<()> {
        let nodes = root
            .children()
            .iter()
            .filter(|node| STATEMENT_ELEMENTS.contains(&node.name()))
            .filter(|node| node.attribute("databaseId") == database_id);

        for node in nodes {
            let resolver = StatementResolver::new(assistant, node)?;

            if database_id.is_some() {
                dialect_specific.insert(resolver.id().to_string());
            } else if dialect_specific.contains(resolver.id()) {
                continue;
            }

            match resolver.resolve(self.cx) {
                Ok(()) => {}
                Err(e) if e.is_incomplete() => self.worklist.enqueue_statement(resolver),
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
