//! The compiled model: every descriptor produced by a compilation run, keyed
//! by qualified id.

use crate::mapping::{Cache, ParameterMap, ResultMap, Statement};
use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Default, Serialize)]
pub struct Registry {
    result_maps: IndexMap<String, ResultMap>,
    parameter_maps: IndexMap<String, ParameterMap>,
    statements: IndexMap<String, Statement>,
    caches: IndexMap<String, Arc<Cache>>,

    /// Requesting namespace to referenced namespace.
    cache_refs: IndexMap<String, String>,

    units: IndexMap<String, UnitState>,
    loaded_resources: IndexSet<String>,
}

/// Per-namespace state tracked across checkpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitState {
    pub namespace: String,
    pub resource: String,

    /// The cache statements of this unit use, either declared by the unit
    /// or attached through a cache reference.
    pub cache: Option<Arc<Cache>>,

    /// Namespace named by the unit's `cache-ref`.
    pub cache_ref: Option<String>,

    /// Set while the unit's cache reference waits for its target.
    pub unresolved_cache_ref: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result_map(&mut self, result_map: ResultMap) -> Result<()> {
        if self.result_maps.contains_key(result_map.id()) {
            return Err(Error::duplicate_id("result map", result_map.id()));
        }

        self.result_maps
            .insert(result_map.id().to_string(), result_map);
        Ok(())
    }

    pub fn result_map(&self, id: &str) -> Option<&ResultMap> {
        self.result_maps.get(id)
    }

    pub fn has_result_map(&self, id: &str) -> bool {
        self.result_maps.contains_key(id)
    }

    pub fn result_maps(&self) -> impl Iterator<Item = &ResultMap> {
        self.result_maps.values()
    }

    /// Whether rows for `id` are assembled from nested result maps, either
    /// directly or through any result map its discriminator can select.
    pub fn has_nested_result_maps(&self, id: &str) -> bool {
        let mut visited = IndexSet::new();
        self.nested_through_discriminator(id, &mut visited)
    }

    fn nested_through_discriminator<'a>(&'a self, id: &'a str, visited: &mut IndexSet<&'a str>) -> bool {
        if !visited.insert(id) {
            return false;
        }

        let Some(result_map) = self.result_maps.get(id) else {
            return false;
        };

        if result_map.has_nested_result_maps() {
            return true;
        }

        result_map.discriminator().is_some_and(|discriminator| {
            discriminator
                .result_map_ids()
                .any(|case| self.nested_through_discriminator(case, visited))
        })
    }

    pub fn add_parameter_map(&mut self, parameter_map: ParameterMap) -> Result<()> {
        if self.parameter_maps.contains_key(parameter_map.id()) {
            return Err(Error::duplicate_id("parameter map", parameter_map.id()));
        }

        self.parameter_maps
            .insert(parameter_map.id().to_string(), parameter_map);
        Ok(())
    }

    pub fn parameter_map(&self, id: &str) -> Option<&ParameterMap> {
        self.parameter_maps.get(id)
    }

    pub fn has_parameter_map(&self, id: &str) -> bool {
        self.parameter_maps.contains_key(id)
    }

    pub fn parameter_maps(&self) -> impl Iterator<Item = &ParameterMap> {
        self.parameter_maps.values()
    }

    pub fn add_statement(&mut self, statement: Statement) -> Result<()> {
        if self.statements.contains_key(statement.id()) {
            return Err(Error::duplicate_id("statement", statement.id()));
        }

        self.statements
            .insert(statement.id().to_string(), statement);
        Ok(())
    }

    pub fn statement(&self, id: &str) -> Option<&Statement> {
        self.statements.get(id)
    }

    pub fn has_statement(&self, id: &str) -> bool {
        self.statements.contains_key(id)
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.values()
    }

    pub fn add_cache(&mut self, cache: Arc<Cache>) -> Result<()> {
        if self.caches.contains_key(cache.id()) {
            return Err(Error::duplicate_id("cache", cache.id()));
        }

        self.caches.insert(cache.id().to_string(), cache);
        Ok(())
    }

    /// The cache declared by the unit `namespace`.
    pub fn cache(&self, namespace: &str) -> Option<&Arc<Cache>> {
        self.caches.get(namespace)
    }

    pub fn caches(&self) -> impl Iterator<Item = &Arc<Cache>> {
        self.caches.values()
    }

    pub fn add_cache_ref(&mut self, namespace: impl Into<String>, target: impl Into<String>) {
        self.cache_refs.insert(namespace.into(), target.into());
    }

    /// Namespace whose cache `namespace` references.
    pub fn cache_ref(&self, namespace: &str) -> Option<&str> {
        self.cache_refs.get(namespace).map(String::as_str)
    }

    pub fn cache_refs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cache_refs
            .iter()
            .map(|(namespace, target)| (namespace.as_str(), target.as_str()))
    }

    /// Starts tracking the unit `namespace` loaded from `resource`.
    pub fn add_unit(&mut self, namespace: &str, resource: &str) -> Result<&mut UnitState> {
        if self.units.contains_key(namespace) {
            return Err(Error::duplicate_id("namespace", namespace));
        }

        let unit = UnitState {
            namespace: namespace.to_string(),
            resource: resource.to_string(),
            ..UnitState::default()
        };

        Ok(self.units.entry(namespace.to_string()).or_insert(unit))
    }

    pub fn unit_mut(&mut self, namespace: &str) -> Option<&mut UnitState> {
        self.units.get_mut(namespace)
    }

    pub fn unit(&self, namespace: &str) -> Option<&UnitState> {
        self.units.get(namespace)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitState> {
        self.units.values()
    }

    /// Records `resource` as loaded. Returns `false` if it already was.
    pub fn mark_loaded(&mut self, resource: &str) -> bool {
        self.loaded_resources.insert(resource.to_string())
    }

    pub fn is_loaded(&self, resource: &str) -> bool {
        self.loaded_resources.contains(resource)
    }

    pub fn loaded_resources(&self) -> impl Iterator<Item = &str> {
        self.loaded_resources.iter().map(String::as_str)
    }
}
