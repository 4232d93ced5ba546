use crate::cache_ref::CacheRefResolver;
use crate::compiler::Context;
use crate::compose::Draft;
use crate::statement::StatementResolver;

use rowmap_core::{Error, Registry, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Declarations parked until a dependency shows up.
///
/// Each kind lives behind its own lock, held for a whole retry pass.
#[derive(Debug, Default)]
pub(crate) struct Worklist {
    result_maps: Mutex<Vec<Draft>>,
    cache_refs: Mutex<Vec<CacheRefResolver>>,
    statements: Mutex<Vec<StatementResolver>>,
}

/// What is still waiting, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pending {
    /// Ids of result maps whose `extends` target is missing.
    pub result_maps: Vec<String>,

    /// `(namespace, target)` pairs of unresolved cache references.
    pub cache_refs: Vec<(String, String)>,

    /// Ids of statements with a missing dependency.
    pub statements: Vec<String>,
}

impl Worklist {
    /// Parks a result map draft. Fails if its id is already registered or
    /// parked, or if parking it closes an `extends` cycle among parked
    /// drafts.
    pub(crate) fn enqueue_result_map(&self, draft: Draft, registry: &Registry) -> Result<()> {
        let mut pending = lock(&self.result_maps);

        if registry.has_result_map(&draft.id) || pending.iter().any(|parked| parked.id == draft.id) {
            return Err(Error::duplicate_id("result map", &draft.id));
        }

        tracing::debug!(id = %draft.id, extends = ?draft.extends, "result map deferred");
        pending.push(draft);
        check_extends_cycles(&pending)
    }

    /// Whether a draft with this id is waiting on its `extends` target.
    pub(crate) fn is_result_map_parked(&self, id: &str) -> bool {
        lock(&self.result_maps).iter().any(|parked| parked.id == id)
    }

    pub(crate) fn enqueue_cache_ref(&self, resolver: CacheRefResolver) {
        tracing::debug!(
            namespace = %resolver.namespace,
            target = %resolver.target,
            "cache reference deferred"
        );
        lock(&self.cache_refs).push(resolver);
    }

    pub(crate) fn enqueue_statement(&self, resolver: StatementResolver) {
        tracing::debug!(id = %resolver.id(), "statement deferred");
        lock(&self.statements).push(resolver);
    }

    pub(crate) fn retry_result_maps(&self, cx: &mut Context<'_>) -> Result<()> {
        let mut pending = lock(&self.result_maps);
        retry(&mut pending, |draft| draft.resolve(cx), |draft| draft.id.as_str())?;
        check_extends_cycles(&pending)
    }

    pub(crate) fn retry_cache_refs(&self, cx: &mut Context<'_>) -> Result<()> {
        let mut pending = lock(&self.cache_refs);
        retry(
            &mut pending,
            |resolver| resolver.resolve(cx),
            |resolver| resolver.namespace.as_str(),
        )
    }

    pub(crate) fn retry_statements(&self, cx: &mut Context<'_>) -> Result<()> {
        let mut pending = lock(&self.statements);
        retry(&mut pending, |resolver| resolver.resolve(cx), |resolver| resolver.id())
    }

    pub(crate) fn report(&self) -> Pending {
        Pending {
            result_maps: lock(&self.result_maps)
                .iter()
                .map(|draft| draft.id.clone())
                .collect(),
            cache_refs: lock(&self.cache_refs)
                .iter()
                .map(|resolver| (resolver.namespace.clone(), resolver.target.clone()))
                .collect(),
            statements: lock(&self.statements)
                .iter()
                .map(|resolver| resolver.id().to_string())
                .collect(),
        }
    }
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.result_maps.len() + self.cache_refs.len() + self.statements.len()
    }

    /// One line per pending declaration.
    pub fn describe(&self) -> Vec<String> {
        let result_maps = self
            .result_maps
            .iter()
            .map(|id| format!("result map `{id}`"));
        let cache_refs = self
            .cache_refs
            .iter()
            .map(|(namespace, target)| format!("cache-ref from `{namespace}` to `{target}`"));
        let statements = self
            .statements
            .iter()
            .map(|id| format!("statement `{id}`"));

        result_maps.chain(cache_refs).chain(statements).collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs one pass over `pending`. Resolved entries are removed, incomplete
/// ones stay, and any other error aborts the pass.
fn retry<T>(
    pending: &mut Vec<T>,
    mut resolve: impl FnMut(&T) -> Result<()>,
    id: impl Fn(&T) -> &str,
) -> Result<()> {
    let mut index = 0;

    while index < pending.len() {
        match resolve(&pending[index]) {
            Ok(()) => {
                let resolved = pending.remove(index);
                tracing::debug!(id = %id(&resolved), "deferred declaration resolved");
            }
            Err(e) if e.is_incomplete() => index += 1,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Follows `extends` links between parked drafts. Each draft has at most one
/// parent, so a walk that revisits a draft has found a cycle.
fn check_extends_cycles(pending: &[Draft]) -> Result<()> {
    let parents: HashMap<&str, &str> = pending
        .iter()
        .filter_map(|draft| Some((draft.id.as_str(), draft.extends.as_deref()?)))
        .collect();

    for draft in pending {
        let mut chain = vec![draft.id.as_str()];
        let mut current = draft.id.as_str();

        while let Some(&parent) = parents.get(current) {
            if let Some(start) = chain.iter().position(|&id| id == parent) {
                let mut cycle: Vec<String> = chain[start..].iter().map(|id| id.to_string()).collect();
                cycle.push(parent.to_string());
                return Err(Error::extends_cycle(cycle));
            }

            chain.push(parent);
            current = parent;
        }
    }

    Ok(())
}
