use rowmap_core::Node;

use indexmap::IndexMap;
use serde::Serialize;

/// A reusable declaration subtree, included into statements by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub id: String,
    pub database_id: Option<String>,
    pub node: Node,
}

/// Fragments declared during one compilation run.
///
/// Each id holds at most one fragment for the configured dialect and one
/// untagged fragment. Lookups prefer the dialect-specific one. Fragments
/// tagged with any other dialect are ignored.
#[derive(Debug, Default)]
pub struct FragmentPool {
    database_id: Option<String>,
    fragments: IndexMap<String, Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    specific: Option<Fragment>,
    agnostic: Option<Fragment>,
}

impl FragmentPool {
    pub fn new(database_id: Option<String>) -> Self {
        FragmentPool {
            database_id,
            fragments: IndexMap::new(),
        }
    }

    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    /// Whether a declaration tagged with `database_id` is used in this run.
    pub fn accepts(&self, database_id: Option<&str>) -> bool {
        match database_id {
            None => true,
            Some(tag) => self.database_id.as_deref() == Some(tag),
        }
    }

    /// Adds `fragment`. Returns `false` when it is ignored, either because
    /// it targets another dialect or because its slot is already taken.
    pub fn insert(&mut self, fragment: Fragment) -> bool {
        if !self.accepts(fragment.database_id.as_deref()) {
            return false;
        }

        let slots = self.fragments.entry(fragment.id.clone()).or_default();
        let slot = if fragment.database_id.is_some() {
            &mut slots.specific
        } else {
            &mut slots.agnostic
        };

        if slot.is_some() {
            return false;
        }

        *slot = Some(fragment);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Fragment> {
        let slots = self.fragments.get(id)?;
        slots.specific.as_ref().or(slots.agnostic.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The fragment returned by [`FragmentPool::get`] for every id.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments
            .values()
            .filter_map(|slots| slots.specific.as_ref().or(slots.agnostic.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(id: &str, database_id: Option<&str>, text: &str) -> Fragment {
        Fragment {
            id: id.to_string(),
            database_id: database_id.map(str::to_string),
            node: Node::new("sql").with_text(text),
        }
    }

    #[test]
    fn ignores_other_dialects() {
        let mut pool = FragmentPool::new(Some("pg".to_string()));
        assert!(!pool.insert(fragment("a.cols", Some("mysql"), "x")));
        assert!(pool.is_empty());
    }

    #[test]
    fn without_dialect_only_agnostic_fragments_count() {
        let mut pool = FragmentPool::new(None);
        assert!(!pool.insert(fragment("a.cols", Some("pg"), "x")));
        assert!(pool.insert(fragment("a.cols", None, "y")));
        assert_eq!(pool.get("a.cols").unwrap().node.text.as_deref(), Some("y"));
    }
}
