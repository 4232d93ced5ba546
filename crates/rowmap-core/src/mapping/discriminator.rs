use crate::types::TypeName;
use indexmap::IndexMap;
use serde::Serialize;

/// Chooses among alternative result maps based on one column's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discriminator {
    pub column: String,

    /// Type the column value is read as before it is stringified.
    pub ty: TypeName,

    pub jdbc_type: Option<String>,
    pub type_handler: Option<TypeName>,

    /// Stringified column value to result map id, in declaration order.
    pub cases: IndexMap<String, String>,
}

impl Discriminator {
    /// The result map selected by `value`. An unmatched value selects
    /// nothing; the caller keeps using the enclosing result map.
    pub fn case_for(&self, value: &str) -> Option<&str> {
        self.cases.get(value).map(String::as_str)
    }

    pub fn result_map_ids(&self) -> impl Iterator<Item = &str> {
        self.cases.values().map(String::as_str)
    }
}
