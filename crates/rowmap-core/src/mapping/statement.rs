use super::Cache;
use crate::decl::Node;
use crate::types::TypeName;
use serde::Serialize;
use std::sync::Arc;

/// A compiled query or command declaration.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub id: String,
    pub command: CommandKind,

    /// Dialect the statement is restricted to.
    pub database_id: Option<String>,

    pub kind: StatementKind,
    pub parameter_type: Option<TypeName>,
    pub parameter_map: Option<String>,

    /// Result maps applied to the returned result sets, in order. A
    /// `resultType` declaration produces one inline result map.
    pub result_maps: Vec<String>,

    pub result_set_type: Option<ResultSetType>,
    pub fetch_size: Option<u32>,
    pub timeout: Option<u32>,
    pub flush_cache: bool,
    pub use_cache: bool,
    pub result_ordered: bool,
    pub key_properties: Vec<String>,
    pub key_columns: Vec<String>,
    pub result_sets: Vec<String>,

    /// The unit's cache when the statement was built.
    pub cache: Option<Arc<Cache>>,

    /// Declaration body with every `<include>` expanded.
    pub body: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Statement,
    #[default]
    Prepared,
    Callable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultSetType {
    Default,
    ForwardOnly,
    ScrollInsensitive,
    ScrollSensitive,
}

impl Statement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_select(&self) -> bool {
        self.command == CommandKind::Select
    }
}

impl CommandKind {
    /// Maps a statement element name to its command.
    pub fn from_element(name: &str) -> Option<CommandKind> {
        match name {
            "select" => Some(CommandKind::Select),
            "insert" => Some(CommandKind::Insert),
            "update" => Some(CommandKind::Update),
            "delete" => Some(CommandKind::Delete),
            _ => None,
        }
    }
}

impl StatementKind {
    pub fn from_name(name: &str) -> Option<StatementKind> {
        match name.to_ascii_uppercase().as_str() {
            "STATEMENT" => Some(StatementKind::Statement),
            "PREPARED" => Some(StatementKind::Prepared),
            "CALLABLE" => Some(StatementKind::Callable),
            _ => None,
        }
    }
}

impl ResultSetType {
    pub fn from_name(name: &str) -> Option<ResultSetType> {
        match name.to_ascii_uppercase().as_str() {
            "DEFAULT" => Some(ResultSetType::Default),
            "FORWARD_ONLY" => Some(ResultSetType::ForwardOnly),
            "SCROLL_INSENSITIVE" => Some(ResultSetType::ScrollInsensitive),
            "SCROLL_SENSITIVE" => Some(ResultSetType::ScrollSensitive),
            _ => None,
        }
    }
}
