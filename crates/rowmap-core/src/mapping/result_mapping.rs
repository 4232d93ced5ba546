use crate::types::TypeName;
use serde::Serialize;

/// One binding within a [`ResultMap`](super::ResultMap): where a value comes
/// from and which property or constructor argument receives it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMapping {
    /// Property name, or constructor argument name for constructor bindings.
    /// Unnamed constructor arguments are matched by position.
    pub property: Option<String>,

    /// Source column. Absent for nested mappings that read no column of
    /// their own.
    pub column: Option<String>,

    /// Type of the bound value.
    pub ty: TypeName,

    pub jdbc_type: Option<String>,

    /// Value-conversion collaborator declared for this binding.
    pub type_handler: Option<TypeName>,

    /// How the value is produced.
    pub binding: Binding,

    pub flags: ResultFlags,

    /// Column set for `column="{prop=col,prop2=col2}"` bindings, passed as
    /// parameters to a nested query.
    pub composites: Vec<ResultMapping>,

    /// Columns that must be non-null for a nested object to be created.
    pub not_null_columns: Vec<String>,

    /// Prefix applied to every column consumed by the nested mapping.
    pub column_prefix: Option<String>,

    /// Named result set to load the value from (multiple result sets).
    pub result_set: Option<String>,

    /// Columns of the named result set matched against `column`.
    pub foreign_columns: Vec<String>,

    /// Whether a nested query is fetched on first access rather than eagerly.
    pub lazy: bool,
}

/// Producer of a bound value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Binding {
    /// A plain column value.
    Column,

    /// A nested object assembled from the same row by another result map.
    NestedResultMap(String),

    /// A nested object loaded by running another statement.
    NestedQuery(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ResultFlags {
    /// Identifies the row; used to merge rows of nested collections.
    pub id: bool,

    /// Supplied as a constructor argument rather than through a setter.
    pub constructor: bool,
}

/// Identity of a binding within a result map, used when a child result map
/// overrides bindings inherited through `extends`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    name: String,
    flags: ResultFlags,
}

impl ResultMapping {
    /// A plain column binding with no flags.
    pub fn column(property: impl Into<String>, column: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            property: Some(property.into()),
            column: Some(column.into()),
            ty: ty.into(),
            jdbc_type: None,
            type_handler: None,
            binding: Binding::Column,
            flags: ResultFlags::default(),
            composites: vec![],
            not_null_columns: vec![],
            column_prefix: None,
            result_set: None,
            foreign_columns: vec![],
            lazy: false,
        }
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_id(&self) -> bool {
        self.flags.id
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.constructor
    }

    pub fn nested_result_map_id(&self) -> Option<&str> {
        match &self.binding {
            Binding::NestedResultMap(id) => Some(id),
            _ => None,
        }
    }

    pub fn nested_query_id(&self) -> Option<&str> {
        match &self.binding {
            Binding::NestedQuery(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.composites.is_empty()
    }

    /// The override key of this binding. `position` is the binding's index
    /// among the constructor arguments of its result map and is only used
    /// for unnamed constructor arguments.
    pub fn key(&self, position: usize) -> BindingKey {
        let name = match &self.property {
            Some(property) => property.clone(),
            None => format!("#{position}"),
        };

        BindingKey {
            name,
            flags: self.flags,
        }
    }
}
