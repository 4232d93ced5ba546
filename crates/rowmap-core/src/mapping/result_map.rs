use super::{Discriminator, ResultMapping};
use crate::types::TypeName;
use indexmap::IndexSet;
use serde::Serialize;

/// A resolved plan for turning one row shape into one value.
///
/// Result maps are immutable once built. Nested result maps declared inline
/// are stored next to top-level ones under derived ids, so every result map is
/// addressed the same way.
#[derive(Debug, Clone, Serialize)]
pub struct ResultMap {
    id: String,
    ty: TypeName,

    /// All bindings, inherited ones first.
    mappings: Vec<ResultMapping>,

    discriminator: Option<Discriminator>,

    /// Id of the result map this one inherits from.
    extends: Option<String>,

    /// `None` falls back to the global auto-mapping behavior.
    auto_mapping: Option<bool>,

    /// Indices into `mappings`.
    id_mappings: Vec<usize>,
    constructor_mappings: Vec<usize>,
    property_mappings: Vec<usize>,

    /// Upper-cased columns read by explicit bindings.
    mapped_columns: IndexSet<String>,
    mapped_properties: IndexSet<String>,

    has_nested_result_maps: bool,
    has_nested_queries: bool,

    /// Settable properties of the target type that no explicit binding
    /// covers. Empty unless auto-mapping is in effect for this result map.
    auto_mapping_targets: Vec<String>,
}

/// Assembles a [`ResultMap`] and computes its derived views.
#[derive(Debug)]
pub struct Builder {
    id: String,
    ty: TypeName,
    mappings: Vec<ResultMapping>,
    discriminator: Option<Discriminator>,
    extends: Option<String>,
    auto_mapping: Option<bool>,
    constructor_order: Option<Vec<String>>,
    auto_mapping_targets: Vec<String>,
}

impl ResultMap {
    pub fn builder(id: impl Into<String>, ty: impl Into<TypeName>, mappings: Vec<ResultMapping>) -> Builder {
        Builder {
            id: id.into(),
            ty: ty.into(),
            mappings,
            discriminator: None,
            extends: None,
            auto_mapping: None,
            constructor_order: None,
            auto_mapping_targets: vec![],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    pub fn mappings(&self) -> &[ResultMapping] {
        &self.mappings
    }

    /// Finds the non-constructor binding for `property`.
    pub fn mapping_for(&self, property: &str) -> Option<&ResultMapping> {
        self.property_mappings()
            .find(|mapping| mapping.property() == Some(property))
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    pub fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub fn auto_mapping(&self) -> Option<bool> {
        self.auto_mapping
    }

    /// Bindings used to identify a row. When none is flagged as an
    /// identifier, every binding participates.
    pub fn id_mappings(&self) -> impl Iterator<Item = &ResultMapping> {
        self.id_mappings.iter().map(|&index| &self.mappings[index])
    }

    /// Constructor bindings, in the order of the matching constructor's
    /// parameters when arguments are named.
    pub fn constructor_mappings(&self) -> impl Iterator<Item = &ResultMapping> {
        self.constructor_mappings
            .iter()
            .map(|&index| &self.mappings[index])
    }

    pub fn property_mappings(&self) -> impl Iterator<Item = &ResultMapping> {
        self.property_mappings
            .iter()
            .map(|&index| &self.mappings[index])
    }

    pub fn mapped_columns(&self) -> &IndexSet<String> {
        &self.mapped_columns
    }

    pub fn mapped_properties(&self) -> &IndexSet<String> {
        &self.mapped_properties
    }

    /// Whether any binding of this result map itself is assembled from a
    /// nested result map. See
    /// [`Registry::has_nested_result_maps`](crate::Registry::has_nested_result_maps)
    /// for the answer including discriminated result maps.
    pub fn has_nested_result_maps(&self) -> bool {
        self.has_nested_result_maps
    }

    pub fn has_nested_queries(&self) -> bool {
        self.has_nested_queries
    }

    pub fn auto_mapping_targets(&self) -> &[String] {
        &self.auto_mapping_targets
    }
}

impl Builder {
    pub fn discriminator(mut self, discriminator: Option<Discriminator>) -> Self {
        self.discriminator = discriminator;
        self
    }

    pub fn extends(mut self, extends: Option<String>) -> Self {
        self.extends = extends;
        self
    }

    pub fn auto_mapping(mut self, auto_mapping: Option<bool>) -> Self {
        self.auto_mapping = auto_mapping;
        self
    }

    /// Parameter names of the constructor matched by the named constructor
    /// bindings. Constructor bindings are ordered by it.
    pub fn constructor_order(mut self, order: Option<Vec<String>>) -> Self {
        self.constructor_order = order;
        self
    }

    pub fn auto_mapping_targets(mut self, targets: Vec<String>) -> Self {
        self.auto_mapping_targets = targets;
        self
    }

    pub fn build(self) -> ResultMap {
        let mut id_mappings = vec![];
        let mut constructor_mappings = vec![];
        let mut property_mappings = vec![];
        let mut mapped_columns = IndexSet::new();
        let mut mapped_properties = IndexSet::new();
        let mut has_nested_result_maps = false;
        let mut has_nested_queries = false;

        for (index, mapping) in self.mappings.iter().enumerate() {
            has_nested_queries |= mapping.nested_query_id().is_some();
            has_nested_result_maps |=
                mapping.nested_result_map_id().is_some() && mapping.result_set.is_none();

            if let Some(column) = &mapping.column {
                mapped_columns.insert(column.to_uppercase());
            } else {
                for composite in &mapping.composites {
                    if let Some(column) = &composite.column {
                        mapped_columns.insert(column.to_uppercase());
                    }
                }
            }

            if let Some(property) = &mapping.property {
                mapped_properties.insert(property.clone());
            }

            if mapping.is_constructor() {
                constructor_mappings.push(index);
            } else {
                property_mappings.push(index);
            }

            if mapping.is_id() {
                id_mappings.push(index);
            }
        }

        if id_mappings.is_empty() {
            id_mappings = (0..self.mappings.len()).collect();
        }

        if let Some(order) = &self.constructor_order {
            let position = |index: &usize| {
                self.mappings[*index]
                    .property()
                    .and_then(|name| order.iter().position(|param| param == name))
                    .unwrap_or(usize::MAX)
            };
            constructor_mappings.sort_by_key(position);
        }

        ResultMap {
            id: self.id,
            ty: self.ty,
            mappings: self.mappings,
            discriminator: self.discriminator,
            extends: self.extends,
            auto_mapping: self.auto_mapping,
            id_mappings,
            constructor_mappings,
            property_mappings,
            mapped_columns,
            mapped_properties,
            has_nested_result_maps,
            has_nested_queries,
            auto_mapping_targets: self.auto_mapping_targets,
        }
    }
}
