//! Global settings consulted while compiling.

use serde::Deserialize;

/// Compilation settings.
///
/// Deserializes from camelCase keys; every key is optional.
///
/// ```
/// # use rowmap_core::{AutoMappingBehavior, Settings};
/// let settings: Settings = serde_json::from_str(r#"{ "autoMappingBehavior": "FULL" }"#).unwrap();
/// assert_eq!(settings.auto_mapping_behavior, AutoMappingBehavior::Full);
/// assert!(settings.cache_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub auto_mapping_behavior: AutoMappingBehavior,
    pub lazy_loading_enabled: bool,
    pub cache_enabled: bool,

    /// Dialect tag. Fragments and statements tagged with another dialect are
    /// ignored.
    pub database_id: Option<String>,
}

/// Which columns are mapped without an explicit binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AutoMappingBehavior {
    /// Only explicit bindings are applied.
    None,

    /// Unmapped columns are applied to result maps without nested result
    /// maps.
    #[default]
    Partial,

    /// Unmapped columns are applied to every result map.
    Full,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_mapping_behavior: AutoMappingBehavior::Partial,
            lazy_loading_enabled: false,
            cache_enabled: true,
            database_id: None,
        }
    }
}

impl Settings {
    pub fn auto_mapping_behavior(mut self, behavior: AutoMappingBehavior) -> Self {
        self.auto_mapping_behavior = behavior;
        self
    }

    pub fn lazy_loading_enabled(mut self, enabled: bool) -> Self {
        self.lazy_loading_enabled = enabled;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = Some(database_id.into());
        self
    }
}

impl AutoMappingBehavior {
    /// Whether unmapped properties are filled automatically for a result map
    /// with the given nesting.
    pub fn applies_to(self, has_nested_result_maps: bool) -> bool {
        match self {
            AutoMappingBehavior::None => false,
            AutoMappingBehavior::Partial => !has_nested_result_maps,
            AutoMappingBehavior::Full => true,
        }
    }
}
