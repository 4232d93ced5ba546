use crate::types::TypeName;
use serde::Serialize;

/// An explicit list of statement parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterMap {
    pub id: String,
    pub ty: TypeName,
    pub mappings: Vec<ParameterMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterMapping {
    pub property: String,
    pub ty: TypeName,
    pub jdbc_type: Option<String>,
    pub mode: ParameterMode,

    /// Result map used to read rows returned through an `out` cursor
    /// parameter.
    pub result_map: Option<String>,

    pub type_handler: Option<TypeName>,

    /// Digits after the decimal point for numeric `out` parameters.
    pub numeric_scale: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

impl ParameterMap {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ParameterMode {
    pub fn from_name(name: &str) -> Option<ParameterMode> {
        match name.to_ascii_uppercase().as_str() {
            "IN" => Some(ParameterMode::In),
            "OUT" => Some(ParameterMode::Out),
            "INOUT" => Some(ParameterMode::InOut),
            _ => None,
        }
    }

    pub fn is_out(self) -> bool {
        matches!(self, ParameterMode::Out | ParameterMode::InOut)
    }
}
