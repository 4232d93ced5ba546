use crate::compiler::Context;

use rowmap_core::decl::Node;
use rowmap_core::mapping::{Cache, ParameterMap, ParameterMapping, ParameterMode};
use rowmap_core::types::TypeKind;
use rowmap_core::{bail, Error, Result, TypeName};

use std::sync::Arc;

/// Per-unit helper that qualifies ids and turns declaration attributes into
/// descriptor values.
#[derive(Debug, Clone)]
pub(crate) struct Assistant {
    namespace: String,
}

impl Assistant {
    pub(crate) fn new(namespace: &str) -> Result<Assistant> {
        if namespace.trim().is_empty() {
            return Err(Error::invalid_mapping("a mapping unit requires a non-empty `namespace`"));
        }

        Ok(Assistant {
            namespace: namespace.to_string(),
        })
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualifies `base` with the unit namespace.
    ///
    /// References containing a dot already name another unit and are kept.
    /// Declared ids may not contain a dot unless they carry this unit's own
    /// prefix.
    pub(crate) fn apply_namespace(&self, base: &str, is_reference: bool) -> Result<String> {
        if is_reference {
            if base.contains('.') {
                return Ok(base.to_string());
            }
        } else {
            if base
                .strip_prefix(self.namespace.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
            {
                return Ok(base.to_string());
            }

            if base.contains('.') {
                bail!(
                    "dots are not allowed in element names, please remove it from `{}`",
                    base
                );
            }
        }

        Ok(format!("{}.{}", self.namespace, base))
    }

    /// Resolves an optional type attribute through the alias registry and
    /// the type catalog.
    pub(crate) fn resolve_type(&self, cx: &Context<'_>, name: Option<&str>) -> Result<Option<TypeName>> {
        name.map(|name| cx.aliases.resolve_type(cx.introspector.catalog(), name))
            .transpose()
    }

    /// Type handlers are recorded by name only; aliases are still expanded.
    pub(crate) fn type_handler(&self, cx: &Context<'_>, name: Option<&str>) -> Option<TypeName> {
        name.map(|name| cx.aliases.resolve(name).unwrap_or_else(|| TypeName::new(name)))
    }

    /// Builds the cache declared by `<cache>`.
    pub(crate) fn new_cache(&self, cx: &Context<'_>, node: &Node) -> Result<Arc<Cache>> {
        let implementation = node.attribute_or("type", Cache::DEFAULT_IMPLEMENTATION);
        let eviction = node.attribute_or("eviction", Cache::DEFAULT_EVICTION);

        let cache = Cache {
            id: self.namespace.clone(),
            implementation: cx
                .aliases
                .resolve_type(cx.introspector.catalog(), implementation)?,
            eviction: cx.aliases.resolve_type(cx.introspector.catalog(), eviction)?,
            flush_interval: node.u64_attribute("flushInterval")?,
            size: node.u32_attribute("size")?,
            read_write: !node.bool_attribute("readOnly")?.unwrap_or(false),
            blocking: node.bool_attribute("blocking")?.unwrap_or(false),
            properties: node.children_as_properties()?,
        };

        Ok(Arc::new(cache))
    }

    /// Builds the parameter map declared by `<parameterMap>`.
    pub(crate) fn parameter_map(&self, cx: &Context<'_>, node: &Node) -> Result<ParameterMap> {
        let id = self.apply_namespace(node.required_attribute("id")?, false)?;
        let ty = cx
            .aliases
            .resolve_type(cx.introspector.catalog(), node.required_attribute("type")?)?;

        let mut mappings = vec![];
        for child in node.children() {
            if !child.is("parameter") {
                bail!("<{}> is not allowed inside <parameterMap> `{}`", child.name(), id);
            }
            mappings.push(self.parameter_mapping(cx, child, &ty)?);
        }

        Ok(ParameterMap { id, ty, mappings })
    }

    fn parameter_mapping(&self, cx: &Context<'_>, node: &Node, parameter_type: &TypeName) -> Result<ParameterMapping> {
        let property = node.required_attribute("property")?;
        let jdbc_type = node.attribute("jdbcType");

        let mode = match node.attribute("mode") {
            Some(mode) => ParameterMode::from_name(mode).ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "unknown parameter mode `{}` for property `{}`",
                    mode, property
                ))
            })?,
            None => ParameterMode::In,
        };

        let ty = match self.resolve_type(cx, node.attribute("javaType"))? {
            Some(ty) => ty,
            None if jdbc_type == Some("CURSOR") => TypeName::new("ResultSet"),
            None if cx.introspector.kind(parameter_type) == TypeKind::Map => TypeName::object(),
            None => cx
                .introspector
                .getter_type(parameter_type, property)
                .ok()
                .flatten()
                .unwrap_or_else(TypeName::object),
        };

        let result_map = node
            .attribute("resultMap")
            .map(|id| self.apply_namespace(id, true))
            .transpose()?;

        Ok(ParameterMapping {
            property: property.to_string(),
            ty,
            jdbc_type: jdbc_type.map(str::to_string),
            mode,
            result_map,
            type_handler: self.type_handler(cx, node.attribute("typeHandler")),
            numeric_scale: node.u32_attribute("numericScale")?,
        })
    }
}
