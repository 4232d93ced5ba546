use crate::assistant::Assistant;
use crate::compiler::Context;
use crate::compose::Draft;

use rowmap_core::decl::Node;
use rowmap_core::mapping::{CommandKind, ResultSetType, Statement, StatementKind};
use rowmap_core::{bail, err, Error, Result, TypeName};

use indexmap::IndexMap;

/// Guards against fragments that include themselves.
const MAX_INCLUDE_DEPTH: usize = 32;

/// A statement declaration, built once everything it refers to is loaded.
#[derive(Debug, Clone)]
pub(crate) struct StatementResolver {
    assistant: Assistant,
    id: String,
    node: Node,
}

impl StatementResolver {
    pub(crate) fn new(assistant: &Assistant, node: &Node) -> Result<StatementResolver> {
        let id = assistant.apply_namespace(node.required_attribute("id")?, false)?;

        Ok(StatementResolver {
            assistant: assistant.clone(),
            id,
            node: node.clone(),
        })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Builds and registers the statement.
    ///
    /// Incomplete while an included fragment, a referenced result map or
    /// parameter map, or the unit's cache reference is missing.
    pub(crate) fn resolve(&self, cx: &mut Context<'_>) -> Result<()> {
        self.build(cx)
            .map_err(|e| e.context(err!("in statement `{}`", self.id)))
    }

    fn build(&self, cx: &mut Context<'_>) -> Result<()> {
        let node = &self.node;
        let namespace = self.assistant.namespace();

        let Some(command) = CommandKind::from_element(node.name()) else {
            bail!("<{}> is not a statement", node.name());
        };

        let unit = cx
            .registry
            .unit(namespace)
            .ok_or_else(|| Error::invalid_mapping(format!("unknown mapping unit `{}`", namespace)))?;

        if unit.unresolved_cache_ref {
            return Err(Error::incomplete(format!(
                "the cache reference of `{}` is not resolved yet",
                namespace
            )));
        }

        let cache = unit.cache.clone().filter(|_| cx.settings.cache_enabled);

        if cx.registry.has_statement(&self.id) {
            return Err(Error::duplicate_id("statement", &self.id));
        }

        let body = self.expand_includes(cx, node, &IndexMap::new(), 0)?;

        let parameter_type = self
            .assistant
            .resolve_type(cx, node.attribute("parameterType"))?;

        let parameter_map = match node.attribute("parameterMap") {
            Some(id) => {
                let id = self.assistant.apply_namespace(id, true)?;
                if !cx.registry.has_parameter_map(&id) {
                    return Err(Error::incomplete(format!("parameter map `{}` is not loaded yet", id)));
                }
                Some(id)
            }
            None => None,
        };

        let mut inline_result_map = None;
        let result_maps = match (node.attribute("resultMap"), node.attribute("resultType")) {
            (Some(ids), _) => {
                let mut result_maps = vec![];
                for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                    let id = self.assistant.apply_namespace(id, true)?;
                    if !cx.registry.has_result_map(&id) {
                        return Err(Error::incomplete(format!("result map `{}` is not loaded yet", id)));
                    }
                    result_maps.push(id);
                }
                result_maps
            }
            (None, Some(result_type)) => {
                let ty = cx
                    .aliases
                    .resolve_type(cx.introspector.catalog(), result_type)?;
                let draft = inline_draft(&self.id, ty);
                let id = draft.id.clone();
                inline_result_map = Some(draft);
                vec![id]
            }
            (None, None) => vec![],
        };

        let is_select = command == CommandKind::Select;

        let kind = match node.attribute("statementType") {
            Some(name) => StatementKind::from_name(name)
                .ok_or_else(|| err!("unknown statementType `{}`", name))?,
            None => StatementKind::default(),
        };

        let result_set_type = node
            .attribute("resultSetType")
            .map(|name| ResultSetType::from_name(name).ok_or_else(|| err!("unknown resultSetType `{}`", name)))
            .transpose()?;

        let statement = Statement {
            id: self.id.clone(),
            command,
            database_id: node.attribute("databaseId").map(str::to_string),
            kind,
            parameter_type,
            parameter_map,
            result_maps,
            result_set_type,
            fetch_size: node.u32_attribute("fetchSize")?,
            timeout: node.u32_attribute("timeout")?,
            flush_cache: node.bool_attribute("flushCache")?.unwrap_or(!is_select),
            use_cache: node.bool_attribute("useCache")?.unwrap_or(is_select),
            result_ordered: node.bool_attribute("resultOrdered")?.unwrap_or(false),
            key_properties: split_list(node.attribute("keyProperty")),
            key_columns: split_list(node.attribute("keyColumn")),
            result_sets: split_list(node.attribute("resultSets")),
            cache,
            body,
        };

        if let Some(draft) = inline_result_map {
            draft.resolve(cx)?;
        }

        cx.registry.add_statement(statement)
    }

    /// Returns a copy of `node` with every `<include>` replaced by the
    /// referenced fragment, itself expanded. `${name}` placeholders in the
    /// fragment are substituted from the include's `<property>` children.
    fn expand_includes(
        &self,
        cx: &Context<'_>,
        node: &Node,
        properties: &IndexMap<String, String>,
        depth: usize,
    ) -> Result<Node> {
        let mut expanded = Node {
            name: node.name.clone(),
            attributes: node
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), substitute(value, properties)))
                .collect(),
            children: Vec::with_capacity(node.children.len()),
            text: node.text.as_deref().map(|text| substitute(text, properties)),
        };

        for child in node.children() {
            let child = if child.is("include") {
                self.include(cx, child, properties, depth)?
            } else {
                self.expand_includes(cx, child, properties, depth)?
            };
            expanded.children.push(child);
        }

        Ok(expanded)
    }

    fn include(
        &self,
        cx: &Context<'_>,
        include: &Node,
        properties: &IndexMap<String, String>,
        depth: usize,
    ) -> Result<Node> {
        if depth >= MAX_INCLUDE_DEPTH {
            bail!(
                "includes nested deeper than {} levels; is a fragment including itself?",
                MAX_INCLUDE_DEPTH
            );
        }

        let refid = substitute(include.required_attribute("refid")?, properties);
        let id = self.assistant.apply_namespace(&refid, true)?;

        let fragment = cx
            .fragments
            .get(&id)
            .ok_or_else(|| Error::incomplete(format!("fragment `{}` is not loaded yet", id)))?;

        let mut scope = properties.clone();
        for (name, value) in include.children_as_properties()? {
            let value = substitute(&value, properties);
            scope.insert(name, value);
        }

        self.expand_includes(cx, &fragment.node, &scope, depth + 1)
    }
}

/// The result map generated for a statement declaring `resultType`.
fn inline_draft(statement_id: &str, ty: TypeName) -> Draft {
    Draft {
        id: format!("{}-Inline", statement_id),
        ty,
        mappings: vec![],
        discriminator: None,
        extends: None,
        auto_mapping: None,
    }
}

/// Replaces `${name}` with the value of `name`. Unknown names are kept.
fn substitute(text: &str, properties: &IndexMap<String, String>) -> String {
    if properties.is_empty() || !text.contains("${") {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match properties.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
