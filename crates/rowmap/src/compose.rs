//! Result map composition.
//!
//! A `<resultMap>` element and every inline nested shape inside it become
//! drafts. Drafts are resolved into [`ResultMap`]s once the result map they
//! extend is registered.

mod discriminator;

use crate::assistant::Assistant;
use crate::compiler::Context;

use rowmap_core::decl::Node;
use rowmap_core::mapping::{Binding, BindingKey, Discriminator, ResultFlags, ResultMap, ResultMapping};
use rowmap_core::types::TypeKind;
use rowmap_core::{bail, err, Error, Result, TypeName};

use std::collections::HashSet;

/// A fully composed result map waiting to be registered.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub(crate) id: String,
    pub(crate) ty: TypeName,

    /// Own bindings, plus those inherited from an enclosing result map for
    /// discriminator cases.
    pub(crate) mappings: Vec<ResultMapping>,

    pub(crate) discriminator: Option<Discriminator>,
    pub(crate) extends: Option<String>,
    pub(crate) auto_mapping: Option<bool>,
}

/// Turns result map declarations into drafts, innermost first.
pub(crate) struct Composer<'a, 'cx> {
    cx: &'a Context<'cx>,
    assistant: &'a Assistant,
    drafts: Vec<Draft>,
}

impl<'a, 'cx> Composer<'a, 'cx> {
    pub(crate) fn new(cx: &'a Context<'cx>, assistant: &'a Assistant) -> Self {
        Composer {
            cx,
            assistant,
            drafts: vec![],
        }
    }

    /// Drafts produced so far. Nested drafts precede the drafts that bind to
    /// them.
    pub(crate) fn into_drafts(self) -> Vec<Draft> {
        self.drafts
    }

    /// Composes the `position`-th `<resultMap>` of the unit.
    pub(crate) fn compose_top_level(&mut self, node: &Node, position: usize) -> Result<String> {
        let derived = format!("{}.resultMap[{}]", self.assistant.namespace(), position);

        self.compose(node, &[], None, derived).map_err(|e| {
            let name = node.attribute("id").unwrap_or("<anonymous>");
            e.context(err!("in result map `{}`", name))
        })
    }

    /// Composes `node` and returns the id it is registered under.
    ///
    /// `inherited` bindings come first in the composed result map.
    /// `enclosing_type` is the type of the result map `node` is nested in;
    /// it is used to infer the target type when none is declared.
    /// `derived_id` is used unless the node declares an `id`.
    pub(crate) fn compose(
        &mut self,
        node: &Node,
        inherited: &[ResultMapping],
        enclosing_type: Option<&TypeName>,
        derived_id: String,
    ) -> Result<String> {
        let ty = self.target_type(node, enclosing_type)?;

        let id = match node.attribute("id") {
            Some(id) => self.assistant.apply_namespace(id, false)?,
            None => derived_id,
        };

        let extends = node
            .attribute("extends")
            .map(|parent| self.assistant.apply_namespace(parent, true))
            .transpose()?;

        let auto_mapping = node.bool_attribute("autoMapping")?;

        let mut mappings = inherited.to_vec();
        let mut discriminator = None;

        for child in node.children() {
            match child.name() {
                "constructor" => self.process_constructor(child, &ty, &id, &mut mappings)?,
                "discriminator" => {
                    if discriminator.is_some() {
                        bail!("result map `{}` declares more than one <discriminator>", id);
                    }
                    discriminator = Some(self.process_discriminator(child, &ty, &id, &mappings)?);
                }
                "id" | "result" | "association" | "collection" => {
                    let flags = ResultFlags {
                        id: child.is("id"),
                        constructor: false,
                    };
                    mappings.push(self.build_result_mapping(child, &ty, flags, &id)?);
                }
                other => bail!("<{}> is not allowed inside result map `{}`", other, id),
            }
        }

        tracing::trace!(%id, %ty, mappings = mappings.len(), "composed result map");

        self.drafts.push(Draft {
            id: id.clone(),
            ty,
            mappings,
            discriminator,
            extends,
            auto_mapping,
        });

        Ok(id)
    }

    fn target_type(&self, node: &Node, enclosing_type: Option<&TypeName>) -> Result<TypeName> {
        let declared = ["type", "ofType", "resultType", "javaType"]
            .into_iter()
            .find_map(|attr| node.attribute(attr));

        if let Some(name) = declared {
            return self
                .cx
                .aliases
                .resolve_type(self.cx.introspector.catalog(), name);
        }

        match (node.name(), enclosing_type) {
            ("association", Some(enclosing)) if node.attribute("resultMap").is_none() => {
                let property = node.required_attribute("property")?;
                self.inherit_property_type(enclosing, property)
            }
            ("case", Some(enclosing)) if node.attribute("resultMap").is_none() => Ok(enclosing.clone()),
            ("collection", Some(_)) => Ok(TypeName::object()),
            _ => bail!("<{}> requires a `type` attribute", node.name()),
        }
    }

    /// The declared type of `property` on the enclosing type. Only bean
    /// types are required to declare it.
    fn inherit_property_type(&self, enclosing: &TypeName, property: &str) -> Result<TypeName> {
        if let Some(ty) = self.cx.introspector.setter_type(enclosing, property)? {
            return Ok(ty);
        }

        if self.cx.introspector.kind(enclosing) == TypeKind::Bean && !enclosing.is_object() {
            return Err(Error::reflection(format!(
                "there is no writable property `{}` on `{}`",
                property, enclosing
            )));
        }

        Ok(TypeName::object())
    }

    fn process_constructor(
        &mut self,
        node: &Node,
        result_type: &TypeName,
        enclosing_id: &str,
        mappings: &mut Vec<ResultMapping>,
    ) -> Result<()> {
        for child in node.children() {
            let flags = match child.name() {
                "idArg" => ResultFlags {
                    id: true,
                    constructor: true,
                },
                "arg" => ResultFlags {
                    id: false,
                    constructor: true,
                },
                other => bail!("<{}> is not allowed inside <constructor>", other),
            };

            mappings.push(self.build_result_mapping(child, result_type, flags, enclosing_id)?);
        }

        Ok(())
    }

    fn build_result_mapping(
        &mut self,
        node: &Node,
        result_type: &TypeName,
        flags: ResultFlags,
        enclosing_id: &str,
    ) -> Result<ResultMapping> {
        let property = if flags.constructor {
            node.attribute("name")
        } else {
            node.attribute("property")
        };

        let select = node.attribute("select");
        let nested_result_map = node.attribute("resultMap");

        let binding = match (select, nested_result_map) {
            (Some(_), Some(_)) => bail!(
                "property `{}` cannot declare both `select` and `resultMap`",
                property.unwrap_or_default()
            ),
            (Some(select), None) => Binding::NestedQuery(self.assistant.apply_namespace(select, true)?),
            (None, Some(id)) => Binding::NestedResultMap(self.assistant.apply_namespace(id, true)?),
            (None, None) => match self.nested_result_map(node, result_type, enclosing_id)? {
                Some(id) => Binding::NestedResultMap(id),
                None => Binding::Column,
            },
        };

        let ty = match self.assistant.resolve_type(self.cx, node.attribute("javaType"))? {
            Some(ty) => ty,
            None => self.value_type(result_type, property, flags),
        };

        let raw_column = node.attribute("column");
        let composites = parse_composite_columns(raw_column)?;
        let column = if composites.is_empty() {
            raw_column.map(str::to_string)
        } else {
            None
        };

        if matches!(binding, Binding::NestedQuery(_)) && column.is_none() && composites.is_empty() {
            bail!(
                "the nested select of property `{}` requires a `column`",
                property.unwrap_or_default()
            );
        }

        let result_set = node.attribute("resultSet").map(str::to_string);
        let foreign_columns = split_columns(node.attribute("foreignColumn"));

        if result_set.is_some() && split_columns(raw_column).len() != foreign_columns.len() {
            bail!(
                "property `{}` must declare as many `column`s as `foreignColumn`s",
                property.unwrap_or_default()
            );
        }

        let lazy = match node.attribute("fetchType") {
            Some("lazy") => true,
            Some("eager") => false,
            Some(other) => bail!("unknown fetchType `{}`", other),
            None => self.cx.settings.lazy_loading_enabled,
        };

        Ok(ResultMapping {
            property: property.map(str::to_string),
            column,
            ty,
            jdbc_type: node.attribute("jdbcType").map(str::to_string),
            type_handler: self.assistant.type_handler(self.cx, node.attribute("typeHandler")),
            binding,
            flags,
            composites,
            not_null_columns: split_columns(node.attribute("notNullColumn")),
            column_prefix: node.attribute("columnPrefix").map(str::to_string),
            result_set,
            foreign_columns,
            lazy,
        })
    }

    /// The value type of a binding without `javaType`: the setter type of
    /// the bound property, or `Object` when it cannot be determined.
    fn value_type(&self, result_type: &TypeName, property: Option<&str>, flags: ResultFlags) -> TypeName {
        let Some(property) = property.filter(|_| !flags.constructor) else {
            return TypeName::object();
        };

        self.cx
            .introspector
            .setter_type(result_type, property)
            .ok()
            .flatten()
            .unwrap_or_else(TypeName::object)
    }

    /// Composes the inline shape of an association or collection that
    /// neither runs a nested query nor references a result map.
    fn nested_result_map(&mut self, node: &Node, result_type: &TypeName, enclosing_id: &str) -> Result<Option<String>> {
        if !matches!(node.name(), "association" | "collection") || node.attribute("select").is_some() {
            return Ok(None);
        }

        self.validate_collection(node, result_type)?;

        let property = node.required_attribute("property")?;
        let derived = format!("{}-{}", enclosing_id, property.replace('.', "_"));

        self.compose(node, &[], Some(result_type), derived).map(Some)
    }

    /// Without `javaType` or `resultMap`, a collection's container type comes
    /// from the enclosing type, which must therefore declare the property.
    fn validate_collection(&self, node: &Node, enclosing: &TypeName) -> Result<()> {
        if !node.is("collection") || node.attribute("resultMap").is_some() || node.attribute("javaType").is_some() {
            return Ok(());
        }

        let property = node.required_attribute("property")?;
        if !self.cx.introspector.has_setter(enclosing, property)? {
            return Err(Error::ambiguous_collection(property));
        }

        Ok(())
    }
}

impl Draft {
    /// Registers the result map, merging in the bindings of the result map
    /// it extends. Incomplete while that result map is not registered.
    pub(crate) fn resolve(&self, cx: &mut Context<'_>) -> Result<()> {
        let mut mappings = match &self.extends {
            Some(parent) => {
                let parent = cx.registry.result_map(parent).ok_or_else(|| {
                    Error::incomplete(format!(
                        "result map `{}` extends `{}`, which is not loaded yet",
                        self.id, parent
                    ))
                })?;
                merge_inherited(parent.mappings(), &self.mappings)
            }
            None => self.mappings.clone(),
        };

        let constructor_order = self.match_constructor(cx, &mut mappings)?;
        self.validate_properties(cx, &mappings)?;

        let has_nested_result_maps = mappings
            .iter()
            .any(|mapping| mapping.nested_result_map_id().is_some() && mapping.result_set.is_none());
        let auto_mapping_targets = self.auto_mapping_targets(cx, &mappings, has_nested_result_maps)?;

        let result_map = ResultMap::builder(&self.id, self.ty.clone(), mappings)
            .discriminator(self.discriminator.clone())
            .extends(self.extends.clone())
            .auto_mapping(self.auto_mapping)
            .constructor_order(constructor_order)
            .auto_mapping_targets(auto_mapping_targets)
            .build();

        cx.registry.add_result_map(result_map)
    }

    /// Matches named constructor arguments against the constructors of the
    /// target type. Arguments without a declared type take the parameter's.
    fn match_constructor(&self, cx: &Context<'_>, mappings: &mut [ResultMapping]) -> Result<Option<Vec<String>>> {
        let arguments: Vec<&ResultMapping> = mappings.iter().filter(|m| m.is_constructor()).collect();
        let named: Vec<&str> = arguments.iter().filter_map(|m| m.property()).collect();

        if named.is_empty() {
            return Ok(None);
        }

        if named.len() != arguments.len() {
            bail!(
                "result map `{}` mixes named and positional constructor arguments",
                self.id
            );
        }

        let metadata = cx.introspector.metadata(&self.ty)?;
        let catalog = cx.introspector.catalog();

        let matched = metadata.constructors().iter().find(|constructor| {
            constructor.params.len() == arguments.len()
                && arguments.iter().all(|argument| {
                    constructor.params.iter().any(|param| {
                        param.name.as_deref() == argument.property()
                            && (argument.ty.is_object() || catalog.is_assignable(&param.ty, &argument.ty))
                    })
                })
        });

        let Some(constructor) = matched else {
            return Err(Error::invalid_mapping(format!(
                "result map `{}`: no constructor of `{}` takes the arguments [{}]",
                self.id,
                self.ty,
                named.join(", ")
            )));
        };

        for mapping in mappings.iter_mut().filter(|m| m.is_constructor()) {
            let param = constructor
                .params
                .iter()
                .find(|param| param.name.as_deref() == mapping.property());

            if let Some(param) = param {
                if mapping.ty.is_object() {
                    mapping.ty = param.ty.clone();
                }
            }
        }

        Ok(constructor
            .params
            .iter()
            .map(|param| param.name.clone())
            .collect())
    }

    /// Bindings on a bean must name a writable property.
    fn validate_properties(&self, cx: &Context<'_>, mappings: &[ResultMapping]) -> Result<()> {
        if self.ty.is_object() || cx.introspector.kind(&self.ty) != TypeKind::Bean {
            return Ok(());
        }

        for mapping in mappings.iter().filter(|m| !m.is_constructor()) {
            let Some(property) = mapping.property() else {
                continue;
            };

            if !cx.introspector.has_setter(&self.ty, property)? {
                return Err(Error::reflection(format!(
                    "result map `{}`: `{}` has no writable property `{}`",
                    self.id, self.ty, property
                )));
            }
        }

        Ok(())
    }

    fn auto_mapping_targets(
        &self,
        cx: &Context<'_>,
        mappings: &[ResultMapping],
        has_nested_result_maps: bool,
    ) -> Result<Vec<String>> {
        let enabled = self.auto_mapping.unwrap_or_else(|| {
            cx.settings
                .auto_mapping_behavior
                .applies_to(has_nested_result_maps)
        });

        if !enabled || self.ty.is_object() || cx.introspector.kind(&self.ty) != TypeKind::Bean {
            return Ok(vec![]);
        }

        let mapped: HashSet<String> = mappings
            .iter()
            .filter_map(|mapping| mapping.property())
            .map(|property| property.split('.').next().unwrap_or(property).to_uppercase())
            .collect();

        let metadata = cx.introspector.metadata(&self.ty)?;

        Ok(metadata
            .settable_properties()
            .filter(|property| !mapped.contains(&property.to_uppercase()))
            .map(str::to_string)
            .collect())
    }
}

/// Inherited bindings followed by own bindings. An own binding replaces the
/// inherited binding with the same key, and declaring any constructor
/// argument replaces all inherited ones.
fn merge_inherited(inherited: &[ResultMapping], own: &[ResultMapping]) -> Vec<ResultMapping> {
    let own_keys: HashSet<BindingKey> = keyed(own).map(|(key, _)| key).collect();
    let declares_constructor = own.iter().any(ResultMapping::is_constructor);

    let mut merged: Vec<ResultMapping> = keyed(inherited)
        .filter(|(key, mapping)| {
            !(declares_constructor && mapping.is_constructor()) && !own_keys.contains(key)
        })
        .map(|(_, mapping)| mapping.clone())
        .collect();

    merged.extend(own.iter().cloned());
    merged
}

/// Pairs each binding with its key. Positions count constructor arguments
/// and other bindings separately.
fn keyed(mappings: &[ResultMapping]) -> impl Iterator<Item = (BindingKey, &ResultMapping)> {
    let mut arguments = 0;
    let mut others = 0;

    mappings.iter().map(move |mapping| {
        let counter = if mapping.is_constructor() {
            &mut arguments
        } else {
            &mut others
        };
        let key = mapping.key(*counter);
        *counter += 1;
        (key, mapping)
    })
}

/// Parses `{prop=col,prop2=col2}` into one binding per pair. Returns nothing
/// for a plain column name.
fn parse_composite_columns(column: Option<&str>) -> Result<Vec<ResultMapping>> {
    let Some(column) = column.filter(|c| c.contains('=') || c.contains(',')) else {
        return Ok(vec![]);
    };

    let tokens: Vec<&str> = column
        .split(|c: char| matches!(c, '{' | '}' | '=' | ',' | ' '))
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() % 2 != 0 {
        bail!("malformed composite column `{}`", column);
    }

    Ok(tokens
        .chunks(2)
        .map(|pair| ResultMapping::column(pair[0], pair[1], TypeName::object()))
        .collect())
}

/// Splits `a, b` or `{a,b}` into column names.
fn split_columns(columns: Option<&str>) -> Vec<String> {
    columns
        .unwrap_or_default()
        .split(|c: char| matches!(c, '{' | '}' | ',' | ' '))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_columns() {
        let composites = parse_composite_columns(Some("{id=author_id, name=author_name}")).unwrap();

        let pairs: Vec<_> = composites
            .iter()
            .map(|m| (m.property().unwrap(), m.column_name().unwrap()))
            .collect();
        assert_eq!(pairs, [("id", "author_id"), ("name", "author_name")]);

        assert!(parse_composite_columns(Some("author_id")).unwrap().is_empty());
        assert!(parse_composite_columns(Some("{id=}")).is_err());
    }

    #[test]
    fn column_lists() {
        assert_eq!(split_columns(Some("{a, b}")), ["a", "b"]);
        assert_eq!(split_columns(Some("a,b")), ["a", "b"]);
        assert!(split_columns(None).is_empty());
    }

    #[test]
    fn merge_replaces_matching_keys() {
        let inherited = vec![
            ResultMapping::column("id", "id", "int"),
            ResultMapping::column("name", "name", "String"),
        ];
        let own = vec![ResultMapping::column("name", "full_name", "String")];

        let merged = merge_inherited(&inherited, &own);
        let columns: Vec<_> = merged.iter().map(|m| m.column_name().unwrap()).collect();
        assert_eq!(columns, ["id", "full_name"]);
    }

    #[test]
    fn own_constructor_drops_inherited_arguments() {
        let mut argument = ResultMapping::column("id", "id", "int");
        argument.flags.constructor = true;

        let mut own_argument = ResultMapping::column("code", "code", "String");
        own_argument.flags.constructor = true;

        let merged = merge_inherited(&[argument], &[own_argument]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].property(), Some("code"));
    }
}
