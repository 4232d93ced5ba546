use super::Composer;

use rowmap_core::decl::Node;
use rowmap_core::mapping::{Discriminator, ResultMapping};
use rowmap_core::{bail, Result, TypeName};

use indexmap::IndexMap;

impl Composer<'_, '_> {
    /// Builds the discriminator of the result map `enclosing_id`.
    ///
    /// Inline cases are composed as result maps of their own. They inherit
    /// the bindings the enclosing result map declared before the
    /// discriminator, and the enclosing type unless they declare one.
    pub(super) fn process_discriminator(
        &mut self,
        node: &Node,
        result_type: &TypeName,
        enclosing_id: &str,
        mappings: &[ResultMapping],
    ) -> Result<Discriminator> {
        let column = node.required_attribute("column")?;
        let ty = self
            .assistant
            .resolve_type(self.cx, node.attribute("javaType"))?
            .unwrap_or_else(TypeName::object);

        let mut cases = IndexMap::new();

        for child in node.children() {
            if !child.is("case") {
                bail!(
                    "<{}> is not allowed inside the discriminator of `{}`",
                    child.name(),
                    enclosing_id
                );
            }

            let value = child.required_attribute("value")?;
            if cases.contains_key(value) {
                bail!(
                    "duplicate discriminator case `{}` in result map `{}`",
                    value,
                    enclosing_id
                );
            }

            let result_map = match child.attribute("resultMap") {
                Some(id) => self.assistant.apply_namespace(id, true)?,
                None => {
                    let derived = format!("{}-case[{}]", enclosing_id, value.replace('.', "_"));
                    self.compose(child, mappings, Some(result_type), derived)?
                }
            };

            cases.insert(value.to_string(), result_map);
        }

        Ok(Discriminator {
            column: column.to_string(),
            ty,
            jdbc_type: node.attribute("jdbcType").map(str::to_string),
            type_handler: self
                .assistant
                .type_handler(self.cx, node.attribute("typeHandler")),
            cases,
        })
    }
}
