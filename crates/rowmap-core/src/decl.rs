//! The declaration tree consumed by the compiler.
//!
//! Declarations arrive as an ordered tree of named elements with named
//! attributes and ordered children. Producing the tree (from XML, from
//! annotations, from code) is the host's job; the compiler only reads it
//! through the accessors on [`Node`].

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// One element of a declaration set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Node {
    /// Element name, e.g. `resultMap` or `collection`.
    pub name: String,

    /// Attributes in declaration order.
    pub attributes: IndexMap<String, String>,

    /// Child elements in document order.
    pub children: Vec<Node>,

    /// Text content, if the element carries any (statement bodies, fragment
    /// bodies).
    pub text: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, returning the node for chaining.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends a child element, returning the node for chaining.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content, returning the node for chaining.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Returns the attribute value, treating an empty value as absent.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the attribute value or `default` when absent.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    /// Returns the attribute value or an invalid mapping error naming the
    /// element and the attribute.
    pub fn required_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name).ok_or_else(|| {
            Error::invalid_mapping(format!(
                "<{}> requires the `{}` attribute",
                self.name, name
            ))
        })
    }

    /// Parses a boolean attribute (`true` / `false`, case-insensitive).
    pub fn bool_attribute(&self, name: &str) -> Result<Option<bool>> {
        let Some(value) = self.attribute(name) else {
            return Ok(None);
        };

        match value.to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(self.bad_attribute(name, value, "a boolean")),
        }
    }

    /// Parses an unsigned integer attribute.
    pub fn u64_attribute(&self, name: &str) -> Result<Option<u64>> {
        let Some(value) = self.attribute(name) else {
            return Ok(None);
        };

        value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| self.bad_attribute(name, value, "an unsigned integer"))
    }

    /// Parses an unsigned integer attribute that must fit in 32 bits.
    pub fn u32_attribute(&self, name: &str) -> Result<Option<u32>> {
        let Some(value) = self.u64_attribute(name)? else {
            return Ok(None);
        };

        u32::try_from(value)
            .map(Some)
            .map_err(|_| self.bad_attribute(name, &value.to_string(), "a 32-bit integer"))
    }

    fn bad_attribute(&self, name: &str, value: &str, expected: &str) -> Error {
        Error::invalid_mapping(format!(
            "attribute `{}` of <{}> must be {}, got `{}`",
            name, self.name, expected, value
        ))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterates the children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Returns the first child with the given element name.
    pub fn first_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Collects `<property name=".." value=".."/>` children into an ordered
    /// map.
    pub fn children_as_properties(&self) -> Result<IndexMap<String, String>> {
        let mut properties = IndexMap::new();

        for child in self.children_named("property") {
            let name = child.required_attribute("name")?;
            let value = child.attribute("value").unwrap_or_default();
            properties.insert(name.to_string(), value.to_string());
        }

        Ok(properties)
    }
}
