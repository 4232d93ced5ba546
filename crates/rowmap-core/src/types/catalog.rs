use super::{TypeDescriptor, TypeKind, TypeName};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// All types the compiler may bind to, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    /// An empty catalog. Most hosts want [`TypeCatalog::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-populated with the value, container, and cache
    /// implementation types referenced by the built-in aliases.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();

        catalog.insert(TypeDescriptor::new("Object", TypeKind::Bean));

        for name in [
            "boolean", "byte", "short", "int", "long", "float", "double", "char",
        ] {
            catalog.insert(TypeDescriptor::scalar(name));
        }

        for name in [
            "String",
            "Boolean",
            "Byte",
            "Short",
            "Integer",
            "Long",
            "Float",
            "Double",
            "Character",
            "BigDecimal",
            "BigInteger",
            "Date",
            "ResultSet",
        ] {
            catalog.insert(TypeDescriptor::scalar(name));
        }

        catalog.insert(TypeDescriptor::interface("Collection"));
        catalog.insert(
            TypeDescriptor::new("List", TypeKind::Collection).implements("Collection"),
        );
        catalog.insert(TypeDescriptor::new("ArrayList", TypeKind::Collection).implements("List"));
        catalog.insert(TypeDescriptor::new("Set", TypeKind::Collection).implements("Collection"));
        catalog.insert(TypeDescriptor::new("HashSet", TypeKind::Collection).implements("Set"));
        catalog.insert(TypeDescriptor::new("Map", TypeKind::Map));
        catalog.insert(TypeDescriptor::new("HashMap", TypeKind::Map).implements("Map"));

        catalog.insert(TypeDescriptor::interface("Cache"));
        for name in [
            "PerpetualCache",
            "LruCache",
            "FifoCache",
            "SoftCache",
            "WeakCache",
        ] {
            catalog.insert(TypeDescriptor::scalar(name).implements("Cache"));
        }

        catalog
    }

    /// Registers a type. Registering the same name twice is an error.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        if self.types.contains_key(&descriptor.name) {
            return Err(Error::duplicate_id("type", descriptor.name.as_str()));
        }
        self.insert(descriptor);
        Ok(())
    }

    /// Registers a type, replacing any previous descriptor with the same name.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns the registered name for `name`, if the type is known.
    pub fn lookup(&self, name: &str) -> Option<TypeName> {
        self.types.get_key_value(name).map(|(key, _)| key.clone())
    }

    /// The kind of a type. Unknown types are treated as scalars.
    pub fn kind(&self, name: &TypeName) -> TypeKind {
        self.get(name.as_str())
            .map(|descriptor| descriptor.kind)
            .unwrap_or(TypeKind::Scalar)
    }

    /// Returns `true` if a value of type `from` can be stored in a slot of
    /// type `to`, i.e. `to` is `from` or one of its ancestors.
    pub fn is_assignable(&self, to: &TypeName, from: &TypeName) -> bool {
        if to == from {
            return true;
        }

        if to.is_object() {
            return !from.is_primitive();
        }

        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            if current == to {
                return true;
            }

            if let Some(descriptor) = self.get(current.as_str()) {
                stack.extend(descriptor.superclass.iter());
                stack.extend(descriptor.interfaces.iter());
            }
        }

        false
    }

    /// Iterates `name` followed by its superclasses, most derived first.
    /// Interfaces are not included.
    pub fn superclass_chain<'a>(&'a self, name: &'a TypeName) -> impl Iterator<Item = &'a TypeDescriptor> + 'a {
        let mut next = self.get(name.as_str());
        let mut seen = HashSet::new();

        core::iter::from_fn(move || {
            let current = next.take()?;
            if !seen.insert(&current.name) {
                return None;
            }
            next = current
                .superclass
                .as_ref()
                .and_then(|superclass| self.get(superclass.as_str()));
            Some(current)
        })
    }
}
