use super::{TypeCatalog, TypeName};
use crate::{Error, Result};
use indexmap::IndexMap;

/// Maps short, case-insensitive names to type identifiers.
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    aliases: IndexMap<String, TypeName>,
}

impl AliasRegistry {
    /// An empty registry with no aliases at all.
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    /// A registry with the built-in aliases for scalars, containers, and cache
    /// implementations.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        for (alias, ty) in [
            ("string", "String"),
            ("byte", "Byte"),
            ("long", "Long"),
            ("short", "Short"),
            ("int", "Integer"),
            ("integer", "Integer"),
            ("double", "Double"),
            ("float", "Float"),
            ("boolean", "Boolean"),
            ("char", "Character"),
            ("character", "Character"),
            ("_byte", "byte"),
            ("_long", "long"),
            ("_short", "short"),
            ("_int", "int"),
            ("_integer", "int"),
            ("_double", "double"),
            ("_float", "float"),
            ("_boolean", "boolean"),
            ("_char", "char"),
            ("date", "Date"),
            ("decimal", "BigDecimal"),
            ("bigdecimal", "BigDecimal"),
            ("biginteger", "BigInteger"),
            ("object", "Object"),
            ("map", "Map"),
            ("hashmap", "HashMap"),
            ("list", "List"),
            ("arraylist", "ArrayList"),
            ("collection", "Collection"),
            ("set", "Set"),
            ("hashset", "HashSet"),
            ("resultset", "ResultSet"),
            ("perpetual", "PerpetualCache"),
            ("lru", "LruCache"),
            ("fifo", "FifoCache"),
            ("soft", "SoftCache"),
            ("weak", "WeakCache"),
        ] {
            registry.aliases.insert(alias.to_string(), TypeName::from(ty));
        }

        registry
    }

    /// Registers an alias. Re-registering an alias for a different type is an
    /// error; registering the same pair twice is a no-op.
    pub fn register(&mut self, alias: &str, ty: impl Into<TypeName>) -> Result<()> {
        let ty = ty.into();
        let key = alias.to_lowercase();

        if let Some(existing) = self.aliases.get(&key) {
            if *existing != ty {
                return Err(Error::invalid_mapping(format!(
                    "alias `{}` is already mapped to `{}`; cannot map it to `{}`",
                    alias, existing, ty
                )));
            }
            return Ok(());
        }

        self.aliases.insert(key, ty);
        Ok(())
    }

    /// Looks up an alias.
    pub fn resolve(&self, name: &str) -> Option<TypeName> {
        self.aliases.get(&name.to_lowercase()).cloned()
    }

    /// Resolves `name` to a type known to `catalog`, trying aliases first and
    /// then the name itself.
    pub fn resolve_type(&self, catalog: &TypeCatalog, name: &str) -> Result<TypeName> {
        if let Some(ty) = self.resolve(name) {
            return Ok(ty);
        }

        catalog
            .lookup(name)
            .ok_or_else(|| Error::unknown_type(name))
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &TypeName)> {
        self.aliases.iter().map(|(alias, ty)| (alias.as_str(), ty))
    }
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new()
    }
}
