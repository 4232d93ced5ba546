use super::property;
use crate::types::{Constructor, Method, TypeCatalog, TypeDescriptor, TypeKind, TypeName};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Property information for one type, built once and never modified.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    ty: TypeName,
    kind: TypeKind,

    /// Readable properties and the type a read produces.
    getters: IndexMap<String, TypeName>,

    /// Writable properties and the type a write accepts.
    setters: IndexMap<String, TypeName>,

    /// Upper-cased property name to declared property name.
    case_insensitive: HashMap<String, String>,

    constructors: Vec<Constructor>,
}

impl TypeMetadata {
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn gettable_properties(&self) -> impl Iterator<Item = &str> {
        self.getters.keys().map(String::as_str)
    }

    pub fn settable_properties(&self) -> impl Iterator<Item = &str> {
        self.setters.keys().map(String::as_str)
    }

    pub fn has_getter(&self, property: &str) -> bool {
        self.getters.contains_key(property)
    }

    pub fn has_setter(&self, property: &str) -> bool {
        self.setters.contains_key(property)
    }

    pub fn getter_type(&self, property: &str) -> Option<&TypeName> {
        self.getters.get(property)
    }

    pub fn setter_type(&self, property: &str) -> Option<&TypeName> {
        self.setters.get(property)
    }

    /// The declared type of a property, preferring the setter's view.
    pub fn type_of(&self, property: &str) -> Option<&TypeName> {
        self.setter_type(property)
            .or_else(|| self.getter_type(property))
    }

    /// Finds a property by name ignoring case.
    pub fn find_property(&self, name: &str) -> Option<&str> {
        self.case_insensitive
            .get(&name.to_uppercase())
            .map(String::as_str)
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructors
            .iter()
            .any(|constructor| constructor.params.is_empty())
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Builds metadata for `ty` from the catalog.
    pub(crate) fn build(catalog: &TypeCatalog, ty: &TypeName) -> Result<TypeMetadata> {
        let descriptor = catalog
            .get(ty.as_str())
            .ok_or_else(|| Error::unknown_type(ty.as_str()))?;

        let mut builder = Builder {
            catalog,
            ty,
            getters: IndexMap::new(),
            setters: IndexMap::new(),
        };

        let methods = builder.class_methods(descriptor);
        builder.add_getters(&methods)?;
        builder.add_setters(&methods)?;
        builder.add_fields();

        let mut case_insensitive = HashMap::new();
        for name in builder.getters.keys().chain(builder.setters.keys()) {
            case_insensitive.insert(name.to_uppercase(), name.clone());
        }

        Ok(TypeMetadata {
            ty: ty.clone(),
            kind: descriptor.kind,
            getters: builder.getters,
            setters: builder.setters,
            case_insensitive,
            constructors: descriptor.constructors.clone(),
        })
    }
}

struct Builder<'a> {
    catalog: &'a TypeCatalog,
    ty: &'a TypeName,
    getters: IndexMap<String, TypeName>,
    setters: IndexMap<String, TypeName>,
}

impl<'a> Builder<'a> {
    /// Collects the methods of the type, its superclasses and all interfaces
    /// they implement. The most derived declaration of each signature wins.
    fn class_methods(&self, descriptor: &'a TypeDescriptor) -> Vec<&'a Method> {
        let mut unique: IndexMap<String, &'a Method> = IndexMap::new();
        let mut add = |methods: &'a [Method]| {
            for method in methods {
                unique.entry(method.signature()).or_insert(method);
            }
        };

        for class in self.catalog.superclass_chain(&descriptor.name) {
            if class.name.is_object() {
                break;
            }
            add(&class.methods);

            let mut interfaces: Vec<&TypeName> = class.interfaces.iter().collect();
            let mut seen = Vec::new();
            while let Some(interface) = interfaces.pop() {
                if seen.contains(&interface) {
                    continue;
                }
                seen.push(interface);

                if let Some(interface) = self.catalog.get(interface.as_str()) {
                    add(&interface.methods);
                    interfaces.extend(interface.interfaces.iter());
                }
            }
        }

        unique.into_values().collect()
    }

    fn add_getters(&mut self, methods: &[&'a Method]) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<&Method>> = IndexMap::new();

        for method in methods {
            if !method.params.is_empty() || method.returns.is_none() {
                continue;
            }
            if !property::is_getter(&method.name) {
                continue;
            }
            if let Some(name) = property::method_to_property(&method.name) {
                conflicting.entry(name).or_default().push(method);
            }
        }

        for (name, candidates) in conflicting {
            let winner = self.resolve_getter_conflict(&name, &candidates)?;
            if property::is_valid_property_name(&name) {
                if let Some(returns) = &winner.returns {
                    self.getters.insert(name, returns.clone());
                }
            }
        }

        Ok(())
    }

    fn resolve_getter_conflict<'m>(&self, name: &str, candidates: &[&'m Method]) -> Result<&'m Method> {
        let mut winner = candidates[0];

        for &candidate in &candidates[1..] {
            let (Some(winner_ty), Some(candidate_ty)) = (&winner.returns, &candidate.returns) else {
                continue;
            };

            if candidate_ty == winner_ty {
                if candidate_ty.as_str() != "boolean" {
                    return Err(self.ambiguous_getter(name));
                }
                if candidate.name.starts_with("is") {
                    winner = candidate;
                }
            } else if self.catalog.is_assignable(candidate_ty, winner_ty) {
                // The current winner is already the narrower type.
            } else if self.catalog.is_assignable(winner_ty, candidate_ty) {
                winner = candidate;
            } else {
                return Err(self.ambiguous_getter(name));
            }
        }

        Ok(winner)
    }

    fn ambiguous_getter(&self, name: &str) -> Error {
        Error::reflection(format!(
            "overloaded getters for property `{}` in `{}` have ambiguous return types",
            name, self.ty
        ))
    }

    fn add_setters(&mut self, methods: &[&'a Method]) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<&Method>> = IndexMap::new();

        for method in methods {
            if method.params.len() != 1 || !property::is_setter(&method.name) {
                continue;
            }
            if let Some(name) = property::method_to_property(&method.name) {
                conflicting.entry(name).or_default().push(method);
            }
        }

        for (name, setters) in conflicting {
            let getter_ty = self.getters.get(&name);
            let mut matched: Option<&TypeName> = None;
            let mut error = None;

            for setter in setters {
                let param = &setter.params[0];

                if Some(param) == getter_ty {
                    matched = Some(param);
                    error = None;
                    break;
                }

                if error.is_none() {
                    match self.pick_better_setter(&name, matched, param) {
                        Ok(better) => matched = Some(better),
                        Err(err) => {
                            matched = None;
                            error = Some(err);
                        }
                    }
                }
            }

            match (matched, error) {
                (Some(ty), _) => {
                    if property::is_valid_property_name(&name) {
                        let ty = ty.clone();
                        self.setters.insert(name, ty);
                    }
                }
                (None, Some(err)) => return Err(err),
                (None, None) => {}
            }
        }

        Ok(())
    }

    /// Between two setters for the same property, the one accepting the
    /// narrower type wins.
    fn pick_better_setter<'t>(
        &self,
        name: &str,
        current: Option<&'t TypeName>,
        candidate: &'t TypeName,
    ) -> Result<&'t TypeName> {
        let Some(current) = current else {
            return Ok(candidate);
        };

        if self.catalog.is_assignable(current, candidate) {
            Ok(candidate)
        } else if self.catalog.is_assignable(candidate, current) {
            Ok(current)
        } else {
            Err(Error::reflection(format!(
                "ambiguous setters for property `{}` in `{}` with types `{}` and `{}`",
                name, self.ty, current, candidate
            )))
        }
    }

    /// Fields fill in properties that have no accessor method.
    fn add_fields(&mut self) {
        let catalog = self.catalog;
        let ty = self.ty;

        for class in catalog.superclass_chain(ty) {
            for field in &class.fields {
                if !property::is_valid_property_name(&field.name) {
                    continue;
                }

                if !self.setters.contains_key(&field.name) && !(field.is_static && field.is_final) {
                    self.setters.insert(field.name.clone(), field.ty.clone());
                }

                if !self.getters.contains_key(&field.name) {
                    self.getters.insert(field.name.clone(), field.ty.clone());
                }
            }
        }
    }
}
