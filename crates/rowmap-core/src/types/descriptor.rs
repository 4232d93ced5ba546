use super::TypeName;

/// Broad shape of a type, deciding how properties are bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A type with getters, setters, and fields.
    Bean,

    /// A key/value container. Any property name is accepted at row-assembly
    /// time, so bindings on it are never validated against metadata.
    Map,

    /// A list or set.
    Collection,

    /// A value type (numbers, strings, dates) or an opaque collaborator type
    /// such as a cache implementation.
    Scalar,

    /// An interface. Contributes methods to implementors.
    Interface,
}

/// Describes one type: its place in the hierarchy and its members.
///
/// The catalog of descriptors stands in for runtime reflection. Hosts register
/// one descriptor per target type before compiling.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub kind: TypeKind,

    /// Direct superclass, if any. `Object` is implied when absent.
    pub superclass: Option<TypeName>,

    /// Directly implemented interfaces.
    pub interfaces: Vec<TypeName>,

    /// Declared methods, in declaration order.
    pub methods: Vec<Method>,

    /// Declared fields, in declaration order.
    pub fields: Vec<FieldDecl>,

    /// Declared constructors.
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<TypeName>,

    /// `None` for methods returning nothing.
    pub returns: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeName,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name when the host knows it.
    pub name: Option<String>,
    pub ty: TypeName,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            interfaces: vec![],
            methods: vec![],
            fields: vec![],
            constructors: vec![],
        }
    }

    /// A bean with a no-argument constructor.
    pub fn bean(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Bean).constructor(Constructor { params: vec![] })
    }

    pub fn scalar(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a `getX()` method returning `ty`.
    pub fn getter(self, property: &str, ty: impl Into<TypeName>) -> Self {
        self.method(Method {
            name: format!("get{}", capitalize(property)),
            params: vec![],
            returns: Some(ty.into()),
        })
    }

    /// Adds a `setX(ty)` method.
    pub fn setter(self, property: &str, ty: impl Into<TypeName>) -> Self {
        self.method(Method {
            name: format!("set{}", capitalize(property)),
            params: vec![ty.into()],
            returns: None,
        })
    }

    /// Adds a matching getter and setter.
    pub fn property(self, property: &str, ty: impl Into<TypeName>) -> Self {
        let ty = ty.into();
        self.getter(property, ty.clone()).setter(property, ty)
    }

    pub fn field(mut self, name: &str, ty: impl Into<TypeName>) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            ty: ty.into(),
            is_static: false,
            is_final: false,
        });
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Adds a constructor with named parameters.
    pub fn named_constructor(self, params: &[(&str, &str)]) -> Self {
        self.constructor(Constructor {
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: Some(name.to_string()),
                    ty: TypeName::from(*ty),
                })
                .collect(),
        })
    }
}

impl Method {
    /// Signature used to de-duplicate overridden methods along the hierarchy.
    pub fn signature(&self) -> String {
        let mut signature = String::new();
        if let Some(returns) = &self.returns {
            signature.push_str(returns.as_str());
            signature.push('#');
        }
        signature.push_str(&self.name);
        for (i, param) in self.params.iter().enumerate() {
            signature.push(if i == 0 { ':' } else { ',' });
            signature.push_str(param.as_str());
        }
        signature
    }
}

impl Constructor {
    /// Returns the parameter names, or `None` if any parameter is unnamed.
    pub fn param_names(&self) -> Option<Vec<&str>> {
        self.params
            .iter()
            .map(|param| param.name.as_deref())
            .collect()
    }
}

fn capitalize(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
