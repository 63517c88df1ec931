// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use log::{debug, info, trace};

use super::identifier::{Identifier, Prefix};
use super::{Registry, RegistryError};
use crate::builtins;
use crate::error::CoercionError;
use crate::logic::Rule;
use crate::primitive::Primitive;
use crate::types::Type;

/// Argument of [`TypeRegistry::resolve`].
#[derive(Debug, Clone)]
pub enum TypeRef {
    Name(String),
    Type(Type),
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> TypeRef {
        TypeRef::Name(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> TypeRef {
        TypeRef::Name(name)
    }
}

impl From<Type> for TypeRef {
    fn from(t: Type) -> TypeRef {
        TypeRef::Type(t)
    }
}

impl From<&Type> for TypeRef {
    fn from(t: &Type) -> TypeRef {
        TypeRef::Type(t.clone())
    }
}

/// String keyed store of types.
///
/// Identifiers that are not registered are synthesized from the identifier
/// grammar on first lookup and cached, so later lookups return the same
/// instance.
pub struct TypeRegistry {
    types: Registry<Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> TypeRegistry {
        TypeRegistry {
            types: Registry::new("TYPES"),
        }
    }

    /// A registry holding the built-in types.
    pub fn with_builtins() -> TypeRegistry {
        let registry = TypeRegistry::new();
        builtins::seed(&registry.types);
        registry
    }

    /// Register `t` under `identifier`, overwriting any previous entry.
    pub fn register(&self, identifier: &str, t: Type) -> Result<(), RegistryError> {
        self.types.register(identifier, t)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn list_names(&self) -> Vec<std::sync::Arc<str>> {
        self.types.list_names()
    }

    /// Drops user registrations and cached synthesized types. Built-ins are
    /// restored in place.
    pub fn reset(&self) {
        let seeded = TypeRegistry::with_builtins();
        self.types.retain(|name| seeded.types.contains(name));
        for name in seeded.types.list_names() {
            if let Some(t) = seeded.types.get(&name) {
                self.types.inner.insert(name, t);
            }
        }
        info!("type registry reset to {} built-ins", self.types.len());
    }

    /// The nominal built-in type for `primitive`.
    pub fn definition(&self, primitive: Primitive) -> Result<Type, RegistryError> {
        self.lookup(primitive.identifier())
    }

    pub fn resolve(&self, reference: TypeRef) -> Result<Type, RegistryError> {
        match reference {
            TypeRef::Name(name) => self.lookup(&name),
            TypeRef::Type(t) => Ok(t),
        }
    }

    pub fn lookup(&self, identifier: &str) -> Result<Type, RegistryError> {
        if let Some(t) = self.types.get(identifier) {
            trace!("type registry hit for {identifier}");
            return Ok(t);
        }

        let combinator = |e: CoercionError| RegistryError::Combinator {
            identifier: identifier.into(),
            message: e.to_string(),
        };

        let t = match Identifier::parse(identifier)? {
            Identifier::Generic { outer, member } => {
                let outer = self.lookup(outer)?;
                let member = self.lookup(member)?;
                outer.of(member).map_err(combinator)?
            }
            Identifier::Prefixed { prefix, rest } => {
                let base = self.lookup(rest)?;
                self.apply_prefix(identifier, prefix, &base)?
            }
            Identifier::Base(name) => {
                return Err(RegistryError::UnknownType { name: name.into() })
            }
        };

        debug!("type registry synthesized {identifier}");
        Ok(self.types.get_or_insert(identifier, t))
    }

    fn apply_prefix(
        &self,
        identifier: &str,
        prefix: Prefix,
        base: &Type,
    ) -> Result<Type, RegistryError> {
        match prefix {
            Prefix::Strict => match base.primitive() {
                Some(primitive) => Ok(base.constrained_by(Rule::type_of(primitive))),
                None => Err(RegistryError::Combinator {
                    identifier: identifier.into(),
                    message: format!("{} has no single primitive", base.name()),
                }),
            },
            Prefix::Optional => Ok(base.optional()),
            Prefix::Maybe => Ok(base.maybe()),
            Prefix::Coercible | Prefix::Params | Prefix::Json => {
                Err(RegistryError::UnknownType {
                    name: identifier.into(),
                })
            }
        }
    }
}
