// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_debug_implementations)] // registry internals are not debug logged

use core::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::warn;

use crate::coercions::{self, Coercion, Generator};
use crate::types::Type;

mod identifier;
mod types;

pub use identifier::{Identifier, Prefix};
pub use types::{TypeRef, TypeRegistry};


/// Errors that can occur when interacting with a Registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidName { name: Arc<str>, registry: Arc<str> },
    UnknownType { name: Arc<str> },
    InvalidIdentifier { identifier: Arc<str>, reason: String },
    Combinator { identifier: Arc<str>, message: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidName { name, registry } => {
                write!(f, "{registry} registration failed: The name '{name}' is invalid (empty or whitespace-only names are not allowed).")
            }
            RegistryError::UnknownType { name } => {
                write!(f, "Nothing registered with the key '{name}'")
            }
            RegistryError::InvalidIdentifier { identifier, reason } => {
                write!(f, "Invalid type identifier '{identifier}': {reason}")
            }
            RegistryError::Combinator {
                identifier,
                message,
            } => {
                write!(f, "Cannot build '{identifier}': {message}")
            }
        }
    }
}

impl core::error::Error for RegistryError {}

/// Validates that a name is not empty or whitespace-only.
pub fn validate_name(name: &str, registry_name: &str) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        Err(RegistryError::InvalidName {
            name: name.into(),
            registry: registry_name.into(),
        })
    } else {
        Ok(())
    }
}

/// Generic thread-safe registry for items of type T using DashMap.
///
/// Items are handed out by clone, so `T` is expected to be a cheap handle
/// (`Type`, `Coercion`, `Generator`).
pub struct Registry<T> {
    inner: DashMap<Arc<str>, T>,
    name: Arc<str>,
}

impl<T: Clone> Registry<T> {
    /// Create a new, empty registry with a given name.
    pub fn new(registry_name: &str) -> Self {
        Self {
            inner: DashMap::new(),
            name: registry_name.into(),
        }
    }

    /// Register an item, replacing any previous item of the same name.
    pub fn register(&self, name: &str, item: T) -> Result<(), RegistryError> {
        validate_name(name, &self.name)?;
        self.inner.insert(name.into(), item);
        Ok(())
    }

    /// Inserts `item` unless `name` is taken and returns the stored item.
    /// Concurrent callers racing on the same name all observe the winner.
    pub fn get_or_insert(&self, name: &str, item: T) -> T {
        self.inner.entry(name.into()).or_insert(item).value().clone()
    }

    pub fn get(&self, name: &str) -> Option<T> {
        self.inner.get(name).map(|entry| entry.value().clone())
    }

    pub fn list_names(&self) -> Vec<Arc<str>> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Keep only the items whose name satisfies `keep`.
    pub fn retain(&self, keep: impl Fn(&str) -> bool) {
        self.inner.retain(|name, _| keep(name));
    }
}

/// Global registry instances
pub mod instances {
    use super::*;

    lazy_static::lazy_static! {
        /// Process-wide type registry, seeded with the built-in types.
        pub static ref TYPES: TypeRegistry = TypeRegistry::with_builtins();
    }

    lazy_static::lazy_static! {
        /// Coercion functions addressable from AST constructor nodes.
        pub static ref COERCIONS: Registry<Coercion> = seeded_coercions();
    }

    lazy_static::lazy_static! {
        /// Default generators addressable from AST default nodes.
        pub static ref GENERATORS: Registry<Generator> = seeded_generators();
    }

    pub(super) fn seed_coercions(registry: &Registry<Coercion>) {
        for c in coercions::builtins() {
            if let Some(name) = c.name() {
                registry.inner.insert(name.into(), c.clone());
            }
        }
    }

    pub(super) fn seed_generators(registry: &Registry<Generator>) {
        for g in coercions::builtin_generators() {
            registry.inner.insert(g.reference(), g.clone());
        }
    }

    fn seeded_coercions() -> Registry<Coercion> {
        let registry = Registry::new("COERCIONS");
        seed_coercions(&registry);
        registry
    }

    fn seeded_generators() -> Registry<Generator> {
        let registry = Registry::new("GENERATORS");
        seed_generators(&registry);
        registry
    }
}

/// Resolve `identifier` against the global type registry.
pub fn lookup(identifier: &str) -> Result<Type, RegistryError> {
    instances::TYPES.lookup(identifier)
}

/// Resolve a name or pass an already built type through unchanged.
pub fn resolve(reference: TypeRef) -> Result<Type, RegistryError> {
    instances::TYPES.resolve(reference)
}

/// Register a type in the global registry, overwriting any previous entry.
pub fn register(identifier: &str, t: Type) -> Result<(), RegistryError> {
    instances::TYPES.register(identifier, t)
}

// Stores `item` under `reference` and returns the reference it is reachable
// by. A reference already held by another function (a built-in, say) is left
// untouched and `item` is stored under `address` instead.
fn claim<T: Clone + PartialEq>(
    registry: &Registry<T>,
    reference: Arc<str>,
    address: Arc<str>,
    item: &T,
) -> Arc<str> {
    let taken = match registry.inner.entry(reference.clone()) {
        Entry::Occupied(e) => e.get() != item,
        Entry::Vacant(e) => {
            e.insert(item.clone());
            false
        }
    };
    if !taken {
        return reference;
    }
    warn!(
        "{} already holds another function as {reference}, using {address}",
        registry.name
    );
    registry.inner.insert(address.clone(), item.clone());
    address
}

/// Make `coercion` addressable by its AST reference and return the reference.
/// Names of other registered coercions are never overwritten.
pub fn register_coercion(coercion: &Coercion) -> Arc<str> {
    claim(
        &instances::COERCIONS,
        coercion.reference(),
        coercion.address(),
        coercion,
    )
}

/// Make `generator` addressable by its AST reference and return the reference.
/// Names of other registered generators are never overwritten.
pub fn register_generator(generator: &Generator) -> Arc<str> {
    claim(
        &instances::GENERATORS,
        generator.reference(),
        generator.address(),
        generator,
    )
}

pub fn coercion(reference: &str) -> Option<Coercion> {
    instances::COERCIONS.get(reference)
}

pub fn generator(reference: &str) -> Option<Generator> {
    instances::GENERATORS.get(reference)
}

/// Restore all global registries to their seeded state. Built-in entries stay
/// resolvable throughout.
pub fn reset() {
    instances::TYPES.reset();
    instances::COERCIONS.retain(|name| coercions::builtin(name).is_some());
    instances::seed_coercions(&instances::COERCIONS);
    instances::GENERATORS.retain(|name| coercions::builtin_generator(name).is_some());
    instances::seed_generators(&instances::GENERATORS);
}
