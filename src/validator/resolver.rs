//! Symbolic type resolution and instantiation.
//!
//! The resolver replaces runtime reflection with an explicit registration
//! table built at startup: each known implementation registers a
//! [`ValidatorDescriptor`] mapping its symbolic type identifier to a
//! factory function. Resolution and instantiation are separate steps so an
//! advisory check can fail fast on an unknown type without constructing
//! anything.

use std::collections::HashMap;

use super::{LifecycleError, Validator};

/// Capability provided by validator descriptors. Descriptors registered for
/// other extension points carry a different capability string and fail
/// resolution with `TypeMismatch`.
pub const CAPABILITY_VALIDATOR: &str = "validator";

type Constructor = fn() -> Result<Box<dyn Validator>, String>;

/// One entry in the resolver's registration table.
#[derive(Clone)]
pub struct ValidatorDescriptor {
    pub type_id: &'static str,
    pub capability: &'static str,
    ctor: Constructor,
}

impl ValidatorDescriptor {
    pub const fn new(type_id: &'static str, ctor: Constructor) -> Self {
        Self {
            type_id,
            capability: CAPABILITY_VALIDATOR,
            ctor,
        }
    }

    /// Descriptor for a different extension point, kept in the same table.
    pub const fn with_capability(
        type_id: &'static str,
        capability: &'static str,
        ctor: Constructor,
    ) -> Self {
        Self {
            type_id,
            capability,
            ctor,
        }
    }
}

impl std::fmt::Debug for ValidatorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorDescriptor")
            .field("type_id", &self.type_id)
            .field("capability", &self.capability)
            .finish()
    }
}

/// Registration table mapping symbolic type identifiers to factories.
#[derive(Debug, Default)]
pub struct ValidatorResolver {
    table: HashMap<&'static str, ValidatorDescriptor>,
}

impl ValidatorResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with the built-in validator types registered.
    pub fn with_builtins() -> Self {
        let mut resolver = Self::new();
        for descriptor in crate::validators::builtin_descriptors() {
            resolver.register(descriptor);
        }
        resolver
    }

    /// Registers a descriptor, replacing any previous one under the same
    /// type identifier.
    pub fn register(&mut self, descriptor: ValidatorDescriptor) -> &mut Self {
        self.table.insert(descriptor.type_id, descriptor);
        self
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.table.contains_key(type_id)
    }

    /// Registered type identifiers, sorted.
    pub fn type_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.table.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Resolves a symbolic identifier to its descriptor, enforcing the
    /// validator capability.
    pub fn resolve(&self, type_id: &str) -> Result<&ValidatorDescriptor, LifecycleError> {
        let descriptor = self
            .table
            .get(type_id)
            .ok_or_else(|| LifecycleError::TypeNotFound {
                type_id: type_id.to_string(),
            })?;

        if descriptor.capability != CAPABILITY_VALIDATOR {
            return Err(LifecycleError::TypeMismatch {
                type_id: type_id.to_string(),
                required: CAPABILITY_VALIDATOR,
                found: descriptor.capability,
            });
        }

        Ok(descriptor)
    }

    /// Constructs a fresh, uninitialized instance from a descriptor.
    pub fn instantiate(
        &self,
        descriptor: &ValidatorDescriptor,
    ) -> Result<Box<dyn Validator>, LifecycleError> {
        (descriptor.ctor)().map_err(|reason| LifecycleError::Instantiation {
            type_id: descriptor.type_id.to_string(),
            reason,
        })
    }
}
