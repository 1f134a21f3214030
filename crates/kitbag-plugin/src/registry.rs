// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide registry of live plugin instances.
//!
//! Ownership discipline: **persistent membership**. The registry owns
//! every constructed instance (`Arc<dyn Plugin>`) for the life of the
//! process; callers receive `Arc` clones and nothing is ever
//! unregistered. Suits fire-and-forget plugins that are activated once
//! and looked up by identifier or capability later.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kitbag_core::{Capability, KitbagError, Plugin};

/// Store of every constructed plugin instance, keyed by identifier.
///
/// All mutation and lookup is serialized behind an internal lock, so a
/// shared registry can be used from several threads without extra
/// coordination.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: RwLock<HashMap<String, Arc<dyn Plugin>>>,
}

impl InstanceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Plugin>>> {
        self.instances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Plugin>>> {
        self.instances.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a freshly constructed instance.
    ///
    /// The identifier must be non-empty and not already registered.
    /// Registration happens exactly once, immediately after construction;
    /// there is no separate lifecycle step and no removal.
    pub fn insert(&self, plugin: Arc<dyn Plugin>) -> Result<(), KitbagError> {
        let identifier = plugin.identifier().to_string();
        if identifier.is_empty() {
            return Err(KitbagError::Registration {
                identifier,
                message: "identifier must not be empty".to_string(),
            });
        }

        let mut instances = self.write();
        if instances.contains_key(&identifier) {
            return Err(KitbagError::Registration {
                identifier,
                message: "identifier already registered".to_string(),
            });
        }

        tracing::debug!(
            "registered plugin instance `{identifier}` (key `{}`)",
            plugin.key()
        );
        instances.insert(identifier, plugin);
        Ok(())
    }

    /// Every live instance, of every plugin type.
    ///
    /// Keying by identifier means no instance can appear twice, whatever
    /// mix of plugin types has been constructed.
    pub fn all(&self) -> Vec<Arc<dyn Plugin>> {
        self.read().values().cloned().collect()
    }

    /// First instance with the given identifier, or `None`.
    pub fn by_identifier(&self, identifier: &str) -> Option<Arc<dyn Plugin>> {
        self.read().get(identifier).cloned()
    }

    /// Whether an instance is registered under `identifier`.
    pub fn contains(&self, identifier: &str) -> bool {
        self.read().contains_key(identifier)
    }

    /// Every instance whose declared capabilities contain `capability`.
    ///
    /// Matching is by capability name equality, nothing structural.
    pub fn by_capability(&self, capability: &Capability) -> Vec<Arc<dyn Plugin>> {
        self.read()
            .values()
            .filter(|p| p.has_capability(capability))
            .cloned()
            .collect()
    }

    /// Identifiers of every registered instance, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Returns the number of registered instances.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no instances are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
