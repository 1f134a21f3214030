// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activation orchestrator.
//!
//! Activation is the process of obtaining a usable plugin instance for an
//! identifier: reuse the registered instance when one exists, otherwise
//! construct through the builder registry and record the result. The
//! failure policy is deliberately asymmetric — structural mistakes
//! (unknown builder key, malformed plugin configuration) are raised,
//! while runtime construction failures and inactive instances are logged
//! and reported as `Ok(None)` so bulk activation can carry on past them.

use std::sync::{Arc, PoisonError, RwLock};

use kitbag_core::{KitbagError, Plugin, PluginParams};
use uuid::Uuid;

use crate::builder::{BuilderRegistry, PluginBuilder};
use crate::registry::InstanceRegistry;

/// Entry of the plugins table holding the comma-separated identifier list.
pub const PLUGIN_LIST_KEY: &str = "plugins";

/// Entry of a plugin section naming the builder to invoke.
pub const BUILDER_ENTRY: &str = "builder";

/// Orchestrates plugin activation over a builder registry and the
/// process-wide instance registry.
///
/// Activation is idempotent on identifier: activating the same
/// identifier twice returns the same instance instead of constructing a
/// duplicate, which makes re-invocation from configuration reloads safe.
#[derive(Default)]
pub struct Activator {
    builders: RwLock<BuilderRegistry>,
    instances: Arc<InstanceRegistry>,
    defaults: Option<toml::Table>,
}

impl Activator {
    /// Create an activator with empty registries and no default
    /// plugins table.
    pub fn new() -> Self {
        Self {
            builders: RwLock::new(BuilderRegistry::new()),
            instances: Arc::new(InstanceRegistry::new()),
            defaults: None,
        }
    }

    /// Create an activator whose [`Activator::activate_from_config`] falls
    /// back to the given plugins table, usually the `[plugins]` table of
    /// the process configuration.
    pub fn with_defaults(defaults: toml::Table) -> Self {
        Self {
            builders: RwLock::new(BuilderRegistry::new()),
            instances: Arc::new(InstanceRegistry::new()),
            defaults: Some(defaults),
        }
    }

    /// Register a single builder.
    pub fn register_builder(&self, builder: Arc<dyn PluginBuilder>) -> Result<(), KitbagError> {
        self.builders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(builder)
    }

    /// Register a batch of builders, failing on the first invalid one.
    pub fn register_builders(
        &self,
        builders: impl IntoIterator<Item = Arc<dyn PluginBuilder>>,
    ) -> Result<(), KitbagError> {
        for builder in builders {
            self.register_builder(builder)?;
        }
        Ok(())
    }

    /// The shared instance registry.
    pub fn instances(&self) -> &Arc<InstanceRegistry> {
        &self.instances
    }

    /// Keys of every registered builder, sorted.
    pub fn builder_keys(&self) -> Vec<String> {
        self.builders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
    }

    /// Obtain a usable plugin instance for `key`, constructing one if the
    /// identifier is not yet registered.
    ///
    /// Returns `Ok(Some(instance))` on success and `Ok(None)` for the two
    /// soft failures: the builder failed at construction time, or the
    /// instance reports itself inactive. Both are logged; the caller may
    /// simply call `activate` again to retry. An unregistered `key` is a
    /// programmer error and raised as [`KitbagError::UnknownBuilderKey`].
    ///
    /// When no identifier is supplied a fresh one is generated, one per
    /// instance — repeated anonymous activations yield distinct instances.
    pub fn activate(
        &self,
        key: &str,
        identifier: Option<&str>,
        params: PluginParams,
    ) -> Result<Option<Arc<dyn Plugin>>, KitbagError> {
        if let Some(id) = identifier
            && let Some(existing) = self.instances.by_identifier(id)
        {
            tracing::debug!("plugin `{id}` already activated, reusing");
            return self.usable(existing, key);
        }

        let identifier = match identifier {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let built = self
            .builders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .build(key, &identifier, &params);

        let plugin: Arc<dyn Plugin> = match built {
            Ok(plugin) => Arc::from(plugin),
            Err(err @ KitbagError::UnknownBuilderKey { .. }) => return Err(err),
            Err(err) => {
                tracing::error!("activation of `{identifier}` (builder `{key}`) failed: {err}");
                return Ok(None);
            }
        };

        // The instance owns the authoritative identifier from here on.
        let assigned = plugin.identifier().to_string();
        match self.instances.insert(Arc::clone(&plugin)) {
            Ok(()) => {}
            // Lost a construction race for the same identifier; the
            // registered instance wins and ours is dropped.
            Err(KitbagError::Registration { .. }) if self.instances.contains(&assigned) => {
                tracing::debug!("plugin `{assigned}` registered concurrently, reusing");
            }
            Err(err) => return Err(err),
        }

        let registered = self
            .instances
            .by_identifier(&assigned)
            .ok_or_else(|| KitbagError::Internal(format!(
                "plugin `{assigned}` missing from registry right after registration"
            )))?;
        self.usable(registered, key)
    }

    /// Activate the plugins declared in a configuration table.
    ///
    /// The table maps section names to key/value tables, plus a
    /// well-known `plugins` entry listing the identifiers to activate as
    /// a comma-separated string:
    ///
    /// ```toml
    /// [plugins]
    /// plugins = "kodi1,kodi2,trakt1"
    ///
    /// [plugins.kodi1]
    /// builder = "kodi"
    /// host = "room.local"
    ///
    /// [plugins.kodi2]
    /// builder = "kodi"
    /// host = "kitchen.local"
    ///
    /// [plugins.trakt1]
    /// builder = "trakt"
    /// ```
    ///
    /// When `identifiers` is supplied only those sections are activated;
    /// otherwise the list comes from the `plugins` entry
    /// ([`KitbagError::MissingPluginList`] if absent). Each section must
    /// carry a `builder` entry; the remaining entries are passed through
    /// verbatim to the builder.
    ///
    /// Returns one result per identifier in input order, `None` marking
    /// soft failures — including sections naming an unregistered builder,
    /// which must not abort activation of the remaining plugins. Errors
    /// about the table itself (shape, missing list, missing section or
    /// builder entry) abort the call; plugins activated before the abort
    /// stay registered.
    pub fn activate_from_config(
        &self,
        identifiers: Option<&[String]>,
        table: Option<&toml::Table>,
    ) -> Result<Vec<Option<Arc<dyn Plugin>>>, KitbagError> {
        let table = table.or(self.defaults.as_ref()).ok_or_else(|| {
            KitbagError::InvalidConfigurationShape {
                detail: "no plugins configuration available".to_string(),
            }
        })?;

        let listed;
        let identifiers: &[String] = match identifiers {
            Some(ids) => ids,
            None => {
                listed = Self::listed_identifiers(table)?;
                &listed
            }
        };

        let mut results = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let (key, params) = Self::section(table, identifier)?;
            match self.activate(&key, Some(identifier), params) {
                Ok(outcome) => results.push(outcome),
                Err(err @ KitbagError::UnknownBuilderKey { .. }) => {
                    tracing::error!("cannot activate `{identifier}`: {err}");
                    results.push(None);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(results)
    }

    /// Parse the comma-separated identifier list out of the plugins table.
    fn listed_identifiers(table: &toml::Table) -> Result<Vec<String>, KitbagError> {
        let raw = table
            .get(PLUGIN_LIST_KEY)
            .ok_or(KitbagError::MissingPluginList)?;
        let raw = raw
            .as_str()
            .ok_or_else(|| KitbagError::InvalidConfigurationShape {
                detail: format!("`{PLUGIN_LIST_KEY}` must be a comma-separated string"),
            })?;

        let identifiers: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if identifiers.is_empty() {
            return Err(KitbagError::MissingPluginList);
        }
        Ok(identifiers)
    }

    /// Extract the builder key and pass-through parameters of one section.
    fn section(
        table: &toml::Table,
        identifier: &str,
    ) -> Result<(String, PluginParams), KitbagError> {
        let section = table
            .get(identifier)
            .ok_or_else(|| KitbagError::MissingPluginSection {
                identifier: identifier.to_string(),
            })?;
        let section = section
            .as_table()
            .ok_or_else(|| KitbagError::InvalidConfigurationShape {
                detail: format!("section `{identifier}` is not a table"),
            })?;

        let mut params = PluginParams::from_table(section.clone());
        let key = match params.remove(BUILDER_ENTRY) {
            Some(toml::Value::String(key)) => key,
            Some(_) => {
                return Err(KitbagError::InvalidConfigurationShape {
                    detail: format!("`{BUILDER_ENTRY}` entry of section `{identifier}` must be a string"),
                });
            }
            None => {
                return Err(KitbagError::MissingBuilderKey {
                    identifier: identifier.to_string(),
                });
            }
        };
        Ok((key, params))
    }

    /// Final activation gate: inactive instances are reported as a soft
    /// failure but stay registered.
    fn usable(
        &self,
        plugin: Arc<dyn Plugin>,
        key: &str,
    ) -> Result<Option<Arc<dyn Plugin>>, KitbagError> {
        if !plugin.is_active() {
            tracing::warn!(
                "plugin `{}` (builder `{key}`) is inactive, configuration required",
                plugin.identifier()
            );
            return Ok(None);
        }
        Ok(Some(plugin))
    }
}
