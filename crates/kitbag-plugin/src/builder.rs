// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder trait and builder registry.
//!
//! A builder constructs plugin instances for one builder-family key.
//! The registry stores builders keyed by that key; activation looks the
//! builder up and invokes it. Registering a second builder under an
//! existing key replaces the first one (last write wins) with a warning.

use std::collections::HashMap;
use std::sync::Arc;

use kitbag_core::{KitbagError, Plugin, PluginParams};

/// Constructs plugin instances for one builder-family key.
///
/// Implement this directly when construction needs state of its own
/// (shared handles, alternative representations of the same plugin
/// family). When the plugin type's constructor is all there is, wrap it
/// in a [`FnBuilder`] instead of writing a dedicated builder type.
pub trait PluginBuilder: Send + Sync {
    /// The key this builder is registered under.
    fn key(&self) -> &str;

    /// Construct a plugin instance with the given identifier and parameters.
    fn build(
        &self,
        identifier: &str,
        params: &PluginParams,
    ) -> Result<Box<dyn Plugin>, KitbagError>;
}

/// Adapts a plain constructor function into a [`PluginBuilder`].
pub struct FnBuilder<F> {
    key: String,
    build: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&str, &PluginParams) -> Result<Box<dyn Plugin>, KitbagError> + Send + Sync,
{
    pub fn new(key: impl Into<String>, build: F) -> Self {
        Self {
            key: key.into(),
            build,
        }
    }
}

impl<F> PluginBuilder for FnBuilder<F>
where
    F: Fn(&str, &PluginParams) -> Result<Box<dyn Plugin>, KitbagError> + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn build(
        &self,
        identifier: &str,
        params: &PluginParams,
    ) -> Result<Box<dyn Plugin>, KitbagError> {
        (self.build)(identifier, params)
    }
}

/// Registry of plugin builders, keyed by builder-family key.
#[derive(Default)]
pub struct BuilderRegistry {
    builders: HashMap<String, Arc<dyn PluginBuilder>>,
}

impl BuilderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Register a builder under its own key.
    ///
    /// Rejects builders with an empty key. Registering under an occupied
    /// key replaces the previous builder silently apart from a warning —
    /// the documented last-write-wins policy.
    pub fn register(&mut self, builder: Arc<dyn PluginBuilder>) -> Result<(), KitbagError> {
        let key = builder.key().trim().to_string();
        if key.is_empty() {
            return Err(KitbagError::InvalidBuilder {
                key,
                reason: "builder key must not be empty".to_string(),
            });
        }

        if self.builders.insert(key.clone(), builder).is_some() {
            tracing::warn!("builder `{key}` re-registered, previous builder replaced");
        } else {
            tracing::debug!("builder `{key}` registered");
        }
        Ok(())
    }

    /// Look up the builder for `key` and invoke it.
    ///
    /// Fails with [`KitbagError::UnknownBuilderKey`] when nothing is
    /// registered under `key`. Construction failures are wrapped in
    /// [`KitbagError::BuildFailed`] so the key travels with the error.
    pub fn build(
        &self,
        key: &str,
        identifier: &str,
        params: &PluginParams,
    ) -> Result<Box<dyn Plugin>, KitbagError> {
        let builder = self
            .builders
            .get(key)
            .ok_or_else(|| KitbagError::UnknownBuilderKey {
                key: key.to_string(),
            })?;

        builder
            .build(identifier, params)
            .map_err(|source| KitbagError::BuildFailed {
                key: key.to_string(),
                source: Box::new(source),
            })
    }

    /// Get a builder by key.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn PluginBuilder>> {
        self.builders.get(key)
    }

    /// Read-only view over `(key, builder)` pairs, for diagnostics.
    pub fn builders(&self) -> impl Iterator<Item = (&str, &Arc<dyn PluginBuilder>)> {
        self.builders.iter().map(|(k, b)| (k.as_str(), b))
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.builders.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Whether a builder is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.builders.contains_key(key)
    }

    /// Returns the number of registered builders.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns true if no builders are registered.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitbag_core::Capability;

    struct TagPlugin {
        identifier: String,
        tag: &'static str,
        params: PluginParams,
    }

    impl Plugin for TagPlugin {
        fn identifier(&self) -> &str {
            &self.identifier
        }

        fn key(&self) -> &str {
            self.tag
        }

        fn capabilities(&self) -> &'static [Capability] {
            &[]
        }

        fn params(&self) -> &PluginParams {
            &self.params
        }
    }

    fn tag_builder(key: &str, tag: &'static str) -> Arc<dyn PluginBuilder> {
        let key = key.to_string();
        Arc::new(FnBuilder::new(key, move |identifier: &str, params: &PluginParams| {
            Ok(Box::new(TagPlugin {
                identifier: identifier.to_string(),
                tag,
                params: params.clone(),
            }) as Box<dyn Plugin>)
        }))
    }

    #[test]
    fn register_and_build() {
        let mut registry = BuilderRegistry::new();
        registry.register(tag_builder("tag", "first")).unwrap();

        let plugin = registry
            .build("tag", "t1", &PluginParams::new())
            .unwrap();
        assert_eq!(plugin.identifier(), "t1");
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut registry = BuilderRegistry::new();
        let result = registry.register(tag_builder("  ", "x"));
        assert!(matches!(result, Err(KitbagError::InvalidBuilder { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn re_registration_is_last_write_wins() {
        let mut registry = BuilderRegistry::new();
        registry.register(tag_builder("tag", "first")).unwrap();
        registry.register(tag_builder("tag", "second")).unwrap();
        assert_eq!(registry.len(), 1);

        // The surviving builder is the second registration.
        let plugin = registry
            .build("tag", "t1", &PluginParams::new())
            .unwrap();
        assert_eq!(plugin.key(), "second");
    }

    #[test]
    fn unknown_key_fails() {
        let registry = BuilderRegistry::new();
        let result = registry.build("missing", "x", &PluginParams::new());
        assert!(matches!(
            result,
            Err(KitbagError::UnknownBuilderKey { key }) if key == "missing"
        ));
    }

    #[test]
    fn construction_failure_is_wrapped_with_key_context() {
        let mut registry = BuilderRegistry::new();
        registry
            .register(Arc::new(FnBuilder::new("broken", |_: &str, _: &PluginParams| {
                Err(KitbagError::Internal("out of widgets".to_string()))
            })))
            .unwrap();

        let err = registry
            .build("broken", "b1", &PluginParams::new())
            .err()
            .unwrap();
        let rendered = err.to_string();
        assert!(rendered.contains("broken"));
        assert!(matches!(err, KitbagError::BuildFailed { .. }));
    }
}
