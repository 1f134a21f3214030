// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all plugin instances implement.

use crate::types::{Capability, PluginParams};

/// A pluggable, independently activatable unit of behavior.
///
/// Instances are produced by a builder registered in the plugin system
/// and tracked in the process-wide instance registry. Identity and
/// capability declarations live here; the actual behavior is whatever
/// inherent API the concrete type exposes.
pub trait Plugin: Send + Sync + 'static {
    /// The registry-unique identifier of this instance.
    ///
    /// Assigned at construction, either by the caller or generated by the
    /// activation layer. Must be non-empty. Each instance gets its own —
    /// identifiers are never shared between instances.
    fn identifier(&self) -> &str;

    /// The builder-family key of this plugin type (e.g. `"smtp-mailer"`).
    ///
    /// For types following the `FooPlugin` naming convention,
    /// [`builder_key_from_type_name`] derives the conventional key.
    fn key(&self) -> &str;

    /// The capabilities this plugin type declares, fixed per concrete type.
    fn capabilities(&self) -> &'static [Capability];

    /// Whether this plugin is unusable without a configuration snapshot.
    fn requires_config(&self) -> bool {
        false
    }

    /// The configuration snapshot handed to the instance at construction.
    fn params(&self) -> &PluginParams;

    /// Whether the instance is usable.
    ///
    /// A plugin is inactive only when it requires configuration and its
    /// snapshot is empty. Inactive instances stay registered; the
    /// activation layer reports them as soft failures.
    fn is_active(&self) -> bool {
        !self.requires_config() || !self.params().is_empty()
    }

    /// Whether this plugin declares the given capability (name equality).
    fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities().contains(capability)
    }
}

/// Derive the conventional builder key from a type name.
///
/// Takes the last path segment, strips a trailing `Plugin` suffix if
/// present, and lowercases the rest: `mail::SmtpMailerPlugin` becomes
/// `"smtpmailer"`.
pub fn builder_key_from_type_name(type_name: &str) -> String {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    let trimmed = base.strip_suffix("Plugin").unwrap_or(base);
    trimmed.to_lowercase()
}
