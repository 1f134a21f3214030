// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the plugin system and its consumers.

use std::fmt;

/// A named behavioral contract a plugin claims to implement.
///
/// Capabilities are declarative tags fixed per concrete plugin type at
/// definition time. Nothing is verified structurally at registration;
/// they exist so callers can ask the instance registry for "every plugin
/// that claims to do X". Matching is by name equality only. Two plugins
/// may declare the same capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    /// Declare a capability tag, usually in a `const`:
    ///
    /// ```
    /// use kitbag_core::Capability;
    ///
    /// const MAIL_SEND: Capability = Capability::new("mail.send");
    /// assert_eq!(MAIL_SEND.name(), "mail.send");
    /// ```
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The capability's name, the sole basis for matching.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Pass-through construction parameters for a plugin.
///
/// Holds the key/value entries of a configuration section verbatim
/// (minus the entries the activation layer consumes itself). Builders
/// read whatever they need; unknown entries are not an error at this
/// layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginParams(toml::Table);

impl PluginParams {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self(toml::Table::new())
    }

    /// Wrap an existing TOML table, preserving entry order.
    pub fn from_table(table: toml::Table) -> Self {
        Self(table)
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove an entry, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.0.remove(key)
    }

    /// Raw access to an entry.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    /// String entry, if present and actually a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(toml::Value::as_str)
    }

    /// Boolean entry, if present and actually a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(toml::Value::as_bool)
    }

    /// Integer entry, if present and actually an integer.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(toml::Value::as_integer)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &toml::Value)> {
        self.0.iter()
    }
}

impl From<toml::Table> for PluginParams {
    fn from(table: toml::Table) -> Self {
        Self::from_table(table)
    }
}

impl FromIterator<(String, toml::Value)> for PluginParams {
    fn from_iter<I: IntoIterator<Item = (String, toml::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
