// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Kitbag toolbox.

use thiserror::Error;

/// The primary error type used across all Kitbag crates.
///
/// Structural mistakes (unknown builder key, malformed plugin
/// configuration) are surfaced as errors to the immediate caller.
/// Runtime construction failures are wrapped in [`KitbagError::BuildFailed`]
/// by the builder registry; the activation layer downgrades them to a
/// logged soft failure instead of propagating.
#[derive(Debug, Error)]
pub enum KitbagError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A builder was rejected at registration time.
    #[error("invalid builder for key `{key}`: {reason}")]
    InvalidBuilder { key: String, reason: String },

    /// A build or activation was requested for a key nobody registered.
    #[error("unknown builder key `{key}`")]
    UnknownBuilderKey { key: String },

    /// A builder was found but failed while constructing its plugin.
    #[error("builder `{key}` failed to construct a plugin: {source}")]
    BuildFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The declarative plugins table is not a section-to-mapping structure.
    #[error("invalid plugins configuration: {detail}")]
    InvalidConfigurationShape { detail: String },

    /// The plugins table has no `plugins` identifier list to activate.
    #[error("no `plugins` entry listing identifiers to activate")]
    MissingPluginList,

    /// An identifier from the activation list has no configuration section.
    #[error("no configuration section for plugin identifier `{identifier}`")]
    MissingPluginSection { identifier: String },

    /// A plugin section is missing its required `builder` entry.
    #[error("section `{identifier}` is missing the required `builder` entry")]
    MissingBuilderKey { identifier: String },

    /// An instance could not be inserted into the instance registry.
    #[error("cannot register plugin instance `{identifier}`: {message}")]
    Registration { identifier: String, message: String },

    /// Mail building or SMTP dispatch errors.
    #[error("mail error: {message}")]
    Mail {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
