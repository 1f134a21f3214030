// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Kitbag toolbox.
//!
//! The structured sections use `#[serde(deny_unknown_fields)]` so typos
//! are rejected at startup with actionable messages. The `[plugins]`
//! table is deliberately free-form: it maps plugin identifiers to
//! arbitrary builder parameters and is interpreted by the plugin system,
//! not here.

use serde::{Deserialize, Serialize};

/// Top-level Kitbag configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KitbagConfig {
    /// Toolbox identity and logging settings.
    #[serde(default)]
    pub toolbox: ToolboxConfig,

    /// SMTP mail dispatch settings.
    #[serde(default)]
    pub mail: MailConfig,

    /// Declarative plugin activation: a `plugins` entry listing the
    /// identifiers to activate, plus one sub-table per identifier with
    /// its `builder` key and pass-through parameters.
    #[serde(default)]
    pub plugins: toml::Table,
}

/// Toolbox identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Display name used in logs and generated mail.
    #[serde(default = "default_toolbox_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            name: default_toolbox_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_toolbox_name() -> String {
    "kitbag".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SMTP mail dispatch configuration.
///
/// Three authentication modes, picked from the populated fields:
/// anonymous (nothing set), username/password, or XOAUTH2 where
/// `oauth_cmd` is an external command printing a ready-to-use token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// SMTP server hostname.
    #[serde(default = "default_mail_host")]
    pub host: String,

    /// SMTP port. When unset: 465 with `ssl`, 25 without.
    #[serde(default)]
    pub port: Option<u16>,

    /// Use implicit TLS (SMTPS) instead of a plain connection.
    #[serde(default)]
    pub ssl: bool,

    /// Account username. `None` means anonymous submission.
    #[serde(default)]
    pub username: Option<String>,

    /// Account password, for password authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// External command printing an XOAUTH2 token on stdout.
    #[serde(default)]
    pub oauth_cmd: Option<String>,

    /// OAuth client identifier announced to the server.
    #[serde(default)]
    pub oauth_client_id: Option<String>,

    /// Default `From` mailbox when a message has no explicit sender.
    #[serde(default)]
    pub sender: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_mail_host(),
            port: None,
            ssl: false,
            username: None,
            password: None,
            oauth_cmd: None,
            oauth_client_id: None,
            sender: None,
        }
    }
}

impl MailConfig {
    /// The effective port: the configured one, else the conventional
    /// default for the connection mode.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.ssl { 465 } else { 25 })
    }
}

fn default_mail_host() -> String {
    "localhost".to_string()
}
