// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./kitbag.toml` > `~/.config/kitbag/kitbag.toml`
//! > `/etc/kitbag/kitbag.toml`, with environment variable overrides via the
//! `KITBAG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KitbagConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/kitbag/kitbag.toml` (system-wide)
/// 3. `~/.config/kitbag/kitbag.toml` (user XDG config)
/// 4. `./kitbag.toml` (local directory)
/// 5. `KITBAG_*` environment variables
pub fn load_config() -> Result<KitbagConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file hierarchy, no env).
///
/// Used for testing and explicit inline configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KitbagConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KitbagConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KitbagConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KitbagConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KitbagConfig::default()))
        .merge(Toml::file("/etc/kitbag/kitbag.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("kitbag/kitbag.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("kitbag.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` so key names that
/// contain underscores keep them: `KITBAG_MAIL_OAUTH_CMD` must map to
/// `mail.oauth_cmd`, not `mail.oauth.cmd`.
fn env_provider() -> Env {
    Env::prefixed("KITBAG_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("toolbox_", "toolbox.", 1)
            .replacen("mail_", "mail.", 1);
        mapped.into()
    })
}
