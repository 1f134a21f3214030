// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! known log levels, coherent mail credentials, and the shape of the
//! free-form `[plugins]` table.

use crate::diagnostic::ConfigError;
use crate::model::KitbagConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing fast, so one run reports
/// all problems.
pub fn validate_config(config: &KitbagConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.toolbox.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "toolbox.log_level `{}` is not one of {}",
                config.toolbox.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.toolbox.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "toolbox.name must not be empty".to_string(),
        });
    }

    if config.mail.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "mail.host must not be empty".to_string(),
        });
    }

    if config.mail.port == Some(0) {
        errors.push(ConfigError::Validation {
            message: "mail.port must not be 0".to_string(),
        });
    }

    if config.mail.password.is_some() && config.mail.username.is_none() {
        errors.push(ConfigError::Validation {
            message: "mail.password is set but mail.username is not".to_string(),
        });
    }

    // XOAUTH2 needs both the token command and the client id.
    if config.mail.oauth_cmd.is_some() != config.mail.oauth_client_id.is_some() {
        errors.push(ConfigError::Validation {
            message: "mail.oauth_cmd and mail.oauth_client_id must be set together".to_string(),
        });
    }

    // The plugins table: a `plugins` string entry, every other entry a
    // section table.
    for (name, value) in &config.plugins {
        if name == "plugins" {
            if !value.is_str() {
                errors.push(ConfigError::Validation {
                    message: "plugins.plugins must be a comma-separated string".to_string(),
                });
            }
        } else if !value.is_table() {
            errors.push(ConfigError::Validation {
                message: format!("plugins.{name} must be a table of builder parameters"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&KitbagConfig::default()).is_ok());
    }

    #[test]
    fn bogus_log_level_fails_validation() {
        let mut config = KitbagConfig::default();
        config.toolbox.log_level = "chatty".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn password_without_username_fails_validation() {
        let mut config = KitbagConfig::default();
        config.mail.password = Some("hunter2".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("username"))));
    }

    #[test]
    fn oauth_fields_must_come_together() {
        let mut config = KitbagConfig::default();
        config.mail.oauth_cmd = Some("/usr/bin/token".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("oauth"))));

        config.mail.oauth_client_id = Some("client-1".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_table_plugin_section_fails_validation() {
        let mut config = KitbagConfig::default();
        config
            .plugins
            .insert("kodi1".to_string(), toml::Value::String("oops".to_string()));
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("kodi1"))));
    }

    #[test]
    fn well_formed_plugins_table_passes() {
        let config: KitbagConfig = toml::from_str(
            r#"
[plugins]
plugins = "a,b"

[plugins.a]
builder = "echo"

[plugins.b]
builder = "echo"
host = "room.local"
"#,
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_multiple_errors_in_one_pass() {
        let mut config = KitbagConfig::default();
        config.toolbox.log_level = "chatty".to_string();
        config.mail.host = "  ".to_string();
        config.mail.port = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
