// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mailer exposed through the plugin system.
//!
//! `SmtpMailerPlugin` declares the `mail.send` capability and requires
//! configuration: activated without any, it stays registered but
//! inactive. Section parameters overlay the process-wide `[mail]`
//! defaults, so several mailer instances with different accounts can
//! coexist.

use std::sync::Arc;

use kitbag_config::MailConfig;
use kitbag_core::{Capability, KitbagError, Plugin, PluginParams};
use kitbag_plugin::{FnBuilder, PluginBuilder};

use crate::sender::SmtpMailer;

/// Capability declared by mail-dispatching plugins.
pub const MAIL_SEND: Capability = Capability::new("mail.send");

/// Builder-family key of the SMTP mailer.
pub const SMTP_MAILER_KEY: &str = "smtp-mailer";

const CAPABILITIES: &[Capability] = &[MAIL_SEND];

/// An SMTP mailer activated through the plugin system.
pub struct SmtpMailerPlugin {
    identifier: String,
    params: PluginParams,
    config: MailConfig,
}

impl SmtpMailerPlugin {
    fn new(identifier: &str, params: &PluginParams, defaults: Option<&MailConfig>) -> Self {
        let mut config = defaults.cloned().unwrap_or_default();
        overlay(&mut config, params);

        // The snapshot that decides activity: explicit section entries,
        // else the process-wide mail defaults we were built around.
        let params = if params.is_empty() {
            defaults
                .and_then(|d| toml::Value::try_from(d).ok())
                .and_then(|v| v.as_table().cloned())
                .map(PluginParams::from_table)
                .unwrap_or_default()
        } else {
            params.clone()
        };

        Self {
            identifier: identifier.to_string(),
            params,
            config,
        }
    }

    /// The effective mail configuration of this instance.
    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Connect a mailer for this instance's configuration.
    pub async fn mailer(&self) -> Result<SmtpMailer, KitbagError> {
        SmtpMailer::from_config(&self.config).await
    }
}

impl Plugin for SmtpMailerPlugin {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn key(&self) -> &str {
        SMTP_MAILER_KEY
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    fn requires_config(&self) -> bool {
        true
    }

    fn params(&self) -> &PluginParams {
        &self.params
    }
}

/// Builder for [`SmtpMailerPlugin`], registered under `smtp-mailer`.
///
/// Carries the process-wide `[mail]` configuration as defaults; section
/// entries override individual fields.
pub fn smtp_mailer_builder(defaults: Option<MailConfig>) -> Arc<dyn PluginBuilder> {
    Arc::new(FnBuilder::new(
        SMTP_MAILER_KEY,
        move |identifier: &str, params: &PluginParams| {
            Ok(Box::new(SmtpMailerPlugin::new(
                identifier,
                params,
                defaults.as_ref(),
            )) as Box<dyn Plugin>)
        },
    ))
}

/// Apply section entries on top of the defaults, field by field.
fn overlay(config: &mut MailConfig, params: &PluginParams) {
    if let Some(host) = params.get_str("host") {
        config.host = host.to_string();
    }
    if let Some(port) = params.get_integer("port").and_then(|p| u16::try_from(p).ok()) {
        config.port = Some(port);
    }
    if let Some(ssl) = params.get_bool("ssl") {
        config.ssl = ssl;
    }
    if let Some(username) = params.get_str("username") {
        config.username = Some(username.to_string());
    }
    if let Some(password) = params.get_str("password") {
        config.password = Some(password.to_string());
    }
    if let Some(oauth_cmd) = params.get_str("oauth_cmd") {
        config.oauth_cmd = Some(oauth_cmd.to_string());
    }
    if let Some(oauth_client_id) = params.get_str("oauth_client_id") {
        config.oauth_client_id = Some(oauth_client_id.to_string());
    }
    if let Some(sender) = params.get_str("sender") {
        config.sender = Some(sender.to_string());
    }
}
