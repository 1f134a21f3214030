// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP dispatch.
//!
//! [`SmtpMailer`] turns a [`MailConfig`] into a ready transport and sends
//! [`Mail`] messages over it. Three authentication modes, picked from the
//! populated config fields: anonymous submission, username/password, or
//! XOAUTH2 with the token produced by an external command at connection
//! time (tokens are short-lived, so nothing is cached).

use kitbag_config::MailConfig;
use kitbag_core::KitbagError;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::message::Mail;

/// How the mailer authenticates against the SMTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// No authentication at all.
    Anonymous,
    /// Username and password.
    Password { username: String, password: String },
    /// XOAUTH2 with a token fetched by running `command`.
    XOauth2 { username: String, command: String },
}

impl AuthMode {
    /// Derive the authentication mode from the populated config fields.
    ///
    /// OAuth wins over password when both are configured; both require a
    /// username.
    pub fn from_config(config: &MailConfig) -> Result<Self, KitbagError> {
        if let Some(command) = &config.oauth_cmd {
            let username = config.username.clone().ok_or_else(|| KitbagError::Mail {
                message: "mail.oauth_cmd requires mail.username".to_string(),
                source: None,
            })?;
            return Ok(Self::XOauth2 {
                username,
                command: command.clone(),
            });
        }
        match (&config.username, &config.password) {
            (Some(username), Some(password)) => Ok(Self::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            (Some(_), None) => Err(KitbagError::Mail {
                message: "mail.username is set but mail.password is not".to_string(),
                source: None,
            }),
            _ => Ok(Self::Anonymous),
        }
    }
}

/// Sends [`Mail`] messages over a configured SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_sender: Option<Mailbox>,
}

impl SmtpMailer {
    /// Build a mailer from configuration.
    ///
    /// With `ssl` the connection is wrapped in TLS from the first byte
    /// (SMTPS); without it the connection is plain, for local relays.
    /// OAuth token retrieval runs here, which is why this is async.
    pub async fn from_config(config: &MailConfig) -> Result<Self, KitbagError> {
        let mut builder = if config.ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(|err| {
                KitbagError::Mail {
                    message: format!("cannot set up TLS for `{}`", config.host),
                    source: Some(Box::new(err)),
                }
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.effective_port());

        match AuthMode::from_config(config)? {
            AuthMode::Anonymous => {}
            AuthMode::Password { username, password } => {
                builder = builder.credentials(Credentials::new(username, password));
            }
            AuthMode::XOauth2 { username, command } => {
                let token = oauth_token(&command).await?;
                builder = builder
                    .credentials(Credentials::new(username, token))
                    .authentication(vec![Mechanism::Xoauth2]);
            }
        }

        let default_sender = config
            .sender
            .as_deref()
            .or(config.username.as_deref())
            .map(|address| {
                address.parse::<Mailbox>().map_err(|err| KitbagError::Mail {
                    message: format!("invalid mail.sender `{address}`"),
                    source: Some(Box::new(err)),
                })
            })
            .transpose()?;

        Ok(Self {
            transport: builder.build(),
            default_sender,
        })
    }

    /// The sender used when a message carries none.
    pub fn default_sender(&self) -> Option<&Mailbox> {
        self.default_sender.as_ref()
    }

    /// Assemble and send one message.
    pub async fn send(&self, mail: &Mail) -> Result<(), KitbagError> {
        let message = mail.to_message(self.default_sender.as_ref())?;
        tracing::debug!(
            "sending `{}` to {} recipient(s)",
            mail.subject(),
            mail.recipients().len()
        );

        self.transport
            .send(message)
            .await
            .map_err(|err| KitbagError::Mail {
                message: format!("SMTP dispatch of `{}` failed", mail.subject()),
                source: Some(Box::new(err)),
            })?;
        tracing::info!("sent `{}`", mail.subject());
        Ok(())
    }
}

/// Run the configured token command and return its trimmed stdout.
async fn oauth_token(command: &str) -> Result<String, KitbagError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| KitbagError::Mail {
        message: "mail.oauth_cmd is empty".to_string(),
        source: None,
    })?;

    let output = tokio::process::Command::new(program)
        .args(parts)
        .output()
        .await
        .map_err(|err| KitbagError::Mail {
            message: format!("cannot run oauth command `{command}`"),
            source: Some(Box::new(err)),
        })?;

    if !output.status.success() {
        return Err(KitbagError::Mail {
            message: format!(
                "oauth command `{command}` exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            source: None,
        });
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(KitbagError::Mail {
            message: format!("oauth command `{command}` produced no token"),
            source: None,
        });
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_when_nothing_is_configured() {
        let config = MailConfig::default();
        assert_eq!(AuthMode::from_config(&config).unwrap(), AuthMode::Anonymous);
    }

    #[test]
    fn password_mode_needs_both_fields() {
        let mut config = MailConfig::default();
        config.username = Some("me".to_string());
        assert!(AuthMode::from_config(&config).is_err());

        config.password = Some("hunter2".to_string());
        assert_eq!(
            AuthMode::from_config(&config).unwrap(),
            AuthMode::Password {
                username: "me".to_string(),
                password: "hunter2".to_string()
            }
        );
    }

    #[test]
    fn oauth_wins_over_password_and_needs_username() {
        let mut config = MailConfig::default();
        config.oauth_cmd = Some("/usr/bin/token".to_string());
        config.oauth_client_id = Some("client-1".to_string());
        assert!(AuthMode::from_config(&config).is_err(), "username missing");

        config.username = Some("me".to_string());
        config.password = Some("unused".to_string());
        assert_eq!(
            AuthMode::from_config(&config).unwrap(),
            AuthMode::XOauth2 {
                username: "me".to_string(),
                command: "/usr/bin/token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn oauth_token_takes_trimmed_stdout() {
        let token = oauth_token("echo  ya29.token-value").await.unwrap();
        assert_eq!(token, "ya29.token-value");
    }

    #[tokio::test]
    async fn oauth_token_rejects_missing_command() {
        let result = oauth_token("/definitely/not/a/command").await;
        assert!(matches!(result, Err(KitbagError::Mail { .. })));
    }

    #[tokio::test]
    async fn oauth_token_rejects_empty_output() {
        let result = oauth_token("true").await;
        assert!(matches!(result, Err(KitbagError::Mail { .. })));
    }

    #[tokio::test]
    async fn mailer_builds_with_plain_config_and_default_sender() {
        let mut config = MailConfig::default();
        config.sender = Some("Box <box@example.org>".to_string());

        let mailer = SmtpMailer::from_config(&config).await.unwrap();
        assert_eq!(
            mailer.default_sender().unwrap().email.to_string(),
            "box@example.org"
        );
    }
}
