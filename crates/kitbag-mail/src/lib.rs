// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail utility for the Kitbag toolbox.
//!
//! A small wrapper over SMTP submission: [`Mail`] describes a message,
//! [`SmtpMailer`] dispatches it using the `[mail]` configuration, and
//! [`SmtpMailerPlugin`] exposes the whole thing through the plugin
//! system under the `mail.send` capability.

pub mod message;
pub mod plugin;
pub mod sender;

pub use message::Mail;
pub use plugin::{smtp_mailer_builder, SmtpMailerPlugin, MAIL_SEND, SMTP_MAILER_KEY};
pub use sender::{AuthMode, SmtpMailer};
