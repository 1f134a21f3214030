// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail message model.
//!
//! [`Mail`] is the transport-independent description of a message:
//! subject, addresses, body, attachments. Address syntax is checked as
//! soon as an address enters the structure, so dispatch never sees a
//! malformed mailbox. The body is plain text unless it starts with an
//! `<html` tag.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kitbag_core::KitbagError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};

/// A mail message under construction.
#[derive(Debug, Clone, Default)]
pub struct Mail {
    subject: String,
    sender: Option<Mailbox>,
    recipients: Vec<Mailbox>,
    body: String,
    attachments: Vec<PathBuf>,
    date: Option<DateTime<Utc>>,
}

impl Mail {
    /// Start a message with the given subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Set the sender. Accepts `addr@example.org` or `Name <addr@example.org>`.
    pub fn from_address(mut self, address: &str) -> Result<Self, KitbagError> {
        self.sender = Some(parse_mailbox(address)?);
        Ok(self)
    }

    /// Add a recipient. Accepts the same syntaxes as [`Mail::from_address`].
    pub fn to(mut self, address: &str) -> Result<Self, KitbagError> {
        self.recipients.push(parse_mailbox(address)?);
        Ok(self)
    }

    /// Set the body. HTML bodies are recognized by their `<html` prefix.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach a file. The file is read at dispatch time, not here.
    pub fn attach(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Set an explicit send date instead of "now".
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn sender(&self) -> Option<&Mailbox> {
        self.sender.as_ref()
    }

    pub fn recipients(&self) -> &[Mailbox] {
        &self.recipients
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    /// The MIME type the body will be sent as.
    pub fn mime_type(&self) -> &'static str {
        if self.body.trim_start().starts_with("<html") {
            "text/html"
        } else {
            "text/plain"
        }
    }

    fn body_content_type(&self) -> ContentType {
        if self.mime_type() == "text/html" {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        }
    }

    /// Build the wire-format message.
    ///
    /// The sender falls back to `default_sender` when none was set on the
    /// message itself; with neither, building fails. Attachment files are
    /// read here.
    pub fn to_message(&self, default_sender: Option<&Mailbox>) -> Result<Message, KitbagError> {
        let sender = self
            .sender
            .as_ref()
            .or(default_sender)
            .ok_or_else(|| KitbagError::Mail {
                message: "message has no sender and no default is configured".to_string(),
                source: None,
            })?;
        if self.recipients.is_empty() {
            return Err(KitbagError::Mail {
                message: "message has no recipients".to_string(),
                source: None,
            });
        }

        let mut builder = Message::builder()
            .from(sender.clone())
            .subject(self.subject.clone());
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        if let Some(date) = self.date {
            builder = builder.date(date.into());
        }

        let result = if self.attachments.is_empty() {
            builder
                .header(self.body_content_type())
                .body(self.body.clone())
        } else {
            let mut multipart = MultiPart::mixed().singlepart(
                SinglePart::builder()
                    .header(self.body_content_type())
                    .body(self.body.clone()),
            );
            for path in &self.attachments {
                multipart = multipart.singlepart(read_attachment(path)?);
            }
            builder.multipart(multipart)
        };

        result.map_err(|err| KitbagError::Mail {
            message: "failed to assemble message".to_string(),
            source: Some(Box::new(err)),
        })
    }
}

/// Parse and check one address.
fn parse_mailbox(address: &str) -> Result<Mailbox, KitbagError> {
    address.parse::<Mailbox>().map_err(|err| KitbagError::Mail {
        message: format!("invalid mail address `{address}`"),
        source: Some(Box::new(err)),
    })
}

/// Read a file into an attachment part named after the file.
fn read_attachment(path: &Path) -> Result<SinglePart, KitbagError> {
    let content = std::fs::read(path).map_err(|err| KitbagError::Mail {
        message: format!("cannot read attachment `{}`", path.display()),
        source: Some(Box::new(err)),
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    Ok(Attachment::new(filename).body(content, ContentType::parse("application/octet-stream")
        .map_err(|err| KitbagError::Mail {
            message: "invalid attachment content type".to_string(),
            source: Some(Box::new(err)),
        })?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_malformed_addresses() {
        let result = Mail::new("hello").to("not-an-address");
        assert!(matches!(result, Err(KitbagError::Mail { .. })));

        let result = Mail::new("hello").from_address("also bad");
        assert!(result.is_err());
    }

    #[test]
    fn accepts_named_and_bare_addresses() {
        let mail = Mail::new("hello")
            .to("alice@example.org")
            .unwrap()
            .to("Bob <bob@example.org>")
            .unwrap();
        assert_eq!(mail.recipients().len(), 2);
        assert_eq!(mail.recipients()[1].email.to_string(), "bob@example.org");
    }

    #[test]
    fn html_body_is_detected_by_prefix() {
        let plain = Mail::new("s").body("hello there");
        assert_eq!(plain.mime_type(), "text/plain");

        let html = Mail::new("s").body("<html><body>hi</body></html>");
        assert_eq!(html.mime_type(), "text/html");
    }

    #[test]
    fn sender_falls_back_to_default() {
        let mail = Mail::new("s").to("alice@example.org").unwrap().body("hi");

        let no_sender = mail.to_message(None);
        assert!(matches!(no_sender, Err(KitbagError::Mail { .. })));

        let default: Mailbox = "box@example.org".parse().unwrap();
        let message = mail.to_message(Some(&default)).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("box@example.org"));
        assert!(rendered.contains("Subject: s"));
    }

    #[test]
    fn explicit_sender_wins_over_default() {
        let mail = Mail::new("s")
            .from_address("me@example.org")
            .unwrap()
            .to("alice@example.org")
            .unwrap()
            .body("hi");

        let default: Mailbox = "box@example.org".parse().unwrap();
        let message = mail.to_message(Some(&default)).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("me@example.org"));
        assert!(!rendered.contains("box@example.org"));
    }

    #[test]
    fn missing_recipients_is_an_error() {
        let mail = Mail::new("s").from_address("me@example.org").unwrap();
        assert!(mail.to_message(None).is_err());
    }

    #[test]
    fn attachment_produces_multipart_message() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "attachment payload").unwrap();

        let mail = Mail::new("with attachment")
            .from_address("me@example.org")
            .unwrap()
            .to("alice@example.org")
            .unwrap()
            .body("see attached")
            .attach(file.path());

        let message = mail.to_message(None).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("multipart/mixed"));
        assert!(rendered.contains("attachment"));
    }

    #[test]
    fn missing_attachment_file_fails_at_build_time() {
        let mail = Mail::new("s")
            .from_address("me@example.org")
            .unwrap()
            .to("alice@example.org")
            .unwrap()
            .attach("/definitely/not/here.bin");
        assert!(matches!(mail.to_message(None), Err(KitbagError::Mail { .. })));
    }
}
