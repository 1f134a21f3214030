// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `kitbag send` subcommand: build a mail from the command line and
//! dispatch it through the configured SMTP account.

use std::path::PathBuf;

use clap::Args;
use kitbag_config::KitbagConfig;
use kitbag_core::KitbagError;
use kitbag_mail::{Mail, SmtpMailer};

/// Arguments of `kitbag send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient address; repeat for several recipients.
    #[arg(long = "to", required = true)]
    pub to: Vec<String>,

    /// Subject line.
    #[arg(long)]
    pub subject: String,

    /// Body text; read from stdin when omitted.
    #[arg(long)]
    pub body: Option<String>,

    /// File to attach; repeatable.
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Explicit sender, overriding the configured default.
    #[arg(long)]
    pub from: Option<String>,
}

pub async fn run(config: &KitbagConfig, args: SendArgs) -> Result<(), KitbagError> {
    let body = match args.body {
        Some(body) => body,
        None => read_stdin().await?,
    };

    let mut mail = Mail::new(args.subject).body(body);
    if let Some(from) = &args.from {
        mail = mail.from_address(from)?;
    }
    for recipient in &args.to {
        mail = mail.to(recipient)?;
    }
    for path in args.attachments {
        mail = mail.attach(path);
    }

    let mailer = SmtpMailer::from_config(&config.mail).await?;
    mailer.send(&mail).await?;
    println!("sent `{}`", mail.subject());
    Ok(())
}

/// Read the whole of stdin as the message body.
async fn read_stdin() -> Result<String, KitbagError> {
    use tokio::io::AsyncReadExt;

    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .map_err(|err| KitbagError::Mail {
            message: "cannot read message body from stdin".to_string(),
            source: Some(Box::new(err)),
        })?;
    Ok(body)
}
