// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kitbag - a personal automation toolbox.
//!
//! This is the binary entry point: configuration inspection, plugin
//! activation, and mail dispatch from the command line.

use clap::{Parser, Subcommand};

mod plugins;
mod send;

/// Kitbag - a personal automation toolbox.
#[derive(Parser, Debug)]
#[command(name = "kitbag", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the effective configuration.
    Config,
    /// Register builders, activate configured plugins, list both registries.
    Plugins,
    /// Send a mail through the configured SMTP account.
    Send(send::SendArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match kitbag_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            kitbag_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.toolbox.log_level);
    tracing::debug!("kitbag starting as `{}`", config.toolbox.name);

    let result = match cli.command {
        Some(Commands::Config) => {
            show_config(&config);
            Ok(())
        }
        Some(Commands::Plugins) => plugins::run(&config),
        Some(Commands::Send(args)) => send::run(&config, args).await,
        None => {
            println!("kitbag: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("kitbag: {err}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber from the configured level.
///
/// `RUST_LOG` takes precedence when set, for ad-hoc filtering.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a human-readable summary of the loaded configuration.
fn show_config(config: &kitbag_config::KitbagConfig) {
    println!("toolbox.name      = {}", config.toolbox.name);
    println!("toolbox.log_level = {}", config.toolbox.log_level);
    println!(
        "mail              = {}:{} (ssl: {}, auth: {})",
        config.mail.host,
        config.mail.effective_port(),
        config.mail.ssl,
        if config.mail.oauth_cmd.is_some() {
            "oauth"
        } else if config.mail.username.is_some() {
            "password"
        } else {
            "anonymous"
        }
    );
    match config.plugins.get(kitbag_plugin::PLUGIN_LIST_KEY).and_then(|v| v.as_str()) {
        Some(list) => println!("plugins           = {list}"),
        None => println!("plugins           = (none configured)"),
    }
}
