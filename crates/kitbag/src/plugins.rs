// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `kitbag plugins` subcommand: register the built-in builders,
//! activate whatever the configuration declares, and print both
//! registries.

use kitbag_config::KitbagConfig;
use kitbag_core::{KitbagError, Plugin};
use kitbag_mail::smtp_mailer_builder;
use kitbag_plugin::{Activator, PLUGIN_LIST_KEY};

pub fn run(config: &KitbagConfig) -> Result<(), KitbagError> {
    let activator = Activator::with_defaults(config.plugins.clone());
    register_builtin_builders(&activator, config)?;

    println!("builders:");
    for key in activator.builder_keys() {
        println!("  {key}");
    }

    if config.plugins.contains_key(PLUGIN_LIST_KEY) {
        let results = activator.activate_from_config(None, None)?;
        let activated = results.iter().filter(|r| r.is_some()).count();
        println!("activated {activated}/{} configured plugin(s)", results.len());
    } else {
        println!("no [plugins] list configured, nothing to activate");
    }

    println!("instances:");
    let mut instances = activator.instances().all();
    instances.sort_by(|a, b| a.identifier().cmp(b.identifier()));
    for plugin in instances {
        println!("  {}", describe(plugin.as_ref()));
    }
    Ok(())
}

/// Register every builder shipped with the toolbox.
fn register_builtin_builders(
    activator: &Activator,
    config: &KitbagConfig,
) -> Result<(), KitbagError> {
    activator.register_builder(smtp_mailer_builder(Some(config.mail.clone())))
}

/// One status line per instance.
fn describe(plugin: &dyn Plugin) -> String {
    let capabilities: Vec<&str> = plugin.capabilities().iter().map(|c| c.name()).collect();
    format!(
        "{} (builder `{}`, {}) capabilities: [{}]",
        plugin.identifier(),
        plugin.key(),
        if plugin.is_active() { "active" } else { "inactive" },
        capabilities.join(", ")
    )
}
