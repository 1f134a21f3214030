// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Kitbag activation pipeline.

use std::sync::Arc;

use kitbag_core::{Capability, KitbagError, Plugin, PluginParams};
use kitbag_plugin::{Activator, FnBuilder, PluginBuilder};

const ECHO: Capability = Capability::new("echo");
const FETCH: Capability = Capability::new("nutrition.fetch");

struct EchoPlugin {
    identifier: String,
    params: PluginParams,
}

impl Plugin for EchoPlugin {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn key(&self) -> &str {
        "echo"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[ECHO]
    }

    fn params(&self) -> &PluginParams {
        &self.params
    }
}

/// Declares the same `echo` capability as `EchoPlugin`, plus one of its own.
struct FetcherPlugin {
    identifier: String,
    params: PluginParams,
}

impl Plugin for FetcherPlugin {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn key(&self) -> &str {
        "fetcher"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[ECHO, FETCH]
    }

    fn params(&self) -> &PluginParams {
        &self.params
    }
}

/// Requires configuration; inactive when built with empty parameters.
struct GatedPlugin {
    identifier: String,
    params: PluginParams,
}

impl Plugin for GatedPlugin {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn key(&self) -> &str {
        "gated"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    fn requires_config(&self) -> bool {
        true
    }

    fn params(&self) -> &PluginParams {
        &self.params
    }
}

fn echo_builder() -> Arc<dyn PluginBuilder> {
    Arc::new(FnBuilder::new("echo", |identifier: &str, params: &PluginParams| {
        Ok(Box::new(EchoPlugin {
            identifier: identifier.to_string(),
            params: params.clone(),
        }) as Box<dyn Plugin>)
    }))
}

fn fetcher_builder() -> Arc<dyn PluginBuilder> {
    Arc::new(FnBuilder::new("fetcher", |identifier: &str, params: &PluginParams| {
        Ok(Box::new(FetcherPlugin {
            identifier: identifier.to_string(),
            params: params.clone(),
        }) as Box<dyn Plugin>)
    }))
}

fn gated_builder() -> Arc<dyn PluginBuilder> {
    Arc::new(FnBuilder::new("gated", |identifier: &str, params: &PluginParams| {
        Ok(Box::new(GatedPlugin {
            identifier: identifier.to_string(),
            params: params.clone(),
        }) as Box<dyn Plugin>)
    }))
}

fn failing_builder() -> Arc<dyn PluginBuilder> {
    Arc::new(FnBuilder::new("failing", |_: &str, _: &PluginParams| {
        Err(KitbagError::Internal("upstream service is down".to_string()))
    }))
}

#[test]
fn anonymous_activations_get_distinct_identifiers() {
    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let first = activator
        .activate("echo", None, PluginParams::new())
        .unwrap()
        .expect("first activation succeeds");
    let second = activator
        .activate("echo", None, PluginParams::new())
        .unwrap()
        .expect("second activation succeeds");

    assert_ne!(first.identifier(), second.identifier());
    assert!(!first.identifier().is_empty());
    assert_eq!(activator.instances().len(), 2);
}

#[test]
fn activation_is_idempotent_on_identifier() {
    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let first = activator
        .activate("echo", Some("e1"), PluginParams::new())
        .unwrap()
        .expect("activation succeeds");
    let second = activator
        .activate("echo", Some("e1"), PluginParams::new())
        .unwrap()
        .expect("re-activation succeeds");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(activator.instances().len(), 1);

    let looked_up = activator.instances().by_identifier("e1").unwrap();
    assert!(Arc::ptr_eq(&first, &looked_up));
}

#[test]
fn unknown_builder_key_is_raised_not_softened() {
    let activator = Activator::new();
    let result = activator.activate("missing", Some("m1"), PluginParams::new());
    assert!(matches!(
        result,
        Err(KitbagError::UnknownBuilderKey { key }) if key == "missing"
    ));
    assert!(activator.instances().is_empty());
}

#[test]
fn construction_failure_is_a_soft_failure() {
    let activator = Activator::new();
    activator.register_builder(failing_builder()).unwrap();

    let outcome = activator
        .activate("failing", Some("f1"), PluginParams::new())
        .unwrap();
    assert!(outcome.is_none());
    assert!(activator.instances().is_empty());

    // Retrying is the caller's move; the failure does not poison anything.
    let outcome = activator
        .activate("failing", Some("f1"), PluginParams::new())
        .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn inactive_instance_reports_none_but_stays_registered() {
    let activator = Activator::new();
    activator.register_builder(gated_builder()).unwrap();

    let outcome = activator
        .activate("gated", Some("g1"), PluginParams::new())
        .unwrap();
    assert!(outcome.is_none());

    // Constructed and recorded, just unusable.
    assert_eq!(activator.instances().len(), 1);
    let registered = activator.instances().by_identifier("g1").unwrap();
    assert!(!registered.is_active());

    // Built with configuration, the same plugin type activates fine.
    let mut params = PluginParams::new();
    params.insert("token", "xyz");
    let active = activator
        .activate("gated", Some("g2"), params)
        .unwrap()
        .expect("configured instance is active");
    assert!(active.is_active());
}

#[test]
fn capability_lookup_spans_plugin_types() {
    let activator = Activator::new();
    activator
        .register_builders([echo_builder(), fetcher_builder()])
        .unwrap();

    activator
        .activate("echo", Some("e1"), PluginParams::new())
        .unwrap()
        .unwrap();
    activator
        .activate("fetcher", Some("n1"), PluginParams::new())
        .unwrap()
        .unwrap();

    let mut echoers: Vec<String> = activator
        .instances()
        .by_capability(&ECHO)
        .iter()
        .map(|p| p.identifier().to_string())
        .collect();
    echoers.sort();
    assert_eq!(echoers, ["e1", "n1"]);

    let fetchers = activator.instances().by_capability(&FETCH);
    assert_eq!(fetchers.len(), 1);
    assert_eq!(fetchers[0].identifier(), "n1");

    assert_eq!(activator.instances().all().len(), 2);
}

#[test]
fn activate_from_config_returns_one_result_per_identifier() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "a,b"

        [a]
        builder = "echo"

        [b]
        builder = "missing"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let results = activator.activate_from_config(None, Some(&table)).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_some(), "`a` activates");
    assert!(results[1].is_none(), "`b` fails softly");

    // Only `a` made it into the registry.
    assert_eq!(activator.instances().identifiers(), ["a"]);
}

#[test]
fn activate_from_config_passes_section_entries_through() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "kodi1, kodi2"

        [kodi1]
        builder = "echo"
        host = "room.local"

        [kodi2]
        builder = "echo"
        host = "kitchen.local"
        port = 9090
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let results = activator.activate_from_config(None, Some(&table)).unwrap();
    assert_eq!(results.len(), 2);

    let kodi1 = results[0].as_ref().unwrap();
    assert_eq!(kodi1.identifier(), "kodi1");
    assert_eq!(kodi1.params().get_str("host"), Some("room.local"));
    assert!(kodi1.params().get("builder").is_none(), "builder entry is consumed");

    let kodi2 = results[1].as_ref().unwrap();
    assert_eq!(kodi2.params().get_str("host"), Some("kitchen.local"));
    assert_eq!(kodi2.params().get_integer("port"), Some(9090));
}

#[test]
fn activate_from_config_with_explicit_identifiers() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "a,b"

        [a]
        builder = "echo"

        [b]
        builder = "echo"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let only_b = vec!["b".to_string()];
    let results = activator
        .activate_from_config(Some(&only_b), Some(&table))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap().identifier(), "b");
    assert_eq!(activator.instances().identifiers(), ["b"]);
}

#[test]
fn missing_plugin_list_is_raised() {
    let table: toml::Table = toml::from_str(
        r#"
        [a]
        builder = "echo"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    let result = activator.activate_from_config(None, Some(&table));
    assert!(matches!(result, Err(KitbagError::MissingPluginList)));
}

#[test]
fn missing_builder_entry_is_raised() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "a"

        [a]
        host = "room.local"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    let result = activator.activate_from_config(None, Some(&table));
    assert!(matches!(
        result,
        Err(KitbagError::MissingBuilderKey { identifier }) if identifier == "a"
    ));
}

#[test]
fn malformed_section_is_raised() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "a"
        a = "not a table"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    let result = activator.activate_from_config(None, Some(&table));
    assert!(matches!(
        result,
        Err(KitbagError::InvalidConfigurationShape { .. })
    ));
}

#[test]
fn structural_abort_keeps_prior_activations() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "a,b"

        [a]
        builder = "echo"
        "#,
    )
    .unwrap();

    let activator = Activator::new();
    activator.register_builder(echo_builder()).unwrap();

    // `b` has no section at all: the bulk call aborts...
    let result = activator.activate_from_config(None, Some(&table));
    assert!(matches!(
        result,
        Err(KitbagError::MissingPluginSection { identifier }) if identifier == "b"
    ));

    // ...but `a`, activated before the abort, stays registered.
    assert_eq!(activator.instances().identifiers(), ["a"]);
}

#[test]
fn defaults_table_backs_config_activation() {
    let table: toml::Table = toml::from_str(
        r#"
        plugins = "e1"

        [e1]
        builder = "echo"
        "#,
    )
    .unwrap();

    let activator = Activator::with_defaults(table);
    activator.register_builder(echo_builder()).unwrap();

    let results = activator.activate_from_config(None, None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap().identifier(), "e1");
}
