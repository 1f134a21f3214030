// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin system for the Kitbag toolbox.
//!
//! Three pieces cooperate here. The [`BuilderRegistry`] maps builder-family
//! keys to [`PluginBuilder`]s able to construct instances. The
//! [`InstanceRegistry`] is the process-wide store of every constructed
//! instance, queryable by identifier or declared capability. The
//! [`Activator`] sits on top: given a key and parameters — directly or
//! from a declarative configuration table — it reuses or constructs an
//! instance, records it, and hands back something usable.

pub mod activator;
pub mod builder;
pub mod registry;

pub use activator::{Activator, BUILDER_ENTRY, PLUGIN_LIST_KEY};
pub use builder::{BuilderRegistry, FnBuilder, PluginBuilder};
pub use registry::InstanceRegistry;
