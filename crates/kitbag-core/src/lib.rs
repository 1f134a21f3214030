// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Kitbag personal toolbox.
//!
//! This crate provides the foundational trait definitions, error type,
//! and common types used throughout the Kitbag workspace. The plugin
//! system, configuration layer, and mail utility all build on what is
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KitbagError;
pub use traits::{builder_key_from_type_name, Plugin};
pub use types::{Capability, PluginParams};
