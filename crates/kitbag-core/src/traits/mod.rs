// SPDX-FileCopyrightText: 2026 Kitbag Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented by pluggable units.

pub mod plugin;

pub use plugin::{builder_key_from_type_name, Plugin};
