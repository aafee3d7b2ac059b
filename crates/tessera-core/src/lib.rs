// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tessera plugin registry.
//!
//! This crate provides the error type, the shared identity and trust types,
//! and the traits for the external collaborators (manifest source, module
//! version source) used throughout the Tessera workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TesseraError;
pub use types::{PluginKey, PluginScope, TrustLevel};

pub use traits::{InstalledModules, ManifestSource, ModuleVersionSource};
