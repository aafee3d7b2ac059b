// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for the external collaborators the registry consumes.
//!
//! Manifest documents and installed module versions live outside the core
//! (package store, database). The registry only sees them through these
//! seams.

pub mod manifest_source;
pub mod module_source;

pub use manifest_source::ManifestSource;
pub use module_source::{InstalledModules, ModuleVersionSource};
