// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, manifest parser, and built-in module catalog.
//!
//! Third-party plugins describe themselves with a JSON manifest: trust level,
//! capabilities, module dependencies, UI slot bindings, and custom fields.
//! The [`PluginRegistry`] validates manifests against the [`TrustPolicy`] and
//! the installed modules, tracks plugin lifecycle, and publishes an immutable
//! [`RegistrySnapshot`] of the active set for renderers to query.

pub mod catalog;
pub mod dependency;
pub mod fields;
pub mod manifest;
pub mod registry;
pub mod slot;
pub mod snapshot;
pub mod source;
pub mod trust;
pub mod validation;

pub use catalog::{builtin_catalog, installed_modules, search_catalog, ModuleEntry};
pub use fields::{FieldCollision, FieldSchemaMerger, MergedField, MergedFieldSchema};
pub use manifest::{
    parse_plugin_manifest, parse_plugin_manifest_value, Dependency, FieldDeclaration,
    PluginManifest, SlotDeclaration,
};
pub use registry::{InstalledPlugin, PluginRegistry, PluginStatus};
pub use slot::{SlotBinding, SlotRegistry};
pub use snapshot::{RegistrySnapshot, RegistryView};
pub use source::DirManifestSource;
pub use trust::TrustPolicy;
pub use validation::{IssueKind, ValidationIssue, ValidationResult};
