// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tessera plugin registry.

use thiserror::Error;

use crate::types::PluginKey;

/// The primary error type used across the registry and its collaborators.
///
/// Manifest problems found during validation are reported as data
/// (a `ValidationResult`); this enum covers parse failures, state-machine
/// misuse, and activation failures that must be surfaced to the caller.
#[derive(Debug, Error)]
pub enum TesseraError {
    /// Configuration errors (invalid TOML, inconsistent trust table).
    #[error("configuration error: {0}")]
    Config(String),

    /// A manifest is missing a required field or has the wrong shape.
    #[error("malformed manifest: {field}: {message}")]
    MalformedManifest { field: String, message: String },

    /// The manifest `version` is not a three-component semantic version.
    #[error("invalid version `{value}`: {reason}")]
    InvalidVersion { value: String, reason: String },

    /// One or more `extends` ranges are not satisfied by installed modules.
    #[error("unsatisfied dependencies for {plugin}: {}", details.join("; "))]
    DependencyUnsatisfied {
        plugin: PluginKey,
        details: Vec<String>,
    },

    /// Two active plugins declare the same custom field on the same model.
    #[error(
        "field collision on {model}.{field}: declared by both `{owner}` and `{challenger}`"
    )]
    FieldCollision {
        model: String,
        field: String,
        owner: String,
        challenger: String,
    },

    /// The plugin failed validation and cannot be activated.
    #[error("plugin {0} is not valid")]
    NotValid(PluginKey),

    /// The plugin must be deactivated before it can be uninstalled.
    #[error("plugin {0} is still active")]
    StillActive(PluginKey),

    /// A plugin with the same id is already installed in the same scope.
    #[error("plugin {0} is already installed")]
    AlreadyInstalled(PluginKey),

    /// No plugin with this key is installed (or the source has no manifest).
    #[error("plugin not found: {0}")]
    PluginNotFound(PluginKey),

    /// A manifest source failed to load a document.
    #[error("manifest source error: {message}")]
    Source {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
