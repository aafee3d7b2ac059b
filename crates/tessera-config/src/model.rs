// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tessera plugin registry.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessera_core::TrustLevel;

/// Top-level Tessera configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TesseraConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where manifests are loaded from.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Capabilities granted at each trust level.
    #[serde(default)]
    pub trust: TrustConfig,

    /// Installed module versions, overriding the built-in module catalog.
    /// Keys are module ids, values semantic versions.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Manifest store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Directory holding `<id>.json` global manifests and one
    /// `<organization_id>/` subdirectory per tenant.
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: String,

    /// Tenant subdirectories to scan. Empty means global manifests only.
    #[serde(default)]
    pub organizations: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            manifest_dir: default_manifest_dir(),
            organizations: Vec::new(),
        }
    }
}

fn default_manifest_dir() -> String {
    "plugins".to_string()
}

/// Trust-level capability table.
///
/// Each list names the capabilities first granted at that level; a level
/// implicitly includes everything granted below it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    #[serde(default = "default_community")]
    pub community: Vec<String>,

    #[serde(default = "default_verified")]
    pub verified: Vec<String>,

    #[serde(default = "default_certified")]
    pub certified: Vec<String>,

    #[serde(default = "default_core")]
    pub core: Vec<String>,
}

impl TrustConfig {
    /// The capabilities first granted at `level`.
    pub fn grants(&self, level: TrustLevel) -> &[String] {
        match level {
            TrustLevel::Community => &self.community,
            TrustLevel::Verified => &self.verified,
            TrustLevel::Certified => &self.certified,
            TrustLevel::Core => &self.core,
        }
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            community: default_community(),
            verified: default_verified(),
            certified: default_certified(),
            core: default_core(),
        }
    }
}

fn default_community() -> Vec<String> {
    vec!["ui.slots".to_string(), "api.read".to_string()]
}

fn default_verified() -> Vec<String> {
    vec!["api.write".to_string(), "fields.add".to_string()]
}

fn default_certified() -> Vec<String> {
    vec!["cron".to_string(), "queue".to_string()]
}

fn default_core() -> Vec<String> {
    vec!["db.migrate".to_string()]
}
