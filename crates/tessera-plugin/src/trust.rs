// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trust-level capability whitelists.
//!
//! The policy is built from the `[trust]` configuration table, which lists
//! the capabilities first granted at each level. A level's whitelist is the
//! union of its own grants and every lower level's, so
//! `community ⊆ verified ⊆ certified ⊆ core` holds for any table.

use std::collections::{BTreeMap, BTreeSet};

use strum::IntoEnumIterator;
use tessera_config::TrustConfig;
use tessera_core::TrustLevel;

use crate::manifest::PluginManifest;
use crate::validation::{IssueKind, ValidationResult};

/// Capability whitelists per trust level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    allowed: BTreeMap<TrustLevel, BTreeSet<String>>,
    first_granted: BTreeMap<String, TrustLevel>,
}

impl TrustPolicy {
    /// Build a policy from the configured grant table.
    pub fn from_config(config: &TrustConfig) -> Self {
        Self::from_grants(TrustLevel::iter().map(|level| (level, config.grants(level).to_vec())))
    }

    /// Build a policy from `(level, capabilities first granted at level)`
    /// pairs. Levels may come in any order; missing levels grant nothing new.
    pub fn from_grants<I, C>(grants: I) -> Self
    where
        I: IntoIterator<Item = (TrustLevel, C)>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut per_level: BTreeMap<TrustLevel, Vec<String>> = BTreeMap::new();
        for (level, caps) in grants {
            per_level
                .entry(level)
                .or_default()
                .extend(caps.into_iter().map(Into::into));
        }

        let mut allowed = BTreeMap::new();
        let mut first_granted = BTreeMap::new();
        let mut cumulative = BTreeSet::new();
        for level in TrustLevel::iter() {
            for cap in per_level.remove(&level).unwrap_or_default() {
                first_granted.entry(cap.clone()).or_insert(level);
                cumulative.insert(cap);
            }
            allowed.insert(level, cumulative.clone());
        }

        Self {
            allowed,
            first_granted,
        }
    }

    /// Every capability a plugin at `level` may declare.
    pub fn allowed_capabilities(&self, level: TrustLevel) -> &BTreeSet<String> {
        // from_grants inserts every level
        &self.allowed[&level]
    }

    pub fn permits(&self, level: TrustLevel, capability: &str) -> bool {
        self.allowed_capabilities(level).contains(capability)
    }

    /// Lowest level that may declare `capability`, or `None` if no level
    /// grants it.
    pub fn minimum_level(&self, capability: &str) -> Option<TrustLevel> {
        self.first_granted.get(capability).copied()
    }

    /// Check every declared capability against the manifest's trust level.
    ///
    /// Produces one `CapabilityNotPermitted` error per offending capability,
    /// keyed `capabilities.<token>`. Any error invalidates the manifest.
    pub fn validate(&self, manifest: &PluginManifest) -> ValidationResult {
        let mut result = ValidationResult::new();
        let level = manifest.trust_level;

        for capability in &manifest.capabilities {
            if self.permits(level, capability) {
                continue;
            }
            let hint = match self.minimum_level(capability) {
                Some(required) => format!("requires {required}"),
                None => "unknown capability".to_string(),
            };
            result.add(
                format!("capabilities.{capability}"),
                IssueKind::CapabilityNotPermitted,
                format!("capability not permitted at trust level {level} ({hint})"),
            );
        }

        result
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::from_config(&TrustConfig::default())
    }
}
