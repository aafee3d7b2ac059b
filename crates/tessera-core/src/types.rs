// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, its collaborators, and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Trust tier of a plugin. Tiers are ordered: each one may use every
/// capability of the tiers below it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrustLevel {
    Community,
    Verified,
    Certified,
    Core,
}

/// Where a plugin is installed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PluginScope {
    /// Visible to every organization.
    Global,
    /// Visible only to one organization.
    Tenant { organization_id: String },
}

impl PluginScope {
    /// The owning organization, if tenant-scoped.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            PluginScope::Global => None,
            PluginScope::Tenant { organization_id } => Some(organization_id),
        }
    }
}

/// Identity of an installed plugin: its id is unique within its scope.
///
/// Orders global plugins before tenant plugins, then by organization, then
/// by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PluginKey {
    pub scope: PluginScope,
    pub id: String,
}

impl PluginKey {
    pub fn global(id: impl Into<String>) -> Self {
        Self {
            scope: PluginScope::Global,
            id: id.into(),
        }
    }

    pub fn tenant(organization_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: PluginScope::Tenant {
                organization_id: organization_id.into(),
            },
            id: id.into(),
        }
    }
}

impl From<&str> for PluginKey {
    fn from(id: &str) -> Self {
        PluginKey::global(id)
    }
}

impl From<String> for PluginKey {
    fn from(id: String) -> Self {
        PluginKey::global(id)
    }
}

impl From<&PluginKey> for PluginKey {
    fn from(key: &PluginKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            PluginScope::Global => write!(f, "`{}`", self.id),
            PluginScope::Tenant { organization_id } => {
                write!(f, "`{}` (organization {organization_id})", self.id)
            }
        }
    }
}
