// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in ERP module catalog.
//!
//! Lists the modules shipped with the base ERP and their versions. Plugin
//! `extends` ranges are resolved against this catalog, optionally overridden
//! by the `[modules]` configuration table. No network calls are made.

use std::collections::BTreeMap;

use semver::Version;
use tessera_core::{InstalledModules, TesseraError};

/// A module shipped with the base ERP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub id: String,
    pub version: Version,
    pub description: String,
}

fn entry(id: &str, major: u64, minor: u64, patch: u64, description: &str) -> ModuleEntry {
    ModuleEntry {
        id: id.to_string(),
        version: Version::new(major, minor, patch),
        description: description.to_string(),
    }
}

/// Returns every built-in module, sorted by id.
///
/// The catalog contains 6 modules:
/// - base (core records, users, organizations)
/// - billing
/// - contacts
/// - crm
/// - invoicing
/// - permissions
pub fn builtin_catalog() -> Vec<ModuleEntry> {
    vec![
        entry("base", 1, 0, 0, "Core records, users, and organizations"),
        entry("billing", 1, 0, 3, "Subscriptions and recurring billing"),
        entry("contacts", 1, 4, 0, "Companies and people address book"),
        entry("crm", 1, 2, 0, "Leads, opportunities, and sales pipeline"),
        entry("invoicing", 2, 1, 0, "Customer invoices and payments"),
        entry("permissions", 1, 1, 0, "Roles and access groups"),
    ]
}

/// Search the catalog by id or description (case-insensitive substring).
pub fn search_catalog(query: &str) -> Vec<ModuleEntry> {
    let query_lower = query.to_lowercase();
    builtin_catalog()
        .into_iter()
        .filter(|m| {
            m.id.to_lowercase().contains(&query_lower)
                || m.description.to_lowercase().contains(&query_lower)
        })
        .collect()
}

/// The installed module versions: the built-in catalog with `overrides`
/// (module id to semver string) applied on top. Overrides may also name
/// modules the catalog does not ship.
pub fn installed_modules(overrides: &BTreeMap<String, String>) -> Result<InstalledModules, TesseraError> {
    let mut modules: InstalledModules = builtin_catalog()
        .into_iter()
        .map(|m| (m.id, m.version))
        .collect();

    for (id, raw) in overrides {
        let version = Version::parse(raw.trim())
            .map_err(|e| TesseraError::Config(format!("modules.{id}: invalid version `{raw}`: {e}")))?;
        modules.insert(id.clone(), version);
    }

    Ok(modules)
}
