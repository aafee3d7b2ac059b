// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tessera trust` and `tessera modules`.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;
use tessera_config::TesseraConfig;
use tessera_core::{ModuleVersionSource, TesseraError, TrustLevel};
use tessera_plugin::{installed_modules, search_catalog, TrustPolicy};

/// The effective whitelist per level, lowest first.
pub fn trust_table(config: &TesseraConfig) -> Vec<(TrustLevel, Vec<String>)> {
    let policy = TrustPolicy::from_config(&config.trust);
    TrustLevel::iter()
        .map(|level| {
            let caps = policy.allowed_capabilities(level).iter().cloned().collect();
            (level, caps)
        })
        .collect()
}

pub fn run_trust(config: &TesseraConfig, json: bool) -> Result<(), TesseraError> {
    let table = trust_table(config);
    if json {
        let map: BTreeMap<String, Vec<String>> = table
            .into_iter()
            .map(|(level, caps)| (level.to_string(), caps))
            .collect();
        let out = serde_json::to_string_pretty(&map)
            .map_err(|e| TesseraError::Internal(format!("failed to serialize output: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    for (level, caps) in table {
        println!("  {:<10} {}", level.to_string(), caps.join(", "));
    }
    Ok(())
}

/// List catalog modules matching `query`, showing the version in effect
/// after `[modules]` overrides.
pub fn run_modules(config: &TesseraConfig, query: Option<&str>) -> Result<(), TesseraError> {
    let installed = installed_modules(&config.modules)?;
    let entries = search_catalog(query.unwrap_or(""));
    if entries.is_empty() {
        println!("  no modules match");
    }
    for entry in entries {
        let version = installed
            .installed_version(&entry.id)
            .unwrap_or(entry.version);
        println!("  {:<14} {:<10} {}", entry.id, version.to_string(), entry.description);
    }
    Ok(())
}
