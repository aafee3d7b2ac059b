// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds a populated registry from configuration.
//!
//! Every manifest found in the configured directory is installed, and each
//! valid one is activated in key order (global plugins first). Activation
//! failures are collected rather than aborting the load.

use std::sync::Arc;

use tessera_config::TesseraConfig;
use tessera_core::{ManifestSource, PluginKey, TesseraError};
use tessera_plugin::{installed_modules, DirManifestSource, PluginRegistry, TrustPolicy};
use tracing::{info, warn};

/// A registry loaded from disk and what went wrong while loading it.
pub struct LoadedRegistry {
    pub registry: PluginRegistry,
    /// Manifests that failed to parse, load, or activate.
    pub failures: Vec<(PluginKey, TesseraError)>,
}

/// The registry's module versions and trust policy, with nothing installed.
pub fn empty_registry(config: &TesseraConfig) -> Result<PluginRegistry, TesseraError> {
    let modules = installed_modules(&config.modules)?;
    Ok(PluginRegistry::new(
        TrustPolicy::from_config(&config.trust),
        Arc::new(modules),
    ))
}

pub async fn load_registry(config: &TesseraConfig) -> Result<LoadedRegistry, TesseraError> {
    let registry = empty_registry(config)?;
    let source = DirManifestSource::new(&config.registry.manifest_dir)
        .with_organizations(config.registry.organizations.iter().cloned());

    let mut failures = Vec::new();
    let keys = source.list().await?;
    for key in &keys {
        match registry.install_from(&source, key).await {
            Ok(plugin) if plugin.status.is_valid() => {
                if let Err(e) = registry.activate(key) {
                    warn!(plugin = %key, error = %e, "plugin left inactive");
                    failures.push((key.clone(), e));
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(plugin = %key, error = %e, "manifest not installed");
                failures.push((key.clone(), e));
            }
        }
    }

    info!(
        dir = %source.root().display(),
        manifests = keys.len(),
        failures = failures.len(),
        "registry loaded"
    );
    Ok(LoadedRegistry { registry, failures })
}
