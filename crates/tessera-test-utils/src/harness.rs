// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end registry testing.
//!
//! `TestHarness` wires a `PluginRegistry` to a mutable module set and an
//! in-memory manifest source, so tests can drive the full install and
//! activation lifecycle and then upgrade or remove modules underneath it.

use std::sync::Arc;

use semver::Version;
use tessera_config::TrustConfig;
use tessera_core::{InstalledModules, PluginKey, TesseraError};
use tessera_plugin::{InstalledPlugin, PluginRegistry, TrustPolicy};

use crate::builder::ManifestBuilder;
use crate::mock_source::MockManifestSource;
use crate::modules::MutableModules;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    modules: InstalledModules,
    trust: TrustConfig,
    manifests: Vec<ManifestBuilder>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            modules: InstalledModules::new(),
            trust: TrustConfig::default(),
            manifests: Vec::new(),
        }
    }

    /// Mark `module_id` as installed at `version` (e.g. `"1.4.0"`).
    pub fn with_module(mut self, module_id: &str, version: &str) -> Self {
        match Version::parse(version) {
            Ok(v) => {
                self.modules.insert(module_id, v);
            }
            Err(e) => panic!("with_module({module_id}, {version}): {e}"),
        }
        self
    }

    /// Replace the default trust table.
    pub fn with_trust(mut self, trust: TrustConfig) -> Self {
        self.trust = trust;
        self
    }

    /// Seed the in-memory manifest source.
    pub fn with_manifest(mut self, manifest: ManifestBuilder) -> Self {
        self.manifests.push(manifest);
        self
    }

    pub fn build(self) -> TestHarness {
        let modules = Arc::new(MutableModules::new(self.modules));
        let registry = Arc::new(PluginRegistry::new(
            TrustPolicy::from_config(&self.trust),
            modules.clone(),
        ));
        let source = Arc::new(MockManifestSource::with_manifests(
            self.manifests.iter().map(|m| (m.key(), m.build())),
        ));
        TestHarness {
            registry,
            modules,
            source,
        }
    }
}

/// A registry with controllable collaborators.
pub struct TestHarness {
    /// The registry under test.
    pub registry: Arc<PluginRegistry>,
    /// Installed module versions seen by the registry.
    pub modules: Arc<MutableModules>,
    /// Manifests available to `install_from`.
    pub source: Arc<MockManifestSource>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Install the manifest built by `manifest`.
    pub fn install(&self, manifest: &ManifestBuilder) -> Result<InstalledPlugin, TesseraError> {
        self.registry.install(&manifest.build())
    }

    /// Install then activate.
    pub fn install_active(&self, manifest: &ManifestBuilder) -> Result<InstalledPlugin, TesseraError> {
        let installed = self.install(manifest)?;
        self.registry.activate(manifest.key())?;
        Ok(installed)
    }

    /// Install every manifest in the source, returning the keys loaded.
    pub async fn install_all_from_source(&self) -> Result<Vec<PluginKey>, TesseraError> {
        use tessera_core::ManifestSource;

        let keys = self.source.list().await?;
        for key in &keys {
            self.registry.install_from(self.source.as_ref(), key).await?;
        }
        tracing::debug!(count = keys.len(), "installed manifests from mock source");
        Ok(keys)
    }
}
