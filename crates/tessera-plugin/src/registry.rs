// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry: install, activate, deactivate, and uninstall plugins.
//!
//! The `PluginRegistry` owns every installed plugin (global and
//! tenant-scoped). Mutations are serialized behind a mutex; each one that
//! changes the active set computes a complete [`RegistrySnapshot`] first and
//! only then swaps it in, so readers calling [`PluginRegistry::snapshot`]
//! never block and never observe a half-applied change.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use tessera_core::{
    InstalledModules, ManifestSource, ModuleVersionSource, PluginKey, TesseraError,
};
use tracing::{debug, info, warn};

use crate::dependency;
use crate::fields::MergedFieldSchema;
use crate::manifest::{parse_plugin_manifest, PluginManifest};
use crate::snapshot::RegistrySnapshot;
use crate::trust::TrustPolicy;
use crate::validation::ValidationResult;

/// Status of an installed plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    /// Failed validation; can never be activated.
    Invalid,
    /// Valid but not contributing to the published snapshot.
    Inactive,
    /// Valid and contributing slot bindings and fields.
    Active,
}

impl PluginStatus {
    /// Whether the plugin passed validation.
    pub fn is_valid(&self) -> bool {
        !matches!(self, PluginStatus::Invalid)
    }
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Invalid => write!(f, "invalid"),
            PluginStatus::Inactive => write!(f, "inactive"),
            PluginStatus::Active => write!(f, "active"),
        }
    }
}

/// A plugin held by the registry.
#[derive(Debug, Clone)]
pub struct InstalledPlugin {
    pub manifest: PluginManifest,
    pub status: PluginStatus,
    /// Result of the validation pass at install time.
    pub validation: ValidationResult,
}

impl InstalledPlugin {
    pub fn key(&self) -> PluginKey {
        self.manifest.key()
    }
}

/// Registry of installed plugins and publisher of the active snapshot.
pub struct PluginRegistry {
    policy: TrustPolicy,
    modules: Arc<dyn ModuleVersionSource>,
    plugins: Mutex<BTreeMap<PluginKey, InstalledPlugin>>,
    snapshot: ArcSwap<RegistrySnapshot>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new(policy: TrustPolicy, modules: Arc<dyn ModuleVersionSource>) -> Self {
        Self {
            policy,
            modules,
            plugins: Mutex::new(BTreeMap::new()),
            snapshot: ArcSwap::from_pointee(RegistrySnapshot::empty()),
        }
    }

    /// A registry with the default trust table and no installed modules.
    pub fn with_defaults() -> Self {
        Self::new(TrustPolicy::default(), Arc::new(InstalledModules::new()))
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    /// Run every validation check against `manifest`: trust level,
    /// capability declarations, and dependencies.
    pub fn validate(&self, manifest: &PluginManifest) -> ValidationResult {
        let mut result = self.policy.validate(manifest);
        result.merge(manifest.check_declarations());
        result.merge(dependency::resolve(manifest, self.modules.as_ref()));
        result
    }

    /// Parse, validate, and store a raw JSON manifest.
    ///
    /// Parse failures are returned as errors and nothing is stored. A
    /// manifest that parses but fails validation is stored as `Invalid`
    /// together with its `ValidationResult`.
    pub fn install(&self, raw: &str) -> Result<InstalledPlugin, TesseraError> {
        let manifest = parse_plugin_manifest(raw).inspect_err(|e| {
            warn!(error = %e, "rejected unparseable manifest");
        })?;
        self.install_manifest(manifest)
    }

    /// Validate and store an already-parsed manifest.
    pub fn install_manifest(&self, manifest: PluginManifest) -> Result<InstalledPlugin, TesseraError> {
        let key = manifest.key();
        let validation = self.validate(&manifest);
        let status = if validation.is_valid() {
            PluginStatus::Inactive
        } else {
            PluginStatus::Invalid
        };

        let mut plugins = self.lock()?;
        if plugins.contains_key(&key) {
            return Err(TesseraError::AlreadyInstalled(key));
        }

        let installed = InstalledPlugin {
            manifest,
            status,
            validation,
        };
        if status.is_valid() {
            info!(plugin = %key, version = %installed.manifest.version, "plugin installed");
        } else {
            warn!(plugin = %key, errors = installed.validation.len(), "plugin installed as invalid");
        }
        plugins.insert(key, installed.clone());
        Ok(installed)
    }

    /// Load a manifest from `source` and install it.
    ///
    /// The load is awaited before any registry lock is taken. The manifest's
    /// own id and scope must match `key`.
    pub async fn install_from(
        &self,
        source: &dyn ManifestSource,
        key: &PluginKey,
    ) -> Result<InstalledPlugin, TesseraError> {
        let raw = source.load(key).await?;
        let manifest = parse_plugin_manifest(&raw)?;
        if manifest.key() != *key {
            return Err(TesseraError::MalformedManifest {
                field: "id".to_string(),
                message: format!("manifest declares {} but was loaded as {key}", manifest.key()),
            });
        }
        self.install_manifest(manifest)
    }

    /// Activate a valid plugin.
    ///
    /// Dependencies are re-checked against the current module versions and
    /// the new snapshot is computed before anything changes. On any failure
    /// the plugin stays inactive and the published snapshot is untouched.
    /// Activating an active plugin is a no-op.
    pub fn activate(&self, key: impl Into<PluginKey>) -> Result<(), TesseraError> {
        let key = key.into();
        let mut plugins = self.lock()?;

        let plugin = plugins
            .get(&key)
            .ok_or_else(|| TesseraError::PluginNotFound(key.clone()))?;
        match plugin.status {
            PluginStatus::Invalid => return Err(TesseraError::NotValid(key)),
            PluginStatus::Active => return Ok(()),
            PluginStatus::Inactive => {}
        }

        let deps = dependency::resolve(&plugin.manifest, self.modules.as_ref());
        if !deps.is_valid() {
            warn!(plugin = %key, "activation refused: unsatisfied dependencies");
            return Err(TesseraError::DependencyUnsatisfied {
                plugin: key,
                details: deps.errors().map(|(k, issue)| format!("{k}: {issue}")).collect(),
            });
        }

        let active = plugins
            .iter()
            .filter(|(k, p)| p.status == PluginStatus::Active || **k == key)
            .map(|(_, p)| &p.manifest);
        let next = RegistrySnapshot::build(active, self.next_generation()).inspect_err(|e| {
            warn!(plugin = %key, error = %e, "activation rolled back");
        })?;

        if let Some(plugin) = plugins.get_mut(&key) {
            plugin.status = PluginStatus::Active;
        }
        self.publish(next);
        info!(plugin = %key, "plugin activated");
        Ok(())
    }

    /// Deactivate a plugin, removing its slot bindings and fields from the
    /// published snapshot. Deactivating a plugin that is not active is a
    /// no-op.
    pub fn deactivate(&self, key: impl Into<PluginKey>) -> Result<(), TesseraError> {
        let key = key.into();
        let mut plugins = self.lock()?;

        let plugin = plugins
            .get(&key)
            .ok_or_else(|| TesseraError::PluginNotFound(key.clone()))?;
        if plugin.status != PluginStatus::Active {
            return Ok(());
        }

        let active = plugins
            .iter()
            .filter(|(k, p)| p.status == PluginStatus::Active && **k != key)
            .map(|(_, p)| &p.manifest);
        let next = RegistrySnapshot::build(active, self.next_generation())?;

        if let Some(plugin) = plugins.get_mut(&key) {
            plugin.status = PluginStatus::Inactive;
        }
        self.publish(next);
        info!(plugin = %key, "plugin deactivated");
        Ok(())
    }

    /// Remove an inactive or invalid plugin.
    pub fn uninstall(&self, key: impl Into<PluginKey>) -> Result<InstalledPlugin, TesseraError> {
        let key = key.into();
        let mut plugins = self.lock()?;

        match plugins.get(&key).map(|p| p.status) {
            None => Err(TesseraError::PluginNotFound(key)),
            Some(PluginStatus::Active) => Err(TesseraError::StillActive(key)),
            Some(_) => {
                let removed = plugins
                    .remove(&key)
                    .ok_or_else(|| TesseraError::PluginNotFound(key.clone()))?;
                info!(plugin = %key, "plugin uninstalled");
                Ok(removed)
            }
        }
    }

    /// A copy of the installed plugin under `key`.
    pub fn get(&self, key: impl Into<PluginKey>) -> Result<Option<InstalledPlugin>, TesseraError> {
        let key = key.into();
        Ok(self.lock()?.get(&key).cloned())
    }

    /// Status of the plugin under `key`, if installed.
    pub fn status(&self, key: impl Into<PluginKey>) -> Result<Option<PluginStatus>, TesseraError> {
        let key = key.into();
        Ok(self.lock()?.get(&key).map(|p| p.status))
    }

    /// Every installed plugin, global first, then by organization and id.
    pub fn list(&self) -> Result<Vec<InstalledPlugin>, TesseraError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    /// The currently published snapshot. Never blocks on mutations.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.load_full()
    }

    /// Ordered component references for `slot` in the global view.
    pub fn resolve_slot(&self, slot: &str) -> Vec<String> {
        self.snapshot.load().resolve_slot(slot, None)
    }

    /// Merged custom fields for `model` in the global view.
    pub fn merge_for_model(&self, model: &str) -> Result<MergedFieldSchema, TesseraError> {
        self.snapshot.load().merge_for_model(model, None)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PluginKey, InstalledPlugin>>, TesseraError> {
        self.plugins
            .lock()
            .map_err(|_| TesseraError::Internal("plugin registry lock poisoned".to_string()))
    }

    fn next_generation(&self) -> u64 {
        self.snapshot.load().generation() + 1
    }

    fn publish(&self, next: RegistrySnapshot) {
        debug!(generation = next.generation(), "publishing registry snapshot");
        self.snapshot.store(Arc::new(next));
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("policy", &self.policy)
            .field("generation", &self.snapshot.load().generation())
            .finish_non_exhaustive()
    }
}
