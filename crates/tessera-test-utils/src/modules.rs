// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module versions that tests can change after the registry is built.

use std::sync::RwLock;

use semver::Version;
use tessera_core::{InstalledModules, ModuleVersionSource};

/// A `ModuleVersionSource` whose contents can be upgraded or removed while a
/// registry holds it, to simulate module upgrades between install and
/// activation.
#[derive(Debug, Default)]
pub struct MutableModules {
    inner: RwLock<InstalledModules>,
}

impl MutableModules {
    pub fn new(initial: InstalledModules) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// Install or upgrade `module_id`.
    pub fn set(&self, module_id: &str, version: Version) {
        if let Ok(mut modules) = self.inner.write() {
            modules.insert(module_id, version);
        }
    }

    /// Uninstall `module_id`.
    pub fn remove(&self, module_id: &str) {
        if let Ok(mut modules) = self.inner.write() {
            modules.remove(module_id);
        }
    }
}

impl ModuleVersionSource for MutableModules {
    fn installed_version(&self, module_id: &str) -> Option<Version> {
        self.inner.read().ok()?.installed_version(module_id)
    }
}
