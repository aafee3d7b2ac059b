// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source of installed ERP module versions.

use std::collections::BTreeMap;

use semver::Version;

/// Reports which version of a module is installed, if any.
pub trait ModuleVersionSource: Send + Sync {
    fn installed_version(&self, module_id: &str) -> Option<Version>;
}

/// A fixed map of installed module versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledModules {
    versions: BTreeMap<String, Version>,
}

impl InstalledModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the installed version of `module_id`.
    pub fn insert(&mut self, module_id: impl Into<String>, version: Version) -> &mut Self {
        self.versions.insert(module_id.into(), version);
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, module_id: impl Into<String>, version: Version) -> Self {
        self.insert(module_id, version);
        self
    }

    pub fn remove(&mut self, module_id: &str) -> Option<Version> {
        self.versions.remove(module_id)
    }

    /// Iterate modules in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Version)> {
        self.versions.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl ModuleVersionSource for InstalledModules {
    fn installed_version(&self, module_id: &str) -> Option<Version> {
        self.versions.get(module_id).cloned()
    }
}

impl FromIterator<(String, Version)> for InstalledModules {
    fn from_iter<I: IntoIterator<Item = (String, Version)>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}
