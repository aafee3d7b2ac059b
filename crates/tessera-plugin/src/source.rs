// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest source backed by a directory of JSON files.
//!
//! Layout: global manifests at `<root>/<id>.json`, tenant manifests at
//! `<root>/<organization_id>/<id>.json`. Only organizations named at
//! construction are scanned by [`ManifestSource::list`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tessera_core::{ManifestSource, PluginKey, PluginScope, TesseraError};
use tracing::debug;

/// Loads manifests from a directory tree.
#[derive(Debug, Clone)]
pub struct DirManifestSource {
    root: PathBuf,
    organizations: Vec<String>,
}

impl DirManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            organizations: Vec::new(),
        }
    }

    /// Also scan `<root>/<organization>/` for tenant manifests.
    pub fn with_organizations<I, S>(mut self, organizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organizations = organizations.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the manifest file for `key`.
    pub fn path_for(&self, key: &PluginKey) -> PathBuf {
        let file = format!("{}.json", key.id);
        match &key.scope {
            PluginScope::Global => self.root.join(file),
            PluginScope::Tenant { organization_id } => self.root.join(organization_id).join(file),
        }
    }

    /// Plugin ids of the `*.json` files directly inside `dir`. A missing
    /// directory has none.
    async fn ids_in(dir: &Path) -> Result<Vec<String>, TesseraError> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(dir, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> TesseraError {
    TesseraError::Source {
        message: format!("failed to read {}: {e}", path.display()),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl ManifestSource for DirManifestSource {
    async fn load(&self, key: &PluginKey) -> Result<String, TesseraError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                debug!(plugin = %key, path = %path.display(), "loaded manifest");
                Ok(raw)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TesseraError::PluginNotFound(key.clone())),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn list(&self) -> Result<Vec<PluginKey>, TesseraError> {
        let mut keys: Vec<PluginKey> = Self::ids_in(&self.root)
            .await?
            .into_iter()
            .map(PluginKey::global)
            .collect();

        for organization in &self.organizations {
            let dir = self.root.join(organization);
            for id in Self::ids_in(&dir).await? {
                keys.push(PluginKey::tenant(organization.clone(), id));
            }
        }

        keys.sort();
        Ok(keys)
    }
}
