// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory manifest source for deterministic testing.
//!
//! `MockManifestSource` implements `ManifestSource` over a map of raw
//! documents, so async install paths can be exercised without a directory.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tessera_core::{ManifestSource, PluginKey, TesseraError};

/// A manifest source backed by a map of raw documents.
///
/// Every successful or failed `load` is counted.
#[derive(Default)]
pub struct MockManifestSource {
    manifests: Arc<RwLock<BTreeMap<PluginKey, String>>>,
    loads: AtomicUsize,
}

impl MockManifestSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-loaded with `(key, raw)` documents.
    pub fn with_manifests<I, K>(manifests: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<PluginKey>,
    {
        Self {
            manifests: Arc::new(RwLock::new(
                manifests.into_iter().map(|(k, raw)| (k.into(), raw)).collect(),
            )),
            loads: AtomicUsize::new(0),
        }
    }

    /// Add or replace the document under `key`.
    pub async fn insert(&self, key: impl Into<PluginKey>, raw: impl Into<String>) {
        self.manifests.write().await.insert(key.into(), raw.into());
    }

    /// Remove the document under `key`.
    pub async fn remove(&self, key: &PluginKey) -> Option<String> {
        self.manifests.write().await.remove(key)
    }

    /// How many times `load` has been called.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManifestSource for MockManifestSource {
    async fn load(&self, key: &PluginKey) -> Result<String, TesseraError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| TesseraError::PluginNotFound(key.clone()))
    }

    async fn list(&self) -> Result<Vec<PluginKey>, TesseraError> {
        Ok(self.manifests.read().await.keys().cloned().collect())
    }
}
