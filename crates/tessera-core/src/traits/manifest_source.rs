// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source of raw plugin manifest documents.

use async_trait::async_trait;

use crate::error::TesseraError;
use crate::types::PluginKey;

/// Supplies raw (JSON) manifest documents keyed by plugin id and scope.
///
/// Loading may perform I/O, so it is async; callers await it before taking
/// any registry lock.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Load the raw manifest for `key`.
    ///
    /// Returns [`TesseraError::PluginNotFound`] when the source has no
    /// document for that key.
    async fn load(&self, key: &PluginKey) -> Result<String, TesseraError>;

    /// List the keys this source can load, in a stable order.
    async fn list(&self) -> Result<Vec<PluginKey>, TesseraError>;
}
