// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent builder for manifest JSON documents.

use serde_json::{json, Map, Value};
use tessera_core::{PluginKey, TrustLevel};
use tessera_plugin::{parse_plugin_manifest, PluginManifest};

/// Builds the raw JSON a plugin author would ship.
///
/// Defaults: version `1.0.0`, trust level `community`, global scope, no
/// capabilities. Declaring a slot or field does not add the matching
/// capability; call [`capability`](Self::capability) explicitly.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    id: String,
    version: String,
    trust_level: TrustLevel,
    organization_id: Option<String>,
    capabilities: Vec<String>,
    extends: Vec<String>,
    slots: Vec<Value>,
    fields: Vec<Value>,
}

impl ManifestBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: "1.0.0".to_string(),
            trust_level: TrustLevel::Community,
            organization_id: None,
            capabilities: Vec::new(),
            extends: Vec::new(),
            slots: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn trust(mut self, level: TrustLevel) -> Self {
        self.trust_level = level;
        self
    }

    /// Scope the plugin to one organization.
    pub fn tenant(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Add a dependency expression such as `"contacts >= 1.2.0"`.
    pub fn extends(mut self, expr: impl Into<String>) -> Self {
        self.extends.push(expr.into());
        self
    }

    pub fn slot(mut self, slot: &str, component: &str, priority: i32) -> Self {
        self.slots
            .push(json!({"slot": slot, "component": component, "priority": priority}));
        self
    }

    pub fn field(mut self, model: &str, name: &str, field_type: &str) -> Self {
        self.fields
            .push(json!({"model": model, "name": name, "type": field_type}));
        self
    }

    /// The key the built manifest will install under.
    pub fn key(&self) -> PluginKey {
        match &self.organization_id {
            Some(org) => PluginKey::tenant(org.clone(), self.id.clone()),
            None => PluginKey::global(self.id.clone()),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("id".into(), json!(self.id));
        doc.insert("name".into(), json!(self.id));
        doc.insert("version".into(), json!(self.version));
        doc.insert("trustLevel".into(), json!(self.trust_level.to_string()));
        doc.insert("capabilities".into(), json!(self.capabilities));
        doc.insert("extends".into(), json!(self.extends));
        doc.insert("slots".into(), Value::Array(self.slots.clone()));
        doc.insert("fields".into(), Value::Array(self.fields.clone()));
        if let Some(org) = &self.organization_id {
            doc.insert("scope".into(), json!("tenant"));
            doc.insert("organizationId".into(), json!(org));
        }
        Value::Object(doc)
    }

    /// The raw JSON document.
    pub fn build(&self) -> String {
        self.to_value().to_string()
    }

    /// Parse the document. Panics if the builder produced an unparseable
    /// manifest, which only happens with a bad version or dependency string.
    pub fn parse(&self) -> PluginManifest {
        match parse_plugin_manifest(&self.build()) {
            Ok(manifest) => manifest,
            Err(e) => panic!("ManifestBuilder produced an invalid manifest: {e}"),
        }
    }
}
