// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from JSON documents.
//!
//! A manifest declares a plugin's identity, trust level, capabilities,
//! module dependencies, UI slot bindings, and custom fields. Parsing checks
//! shape only; capability and dependency checks happen in
//! [`crate::trust`] and [`crate::dependency`].

use std::collections::HashSet;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::Deserialize;
use tessera_core::{PluginKey, PluginScope, TesseraError, TrustLevel};

use crate::validation::{IssueKind, ValidationResult};

/// Capability required to bind components to UI slots.
pub const CAP_UI_SLOTS: &str = "ui.slots";

/// Capability required to contribute custom fields.
pub const CAP_FIELDS_ADD: &str = "fields.add";

/// Priority given to slot bindings that do not declare one.
pub const DEFAULT_SLOT_PRIORITY: i32 = 100;

/// A parsed, immutable plugin manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginManifest {
    /// Unique id within the plugin's scope (e.g., "lead-scoring").
    pub id: String,
    /// Display name; defaults to the id.
    pub name: String,
    pub version: Version,
    pub trust_level: TrustLevel,
    /// Declared capability tokens in declaration order, deduplicated.
    /// Unknown tokens are kept verbatim.
    pub capabilities: Vec<String>,
    /// Module dependencies from `extends`.
    pub extends: Vec<Dependency>,
    pub slots: Vec<SlotDeclaration>,
    pub fields: Vec<FieldDeclaration>,
    pub scope: PluginScope,
}

/// One `extends` entry: a module id and the versions it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub module_id: String,
    pub range: VersionReq,
}

/// A component the plugin renders at a named slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDeclaration {
    pub slot: String,
    pub component: String,
    /// Lower renders first.
    pub priority: i32,
}

/// A custom field the plugin adds to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub model: String,
    pub name: String,
    pub field_type: String,
    /// Opaque validation rules handed to the form layer.
    pub validation: Option<serde_json::Value>,
}

impl PluginManifest {
    /// Registry key of this manifest.
    pub fn key(&self) -> PluginKey {
        PluginKey {
            scope: self.scope.clone(),
            id: self.id.clone(),
        }
    }

    pub fn declares(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Consistency checks between what the manifest uses and what it
    /// declares: slot and field features need their capabilities, and a
    /// plugin may not bind the same slot or declare the same field twice.
    pub fn check_declarations(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !self.slots.is_empty() && !self.declares(CAP_UI_SLOTS) {
            result.add(
                "slots",
                IssueKind::CapabilityNotDeclared,
                format!("slot bindings require capability `{CAP_UI_SLOTS}`"),
            );
        }
        if !self.fields.is_empty() && !self.declares(CAP_FIELDS_ADD) {
            result.add(
                "fields",
                IssueKind::CapabilityNotDeclared,
                format!("custom fields require capability `{CAP_FIELDS_ADD}`"),
            );
        }

        let mut seen_slots = HashSet::new();
        for binding in &self.slots {
            if !seen_slots.insert(binding.slot.as_str()) {
                result.add(
                    format!("slots.{}", binding.slot),
                    IssueKind::DuplicateDeclaration,
                    "slot is bound more than once",
                );
            }
        }

        let mut seen_fields = HashSet::new();
        for field in &self.fields {
            if !seen_fields.insert((field.model.as_str(), field.name.as_str())) {
                result.add(
                    format!("fields.{}.{}", field.model, field.name),
                    IssueKind::DuplicateDeclaration,
                    "field is declared more than once",
                );
            }
        }

        result
    }
}

// --- JSON intermediate structs ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    id: Option<String>,
    name: Option<String>,
    version: Option<String>,
    trust_level: Option<String>,
    scope: Option<String>,
    organization_id: Option<String>,
    #[serde(default)]
    extends: Vec<String>,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    slots: Vec<RawSlot>,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    slot: Option<String>,
    component: Option<String>,
    priority: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    model: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    field_type: Option<String>,
    validation: Option<serde_json::Value>,
}

fn malformed(field: impl Into<String>, message: impl Into<String>) -> TesseraError {
    TesseraError::MalformedManifest {
        field: field.into(),
        message: message.into(),
    }
}

/// A required, non-blank string field.
fn required(value: Option<String>, field: &str) -> Result<String, TesseraError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(malformed(field, "must not be empty")),
        None => Err(malformed(field, "is required")),
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// --- Public API ---

/// Parse a manifest from a JSON string.
pub fn parse_plugin_manifest(json: &str) -> Result<PluginManifest, TesseraError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| malformed("manifest", format!("invalid JSON: {e}")))?;
    parse_plugin_manifest_value(value)
}

/// Parse a manifest from an already-decoded JSON value.
///
/// Fails with `MalformedManifest` when a required field (`id`, `version`,
/// `trustLevel`) is missing or a value has the wrong shape, and with
/// `InvalidVersion` when `version` is not a semantic version.
pub fn parse_plugin_manifest_value(value: serde_json::Value) -> Result<PluginManifest, TesseraError> {
    if !value.is_object() {
        return Err(malformed("manifest", "expected a JSON object"));
    }
    let raw: RawManifest =
        serde_json::from_value(value).map_err(|e| malformed("manifest", e.to_string()))?;

    let id = required(raw.id, "id")?;
    if !is_identifier(&id) {
        return Err(malformed(
            "id",
            format!("`{id}` may only contain ASCII letters, digits, '-', '_' and '.'"),
        ));
    }

    let version_str = required(raw.version, "version")?;
    let version = Version::parse(&version_str).map_err(|e| TesseraError::InvalidVersion {
        value: version_str.clone(),
        reason: e.to_string(),
    })?;

    let trust_str = required(raw.trust_level, "trustLevel")?;
    let trust_level = TrustLevel::from_str(&trust_str).map_err(|_| {
        malformed(
            "trustLevel",
            format!("`{trust_str}` is not one of: community, verified, certified, core"),
        )
    })?;

    let scope = parse_scope(raw.scope.as_deref(), raw.organization_id)?;

    let mut capabilities: Vec<String> = Vec::with_capacity(raw.capabilities.len());
    for (i, token) in raw.capabilities.iter().enumerate() {
        let token = token.trim();
        if token.is_empty() {
            return Err(malformed(format!("capabilities[{i}]"), "must not be empty"));
        }
        if !capabilities.iter().any(|c| c == token) {
            capabilities.push(token.to_string());
        }
    }

    let extends = raw
        .extends
        .iter()
        .enumerate()
        .map(|(i, expr)| {
            parse_dependency(expr).map_err(|message| malformed(format!("extends[{i}]"), message))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let slots = raw
        .slots
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            Ok(SlotDeclaration {
                slot: required(s.slot, &format!("slots[{i}].slot"))?,
                component: required(s.component, &format!("slots[{i}].component"))?,
                priority: s.priority.unwrap_or(DEFAULT_SLOT_PRIORITY),
            })
        })
        .collect::<Result<Vec<_>, TesseraError>>()?;

    let fields = raw
        .fields
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let name = required(f.name, &format!("fields[{i}].name"))?;
            if !is_identifier(&name) {
                return Err(malformed(
                    format!("fields[{i}].name"),
                    format!("`{name}` is not a valid field name"),
                ));
            }
            Ok(FieldDeclaration {
                model: required(f.model, &format!("fields[{i}].model"))?,
                name,
                field_type: required(f.field_type, &format!("fields[{i}].type"))?,
                validation: f.validation,
            })
        })
        .collect::<Result<Vec<_>, TesseraError>>()?;

    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| id.clone());

    Ok(PluginManifest {
        id,
        name,
        version,
        trust_level,
        capabilities,
        extends,
        slots,
        fields,
        scope,
    })
}

fn parse_scope(scope: Option<&str>, organization_id: Option<String>) -> Result<PluginScope, TesseraError> {
    let organization_id = organization_id
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    match (scope.map(|s| s.trim().to_ascii_lowercase()).as_deref(), organization_id) {
        (None, None) | (Some("global"), None) => Ok(PluginScope::Global),
        (Some("global"), Some(_)) => Err(malformed(
            "organizationId",
            "only valid for tenant-scoped manifests",
        )),
        (None, Some(organization_id)) | (Some("tenant"), Some(organization_id)) => {
            if !is_identifier(&organization_id) {
                return Err(malformed(
                    "organizationId",
                    format!(
                        "`{organization_id}` may only contain ASCII letters, digits, '-', '_' and '.'"
                    ),
                ));
            }
            Ok(PluginScope::Tenant { organization_id })
        }
        (Some("tenant"), None) => Err(malformed(
            "organizationId",
            "is required for tenant-scoped manifests",
        )),
        (Some(other), _) => Err(malformed(
            "scope",
            format!("`{other}` is not one of: global, tenant"),
        )),
    }
}

/// Parse one `extends` expression such as `"contacts >= 1.2.0"`.
///
/// The module id runs up to the first whitespace or comparator character.
/// A missing range accepts any version; a bare version means an exact match.
pub fn parse_dependency(expr: &str) -> Result<Dependency, String> {
    let expr = expr.trim();
    let split = expr
        .find(|c: char| c.is_whitespace() || matches!(c, '>' | '<' | '=' | '^' | '~'))
        .unwrap_or(expr.len());
    let (module_id, range) = expr.split_at(split);

    if module_id.is_empty() {
        return Err(format!("`{expr}` does not start with a module id"));
    }
    if !is_identifier(module_id) {
        return Err(format!("`{module_id}` is not a valid module id"));
    }

    let range = range.trim();
    let range = if range.is_empty() {
        Ok(VersionReq::STAR)
    } else if range.starts_with(|c: char| c.is_ascii_digit()) {
        VersionReq::parse(&format!("={range}"))
    } else {
        VersionReq::parse(range)
    }
    .map_err(|e| format!("invalid version range in `{expr}`: {e}"))?;

    Ok(Dependency {
        module_id: module_id.to_string(),
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: TesseraError) -> String {
        match err {
            TesseraError::MalformedManifest { field, .. } => field,
            other => panic!("expected MalformedManifest, got {other:?}"),
        }
    }

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "id": "lead-scoring",
            "name": "Lead Scoring",
            "version": "1.2.0",
            "trustLevel": "verified",
            "extends": ["contacts >= 1.0.0", "crm ^2.1"],
            "capabilities": ["ui.slots", "fields.add", "ui.slots"],
            "slots": [{"slot": "contacts.detail.sidebar", "component": "ScoreCard", "priority": 10}],
            "fields": [{"model": "Contact", "name": "lead_score", "type": "integer",
                        "validation": {"min": 0, "max": 100}}]
        }"#;
        let m = parse_plugin_manifest(json).unwrap();
        assert_eq!(m.id, "lead-scoring");
        assert_eq!(m.name, "Lead Scoring");
        assert_eq!(m.version, Version::new(1, 2, 0));
        assert_eq!(m.trust_level, TrustLevel::Verified);
        assert_eq!(m.capabilities, vec!["ui.slots", "fields.add"]);
        assert_eq!(m.extends.len(), 2);
        assert_eq!(m.extends[0].module_id, "contacts");
        assert!(m.extends[1].range.matches(&Version::new(2, 3, 0)));
        assert_eq!(m.slots[0].priority, 10);
        assert_eq!(m.fields[0].field_type, "integer");
        assert_eq!(m.fields[0].validation.as_ref().unwrap()["max"], 100);
        assert_eq!(m.scope, PluginScope::Global);
        assert!(m.check_declarations().is_valid());
    }

    #[test]
    fn parse_minimal_manifest() {
        let m = parse_plugin_manifest(r#"{"id": "p1", "version": "0.1.0", "trustLevel": "community"}"#)
            .unwrap();
        assert_eq!(m.name, "p1");
        assert!(m.capabilities.is_empty());
        assert!(m.extends.is_empty());
        assert!(m.slots.is_empty());
        assert!(m.fields.is_empty());
        assert_eq!(m.key(), PluginKey::global("p1"));
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let err = parse_plugin_manifest(r#"{"version": "1.0.0", "trustLevel": "core"}"#).unwrap_err();
        assert_eq!(field_of(err), "id");

        let err = parse_plugin_manifest(r#"{"id": "p", "trustLevel": "core"}"#).unwrap_err();
        assert_eq!(field_of(err), "version");

        let err = parse_plugin_manifest(r#"{"id": "p", "version": "1.0.0"}"#).unwrap_err();
        assert_eq!(field_of(err), "trustLevel");

        let err = parse_plugin_manifest(r#"{"id": " ", "version": "1.0.0", "trustLevel": "core"}"#)
            .unwrap_err();
        assert_eq!(field_of(err), "id");
    }

    #[test]
    fn unknown_trust_level_is_malformed() {
        let err = parse_plugin_manifest(r#"{"id": "p", "version": "1.0.0", "trustLevel": "partner"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("partner"));
        assert_eq!(field_of(err), "trustLevel");
    }

    #[test]
    fn two_component_version_is_invalid() {
        let err = parse_plugin_manifest(r#"{"id": "p", "version": "1.0", "trustLevel": "core"}"#)
            .unwrap_err();
        assert!(matches!(err, TesseraError::InvalidVersion { ref value, .. } if value == "1.0"));
    }

    #[test]
    fn non_object_and_bad_json_are_malformed() {
        assert_eq!(field_of(parse_plugin_manifest("[1, 2]").unwrap_err()), "manifest");
        assert_eq!(field_of(parse_plugin_manifest("{not json").unwrap_err()), "manifest");
        let err = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core", "capabilities": "cron"}"#,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "manifest");
    }

    #[test]
    fn unknown_capabilities_are_retained() {
        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core", "capabilities": ["telepathy"]}"#,
        )
        .unwrap();
        assert_eq!(m.capabilities, vec!["telepathy"]);
    }

    #[test]
    fn tenant_scope_requires_organization() {
        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "scope": "tenant", "organizationId": "acme"}"#,
        )
        .unwrap();
        assert_eq!(m.key(), PluginKey::tenant("acme", "p"));

        let err = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core", "scope": "tenant"}"#,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "organizationId");

        let err = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core", "scope": "galaxy"}"#,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "scope");
    }

    #[test]
    fn organization_id_must_be_an_identifier() {
        for org in ["acme/west", "acme west", "ac:me"] {
            let raw = serde_json::json!({
                "id": "p", "version": "1.0.0", "trustLevel": "core",
                "scope": "tenant", "organizationId": org,
            });
            let err = parse_plugin_manifest(&raw.to_string()).unwrap_err();
            assert_eq!(field_of(err), "organizationId", "{org} was accepted");
        }

        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "scope": "tenant", "organizationId": "acme-eu.2"}"#,
        )
        .unwrap();
        assert_eq!(m.scope.organization_id(), Some("acme-eu.2"));
    }

    #[test]
    fn slot_without_component_names_the_index() {
        let err = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "slots": [{"slot": "a", "component": "A"}, {"slot": "b"}]}"#,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "slots[1].component");
    }

    #[test]
    fn slot_priority_defaults() {
        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core", "capabilities": ["ui.slots"],
                "slots": [{"slot": "a", "component": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(m.slots[0].priority, DEFAULT_SLOT_PRIORITY);
    }

    #[test]
    fn dependency_expressions() {
        let dep = parse_dependency("contacts >= 1.2.0").unwrap();
        assert_eq!(dep.module_id, "contacts");
        assert!(dep.range.matches(&Version::new(1, 2, 0)));
        assert!(!dep.range.matches(&Version::new(1, 1, 9)));

        let dep = parse_dependency("crm>=1.0.0, <2.0.0").unwrap();
        assert_eq!(dep.module_id, "crm");
        assert!(!dep.range.matches(&Version::new(2, 0, 0)));

        let dep = parse_dependency("billing ^1.4").unwrap();
        assert!(dep.range.matches(&Version::new(1, 9, 0)));
        assert!(!dep.range.matches(&Version::new(2, 0, 0)));

        let dep = parse_dependency("invoicing 2.1.0").unwrap();
        assert!(dep.range.matches(&Version::new(2, 1, 0)));
        assert!(!dep.range.matches(&Version::new(2, 1, 1)));

        let dep = parse_dependency("contacts").unwrap();
        assert!(dep.range.matches(&Version::new(0, 0, 1)));

        assert!(parse_dependency(">= 1.0.0").is_err());
        assert!(parse_dependency("contacts >= banana").is_err());
    }

    #[test]
    fn bad_dependency_names_extends_index() {
        let err = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "extends": ["contacts >= 1.0.0", "crm >> 2"]}"#,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "extends[1]");
    }

    #[test]
    fn check_declarations_requires_capabilities() {
        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "slots": [{"slot": "a", "component": "A"}],
                "fields": [{"model": "Contact", "name": "x", "type": "char"}]}"#,
        )
        .unwrap();
        let result = m.check_declarations();
        assert_eq!(result.get("slots").unwrap().kind, IssueKind::CapabilityNotDeclared);
        assert_eq!(result.get("fields").unwrap().kind, IssueKind::CapabilityNotDeclared);
    }

    #[test]
    fn check_declarations_flags_duplicates() {
        let m = parse_plugin_manifest(
            r#"{"id": "p", "version": "1.0.0", "trustLevel": "core",
                "capabilities": ["ui.slots", "fields.add"],
                "slots": [{"slot": "a", "component": "A"}, {"slot": "a", "component": "B"}],
                "fields": [{"model": "Contact", "name": "x", "type": "char"},
                           {"model": "Contact", "name": "x", "type": "text"},
                           {"model": "Invoice", "name": "x", "type": "char"}]}"#,
        )
        .unwrap();
        let result = m.check_declarations();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("slots.a").unwrap().kind, IssueKind::DuplicateDeclaration);
        assert_eq!(
            result.get("fields.Contact.x").unwrap().kind,
            IssueKind::DuplicateDeclaration
        );
    }
}
