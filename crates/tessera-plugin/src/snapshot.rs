// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable views of the active plugin set, published by the registry.
//!
//! A snapshot is computed in full before it is published, and never changed
//! afterwards. Readers holding an `Arc<RegistrySnapshot>` see one consistent
//! active set for as long as they keep it.

use std::collections::BTreeMap;

use tessera_core::{PluginScope, TesseraError};

use crate::fields::{FieldSchemaMerger, MergedFieldSchema};
use crate::manifest::PluginManifest;
use crate::slot::SlotRegistry;

/// Slot bindings and merged fields for one audience (global or one tenant).
#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    slots: SlotRegistry,
    fields: FieldSchemaMerger,
}

impl RegistryView {
    /// Build a view from the manifests visible to one audience, failing on
    /// the first field collision.
    fn build(plugins: &[&PluginManifest]) -> Result<Self, TesseraError> {
        let mut slots = SlotRegistry::new();
        for manifest in plugins {
            let organization = manifest.scope.organization_id();
            for binding in &manifest.slots {
                slots.register_scoped(
                    binding.slot.as_str(),
                    manifest.id.as_str(),
                    organization,
                    binding.component.as_str(),
                    binding.priority,
                );
            }
        }

        let fields = FieldSchemaMerger::build_scoped(plugins.iter().map(|m| {
            (
                m.id.as_str(),
                m.scope.organization_id(),
                m.fields.as_slice(),
            )
        }));
        if let Some(collision) = fields.collisions().first() {
            return Err(TesseraError::from(*collision));
        }

        Ok(Self { slots, fields })
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn fields(&self) -> &FieldSchemaMerger {
        &self.fields
    }
}

/// The published state readers query.
///
/// Global plugins are visible to everyone. Each organization with active
/// tenant plugins gets its own view containing the global plugins plus its
/// own. Ordering inside a view depends on plugin ids only; tenant plugins
/// are reported as `<organization>/<id>`.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    generation: u64,
    global: RegistryView,
    tenants: BTreeMap<String, RegistryView>,
}

impl RegistrySnapshot {
    /// The snapshot of a registry with nothing active.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute the snapshot for an active set.
    ///
    /// Fails with `FieldCollision` if any view would contain two plugins
    /// declaring the same field on the same model.
    pub fn build<'a, I>(active: I, generation: u64) -> Result<Self, TesseraError>
    where
        I: IntoIterator<Item = &'a PluginManifest>,
    {
        let mut global: Vec<&PluginManifest> = Vec::new();
        let mut per_tenant: BTreeMap<&str, Vec<&PluginManifest>> = BTreeMap::new();

        for manifest in active {
            match &manifest.scope {
                PluginScope::Global => global.push(manifest),
                PluginScope::Tenant { organization_id } => per_tenant
                    .entry(organization_id.as_str())
                    .or_default()
                    .push(manifest),
            }
        }

        let mut tenants = BTreeMap::new();
        for (organization_id, own) in per_tenant {
            let mut plugins = global.clone();
            plugins.extend(own);
            tenants.insert(organization_id.to_string(), RegistryView::build(&plugins)?);
        }

        Ok(Self {
            generation,
            global: RegistryView::build(&global)?,
            tenants,
        })
    }

    /// Incremented each time the registry publishes a snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The view for `organization`, falling back to the global view when the
    /// organization has no active tenant plugins.
    pub fn view(&self, organization: Option<&str>) -> &RegistryView {
        organization
            .and_then(|org| self.tenants.get(org))
            .unwrap_or(&self.global)
    }

    /// Ordered component references to render at `slot`.
    pub fn resolve_slot(&self, slot: &str, organization: Option<&str>) -> Vec<String> {
        self.view(organization).slots.resolve(slot)
    }

    /// Extra form fields for `model`.
    pub fn merge_for_model(
        &self,
        model: &str,
        organization: Option<&str>,
    ) -> Result<MergedFieldSchema, TesseraError> {
        self.view(organization).fields.merge_for_model(model)
    }

    /// Organizations that have their own view.
    pub fn organizations(&self) -> Vec<&str> {
        self.tenants.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_plugin_manifest;

    fn manifest(json: serde_json::Value) -> PluginManifest {
        parse_plugin_manifest(&json.to_string()).unwrap()
    }

    fn global_slot(id: &str, component: &str, priority: i32) -> PluginManifest {
        manifest(serde_json::json!({
            "id": id, "version": "1.0.0", "trustLevel": "community",
            "capabilities": ["ui.slots"],
            "slots": [{"slot": "crm.pipeline.header", "component": component, "priority": priority}],
        }))
    }

    fn tenant_slot(org: &str, id: &str, component: &str, priority: i32) -> PluginManifest {
        manifest(serde_json::json!({
            "id": id, "version": "1.0.0", "trustLevel": "community",
            "scope": "tenant", "organizationId": org,
            "capabilities": ["ui.slots"],
            "slots": [{"slot": "crm.pipeline.header", "component": component, "priority": priority}],
        }))
    }

    fn field(id: &str, org: Option<&str>, name: &str) -> PluginManifest {
        let mut json = serde_json::json!({
            "id": id, "version": "1.0.0", "trustLevel": "verified",
            "capabilities": ["fields.add"],
            "fields": [{"model": "Contact", "name": name, "type": "char"}],
        });
        if let Some(org) = org {
            json["scope"] = "tenant".into();
            json["organizationId"] = org.into();
        }
        manifest(json)
    }

    #[test]
    fn empty_snapshot_resolves_nothing() {
        let snapshot = RegistrySnapshot::empty();
        assert!(snapshot.resolve_slot("anything", None).is_empty());
        assert!(snapshot.merge_for_model("Contact", Some("acme")).unwrap().is_empty());
        assert_eq!(snapshot.generation(), 0);
    }

    #[test]
    fn tenant_view_adds_to_global() {
        let plugins = [
            global_slot("g1", "Global", 20),
            tenant_slot("acme", "t1", "AcmeOnly", 10),
            tenant_slot("globex", "t1", "GlobexOnly", 30),
        ];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 3).unwrap();

        assert_eq!(snapshot.resolve_slot("crm.pipeline.header", None), vec!["Global"]);
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("acme")),
            vec!["AcmeOnly", "Global"]
        );
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("globex")),
            vec!["Global", "GlobexOnly"]
        );
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("initech")),
            vec!["Global"]
        );
        assert_eq!(snapshot.organizations(), vec!["acme", "globex"]);
        assert_eq!(snapshot.generation(), 3);
    }

    #[test]
    fn tenant_plugin_may_reuse_a_global_id() {
        let plugins = [global_slot("p1", "Global", 10), tenant_slot("acme", "p1", "Tenant", 10)];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 1).unwrap();
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("acme")),
            vec!["Global", "Tenant"]
        );
    }

    #[test]
    fn tenant_ties_order_by_plugin_id() {
        let plugins = [global_slot("b", "GlobalB", 10), tenant_slot("acme", "zzz", "TenantZ", 10)];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 1).unwrap();
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("acme")),
            vec!["GlobalB", "TenantZ"]
        );

        let plugins = [global_slot("m", "GlobalM", 10), tenant_slot("zeta", "a", "TenantA", 10)];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 1).unwrap();
        assert_eq!(
            snapshot.resolve_slot("crm.pipeline.header", Some("zeta")),
            vec!["TenantA", "GlobalM"]
        );
    }

    #[test]
    fn collision_in_tenant_view_fails_build() {
        let plugins = [field("g1", None, "vat_id"), field("t1", Some("acme"), "vat_id")];
        let err = RegistrySnapshot::build(plugins.iter(), 1).unwrap_err();
        assert!(matches!(
            err,
            TesseraError::FieldCollision { ref owner, ref challenger, .. }
                if owner == "g1" && challenger == "acme/t1"
        ));
    }

    #[test]
    fn tenant_field_owner_follows_plugin_id() {
        let plugins = [field("zzz", Some("acme"), "vat_id"), field("b", None, "tax_code")];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 1).unwrap();
        let acme = snapshot.merge_for_model("Contact", Some("acme")).unwrap();
        assert_eq!(acme.names(), vec!["tax_code", "vat_id"]);
        assert_eq!(acme.get("vat_id").unwrap().owner, "acme/zzz");
    }

    #[test]
    fn separate_tenants_do_not_collide() {
        let plugins = [field("t1", Some("acme"), "vat_id"), field("t1", Some("globex"), "vat_id")];
        let snapshot = RegistrySnapshot::build(plugins.iter(), 1).unwrap();
        let acme = snapshot.merge_for_model("Contact", Some("acme")).unwrap();
        assert_eq!(acme.get("vat_id").unwrap().owner, "acme/t1");
        assert!(snapshot.merge_for_model("Contact", None).unwrap().is_empty());
    }
}
