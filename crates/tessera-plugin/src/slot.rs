// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot registry: which plugin components render at each named UI slot.
//!
//! Bindings within a slot are kept sorted by `(priority, plugin_id)` so
//! lookups are deterministic regardless of registration order. A global
//! plugin and a tenant plugin may share an id; the global one sorts first.

use std::collections::HashMap;

/// A component bound to a slot by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub plugin_id: String,
    /// Set for tenant-scoped plugins.
    pub organization: Option<String>,
    pub component: String,
    pub priority: i32,
}

impl SlotBinding {
    fn sort_key(&self) -> (i32, &str, Option<&str>) {
        (self.priority, self.plugin_id.as_str(), self.organization.as_deref())
    }

    fn is_owned_by(&self, plugin_id: &str, organization: Option<&str>) -> bool {
        self.plugin_id == plugin_id && self.organization.as_deref() == organization
    }

    /// `<organization>/<id>` for tenant plugins, the bare id otherwise.
    pub fn owner_label(&self) -> String {
        match &self.organization {
            Some(org) => format!("{org}/{}", self.plugin_id),
            None => self.plugin_id.clone(),
        }
    }
}

/// Index from slot name to its ordered bindings.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: HashMap<String, Vec<SlotBinding>>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `component` to `slot` for the global plugin `plugin_id`.
    ///
    /// A plugin holds at most one binding per slot: registering the same
    /// `(slot, plugin_id)` pair again replaces the earlier binding.
    pub fn register(
        &mut self,
        slot: impl Into<String>,
        plugin_id: impl Into<String>,
        component: impl Into<String>,
        priority: i32,
    ) {
        self.register_scoped(slot, plugin_id, None, component, priority);
    }

    /// Like [`register`](Self::register), for a plugin that may be
    /// tenant-scoped.
    pub fn register_scoped(
        &mut self,
        slot: impl Into<String>,
        plugin_id: impl Into<String>,
        organization: Option<&str>,
        component: impl Into<String>,
        priority: i32,
    ) {
        let binding = SlotBinding {
            plugin_id: plugin_id.into(),
            organization: organization.map(str::to_string),
            component: component.into(),
            priority,
        };
        let bindings = self.slots.entry(slot.into()).or_default();
        bindings.retain(|b| !b.is_owned_by(&binding.plugin_id, organization));
        let at = bindings.partition_point(|b| b.sort_key() < binding.sort_key());
        bindings.insert(at, binding);
    }

    /// Remove every binding owned by the global plugin `plugin_id`. Returns
    /// how many were removed.
    pub fn unregister_all(&mut self, plugin_id: &str) -> usize {
        self.unregister_all_scoped(plugin_id, None)
    }

    /// Remove every binding owned by `plugin_id` in `organization` (or the
    /// global scope when `None`).
    pub fn unregister_all_scoped(&mut self, plugin_id: &str, organization: Option<&str>) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, bindings| {
            let before = bindings.len();
            bindings.retain(|b| !b.is_owned_by(plugin_id, organization));
            removed += before - bindings.len();
            !bindings.is_empty()
        });
        removed
    }

    /// Component references for `slot`, by ascending priority then plugin id.
    ///
    /// An unknown slot yields an empty list.
    pub fn resolve(&self, slot: &str) -> Vec<String> {
        self.bindings(slot).iter().map(|b| b.component.clone()).collect()
    }

    /// The ordered bindings for `slot`.
    pub fn bindings(&self, slot: &str) -> &[SlotBinding] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of every slot with at least one binding, sorted.
    pub fn slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of bindings across all slots.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unknown_slot_is_empty() {
        let registry = SlotRegistry::new();
        assert!(registry.resolve("contacts.detail.sidebar").is_empty());
        assert!(registry.bindings("nowhere").is_empty());
    }

    #[test]
    fn orders_by_priority_then_plugin_id() {
        let mut registry = SlotRegistry::new();
        registry.register("dash", "zeta", "Z", 10);
        registry.register("dash", "alpha", "A", 50);
        registry.register("dash", "beta", "B", 10);
        registry.register("dash", "gamma", "G", -5);
        assert_eq!(registry.resolve("dash"), vec!["G", "B", "Z", "A"]);
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = SlotRegistry::new();
        registry.register("dash", "p1", "Old", 10);
        registry.register("dash", "p2", "Other", 20);
        registry.register("dash", "p1", "New", 30);
        assert_eq!(registry.bindings("dash").len(), 2);
        assert_eq!(registry.resolve("dash"), vec!["Other", "New"]);
    }

    #[test]
    fn unregister_all_removes_every_slot_binding() {
        let mut registry = SlotRegistry::new();
        registry.register("a", "p1", "A1", 1);
        registry.register("b", "p1", "B1", 1);
        registry.register("b", "p2", "B2", 2);
        assert_eq!(registry.unregister_all("p1"), 2);
        assert!(registry.resolve("a").is_empty());
        assert_eq!(registry.resolve("b"), vec!["B2"]);
        assert_eq!(registry.slot_names(), vec!["b"]);
        assert_eq!(registry.unregister_all("p1"), 0);
    }

    #[test]
    fn tenant_ties_break_on_plugin_id_not_organization() {
        let mut registry = SlotRegistry::new();
        registry.register("s", "b", "GlobalB", 10);
        registry.register_scoped("s", "zzz", Some("acme"), "TenantZ", 10);
        registry.register_scoped("s", "a", Some("zeta-org"), "TenantA", 10);
        assert_eq!(registry.resolve("s"), vec!["TenantA", "GlobalB", "TenantZ"]);
    }

    #[test]
    fn same_id_in_two_scopes_keeps_both() {
        let mut registry = SlotRegistry::new();
        registry.register_scoped("s", "p1", Some("acme"), "Tenant", 10);
        registry.register("s", "p1", "Global", 10);
        assert_eq!(registry.resolve("s"), vec!["Global", "Tenant"]);
        assert_eq!(registry.bindings("s")[1].owner_label(), "acme/p1");

        assert_eq!(registry.unregister_all_scoped("p1", Some("acme")), 1);
        assert_eq!(registry.resolve("s"), vec!["Global"]);
    }

    #[test]
    fn len_counts_bindings() {
        let mut registry = SlotRegistry::new();
        assert!(registry.is_empty());
        registry.register("a", "p1", "A1", 1);
        registry.register("b", "p1", "B1", 1);
        registry.register("b", "p2", "B2", 1);
        assert_eq!(registry.len(), 3);
    }

    proptest! {
        #[test]
        fn resolve_is_sorted_and_order_independent(
            entries in prop::collection::vec(("[a-e]", -3i32..3), 0..12),
        ) {
            let mut forward = SlotRegistry::new();
            for (plugin, priority) in &entries {
                forward.register("s", plugin.clone(), format!("{plugin}:{priority}"), *priority);
            }

            // Last registration per plugin wins in both orders.
            let mut last: HashMap<String, i32> = HashMap::new();
            for (plugin, priority) in &entries {
                last.insert(plugin.clone(), *priority);
            }
            let mut backward = SlotRegistry::new();
            for (plugin, priority) in last.iter() {
                backward.register("s", plugin.clone(), format!("{plugin}:{priority}"), *priority);
            }

            prop_assert_eq!(forward.resolve("s"), backward.resolve("s"));
            prop_assert_eq!(forward.resolve("s"), forward.resolve("s"));
            prop_assert_eq!(forward.bindings("s").len(), last.len());

            let keys: Vec<(i32, String)> = forward
                .bindings("s")
                .iter()
                .map(|b| (b.priority, b.plugin_id.clone()))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }
}
