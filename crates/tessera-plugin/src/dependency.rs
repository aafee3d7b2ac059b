// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of a manifest's `extends` ranges against installed modules.

use tessera_core::ModuleVersionSource;

use crate::manifest::PluginManifest;
use crate::validation::{IssueKind, ValidationResult};

/// Check every `extends` entry of `manifest` against `modules`.
///
/// Errors are keyed `extends.<module_id>`. A single unmet dependency makes
/// the whole manifest invalid.
pub fn resolve(manifest: &PluginManifest, modules: &dyn ModuleVersionSource) -> ValidationResult {
    let mut result = ValidationResult::new();

    for dep in &manifest.extends {
        let key = format!("extends.{}", dep.module_id);
        match modules.installed_version(&dep.module_id) {
            None => result.add(key, IssueKind::DependencyUnsatisfied, "module not installed"),
            Some(found) if !dep.range.matches(&found) => result.add(
                key,
                IssueKind::DependencyUnsatisfied,
                format!("version mismatch: required {}, found {found}", dep.range),
            ),
            Some(_) => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_plugin_manifest;
    use semver::Version;
    use tessera_core::InstalledModules;

    fn manifest(extends: &[&str]) -> PluginManifest {
        let json = serde_json::json!({
            "id": "p1",
            "version": "1.0.0",
            "trustLevel": "community",
            "extends": extends,
        });
        parse_plugin_manifest(&json.to_string()).unwrap()
    }

    fn modules() -> InstalledModules {
        InstalledModules::new()
            .with("contacts", Version::new(1, 4, 0))
            .with("crm", Version::new(2, 0, 3))
    }

    #[test]
    fn satisfied_dependencies_are_valid() {
        let m = manifest(&["contacts >= 1.2.0", "crm ^2.0"]);
        assert!(resolve(&m, &modules()).is_valid());
    }

    #[test]
    fn no_dependencies_is_valid() {
        assert!(resolve(&manifest(&[]), &InstalledModules::new()).is_valid());
    }

    #[test]
    fn missing_module_is_reported() {
        let result = resolve(&manifest(&["billing >= 1.0.0"]), &modules());
        let issue = result.get("extends.billing").unwrap();
        assert_eq!(issue.kind, IssueKind::DependencyUnsatisfied);
        assert_eq!(issue.message, "module not installed");
    }

    #[test]
    fn version_mismatch_names_both_versions() {
        let result = resolve(&manifest(&["contacts >= 2.0.0"]), &modules());
        assert_eq!(
            result.get("extends.contacts").unwrap().message,
            "version mismatch: required >=2.0.0, found 1.4.0"
        );
    }

    #[test]
    fn one_failure_invalidates_all() {
        let result = resolve(
            &manifest(&["contacts >= 1.0.0", "crm < 2.0.0", "billing"]),
            &modules(),
        );
        assert!(!result.is_valid());
        assert_eq!(
            result.keys_of_kind(IssueKind::DependencyUnsatisfied),
            vec!["extends.billing", "extends.crm"]
        );
    }
}
