// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Tessera configuration system.

use miette::Diagnostic;
use tessera_config::diagnostic::ConfigError;
use tessera_config::model::TesseraConfig;
use tessera_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use tessera_core::TrustLevel;

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_tessera_config() {
    let toml = r#"
[logging]
level = "debug"

[registry]
manifest_dir = "/srv/erp/plugins"
organizations = ["acme", "globex"]

[trust]
community = ["ui.slots"]
verified = ["api.read", "fields.add"]
certified = ["api.write", "cron"]
core = ["db.migrate", "queue"]

[modules]
contacts = "1.4.0"
invoicing = "2.1.3"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.registry.manifest_dir, "/srv/erp/plugins");
    assert_eq!(config.registry.organizations, vec!["acme", "globex"]);
    assert_eq!(config.trust.grants(TrustLevel::Community), ["ui.slots"]);
    assert_eq!(config.trust.grants(TrustLevel::Core), ["db.migrate", "queue"]);
    assert_eq!(config.modules.get("contacts").map(String::as_str), Some("1.4.0"));
    assert_eq!(config.modules.len(), 2);
}

/// Missing sections fall back to compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.registry.manifest_dir, "plugins");
    assert!(config.registry.organizations.is_empty());
    assert_eq!(config.trust.grants(TrustLevel::Community), ["ui.slots", "api.read"]);
    assert_eq!(config.trust.grants(TrustLevel::Verified), ["api.write", "fields.add"]);
    assert_eq!(config.trust.grants(TrustLevel::Certified), ["cron", "queue"]);
    assert_eq!(config.trust.grants(TrustLevel::Core), ["db.migrate"]);
    assert!(config.modules.is_empty());
}

/// A partially specified trust table keeps defaults for the other levels.
#[test]
fn partial_trust_table_keeps_other_defaults() {
    let toml = r#"
[trust]
core = ["db.migrate", "tenancy.admin"]
"#;
    let config = load_and_validate_str(toml).expect("should validate");
    assert_eq!(config.trust.core, vec!["db.migrate", "tenancy.admin"]);
    assert_eq!(config.trust.community, vec!["ui.slots", "api.read"]);
}

/// Env overrides use dotted keys so underscores inside names survive.
#[test]
fn env_var_overrides_manifest_dir() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "tessera.toml",
            r#"
[registry]
manifest_dir = "from-toml"
"#,
        )?;
        jail.set_env("TESSERA_REGISTRY_MANIFEST_DIR", "from-env");
        jail.set_env("TESSERA_LOGGING_LEVEL", "warn");

        let path = jail.directory().join("tessera.toml");
        let config = load_and_validate_path(&path).expect("should load");
        assert_eq!(config.registry.manifest_dir, "from-env");
        assert_eq!(config.logging.level, "warn");
        Ok(())
    });
}

/// Module versions and trust grants can also come from the environment.
#[test]
fn env_var_overrides_modules_and_trust() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("TESSERA_MODULES_CONTACTS", "2.0.0");
        jail.set_env("TESSERA_TRUST_CORE", r#"["db.migrate", "tenancy.admin"]"#);

        let path = jail.directory().join("absent.toml");
        let config = load_and_validate_path(&path).expect("should load");
        assert_eq!(config.modules.get("contacts").map(String::as_str), Some("2.0.0"));
        assert_eq!(config.trust.core, vec!["db.migrate", "tenancy.admin"]);
        Ok(())
    });
}

/// Unknown top-level sections are rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[plugins]
dir = "x"
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("plugins"),
        "error should mention the unknown key, got: {err_str}"
    );
}

/// A typo inside a section produces an UnknownKey diagnostic with a suggestion.
#[test]
fn diagnostic_suggests_valid_trust_level() {
    let toml = r#"
[trust]
verfied = ["api.write"]
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "verfied"
                && suggestion.as_deref() == Some("verified")
                && valid_keys.contains("certified")
        })
    });
    assert!(found, "expected UnknownKey for `verfied`, got: {errors:?}");
}

/// Wrong value types are reported with the dotted key path.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[registry]
organizations = "acme"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string for list");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. }) || e.to_string().contains("organizations")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_rejects_overlapping_trust_levels() {
    let toml = r#"
[trust]
certified = ["cron", "fields.add"]
"#;
    let errors = load_and_validate_str(toml).expect_err("fields.add is granted twice");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("fields.add"));
}

#[test]
fn validation_rejects_bad_module_version() {
    let toml = r#"
[modules]
billing = "latest"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject");
    assert!(errors[0].to_string().contains("modules.billing"));
}

/// Every ConfigError carries a miette diagnostic code.
#[test]
fn config_error_implements_diagnostic() {
    let err = ConfigError::Validation {
        message: "x".into(),
    };
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("tessera::config::validation"));

    let err = ConfigError::MissingKey { key: "level".into() };
    let help = err.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("tessera.toml"));
}

/// Defaults round-trip through serde.
#[test]
fn default_config_serializes() {
    let json = serde_json::to_value(TesseraConfig::default()).expect("serialize");
    assert_eq!(json["registry"]["manifest_dir"], "plugins");
    assert_eq!(json["trust"]["core"][0], "db.migrate");
}

/// A config file on disk is loaded through the same validation path.
#[test]
fn load_from_file_on_disk() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[logging]\nlevel = \"trace\"\n")?;
        let path = jail.directory().join("custom.toml");
        let config = load_and_validate_path(&path).expect("should load");
        assert_eq!(config.logging.level, "trace");
        Ok(())
    });
}

/// A missing file is skipped and defaults apply.
#[test]
fn missing_config_file_uses_defaults() {
    figment::Jail::expect_with(|jail| {
        let path = jail.directory().join("absent.toml");
        let config = load_and_validate_path(&path).expect("defaults are valid");
        assert_eq!(config.registry.manifest_dir, "plugins");
        Ok(())
    });
}
