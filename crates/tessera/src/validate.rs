// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tessera validate` command implementation.
//!
//! Parses one manifest file and runs the full validation pass (trust policy,
//! capability declarations, dependencies) without installing it.

use std::path::Path;

use tessera_config::TesseraConfig;
use tessera_core::TesseraError;
use tessera_plugin::{parse_plugin_manifest, ValidationResult};

use crate::loader::empty_registry;

/// Validate the manifest at `path`. Parse failures are reported as a
/// `ValidationResult` too, so the caller gets one shape either way.
pub async fn validate_file(config: &TesseraConfig, path: &Path) -> Result<ValidationResult, TesseraError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| TesseraError::Source {
        message: format!("failed to read {}: {e}", path.display()),
        source: Some(Box::new(e)),
    })?;
    validate_raw(config, &raw)
}

pub fn validate_raw(config: &TesseraConfig, raw: &str) -> Result<ValidationResult, TesseraError> {
    let registry = empty_registry(config)?;
    Ok(match parse_plugin_manifest(raw) {
        Ok(manifest) => registry.validate(&manifest),
        Err(e) => ValidationResult::from_error(&e),
    })
}

/// Run the `tessera validate` command. Returns whether the manifest is valid.
pub async fn run_validate(
    config: &TesseraConfig,
    path: &Path,
    json: bool,
    use_color: bool,
) -> Result<bool, TesseraError> {
    let result = validate_file(config, path).await?;

    if json {
        let out = serde_json::to_string_pretty(&result)
            .map_err(|e| TesseraError::Internal(format!("failed to serialize result: {e}")))?;
        println!("{out}");
        return Ok(result.is_valid());
    }

    if result.is_valid() {
        if use_color {
            use colored::Colorize;
            println!("  {} {}", "✓".green(), path.display());
        } else {
            println!("  [OK]   {}", path.display());
        }
    } else {
        if use_color {
            use colored::Colorize;
            println!("  {} {}", "✗".red(), path.display());
        } else {
            println!("  [FAIL] {}", path.display());
        }
        for (key, issue) in result.errors() {
            println!("    {key:<28} {issue}");
        }
    }

    Ok(result.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_plugin::IssueKind;

    #[test]
    fn parse_failure_becomes_validation_error() {
        let result = validate_raw(&TesseraConfig::default(), "{not json").unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.keys_of_kind(IssueKind::MalformedManifest), vec!["manifest"]);
    }

    #[test]
    fn trust_violation_is_reported() {
        let raw = serde_json::json!({
            "id": "p1", "version": "1.0.0", "trustLevel": "community",
            "capabilities": ["fields.add"],
        })
        .to_string();
        let result = validate_raw(&TesseraConfig::default(), &raw).unwrap();
        assert_eq!(
            result.get("capabilities.fields.add").map(|i| i.kind),
            Some(IssueKind::CapabilityNotPermitted)
        );
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_file(&TesseraConfig::default(), &dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, TesseraError::Source { .. }));
    }
}
