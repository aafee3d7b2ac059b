// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a strictly layered trust table and parseable module versions.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;
use tessera_core::TrustLevel;

use crate::diagnostic::ConfigError;
use crate::model::TesseraConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TesseraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.registry.manifest_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "registry.manifest_dir must not be empty".to_string(),
        });
    }

    for (i, org) in config.registry.organizations.iter().enumerate() {
        if org.trim().is_empty() || org.contains(['/', '\\']) || org == ".." {
            errors.push(ConfigError::Validation {
                message: format!("registry.organizations[{i}] `{org}` is not a valid organization id"),
            });
        }
    }

    for (module, version) in &config.modules {
        if let Err(e) = semver::Version::parse(version) {
            errors.push(ConfigError::Validation {
                message: format!("modules.{module} = `{version}` is not a semantic version: {e}"),
            });
        }
    }

    validate_trust_table(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The trust table must be strictly layered: every level grants something
/// new, and no capability is granted at two levels.
fn validate_trust_table(config: &TesseraConfig, errors: &mut Vec<ConfigError>) {
    let mut first_grant: BTreeMap<&str, TrustLevel> = BTreeMap::new();

    for level in TrustLevel::iter() {
        let grants = config.trust.grants(level);
        if grants.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("trust.{level} must grant at least one capability"),
            });
        }

        for capability in grants {
            if capability.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("trust.{level} contains an empty capability"),
                });
                continue;
            }
            if let Some(previous) = first_grant.get(capability.as_str()) {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "capability `{capability}` is granted at both trust.{previous} and trust.{level}"
                    ),
                });
            } else {
                first_grant.insert(capability, level);
            }
        }
    }
}
