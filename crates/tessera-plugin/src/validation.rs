// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation results shown to plugin authors and administrators.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tessera_core::TesseraError;

/// What kind of problem a validation issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedManifest,
    InvalidVersion,
    CapabilityNotPermitted,
    CapabilityNotDeclared,
    DuplicateDeclaration,
    DependencyUnsatisfied,
}

/// One problem found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one validation pass over a manifest.
///
/// Errors are keyed by the manifest field (or capability token) they concern
/// so the administrative UI can show them inline. Any error makes the whole
/// manifest invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: BTreeMap<String, ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error for `key`. A second error on the same key is appended
    /// to the first message; the first kind wins.
    pub fn add(&mut self, key: impl Into<String>, kind: IssueKind, message: impl Into<String>) {
        let message = message.into();
        self.errors
            .entry(key.into())
            .and_modify(|issue| {
                issue.message.push_str("; ");
                issue.message.push_str(&message);
            })
            .or_insert(ValidationIssue { kind, message });
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        for (key, issue) in other.errors {
            self.add(key, issue.kind, issue.message);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValidationIssue> {
        self.errors.get(key)
    }

    /// Errors in key order.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &ValidationIssue)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys of every issue of `kind`.
    pub fn keys_of_kind(&self, kind: IssueKind) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(_, issue)| issue.kind == kind)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Express a parse failure as displayable data.
    pub fn from_error(err: &TesseraError) -> Self {
        let mut result = Self::new();
        match err {
            TesseraError::MalformedManifest { field, message } => {
                result.add(field.clone(), IssueKind::MalformedManifest, message.clone());
            }
            TesseraError::InvalidVersion { value, reason } => {
                result.add(
                    "version",
                    IssueKind::InvalidVersion,
                    format!("`{value}` is not a semantic version: {reason}"),
                );
            }
            other => result.add("manifest", IssueKind::MalformedManifest, other.to_string()),
        }
        result
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        for (i, (key, issue)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{key}: {issue}")?;
        }
        Ok(())
    }
}
