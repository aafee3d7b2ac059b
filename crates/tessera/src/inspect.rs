// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tessera resolve`, `tessera fields`, and `tessera plugins`.
//!
//! Each loads the manifest directory into a fresh registry and reports on the
//! resulting snapshot.

use serde::Serialize;
use tessera_core::{TesseraError, TrustLevel};
use tessera_plugin::{InstalledPlugin, ValidationResult};

use crate::loader::LoadedRegistry;

fn print_json<T: Serialize>(value: &T) -> Result<(), TesseraError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| TesseraError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Print the ordered components bound to `slot`.
pub fn run_resolve(
    loaded: &LoadedRegistry,
    slot: &str,
    organization: Option<&str>,
    json: bool,
) -> Result<(), TesseraError> {
    let snapshot = loaded.registry.snapshot();
    let bindings = snapshot.view(organization).slots().bindings(slot);

    if json {
        #[derive(Serialize)]
        struct Row<'a> {
            component: &'a str,
            plugin: String,
            priority: i32,
        }
        let rows: Vec<Row<'_>> = bindings
            .iter()
            .map(|b| Row {
                component: &b.component,
                plugin: b.owner_label(),
                priority: b.priority,
            })
            .collect();
        return print_json(&rows);
    }

    if bindings.is_empty() {
        println!("  no components bound to {slot}");
    }
    for b in bindings {
        println!("  {:>6}  {:<32} {}", b.priority, b.component, b.owner_label());
    }
    Ok(())
}

/// Print the merged custom fields for `model`.
pub fn run_fields(
    loaded: &LoadedRegistry,
    model: &str,
    organization: Option<&str>,
    json: bool,
) -> Result<(), TesseraError> {
    let schema = loaded.registry.snapshot().merge_for_model(model, organization)?;

    if json {
        #[derive(Serialize)]
        struct Row<'a> {
            name: &'a str,
            #[serde(rename = "type")]
            field_type: &'a str,
            owner: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            validation: Option<&'a serde_json::Value>,
        }
        let rows: Vec<Row<'_>> = schema
            .fields()
            .iter()
            .map(|f| Row {
                name: &f.name,
                field_type: &f.field_type,
                owner: &f.owner,
                validation: f.validation.as_ref(),
            })
            .collect();
        return print_json(&rows);
    }

    if schema.is_empty() {
        println!("  no custom fields on {model}");
    }
    for f in schema.fields() {
        println!("  {:<24} {:<12} {}", f.name, f.field_type, f.owner);
    }
    Ok(())
}

/// One line of `tessera plugins --json`.
#[derive(Debug, Serialize)]
pub struct PluginRow {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub version: String,
    pub trust_level: TrustLevel,
    pub status: String,
    pub validation: ValidationResult,
}

impl From<&InstalledPlugin> for PluginRow {
    fn from(p: &InstalledPlugin) -> Self {
        Self {
            id: p.manifest.id.clone(),
            organization: p.manifest.scope.organization_id().map(str::to_string),
            version: p.manifest.version.to_string(),
            trust_level: p.manifest.trust_level,
            status: p.status.to_string(),
            validation: p.validation.clone(),
        }
    }
}

/// List installed plugins with status, validation errors, and load failures.
pub fn run_plugins(loaded: &LoadedRegistry, json: bool, use_color: bool) -> Result<(), TesseraError> {
    let plugins = loaded.registry.list()?;

    if json {
        let rows: Vec<PluginRow> = plugins.iter().map(PluginRow::from).collect();
        return print_json(&rows);
    }

    println!();
    println!("  tessera plugins");
    println!("  {}", "-".repeat(50));

    for plugin in &plugins {
        let status = plugin.status.to_string();
        let status = if use_color {
            use colored::Colorize;
            match plugin.status {
                tessera_plugin::PluginStatus::Active => status.green().to_string(),
                tessera_plugin::PluginStatus::Inactive => status.yellow().to_string(),
                tessera_plugin::PluginStatus::Invalid => status.red().to_string(),
            }
        } else {
            status
        };
        println!(
            "    {:<36} {:<10} {:<10} {status}",
            plugin.key().to_string(),
            plugin.manifest.version.to_string(),
            plugin.manifest.trust_level.to_string(),
        );
        for (key, issue) in plugin.validation.errors() {
            println!("      {key}: {issue}");
        }
    }

    if !loaded.failures.is_empty() {
        println!();
        for (key, err) in &loaded.failures {
            println!("    {key}: {err}");
        }
    }

    println!();
    let active = plugins
        .iter()
        .filter(|p| p.status == tessera_plugin::PluginStatus::Active)
        .count();
    println!("  {} installed, {active} active.", plugins.len());
    Ok(())
}
