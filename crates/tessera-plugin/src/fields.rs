// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merged custom-field schemas contributed by active plugins.
//!
//! The merger is always built from scratch from the current active set.
//! Plugins are visited in id order (a global plugin before a tenant plugin
//! sharing its id); the first plugin to declare a
//! `(model, field)` pair owns it, and a second declarer makes the whole
//! model's merge fail with `FieldCollision`.

use std::collections::BTreeMap;

use tessera_core::TesseraError;

use crate::manifest::FieldDeclaration;

/// A custom field with the plugin that contributed it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedField {
    pub name: String,
    pub field_type: String,
    pub validation: Option<serde_json::Value>,
    pub owner: String,
}

/// The extra fields for one model, in plugin-id then declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedFieldSchema {
    pub model: String,
    fields: Vec<MergedField>,
}

impl MergedFieldSchema {
    fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MergedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[MergedField] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A conflicting declaration found while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCollision {
    pub model: String,
    pub field: String,
    pub owner: String,
    pub challenger: String,
}

impl From<&FieldCollision> for TesseraError {
    fn from(c: &FieldCollision) -> Self {
        TesseraError::FieldCollision {
            model: c.model.clone(),
            field: c.field.clone(),
            owner: c.owner.clone(),
            challenger: c.challenger.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum ModelSchema {
    Merged(MergedFieldSchema),
    Collided(FieldCollision),
}

/// Per-model merged schemas for one set of active plugins.
#[derive(Debug, Clone, Default)]
pub struct FieldSchemaMerger {
    models: BTreeMap<String, ModelSchema>,
}

impl FieldSchemaMerger {
    /// Merge the field declarations of global `plugins`, given as
    /// `(plugin_id, declarations)`. Input order does not matter.
    pub fn build<'a, I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [FieldDeclaration])>,
    {
        Self::build_scoped(plugins.into_iter().map(|(id, decls)| (id, None, decls)))
    }

    /// Merge plugins given as `(plugin_id, organization, declarations)`.
    ///
    /// Ordering uses the plugin id; owners of tenant plugins are reported as
    /// `<organization>/<id>`.
    pub fn build_scoped<'a, I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>, &'a [FieldDeclaration])>,
    {
        let mut plugins: Vec<(&str, Option<&str>, &[FieldDeclaration])> =
            plugins.into_iter().collect();
        plugins.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let plugins = plugins.into_iter().map(|(id, org, decls)| {
            let label = match org {
                Some(org) => format!("{org}/{id}"),
                None => id.to_string(),
            };
            (label, decls)
        });

        let mut models: BTreeMap<String, ModelSchema> = BTreeMap::new();
        for (plugin_id, declarations) in plugins {
            for decl in declarations {
                let entry = models
                    .entry(decl.model.clone())
                    .or_insert_with(|| ModelSchema::Merged(MergedFieldSchema::new(&decl.model)));

                // First collision on a model is the one reported.
                let owner = match entry {
                    ModelSchema::Merged(schema) => schema.get(&decl.name).map(|f| f.owner.clone()),
                    ModelSchema::Collided(_) => continue,
                };

                match (owner, entry) {
                    (Some(owner), entry) => {
                        *entry = ModelSchema::Collided(FieldCollision {
                            model: decl.model.clone(),
                            field: decl.name.clone(),
                            owner,
                            challenger: plugin_id.clone(),
                        });
                    }
                    (None, ModelSchema::Merged(schema)) => schema.fields.push(MergedField {
                        name: decl.name.clone(),
                        field_type: decl.field_type.clone(),
                        validation: decl.validation.clone(),
                        owner: plugin_id.clone(),
                    }),
                    (None, ModelSchema::Collided(_)) => {}
                }
            }
        }

        Self { models }
    }

    /// The merged schema for `model`, or `FieldCollision` if two plugins
    /// declare the same field on it. Models nobody extends yield an empty
    /// schema.
    pub fn merge_for_model(&self, model: &str) -> Result<MergedFieldSchema, TesseraError> {
        match self.models.get(model) {
            None => Ok(MergedFieldSchema::new(model)),
            Some(ModelSchema::Merged(schema)) => Ok(schema.clone()),
            Some(ModelSchema::Collided(collision)) => Err(collision.into()),
        }
    }

    /// Every collision, one per affected model, in model order.
    pub fn collisions(&self) -> Vec<&FieldCollision> {
        self.models
            .values()
            .filter_map(|m| match m {
                ModelSchema::Collided(c) => Some(c),
                ModelSchema::Merged(_) => None,
            })
            .collect()
    }

    /// Models with at least one contributed field (or a collision).
    pub fn models(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }
}
