//! JSON-persisted store of variables, sets, templates, and settings.
//!
//! The lifecycle mirrors the original clipper's storage layer: load the
//! file (absent file means defaults), merge defaults for missing settings
//! keys, migrate records written before specificity levels existed, and
//! save the whole store back on every change. The store is an explicit
//! value the caller owns — handlers receive `&mut Store`, never ambient
//! globals.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    SavedEntry, SavedSet, Settings, TemplateEntry, Variable, VariableTemplate,
};

/// Error type for store persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The store file is not valid JSON for the current schema.
    #[error("store format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The whole persisted state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    /// Variable definitions with their last extracted values.
    pub variables: Vec<Variable>,
    /// Saved value sets.
    pub saved_sets: Vec<SavedSet>,
    /// Variable-definition templates.
    pub variable_templates: Vec<VariableTemplate>,
    /// The set most recently saved or applied, if any.
    pub current_set_id: Option<Uuid>,
    /// User settings (missing keys merge to defaults via serde).
    pub settings: Settings,
}

impl Store {
    /// Load a store from `path`.
    ///
    /// An absent file yields the default (empty) store. Records missing
    /// their specificity levels are migrated to level 1 and the file is
    /// saved back immediately, as the original storage layer did.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let mut store: Store = serde_json::from_str(&text)?;
        if store.migrate() {
            store.save(path)?;
        }
        Ok(store)
    }

    /// Save the whole store to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Fill in specificity levels on records written before levels existed.
    /// Returns whether anything changed (and so needs saving).
    pub fn migrate(&mut self) -> bool {
        let mut changed = false;
        for variable in &mut self.variables {
            if variable.specificity_level.is_none() {
                variable.specificity_level = Some(1);
                changed = true;
            }
            if variable.paste_specificity_level.is_none() {
                variable.paste_specificity_level = Some(1);
                changed = true;
            }
        }
        changed
    }

    // ===== Variables =====

    /// Add a variable and return its id.
    pub fn add_variable(&mut self, variable: Variable) -> Uuid {
        let id = variable.id;
        self.variables.push(variable);
        id
    }

    /// Find a variable by display name.
    #[must_use]
    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Find a variable by display name, mutably.
    pub fn variable_by_name_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// Find a variable by id, mutably.
    pub fn variable_mut(&mut self, id: Uuid) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.id == id)
    }

    /// Remove a variable by name. Returns whether one was removed.
    pub fn remove_variable(&mut self, name: &str) -> bool {
        let before = self.variables.len();
        self.variables.retain(|v| v.name != name);
        self.variables.len() != before
    }

    // ===== Sets =====

    /// Snapshot the current variable values into a named set.
    ///
    /// Only variables holding a value are captured. When the
    /// `clear_values_after_save` setting is on, captured values are cleared
    /// from the variables afterwards.
    pub fn save_current_as_set(&mut self, name: &str) -> Uuid {
        let entries: Vec<SavedEntry> = self
            .variables
            .iter()
            .filter_map(|v| {
                v.value.as_ref().map(|value| SavedEntry {
                    variable_id: v.id,
                    name: v.name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        let set = SavedSet {
            id: Uuid::new_v4(),
            name: name.to_string(),
            entries,
            created_at: Utc::now(),
        };
        let id = set.id;
        self.saved_sets.push(set);
        self.current_set_id = Some(id);

        if self.settings.clear_values_after_save {
            for variable in &mut self.variables {
                variable.value = None;
            }
        }

        id
    }

    /// Find a saved set by display name.
    #[must_use]
    pub fn set_by_name(&self, name: &str) -> Option<&SavedSet> {
        self.saved_sets.iter().find(|s| s.name == name)
    }

    /// Restore a saved set's values into the variables.
    ///
    /// Entries are matched by variable id first, then by name (the id is
    /// stale after a variable was deleted and recreated). Returns the number
    /// of values restored, or `None` if no set has that name.
    pub fn apply_set(&mut self, name: &str) -> Option<usize> {
        let set = self.saved_sets.iter().find(|s| s.name == name)?.clone();
        let mut restored = 0;

        for entry in &set.entries {
            let target_idx = self
                .variables
                .iter()
                .position(|v| v.id == entry.variable_id)
                .or_else(|| self.variables.iter().position(|v| v.name == entry.name));
            if let Some(variable) = target_idx.map(|idx| &mut self.variables[idx]) {
                variable.value = Some(entry.value.clone());
                restored += 1;
            }
        }

        self.current_set_id = Some(set.id);
        Some(restored)
    }

    /// Delete a saved set by name. Returns whether one was removed.
    pub fn delete_set(&mut self, name: &str) -> bool {
        let before = self.saved_sets.len();
        self.saved_sets.retain(|s| s.name != name);
        if self
            .current_set_id
            .is_some_and(|id| !self.saved_sets.iter().any(|s| s.id == id))
        {
            self.current_set_id = None;
        }
        self.saved_sets.len() != before
    }

    // ===== Templates =====

    /// Capture the current variable definitions (not their values) as a
    /// named template.
    pub fn save_template(&mut self, name: &str) -> Uuid {
        let entries: Vec<TemplateEntry> = self
            .variables
            .iter()
            .map(|v| TemplateEntry {
                name: v.name.clone(),
                selector: v.selector.clone(),
                paste_selector: v.paste_selector.clone(),
                extract_mode: v.extract_mode,
                attribute_name: v.attribute_name.clone(),
                specificity_level: v.specificity_level,
                paste_specificity_level: v.paste_specificity_level,
            })
            .collect();

        let template = VariableTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            entries,
        };
        let id = template.id;
        self.variable_templates.push(template);
        id
    }

    /// Instantiate a template: fresh variables with new ids and no values.
    ///
    /// Returns the number of variables created, or `None` if no template
    /// has that name.
    pub fn apply_template(&mut self, name: &str) -> Option<usize> {
        let template = self
            .variable_templates
            .iter()
            .find(|t| t.name == name)?
            .clone();

        for entry in &template.entries {
            let mut variable = Variable::new(&entry.name, &entry.selector);
            variable.paste_selector = entry.paste_selector.clone();
            variable.extract_mode = entry.extract_mode;
            variable.attribute_name = entry.attribute_name.clone();
            variable.specificity_level = entry.specificity_level.or(Some(1));
            variable.paste_specificity_level = entry.paste_specificity_level.or(Some(1));
            self.variables.push(variable);
        }

        Some(template.entries.len())
    }

    /// Delete a template by name. Returns whether one was removed.
    pub fn delete_template(&mut self, name: &str) -> bool {
        let before = self.variable_templates.len();
        self.variable_templates.retain(|t| t.name != name);
        self.variable_templates.len() != before
    }
}
