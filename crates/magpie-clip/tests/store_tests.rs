//! Tests for the store lifecycle: defaults, persistence, merge, migration.

use std::fs;
use std::path::PathBuf;

use magpie_clip::{ExtractMode, Store, Variable};
use tempfile::TempDir;

/// A store path inside a fresh temp dir.
fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("magpie-store.json")
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = Store::load(&store_path(&dir)).unwrap();

    assert!(store.variables.is_empty());
    assert!(store.saved_sets.is_empty());
    assert!(store.variable_templates.is_empty());
    assert!(store.current_set_id.is_none());
    assert!(store.settings.auto_highlight);
    assert!(store.settings.show_notifications);
    assert!(!store.settings.clear_values_after_save);
}

#[test]
fn test_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let mut store = Store::default();
    let mut variable = Variable::new("price", "#total");
    variable.extract_mode = ExtractMode::Text;
    variable.value = Some("42.00".to_string());
    let id = store.add_variable(variable);
    store.settings.clear_values_after_save = true;
    store.save(&path).unwrap();

    let loaded = Store::load(&path).unwrap();
    assert_eq!(loaded.variables.len(), 1);
    let variable = &loaded.variables[0];
    assert_eq!(variable.id, id);
    assert_eq!(variable.name, "price");
    assert_eq!(variable.selector, "#total");
    assert_eq!(variable.extract_mode, ExtractMode::Text);
    assert_eq!(variable.value.as_deref(), Some("42.00"));
    assert!(loaded.settings.clear_values_after_save);
}

#[test]
fn test_settings_merge_defaults_for_missing_keys() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    // A store written by a version that only knew autoHighlight.
    fs::write(&path, r#"{"settings": {"autoHighlight": false}}"#).unwrap();

    let store = Store::load(&path).unwrap();
    assert!(!store.settings.auto_highlight);
    assert!(store.settings.show_notifications);
    assert!(!store.settings.clear_values_after_save);
}

#[test]
fn test_migration_fills_specificity_levels() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    // A variable record from before specificity levels existed.
    fs::write(
        &path,
        r#"{"variables": [{
            "id": "8c7f2f6e-6f63-4e8f-9c37-0d3f6f2a1b4c",
            "name": "title",
            "selector": "h1"
        }]}"#,
    )
    .unwrap();

    let store = Store::load(&path).unwrap();
    assert_eq!(store.variables[0].specificity_level, Some(1));
    assert_eq!(store.variables[0].paste_specificity_level, Some(1));

    // Migration saves the file back immediately.
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("specificityLevel"));
    assert!(raw.contains("pasteSpecificityLevel"));
}

#[test]
fn test_wire_format_keeps_original_field_names() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let mut store = Store::default();
    let mut variable = Variable::new("markup", "div.content");
    variable.extract_mode = ExtractMode::InnerHtml;
    let _ = store.add_variable(variable);
    store.save(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"extractType\": \"innerHTML\""));
    assert!(raw.contains("\"currentSetId\""));
    assert!(raw.contains("\"savedSets\""));
    assert!(raw.contains("\"variableTemplates\""));
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    fs::write(&path, "not json at all {{{").unwrap();

    assert!(Store::load(&path).is_err());
}

// ========== sets ==========

#[test]
fn test_save_set_snapshots_values() {
    let mut store = Store::default();
    let mut with_value = Variable::new("a", "#a");
    with_value.value = Some("1".to_string());
    let a_id = store.add_variable(with_value);
    let _ = store.add_variable(Variable::new("b", "#b")); // no value

    let set_id = store.save_current_as_set("run-1");

    let set = store.set_by_name("run-1").unwrap();
    assert_eq!(set.id, set_id);
    assert_eq!(set.entries.len(), 1);
    assert_eq!(set.entries[0].variable_id, a_id);
    assert_eq!(set.entries[0].value, "1");
    assert_eq!(store.current_set_id, Some(set_id));

    // Default settings keep values in place after saving.
    assert_eq!(store.variables[0].value.as_deref(), Some("1"));
}

#[test]
fn test_save_set_clears_values_when_configured() {
    let mut store = Store::default();
    store.settings.clear_values_after_save = true;
    let mut variable = Variable::new("a", "#a");
    variable.value = Some("1".to_string());
    let _ = store.add_variable(variable);

    let _ = store.save_current_as_set("run-1");

    assert!(store.variables[0].value.is_none());
    assert_eq!(store.set_by_name("run-1").unwrap().entries[0].value, "1");
}

#[test]
fn test_apply_set_restores_values() {
    let mut store = Store::default();
    let mut variable = Variable::new("a", "#a");
    variable.value = Some("old".to_string());
    let _ = store.add_variable(variable);
    let _ = store.save_current_as_set("snapshot");

    store.variable_by_name_mut("a").unwrap().value = Some("changed".to_string());

    let restored = store.apply_set("snapshot").unwrap();
    assert_eq!(restored, 1);
    assert_eq!(store.variables[0].value.as_deref(), Some("old"));

    assert!(store.apply_set("no-such-set").is_none());
}

#[test]
fn test_apply_set_falls_back_to_name_match() {
    let mut store = Store::default();
    let mut variable = Variable::new("a", "#a");
    variable.value = Some("kept".to_string());
    let _ = store.add_variable(variable);
    let _ = store.save_current_as_set("snapshot");

    // Delete and recreate the variable: new id, same name.
    assert!(store.remove_variable("a"));
    let _ = store.add_variable(Variable::new("a", "#a-new"));

    let restored = store.apply_set("snapshot").unwrap();
    assert_eq!(restored, 1);
    assert_eq!(store.variables[0].value.as_deref(), Some("kept"));
}

#[test]
fn test_delete_set_clears_dangling_current() {
    let mut store = Store::default();
    let mut variable = Variable::new("a", "#a");
    variable.value = Some("1".to_string());
    let _ = store.add_variable(variable);
    let _ = store.save_current_as_set("only");

    assert!(store.delete_set("only"));
    assert!(store.current_set_id.is_none());
    assert!(!store.delete_set("only"));
}

// ========== templates ==========

#[test]
fn test_template_captures_definitions_not_values() {
    let mut store = Store::default();
    let mut variable = Variable::new("title", "h1.page-title");
    variable.extract_mode = ExtractMode::Text;
    variable.value = Some("should not be captured".to_string());
    let _ = store.add_variable(variable);

    let _ = store.save_template("article");
    let template = &store.variable_templates[0];
    assert_eq!(template.entries.len(), 1);
    assert_eq!(template.entries[0].selector, "h1.page-title");
}

#[test]
fn test_apply_template_creates_fresh_variables() {
    let mut store = Store::default();
    let mut variable = Variable::new("title", "h1");
    variable.value = Some("old".to_string());
    let _ = store.add_variable(variable);
    let original_id = store.variables[0].id;
    let _ = store.save_template("shape");

    store.variables.clear();
    let created = store.apply_template("shape").unwrap();

    assert_eq!(created, 1);
    let fresh = &store.variables[0];
    assert_eq!(fresh.name, "title");
    assert_eq!(fresh.selector, "h1");
    assert_ne!(fresh.id, original_id);
    assert!(fresh.value.is_none());

    assert!(store.apply_template("missing").is_none());
}
