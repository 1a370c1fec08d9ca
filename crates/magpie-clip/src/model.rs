//! Clipping data model: variables, sets, templates, settings.
//!
//! Field names on the wire keep the original clipper's camelCase JSON so an
//! existing store file keeps loading (`extractType`, `specificityLevel`,
//! `pasteSpecificityLevel`, ...). Records written by older versions may lack
//! the specificity-level fields entirely; [`crate::store::Store::load`]
//! migrates those to level 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a value is read out of a resolved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// The element's `value` (form controls). For a `textarea`, whose value
    /// lives in its content, the text content is used.
    #[default]
    Value,
    /// Trimmed text content.
    Text,
    /// A named attribute (see `attribute_name` on the variable).
    Attribute,
    /// Serialized inner markup.
    #[serde(rename = "innerHTML")]
    InnerHtml,
}

/// A named variable bound to a CSS selector.
///
/// The selector is captured once (generated or hand-written) and embedded
/// in the definition; extraction re-resolves it against whatever document
/// is current at that moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Stable identity, kept across renames.
    pub id: Uuid,
    /// Display name, unique per store by convention.
    pub name: String,
    /// Extraction selector.
    pub selector: String,
    /// Optional distinct paste destination; bulk pasting prefers this over
    /// the extraction selector when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_selector: Option<String>,
    /// How the value is read from the resolved element.
    #[serde(default, rename = "extractType")]
    pub extract_mode: ExtractMode,
    /// Attribute to read in [`ExtractMode::Attribute`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    /// Last extracted value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// URL or path of the document the value came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Raw specificity level (1-4) used when generating the extraction
    /// selector. `None` in stores written before levels existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity_level: Option<u32>,
    /// Raw specificity level for the paste selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_specificity_level: Option<u32>,
    /// When the value was last extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
}

impl Variable {
    /// Create a fresh variable bound to a selector, with defaults everywhere
    /// else.
    #[must_use]
    pub fn new(name: &str, selector: &str) -> Self {
        Variable {
            id: Uuid::new_v4(),
            name: name.to_string(),
            selector: selector.to_string(),
            paste_selector: None,
            extract_mode: ExtractMode::default(),
            attribute_name: None,
            value: None,
            source_url: None,
            specificity_level: Some(1),
            paste_specificity_level: Some(1),
            extracted_at: None,
        }
    }

    /// The selector bulk pasting should use: the paste selector when
    /// present, else the extraction selector.
    #[must_use]
    pub fn paste_target(&self) -> &str {
        self.paste_selector.as_deref().unwrap_or(&self.selector)
    }
}

/// One captured value inside a saved set.
///
/// The variable's name is denormalized into the entry so a set survives the
/// variable being renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
    /// The variable this value came from.
    pub variable_id: Uuid,
    /// Variable name at capture time.
    pub name: String,
    /// Captured value.
    pub value: String,
}

/// A named snapshot of extracted values, reusable later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSet {
    /// Stable identity.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Captured values.
    pub entries: Vec<SavedEntry>,
    /// When the set was saved.
    pub created_at: DateTime<Utc>,
}

/// One variable definition inside a template (no value, no identity).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    /// Variable name to create.
    pub name: String,
    /// Extraction selector.
    pub selector: String,
    /// Optional paste destination selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_selector: Option<String>,
    /// Extraction mode.
    #[serde(default, rename = "extractType")]
    pub extract_mode: ExtractMode,
    /// Attribute for [`ExtractMode::Attribute`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    /// Raw specificity level for the extraction selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity_level: Option<u32>,
    /// Raw specificity level for the paste selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_specificity_level: Option<u32>,
}

/// A reusable bundle of variable definitions.
///
/// Applying a template instantiates fresh variables (new ids, empty
/// values) so several documents can be clipped with one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableTemplate {
    /// Stable identity.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The definitions to instantiate.
    pub entries: Vec<TemplateEntry>,
}

/// User settings, merged with defaults on load so new keys pick up their
/// default in old store files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Highlight resolved elements when verifying selectors.
    pub auto_highlight: bool,
    /// Surface notifications after extract/paste operations.
    pub show_notifications: bool,
    /// Clear variable values after saving them into a set.
    pub clear_values_after_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_highlight: true,
            show_notifications: true,
            clear_values_after_save: false,
        }
    }
}
