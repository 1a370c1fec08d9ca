//! Extracting values from elements and pasting them back.
//!
//! Both directions treat "selector resolves to zero elements" as a
//! recoverable failure (`None`/`false`), never a crash — stored selectors
//! routinely go stale when pages change.

use chrono::Utc;
use magpie_dom::{DomTree, NodeId};
use magpie_html::inner_html;
use magpie_selector::query_first;

use crate::model::ExtractMode;
use crate::store::Store;

/// Synthetic notification a host environment would dispatch after a paste.
///
/// With no script runtime in a snapshot there is nothing to run them; they
/// are recorded as data so callers can relay a faithful
/// [`PasteComplete`](crate::protocol::Message::PasteComplete).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    /// An `input` event, bubbling.
    Input,
    /// A `change` event, bubbling.
    Change,
}

/// What a paste did to the target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The element exposes a settable value; it was set, and a host would
    /// dispatch `input` then `change`.
    Value,
    /// The element is `contenteditable`; its text was replaced, and a host
    /// would dispatch `input`.
    Editable,
    /// Fallback: plain text-content assignment, no notifications.
    TextContent,
    /// The target is not an element.
    Failed,
}

impl PasteOutcome {
    /// Whether the paste changed the document.
    #[must_use]
    pub const fn succeeded(self) -> bool {
        !matches!(self, PasteOutcome::Failed)
    }

    /// The synthetic notifications a host environment would dispatch.
    #[must_use]
    pub const fn dispatched_events(self) -> &'static [SyntheticEvent] {
        match self {
            PasteOutcome::Value => &[SyntheticEvent::Input, SyntheticEvent::Change],
            PasteOutcome::Editable => &[SyntheticEvent::Input],
            PasteOutcome::TextContent | PasteOutcome::Failed => &[],
        }
    }
}

/// Tags whose value lives in the `value` attribute.
const VALUE_ATTRIBUTE_TAGS: [&str; 3] = ["input", "select", "option"];

/// Read a value out of an element by mode.
///
/// A missing value/attribute yields `""` — absence of data is not an error
/// at this layer.
#[must_use]
pub fn extract_value(
    tree: &DomTree,
    node: NodeId,
    mode: ExtractMode,
    attribute_name: Option<&str>,
) -> String {
    let Some(element) = tree.as_element(node) else {
        return String::new();
    };

    match mode {
        ExtractMode::Value => {
            // A textarea's value is its content, not an attribute.
            if element.tag_name.eq_ignore_ascii_case("textarea") {
                return tree.text_content(node).trim().to_string();
            }
            element.attrs.get("value").cloned().unwrap_or_default()
        }
        ExtractMode::Text => tree.text_content(node).trim().to_string(),
        ExtractMode::Attribute => attribute_name
            .and_then(|name| element.attrs.get(name))
            .cloned()
            .unwrap_or_default(),
        ExtractMode::InnerHtml => inner_html(tree, node),
    }
}

/// Resolve a selector and extract a value from the first match.
///
/// Returns `None` when the selector resolves to nothing.
#[must_use]
pub fn extract_by_selector(
    tree: &DomTree,
    selector: &str,
    mode: ExtractMode,
    attribute_name: Option<&str>,
) -> Option<String> {
    let node = query_first(tree, selector)?;
    Some(extract_value(tree, node, mode, attribute_name))
}

/// Write a value into an element.
///
/// The ladder follows the original clipper: a settable value first
/// (`input`/`select`/`option` via the value attribute, `textarea` via
/// content), then `contenteditable` text, then plain text-content
/// assignment for everything else.
pub fn paste_value(tree: &mut DomTree, node: NodeId, value: &str) -> PasteOutcome {
    let Some(element) = tree.as_element(node) else {
        return PasteOutcome::Failed;
    };
    let tag = element.tag_name.to_ascii_lowercase();
    let editable = element
        .attrs
        .get("contenteditable")
        .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"));

    if tag == "textarea" {
        let _ = tree.set_text_content(node, value);
        return PasteOutcome::Value;
    }
    if VALUE_ATTRIBUTE_TAGS.contains(&tag.as_str()) {
        let _ = tree.set_attr(node, "value", value);
        return PasteOutcome::Value;
    }
    if editable {
        let _ = tree.set_text_content(node, value);
        return PasteOutcome::Editable;
    }

    let _ = tree.set_text_content(node, value);
    PasteOutcome::TextContent
}

/// Resolve a selector and paste into the first match.
///
/// Returns `false` when the selector resolves to nothing.
pub fn paste_by_selector(tree: &mut DomTree, selector: &str, value: &str) -> bool {
    match query_first(tree, selector) {
        Some(node) => paste_value(tree, node, value).succeeded(),
        None => false,
    }
}

/// Extract one variable (by name) from a document, recording the source and
/// timestamp on success.
///
/// Returns the extracted value; `None` when the variable does not exist or
/// its selector matched nothing.
pub fn extract_variable(
    store: &mut Store,
    name: &str,
    tree: &DomTree,
    source_url: Option<&str>,
) -> Option<String> {
    let variable = store.variables.iter_mut().find(|v| v.name == name)?;
    let value = extract_by_selector(
        tree,
        &variable.selector,
        variable.extract_mode,
        variable.attribute_name.as_deref(),
    )?;
    variable.value = Some(value.clone());
    variable.source_url = source_url.map(str::to_string);
    variable.extracted_at = Some(Utc::now());
    Some(value)
}

/// Extract every variable with a selector from one document, recording the
/// source and timestamp. Returns how many variables received a value.
pub fn extract_all(store: &mut Store, tree: &DomTree, source_url: Option<&str>) -> usize {
    let mut extracted = 0;
    for variable in &mut store.variables {
        if variable.selector.is_empty() {
            continue;
        }
        let value = extract_by_selector(
            tree,
            &variable.selector,
            variable.extract_mode,
            variable.attribute_name.as_deref(),
        );
        if let Some(value) = value {
            variable.value = Some(value);
            variable.source_url = source_url.map(str::to_string);
            variable.extracted_at = Some(Utc::now());
            extracted += 1;
        }
    }
    extracted
}

/// Paste every variable holding a value into one document.
///
/// The paste destination is [`Variable::paste_target`](crate::model::Variable::paste_target):
/// the dedicated paste selector when present, else the extraction selector.
/// Returns how many pastes succeeded.
pub fn paste_all(store: &Store, tree: &mut DomTree) -> usize {
    let mut pasted = 0;
    for variable in &store.variables {
        let Some(value) = variable.value.as_deref() else {
            continue;
        };
        if paste_by_selector(tree, variable.paste_target(), value) {
            pasted += 1;
        }
    }
    pasted
}
