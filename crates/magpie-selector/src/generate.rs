//! Unique-selector generation.
//!
//! Given an element in a document snapshot, produce a CSS selector string
//! that (a) resolves to exactly that element, (b) survives minor page
//! changes, and (c) can be tuned along a specificity/robustness trade-off.
//!
//! Short selectors (`#id`, `tag.class`) are fragile on pages with
//! framework-generated ids and classes; deep positional paths are fragile
//! to any structural reshuffling. The caller picks the trade-off per use
//! case via [`SpecificityLevel`] — "select precisely this button" wants a
//! low level, "select the nth row of a table regardless of attribute churn"
//! wants a high one.
//!
//! The algorithm is a pure, synchronous function over the tree at call
//! time: it issues read-only document-wide queries and keeps no state, so
//! two calls on a mutated document may legitimately disagree.

use magpie_dom::{DomTree, ElementData, NodeId};

use crate::escape::{escape_attribute_value, escape_ident};
use crate::query::resolves_uniquely_to;

/// Sentinel for "no limit" in [`LevelSettings`]; large enough that no real
/// document reaches it.
const UNBOUNDED: usize = 999;

/// Class tokens that name transient UI states rather than stable identity
/// markers. A selector built on `.active` stops matching the moment the
/// page toggles the state, so these are excluded (case-insensitively) from
/// every class-based candidate.
const VOLATILE_STATE_CLASSES: [&str; 5] = ["active", "hover", "focus", "disabled", "selected"];

/// Caller-chosen verbosity/robustness trade-off for generated selectors.
///
/// Levels map to raw integers 1-4 on the wire (stored variables keep the
/// integer); anything outside that range falls back to level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecificityLevel {
    /// Level 1: shortest useful selectors (up to 3 classes, 3 path nodes).
    #[default]
    Minimal,
    /// Level 2: a little more context (up to 5 classes, 5 path nodes).
    Standard,
    /// Level 3: unlimited classes, paths up to 8 nodes.
    Detailed,
    /// Level 4: unlimited classes, path bounded only by the body element.
    Full,
}

/// The per-level configuration table. Pure constant data, consulted per
/// call; it has no lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct LevelSettings {
    /// Most class tokens appended to a path fragment.
    pub max_classes: usize,
    /// Most node fragments in an ancestor path.
    pub max_depth: usize,
    /// Append `:nth-of-type()` when a node has same-tag siblings.
    pub include_nth: bool,
    /// Include the tag name in class-based fragments.
    pub include_type: bool,
}

impl SpecificityLevel {
    /// Resolve a raw stored level. Values outside 1-4 (including a missing
    /// one defaulted to 0) fall back to level 1.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            2 => Self::Standard,
            3 => Self::Detailed,
            4 => Self::Full,
            _ => Self::Minimal,
        }
    }

    /// The raw integer form stored in variable definitions.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::Minimal => 1,
            Self::Standard => 2,
            Self::Detailed => 3,
            Self::Full => 4,
        }
    }

    /// Look up this level's configuration.
    #[must_use]
    pub const fn settings(self) -> LevelSettings {
        match self {
            Self::Minimal => LevelSettings {
                max_classes: 3,
                max_depth: 3,
                include_nth: true,
                include_type: true,
            },
            Self::Standard => LevelSettings {
                max_classes: 5,
                max_depth: 5,
                include_nth: true,
                include_type: true,
            },
            Self::Detailed => LevelSettings {
                max_classes: UNBOUNDED,
                max_depth: 8,
                include_nth: true,
                include_type: true,
            },
            Self::Full => LevelSettings {
                max_classes: UNBOUNDED,
                max_depth: UNBOUNDED,
                include_nth: true,
                include_type: true,
            },
        }
    }
}

/// Generate a CSS selector uniquely identifying `node` within `tree`.
///
/// Returns `""` when `node` does not refer to an element — the sentinel for
/// "no selector could be produced", not an error. Otherwise the attempts
/// run in order, first success (candidate resolves to exactly the target)
/// wins:
///
/// 1. `#id` — only if the id is actually document-unique (malformed pages
///    duplicate ids; a non-unique id falls through)
/// 2. `tag[name="..."]`
/// 3. `tag.class` for each stable class, in document order
/// 4. `tag.class1.class2` from the first two stable classes
/// 5. a `>`-joined ancestor path, extended one node at a time until unique
///    (shortest sufficient path), bounded by the level's `max_depth` and
///    stopping below the body element
///
/// If the walk exhausts its bound without reaching uniqueness the
/// accumulated path is returned as-is: a best-effort selector that may
/// match zero or several elements. Callers needing a guarantee must
/// re-verify with the query engine.
///
/// Every id/name/class fragment is escaped before interpolation, so the
/// result is always syntactically valid.
#[must_use]
pub fn generate(tree: &DomTree, node: NodeId, level: SpecificityLevel) -> String {
    let Some(element) = tree.as_element(node) else {
        return String::new();
    };
    let settings = level.settings();
    let tag = element.tag_name.to_ascii_lowercase();

    // 1. Identifier shortcut.
    if let Some(id) = element.id() {
        let candidate = format!("#{}", escape_ident(id));
        if resolves_uniquely_to(tree, &candidate, node) {
            return candidate;
        }
    }

    // 2. Name-attribute shortcut.
    if let Some(name) = element.name() {
        let candidate = format!("{tag}[name=\"{}\"]", escape_attribute_value(name));
        if resolves_uniquely_to(tree, &candidate, node) {
            return candidate;
        }
    }

    // 3. Single-class shortcut.
    let classes = stable_classes(element);
    for class in &classes {
        let candidate = format!("{tag}.{}", escape_ident(class));
        if resolves_uniquely_to(tree, &candidate, node) {
            return candidate;
        }
    }

    // 4. Two-class combination shortcut.
    if classes.len() >= 2 {
        let candidate = format!(
            "{tag}.{}.{}",
            escape_ident(classes[0]),
            escape_ident(classes[1])
        );
        if resolves_uniquely_to(tree, &candidate, node) {
            return candidate;
        }
    }

    // 5./6. Ancestor-path fallback, best-effort on exhaustion.
    ancestor_path(tree, node, &settings)
}

/// The element's class tokens with volatile state classes filtered out,
/// original order preserved.
fn stable_classes(element: &ElementData) -> Vec<&str> {
    element
        .classes()
        .into_iter()
        .filter(|class| {
            !VOLATILE_STATE_CLASSES
                .iter()
                .any(|volatile| class.eq_ignore_ascii_case(volatile))
        })
        .collect()
}

/// Walk upward from `node` toward the body element, prepending one fragment
/// per level and returning as soon as the accumulated path is unique.
///
/// The walk ends early when a fragment is an id — an id is assumed to
/// anchor the path uniquely from that point, so prepending further
/// ancestors cannot help.
fn ancestor_path(tree: &DomTree, node: NodeId, settings: &LevelSettings) -> String {
    let boundary = tree.body();
    let mut path: Vec<String> = Vec::new();
    let mut current = node;

    loop {
        let Some(element) = tree.as_element(current) else {
            break;
        };

        let (fragment, is_anchor) = node_fragment(tree, current, element, settings);
        path.insert(0, fragment);

        let joined = path.join(" > ");
        if resolves_uniquely_to(tree, &joined, node) {
            return joined;
        }

        if is_anchor || path.len() >= settings.max_depth {
            break;
        }

        match tree.parent(current) {
            Some(parent) if Some(parent) != boundary && tree.as_element(parent).is_some() => {
                current = parent;
            }
            _ => break,
        }
    }

    path.join(" > ")
}

/// Build the path fragment for one node. Returns the fragment and whether
/// it anchors the path (true only for id fragments).
fn node_fragment(
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
    settings: &LevelSettings,
) -> (String, bool) {
    if let Some(el_id) = element.id() {
        return (format!("#{}", escape_ident(el_id)), true);
    }

    let tag = element.tag_name.to_ascii_lowercase();
    let mut fragment = if let Some(name) = element.name() {
        format!("{tag}[name=\"{}\"]", escape_attribute_value(name))
    } else {
        let classes = stable_classes(element);
        let mut f = if settings.include_type || classes.is_empty() {
            tag
        } else {
            String::new()
        };
        for class in classes.iter().take(settings.max_classes) {
            f.push('.');
            f.push_str(&escape_ident(class));
        }
        f
    };

    if settings.include_nth {
        if let Some((position, count)) = tree.same_tag_position(id) {
            if count > 1 {
                fragment.push_str(&format!(":nth-of-type({position})"));
            }
        }
    }

    (fragment, false)
}
