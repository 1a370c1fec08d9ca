//! Value clipping for magpie.
//!
//! # Scope
//!
//! This crate is the application layer over the DOM/selector machinery:
//!
//! - **Model** - variables bound to selectors, saved value sets, and
//!   variable-definition templates
//! - **Store** - JSON-persisted state with a load → merge defaults →
//!   migrate → save lifecycle
//! - **Values** - extracting element values by mode and pasting them back
//! - **Protocol** - the typed message set relayed between the surfaces of
//!   the clipping workflow, with at-most-one in-flight select request
//! - **Loader** - documents from local files or HTTP URLs
//!
//! The store is an explicit handle owned by the caller and passed by
//! reference — there is no ambient global state.

pub mod loader;
pub mod model;
pub mod protocol;
pub mod store;
pub mod values;

pub use loader::{LoadError, LoadedDocument, load_document};
pub use model::{
    ExtractMode, SavedEntry, SavedSet, Settings, TemplateEntry, Variable, VariableTemplate,
};
pub use protocol::{Message, Relay, SelectKind, apply_message};
pub use store::{Store, StoreError};
pub use values::{
    PasteOutcome, SyntheticEvent, extract_all, extract_by_selector, extract_value,
    extract_variable, paste_all, paste_by_selector, paste_value,
};
