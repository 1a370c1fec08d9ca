//! Document loading.
//!
//! A clipped "page" is a snapshot: read from a local file or fetched once
//! over HTTP, then parsed into a DOM tree. There is no resource loading
//! beyond the document itself.

use std::fs;

use magpie_common::net::fetch_text;
use magpie_common::warning::clear_warnings;
use magpie_dom::DomTree;
use magpie_html::parse_document_with_issues;

/// A loaded and parsed document.
pub struct LoadedDocument {
    /// Original HTML source.
    pub html_source: String,
    /// Source path or URL.
    pub source_path: String,
    /// Parsed DOM tree.
    pub dom: DomTree,
    /// Parse issues encountered while building the tree.
    pub issues: Vec<String>,
}

/// Error type for document loading.
#[derive(Debug)]
pub enum LoadError {
    /// Failed to read a local file.
    FileError(String),
    /// Failed to fetch a URL.
    NetworkError(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::FileError(msg) => write!(f, "File error: {msg}"),
            LoadError::NetworkError(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load a document from a file path or URL.
///
/// `http://` and `https://` sources are fetched; anything else is treated
/// as a local path. The deduplicated warning set is cleared first so each
/// document gets its own round of warnings.
///
/// # Errors
///
/// Returns [`LoadError`] when the source cannot be read or fetched.
/// Parse issues never fail the load; they are carried on the result.
pub fn load_document(path: &str) -> Result<LoadedDocument, LoadError> {
    clear_warnings();

    let html_source = if path.starts_with("http://") || path.starts_with("https://") {
        fetch_text(path).map_err(LoadError::NetworkError)?
    } else {
        fs::read_to_string(path)
            .map_err(|e| LoadError::FileError(format!("Failed to read '{path}': {e}")))?
    };

    let (dom, issues) = parse_document_with_issues(&html_source);

    Ok(LoadedDocument {
        html_source,
        source_path: path.to_string(),
        dom,
        issues: issues.iter().map(|i| i.message.clone()).collect(),
    })
}
