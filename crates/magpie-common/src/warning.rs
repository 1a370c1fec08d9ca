//! Warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML and selector components to report constructs they skip,
//! e.g. a selector string the query engine cannot parse.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a skipped or unsupported construct (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("selector", "unparseable selector 'div:has(p)' treated as matching nothing");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[magpie {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call when loading a new document)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_warnings_resets_dedup_set() {
        warn_once("test", "a warning");
        clear_warnings();
        // After clearing, the same message is considered new again.
        let is_new = WARNED
            .lock()
            .unwrap()
            .get_or_insert_with(HashSet::new)
            .insert("[test] a warning".to_string());
        assert!(is_new);
        clear_warnings();
    }
}
