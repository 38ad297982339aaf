//! Parser warnings with deduplication.
//!
//! Avoids spamming the same diagnostic when a malformed document repeats
//! the same mistake hundreds of times. Used by the tree builder and the
//! DOM layer to report problems they recovered from.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recovered problem (emitted once per unique message)
///
/// The warning is emitted as a `tracing` event at WARN level, so it is only
/// visible when the embedding application installs a subscriber.
///
/// # Example
/// ```ignore
/// warn_once("HTML", "close tag </span> matches no open tag");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Returns true if this exact warning has already been emitted.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call before parsing an unrelated document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
