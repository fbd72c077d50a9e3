//! Result merger
//!
//! Folds newly fetched chat items into the client-visible ordered log.
//! Reconciliation is always by id, never by position: the optimistic send
//! path may already hold an item a later poll returns again.
//!
//! After every merge the log is ascending by `created_at` (ties broken by
//! id) with no duplicate ids, and the returned cursor never moves backwards.

use std::collections::HashSet;

use liveshop_core::{ChatMessage, Cursor};
use uuid::Uuid;

/// Merge the initial page into the log.
///
/// The server returns the most recent N items in descending order when no
/// cursor is present; this is the one case where the merge must sort rather
/// than assume pre-sorted input. Returns the cursor after the merge.
pub fn merge_initial(log: &mut Vec<ChatMessage>, fetched: Vec<ChatMessage>) -> Option<Cursor> {
    append_unseen(log, fetched)
}

/// Merge an incremental page (items strictly after the cursor, ascending)
/// into the log. An empty fetch is a no-op and leaves the cursor unchanged.
pub fn merge_incremental(
    log: &mut Vec<ChatMessage>,
    fetched: Vec<ChatMessage>,
    cursor: Option<Cursor>,
) -> Option<Cursor> {
    let merged = append_unseen(log, fetched);
    max_cursor(cursor, merged)
}

/// Later of two optional cursors
pub fn max_cursor(a: Option<Cursor>, b: Option<Cursor>) -> Option<Cursor> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn append_unseen(log: &mut Vec<ChatMessage>, fetched: Vec<ChatMessage>) -> Option<Cursor> {
    if fetched.is_empty() {
        return latest_created_at(log);
    }

    let seen: HashSet<Uuid> = log.iter().map(|m| m.id).collect();
    let mut appended = false;

    for item in fetched {
        if seen.contains(&item.id) {
            continue;
        }
        log.push(item);
        appended = true;
    }

    if appended {
        log.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }

    latest_created_at(log)
}

fn latest_created_at(log: &[ChatMessage]) -> Option<Cursor> {
    log.last().map(|m| Cursor::at(m.created_at))
}
