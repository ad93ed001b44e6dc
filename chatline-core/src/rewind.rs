//! Rollback point resolution for rejected changes.

use chatline_types::{Message, MessageRole};
use tracing::warn;

/// Find the index the timeline should be rolled back to when `rejected_id`
/// is rejected.
///
/// Scans from the tail and stops at the first entry that is either a user
/// message or a checkpoint other than the rejected message. Returns `None`
/// when no such entry exists, which callers treat as a no-op rewind.
pub fn resolve(timeline: &[Message], rejected_id: &str) -> Option<usize> {
    let found = timeline
        .iter()
        .rposition(|message| is_anchor(message, rejected_id));

    if found.is_none() {
        warn!(
            rejected_id,
            timeline_len = timeline.len(),
            timeline = %snapshot(timeline),
            "No rewind anchor found"
        );
    }

    found
}

fn is_anchor(message: &Message, rejected_id: &str) -> bool {
    message.role == MessageRole::User
        || (message.repository_id.is_some() && message.id != rejected_id)
}

/// Compact one-line rendering of a timeline for diagnostics
pub fn snapshot(timeline: &[Message]) -> String {
    let entries: Vec<String> = timeline
        .iter()
        .map(|m| match &m.repository_id {
            Some(repo) => format!("{}:{}:{}", m.id, m.role, repo),
            None => format!("{}:{}", m.id, m.role),
        })
        .collect();
    format!("[{}]", entries.join(", "))
}
