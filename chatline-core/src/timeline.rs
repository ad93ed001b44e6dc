use std::collections::HashSet;

use chatline_types::{Message, MessageContent};

/// Errors raised by timeline mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// A chunk shares its id with the tail but one of them is not text
    #[error("Cannot merge {incoming} chunk into {existing} message '{id}'")]
    TypeMismatch {
        id: String,
        existing: &'static str,
        incoming: &'static str,
    },

    /// A chunk arrived for a message whose stream already ended
    #[error("Message '{0}' is finalized and cannot be extended")]
    MessageFinalized(String),

    #[error("Message '{0}' is not in the timeline")]
    UnknownMessage(String),

    #[error("Index {index} is out of bounds for a timeline of {len} messages")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// What a call to [`MessageTimeline::merge_or_append`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Content was concatenated onto the tail entry
    Merged,
    /// A new tail entry was pushed
    Appended,
}

/// Ordered messages of one conversation.
///
/// Entries are kept in causal order and never reordered. Every successful
/// mutation bumps `version`, which lets writers detect that the timeline moved
/// under them.
#[derive(Debug, Clone, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
    finalized: HashSet<String>,
    version: u64,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            finalized: HashSet::new(),
            version: 0,
        }
    }

    /// Merge a streamed chunk into the tail, or append it as a new entry.
    ///
    /// When the tail has the same id both sides must be text; their contents
    /// are concatenated in arrival order. On error the timeline is untouched.
    pub fn merge_or_append(&mut self, incoming: Message) -> Result<MergeOutcome, TimelineError> {
        let Some(last) = self.messages.last_mut() else {
            self.push(incoming);
            return Ok(MergeOutcome::Appended);
        };

        if last.id != incoming.id {
            self.push(incoming);
            return Ok(MergeOutcome::Appended);
        }

        if self.finalized.contains(&incoming.id) {
            return Err(TimelineError::MessageFinalized(incoming.id));
        }

        match (&mut last.body, incoming.body) {
            (
                MessageContent::Text { content: existing },
                MessageContent::Text { content: chunk },
            ) => {
                existing.push_str(&chunk);
                if last.repository_id.is_none() {
                    last.repository_id = incoming.repository_id;
                }
            }
            (existing, chunk) => {
                return Err(TimelineError::TypeMismatch {
                    id: incoming.id,
                    existing: existing.kind(),
                    incoming: chunk.kind(),
                });
            }
        }

        self.version += 1;
        Ok(MergeOutcome::Merged)
    }

    /// Mark the stream for `id` as ended; the message becomes immutable
    pub fn finalize(&mut self, id: &str) -> Result<(), TimelineError> {
        if !self.messages.iter().any(|m| m.id == id) {
            return Err(TimelineError::UnknownMessage(id.to_string()));
        }
        if self.finalized.insert(id.to_string()) {
            self.version += 1;
        }
        Ok(())
    }

    pub fn is_finalized(&self, id: &str) -> bool {
        self.finalized.contains(id)
    }

    /// Keep entries `0..=index` and drop the tail in bulk.
    ///
    /// Returns the removed messages in their original order.
    pub fn truncate_after(&mut self, index: usize) -> Result<Vec<Message>, TimelineError> {
        let len = self.messages.len();
        if index >= len {
            return Err(TimelineError::IndexOutOfBounds { index, len });
        }

        let removed = self.messages.split_off(index + 1);
        for message in &removed {
            self.finalized.remove(&message.id);
        }
        if !removed.is_empty() {
            self.version += 1;
        }
        Ok(removed)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.version += 1;
    }
}
