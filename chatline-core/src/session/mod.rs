use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chatline_client::{DecisionClient, DecisionError};
use chatline_types::{Message, SimulationEvent};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::rewind;
use crate::telemetry::SimulationEventSink;
use crate::timeline::{MergeOutcome, MessageTimeline, TimelineError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// A compare-and-swap write found the timeline at a different version
    #[error("Timeline version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}

/// Point-in-time copy of a conversation timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSnapshot {
    pub version: u64,
    pub messages: Vec<Message>,
}

/// Result of a rewind request
#[derive(Debug, Clone, PartialEq)]
pub struct RewindResult {
    /// Index rolled back to, or `None` when there was nothing to roll back to
    pub index: Option<usize>,
    pub removed: Vec<Message>,
    pub version: u64,
}

/// Forwarded simulation events kept per conversation; older events are dropped
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 10_000;

/// State owned by one conversation.
///
/// All timeline writes go through the session's lock, so merges, appends and
/// rewinds of the same conversation are serialized. A rewind resolves and
/// truncates under a single acquisition.
pub struct ConversationSession {
    id: String,
    timeline: Mutex<MessageTimeline>,
    simulation_events: Mutex<Vec<SimulationEvent>>,
    event_capacity: usize,
}

impl ConversationSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_timeline(id, MessageTimeline::new())
    }

    pub fn with_timeline(id: impl Into<String>, timeline: MessageTimeline) -> Self {
        Self {
            id: id.into(),
            timeline: Mutex::new(timeline),
            simulation_events: Mutex::new(Vec::new()),
            event_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }

    /// Keep at most `capacity` forwarded events, dropping the oldest first
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Merge a streamed chunk or append a new message
    pub async fn merge_or_append(&self, message: Message) -> Result<MergeOutcome, SessionError> {
        let mut timeline = self.timeline.lock().await;
        let message_id = message.id.clone();

        match timeline.merge_or_append(message) {
            Ok(outcome) => {
                debug!(
                    conversation_id = %self.id,
                    message_id = %message_id,
                    ?outcome,
                    version = timeline.version(),
                    "Timeline updated"
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(
                    conversation_id = %self.id,
                    message_id = %message_id,
                    error = %e,
                    "Rejected timeline update"
                );
                Err(e.into())
            }
        }
    }

    /// Mark a message's stream as ended
    pub async fn finalize(&self, message_id: &str) -> Result<u64, SessionError> {
        let mut timeline = self.timeline.lock().await;
        timeline.finalize(message_id)?;
        Ok(timeline.version())
    }

    /// Roll the timeline back in response to `rejected_id` being rejected
    pub async fn rewind(&self, rejected_id: &str) -> RewindResult {
        let mut timeline = self.timeline.lock().await;
        Self::rewind_locked(&self.id, &mut timeline, rejected_id)
    }

    /// Like [`rewind`](Self::rewind), but only if the timeline is still at
    /// `expected_version`
    pub async fn rewind_if_version(
        &self,
        expected_version: u64,
        rejected_id: &str,
    ) -> Result<RewindResult, SessionError> {
        let mut timeline = self.timeline.lock().await;
        let actual = timeline.version();
        if actual != expected_version {
            warn!(
                conversation_id = %self.id,
                expected = expected_version,
                actual,
                "Rewind skipped, timeline moved"
            );
            return Err(SessionError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }
        Ok(Self::rewind_locked(&self.id, &mut timeline, rejected_id))
    }

    fn rewind_locked(
        conversation_id: &str,
        timeline: &mut MessageTimeline,
        rejected_id: &str,
    ) -> RewindResult {
        let Some(index) = rewind::resolve(timeline.messages(), rejected_id) else {
            return RewindResult {
                index: None,
                removed: Vec::new(),
                version: timeline.version(),
            };
        };

        // resolve only yields indexes inside the timeline
        let removed = timeline.truncate_after(index).unwrap_or_default();

        info!(
            conversation_id,
            rejected_id,
            index,
            removed = removed.len(),
            "Timeline rewound"
        );

        RewindResult {
            index: Some(index),
            removed,
            version: timeline.version(),
        }
    }

    pub async fn snapshot(&self) -> TimelineSnapshot {
        let timeline = self.timeline.lock().await;
        TimelineSnapshot {
            version: timeline.version(),
            messages: timeline.messages().to_vec(),
        }
    }

    pub async fn version(&self) -> u64 {
        self.timeline.lock().await.version()
    }

    /// Ask the decision service whether the pending turn should be simulated.
    ///
    /// The history is copied before the request so the timeline stays writable
    /// while the request is in flight.
    pub async fn should_simulate(
        &self,
        client: &dyn DecisionClient,
        pending_input: &str,
    ) -> Result<bool, DecisionError> {
        let history = self.snapshot().await.messages;
        client.decide(&history, pending_input).await
    }

    /// Events forwarded from the running preview, oldest first
    pub async fn simulation_events(&self) -> Vec<SimulationEvent> {
        self.simulation_events.lock().await.clone()
    }
}

#[async_trait]
impl SimulationEventSink for ConversationSession {
    async fn forward(&self, events: Vec<SimulationEvent>) {
        let count = events.len();
        let mut log = self.simulation_events.lock().await;
        log.extend(events);
        if log.len() > self.event_capacity {
            let dropped = log.len() - self.event_capacity;
            log.drain(..dropped);
            debug!(conversation_id = %self.id, dropped, "Oldest simulation events dropped");
        }
        debug!(
            conversation_id = %self.id,
            count,
            total = log.len(),
            "Simulation events recorded"
        );
    }
}

/// Conversations known to this process, keyed by id
#[derive(Default)]
pub struct ConversationRegistry {
    sessions: RwLock<HashMap<String, Arc<ConversationSession>>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ConversationSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn get_or_create(&self, id: &str) -> Arc<ConversationSession> {
        if let Some(session) = self.get(id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(conversation_id = %id, "Conversation created");
                Arc::new(ConversationSession::new(id))
            })
            .clone()
    }

    /// Forget a conversation; returns it if it was known
    pub async fn remove(&self, id: &str) -> Option<Arc<ConversationSession>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            info!(conversation_id = %id, "Conversation removed");
        }
        removed
    }

    /// Number of conversations held in memory
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
