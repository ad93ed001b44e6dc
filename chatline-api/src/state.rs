use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chatline_client::{DecisionClient, SimulationDecisionClient};
use chatline_core::{
    ActivePreview, CollectorHandle, CollectorStats, ConversationRegistry, SimulationEventSink,
    SimulationTelemetryCollector, SurfaceError,
};
use chatline_types::SimulationEvent;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ApiConfig;

/// Shared state handed to every handler
pub struct AppState {
    pub conversations: ConversationRegistry,
    pub decision_client: Arc<dyn DecisionClient>,
    pub previews: PreviewManager,
}

impl AppState {
    pub fn new(decision_client: Arc<dyn DecisionClient>, telemetry_interval: Duration) -> Self {
        Self {
            conversations: ConversationRegistry::new(),
            decision_client,
            previews: PreviewManager::new(telemetry_interval),
        }
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = SimulationDecisionClient::builder()
            .base_url(&config.simulation.base_url)
            .endpoint(&config.simulation.endpoint)
            .timeout(Duration::from_secs(config.simulation.timeout_secs))
            .truthiness(config.simulation.truthiness)
            .build()?;

        info!(
            url = %client.url(),
            truthiness = ?client.truthiness(),
            "Decision client configured"
        );

        Ok(Self::new(Arc::new(client), config.telemetry.interval()))
    }
}

struct PreviewEntry {
    preview: Arc<ActivePreview>,
    collector: CollectorHandle,
}

/// Running previews and their collectors, one per conversation
pub struct PreviewManager {
    interval: Duration,
    entries: Mutex<HashMap<String, PreviewEntry>>,
}

impl PreviewManager {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Start a fresh surface and collector for the conversation, tearing down
    /// any preview already running for it.
    ///
    /// Collected events are forwarded to `sink`, normally the conversation's
    /// session.
    pub async fn start(
        &self,
        conversation_id: &str,
        sink: Arc<dyn SimulationEventSink>,
    ) -> Result<(), SurfaceError> {
        let conversation_id = conversation_id.to_string();

        let previous = self.entries.lock().await.remove(&conversation_id);
        if let Some(previous) = previous {
            Self::shutdown(&conversation_id, previous).await;
        }

        let preview = Arc::new(ActivePreview::new());
        preview.start()?;

        let collector = Arc::new(
            SimulationTelemetryCollector::new(preview.clone(), sink).with_interval(self.interval),
        );
        let handle = collector.start();

        let replaced = self.entries.lock().await.insert(
            conversation_id.clone(),
            PreviewEntry {
                preview,
                collector: handle,
            },
        );
        // a concurrent start for the same conversation won the slot first
        if let Some(replaced) = replaced {
            Self::shutdown(&conversation_id, replaced).await;
        }
        Ok(())
    }

    /// Buffer events into the conversation's active surface.
    ///
    /// Returns `None` when no preview is running.
    pub async fn push(
        &self,
        conversation_id: &str,
        events: Vec<SimulationEvent>,
    ) -> Result<Option<usize>, SurfaceError> {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(conversation_id) else {
            return Ok(None);
        };
        let Some(surface) = entry.preview.current()? else {
            return Ok(None);
        };
        surface.push(events).map(Some)
    }

    /// Number of events waiting in the active surface, if a preview is running
    pub async fn buffered(&self, conversation_id: &str) -> Option<usize> {
        let entries = self.entries.lock().await;
        let surface = entries.get(conversation_id)?.preview.current().ok()??;
        Some(surface.buffered_len())
    }

    /// Tear down the conversation's preview.
    ///
    /// Events still buffered are forwarded before the surface closes. Returns
    /// `None` when no preview was running.
    pub async fn stop(&self, conversation_id: &str) -> Option<CollectorStats> {
        let entry = self.entries.lock().await.remove(conversation_id)?;
        Some(Self::shutdown(conversation_id, entry).await)
    }

    pub async fn stop_all(&self) {
        let entries: Vec<(String, PreviewEntry)> = self.entries.lock().await.drain().collect();
        for (conversation_id, entry) in entries {
            Self::shutdown(&conversation_id, entry).await;
        }
    }

    pub async fn is_active(&self, conversation_id: &str) -> bool {
        self.entries.lock().await.contains_key(conversation_id)
    }

    /// Stop the collector task, then forward whatever the surface still holds
    /// and close it.
    ///
    /// The task is joined first so the final drain cannot race a periodic tick.
    async fn shutdown(conversation_id: &str, entry: PreviewEntry) -> CollectorStats {
        let PreviewEntry {
            preview,
            collector: handle,
        } = entry;
        let collector = Arc::clone(handle.collector());
        handle.stop().await;

        let outcome = collector.tick().await;
        debug!(conversation_id, ?outcome, "Final telemetry flush");

        if let Err(e) = preview.stop() {
            debug!(conversation_id, error = %e, "Preview surface already gone");
        }
        collector.stats()
    }
}
