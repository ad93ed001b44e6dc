use crate::message::Message;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A behavioral event captured from a sandboxed live preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SimulationEvent {
    #[serde(rename = "type")]
    pub kind: String,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub data: serde_json::Value,
}

impl SimulationEvent {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            data,
        }
    }
}

/// Body of `POST /api/use-simulation`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UseSimulationRequest {
    pub messages: Vec<Message>,
    pub message_input: String,
}

/// Typed view of the decision endpoint's answer.
///
/// The decision client inspects the raw JSON instead of this struct so it can
/// apply its truthiness policy; this type documents the contract.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UseSimulationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub use_simulation: Option<bool>,
}

/// Diagnostic ping sent by the front-end
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TelemetryPingRequest {
    pub event: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TelemetryPingResponse {
    pub success: bool,
}
