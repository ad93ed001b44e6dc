use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod conversation;
pub mod message;
pub mod simulation;
pub mod typescript_gen;

pub use typescript_gen::{generate_typescript_definitions, write_typescript_definitions};

pub use conversation::{
    ConversationResponse, PreviewResponse, RewindRequest, RewindResponse,
    SimulationDecisionRequest, SimulationDecisionResponse, SimulationEventsResponse,
};
pub use message::{ImageContent, Message, MessageContent, MessageRole};
pub use simulation::{
    SimulationEvent, TelemetryPingRequest, TelemetryPingResponse, UseSimulationRequest,
    UseSimulationResponse,
};

// Wire models shared by the chatline service and the browser front-end

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
