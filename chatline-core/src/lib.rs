//! Conversation timeline reconciliation, rewind and simulation telemetry.

pub mod rewind;
pub mod session;
pub mod telemetry;
pub mod timeline;

pub use rewind::resolve;
pub use session::{
    ConversationRegistry, ConversationSession, RewindResult, SessionError, TimelineSnapshot,
    DEFAULT_EVENT_LOG_CAPACITY,
};
pub use telemetry::{
    ActivePreview, BufferedSurface, CollectorHandle, CollectorStats, PreviewSurface,
    SimulationEventSink, SimulationTelemetryCollector, SurfaceError, SurfaceProvider, TickOutcome,
};
pub use timeline::{MergeOutcome, MessageTimeline, TimelineError};
