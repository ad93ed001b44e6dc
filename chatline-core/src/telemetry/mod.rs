//! Simulation telemetry capture.
//!
//! A [`SimulationTelemetryCollector`] periodically drains behavioral events
//! from the active preview surface and forwards each non-empty batch to a
//! conversation sink. The collector is best-effort: surface and drain failures
//! turn the tick into a no-op and never reach the caller.

mod collector;
mod surface;

pub use collector::{
    CollectorHandle, CollectorStats, SimulationTelemetryCollector, TickOutcome,
    DEFAULT_TELEMETRY_INTERVAL,
};
pub use surface::{ActivePreview, BufferedSurface};

use std::sync::Arc;

use async_trait::async_trait;
use chatline_types::SimulationEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface was torn down while it was being used
    #[error("Preview surface was torn down")]
    TornDown,

    #[error("Preview surface unavailable: {0}")]
    Unavailable(String),
}

/// A sandboxed execution surface that buffers behavioral events
#[async_trait]
pub trait PreviewSurface: Send + Sync {
    /// Return and clear every event buffered since the previous drain, oldest
    /// first
    async fn drain(&self) -> Result<Vec<SimulationEvent>, SurfaceError>;
}

/// Hands out the currently active surface, if any
pub trait SurfaceProvider: Send + Sync {
    fn active_surface(&self) -> Result<Option<Arc<dyn PreviewSurface>>, SurfaceError>;
}

/// Append-only receiver of event batches
#[async_trait]
pub trait SimulationEventSink: Send + Sync {
    async fn forward(&self, events: Vec<SimulationEvent>);
}
