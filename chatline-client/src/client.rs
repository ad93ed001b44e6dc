use crate::error::DecisionError;
use async_trait::async_trait;
use chatline_types::Message;

/// Core trait for simulation decision clients
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Decide whether the pending turn should run in simulation mode.
    ///
    /// Failures are returned to the caller, which owns the fallback.
    async fn decide(&self, history: &[Message], pending_input: &str)
        -> Result<bool, DecisionError>;

    /// Short name of the backing implementation, used in logs
    fn name(&self) -> &str;
}
