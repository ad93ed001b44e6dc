pub mod builder;
pub mod client;
pub mod types;

pub use builder::SimulationDecisionClientBuilder;
pub use client::{SimulationDecisionClient, DEFAULT_ENDPOINT};
pub use types::TruthinessPolicy;
