//! # chatline client
//!
//! Client for the remote classifier that decides whether a chat turn should
//! run in simulation mode.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatline_client::{DecisionClient, SimulationDecisionClient};
//! use chatline_types::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimulationDecisionClient::new("http://localhost:3000")?;
//!     let history = vec![Message::user("u1", "Build a landing page")];
//!
//!     let use_simulation = client.decide(&history, "Click the signup button").await?;
//!     println!("Simulation: {}", use_simulation);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod simulation;

pub use client::DecisionClient;
pub use error::DecisionError;
pub use simulation::{SimulationDecisionClient, SimulationDecisionClientBuilder, TruthinessPolicy};
