use async_trait::async_trait;
use chatline_types::{Message, UseSimulationRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::{debug, info};

use crate::{
    client::DecisionClient,
    error::DecisionError,
    simulation::{builder::SimulationDecisionClientBuilder, types::TruthinessPolicy},
};

/// Default path of the decision endpoint
pub const DEFAULT_ENDPOINT: &str = "/api/use-simulation";

/// HTTP client for the simulation decision endpoint
pub struct SimulationDecisionClient {
    pub(crate) base_url: String,
    pub(crate) endpoint: String,
    pub(crate) truthiness: TruthinessPolicy,
    pub(crate) http_client: reqwest::Client,
}

impl SimulationDecisionClient {
    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, DecisionError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> SimulationDecisionClientBuilder {
        SimulationDecisionClientBuilder::new()
    }

    /// Full URL requests are sent to
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint)
    }

    pub fn truthiness(&self) -> TruthinessPolicy {
        self.truthiness
    }

    /// Send the raw decision request and return the parsed response body
    pub async fn request_decision(
        &self,
        request: &UseSimulationRequest,
    ) -> Result<serde_json::Value, DecisionError> {
        let url = self.url();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        debug!(
            url = %url,
            history_len = request.messages.len(),
            "Requesting simulation decision"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            };
            return Err(DecisionError::api_error(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DecisionClient for SimulationDecisionClient {
    async fn decide(
        &self,
        history: &[Message],
        pending_input: &str,
    ) -> Result<bool, DecisionError> {
        let request = UseSimulationRequest {
            messages: history.to_vec(),
            message_input: pending_input.to_string(),
        };

        let body = self.request_decision(&request).await?;
        let use_simulation = self.truthiness.verdict(&body)?;

        info!(
            use_simulation,
            policy = ?self.truthiness,
            "Simulation decision received"
        );

        Ok(use_simulation)
    }

    fn name(&self) -> &str {
        "http"
    }
}
