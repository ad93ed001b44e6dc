use std::time::Duration;

use crate::{
    error::DecisionError,
    simulation::{
        client::{SimulationDecisionClient, DEFAULT_ENDPOINT},
        types::TruthinessPolicy,
    },
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for [`SimulationDecisionClient`]
#[derive(Debug, Clone)]
pub struct SimulationDecisionClientBuilder {
    base_url: Option<String>,
    endpoint: String,
    timeout: Duration,
    truthiness: TruthinessPolicy,
}

impl Default for SimulationDecisionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationDecisionClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            truthiness: TruthinessPolicy::default(),
        }
    }

    /// Set the base URL of the decision service (scheme and host)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the endpoint path
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn truthiness(mut self, policy: TruthinessPolicy) -> Self {
        self.truthiness = policy;
        self
    }

    pub fn build(self) -> Result<SimulationDecisionClient, DecisionError> {
        let base_url = self
            .base_url
            .ok_or_else(|| DecisionError::invalid_config("Base URL is required"))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DecisionError::invalid_config("Base URL cannot be empty"));
        }
        reqwest::Url::parse(&base_url).map_err(|e| {
            DecisionError::invalid_config(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        let endpoint = if self.endpoint.starts_with('/') {
            self.endpoint
        } else {
            format!("/{}", self.endpoint)
        };

        let http_client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(SimulationDecisionClient {
            base_url,
            endpoint,
            truthiness: self.truthiness,
            http_client,
        })
    }
}
