use thiserror::Error;

/// Errors raised while asking the remote classifier for a simulation decision
#[derive(Error, Debug)]
pub enum DecisionError {
    /// Network or connection error
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// The body parsed as JSON but is not a decision object
    #[error("Invalid decision response: {message}")]
    InvalidResponse { message: String },

    /// The client was configured with unusable settings
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl DecisionError {
    /// Create an API error
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
