use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecisionError;

/// Field of the decision response that carries the verdict
pub const USE_SIMULATION_FIELD: &str = "useSimulation";

/// How the `useSimulation` field of a decision response is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthinessPolicy {
    /// Any truthy JSON value counts: `true`, non-zero numbers, non-empty
    /// strings, arrays and objects
    #[default]
    Loose,
    /// Only the boolean `true` counts
    Strict,
}

impl TruthinessPolicy {
    /// Apply the policy to a field that may be missing
    pub fn is_truthy(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match self {
            TruthinessPolicy::Strict => matches!(value, Value::Bool(true)),
            TruthinessPolicy::Loose => match value {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
                Value::String(s) => !s.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
        }
    }

    /// Extract the verdict from a parsed response body.
    ///
    /// The body must be a JSON object; a missing field yields `false`.
    pub fn verdict(&self, body: &Value) -> Result<bool, DecisionError> {
        let Some(fields) = body.as_object() else {
            return Err(DecisionError::invalid_response(format!(
                "expected a JSON object, got {}",
                json_kind(body)
            )));
        };
        Ok(self.is_truthy(fields.get(USE_SIMULATION_FIELD)))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl std::str::FromStr for TruthinessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loose" => Ok(TruthinessPolicy::Loose),
            "strict" => Ok(TruthinessPolicy::Strict),
            other => Err(format!(
                "Unknown truthiness policy '{}', expected 'loose' or 'strict'",
                other
            )),
        }
    }
}
