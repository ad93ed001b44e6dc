use actix_web::{test, web, App};
use chatline_api::AppState;
use chatline_client::{DecisionClient, DecisionError};
use chatline_types::Message;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct TestApp<S> {
    pub state: web::Data<AppState>,
    pub mock_decision_client: Arc<MockDecisionClient>,
    pub app: S,
}

/// Decision client returning scripted verdicts, `false` once they run out
pub struct MockDecisionClient {
    pub responses: Arc<Mutex<Vec<Result<bool, DecisionError>>>>,
    pub calls: Arc<Mutex<Vec<(usize, String)>>>,
}

impl MockDecisionClient {
    pub fn new() -> Self {
        MockDecisionClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_response(&self, response: Result<bool, DecisionError>) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// History length and pending input of each call
    pub fn get_calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockDecisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DecisionClient for MockDecisionClient {
    async fn decide(&self, history: &[Message], pending_input: &str) -> Result<bool, DecisionError> {
        self.calls
            .lock()
            .unwrap()
            .push((history.len(), pending_input.to_string()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(false)
        } else {
            responses.remove(0)
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Collector interval long enough that tests only see the flush on stop
pub const TEST_TELEMETRY_INTERVAL: Duration = Duration::from_secs(3600);

pub async fn setup_test_app() -> anyhow::Result<TestApp<impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
>>> {
    let mock_decision_client = Arc::new(MockDecisionClient::new());
    let decision_client = mock_decision_client.clone() as Arc<dyn DecisionClient>;
    let state = web::Data::new(AppState::new(decision_client, TEST_TELEMETRY_INTERVAL));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(chatline_api::configure),
    )
    .await;

    Ok(TestApp {
        state,
        mock_decision_client,
        app,
    })
}

pub fn text_chunk(id: &str, role: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "role": role,
        "type": "text",
        "content": content,
    })
}
