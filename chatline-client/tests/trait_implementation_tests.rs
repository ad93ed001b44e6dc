use chatline_client::{DecisionClient, DecisionError, SimulationDecisionClient};
use chatline_types::Message;

struct AlwaysSimulate;

#[async_trait::async_trait]
impl DecisionClient for AlwaysSimulate {
    async fn decide(
        &self,
        _history: &[Message],
        _pending_input: &str,
    ) -> Result<bool, DecisionError> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "always"
    }
}

#[test]
fn test_clients_implement_trait() {
    fn assert_implements_trait<T: DecisionClient>() {}

    assert_implements_trait::<SimulationDecisionClient>();
    assert_implements_trait::<AlwaysSimulate>();
}

#[test]
fn test_trait_object_usage() {
    let client: Box<dyn DecisionClient> =
        Box::new(SimulationDecisionClient::new("http://localhost:3000").unwrap());
    assert_eq!(client.name(), "http");
}

#[tokio::test]
async fn test_custom_client_through_trait_object() {
    let client: std::sync::Arc<dyn DecisionClient> = std::sync::Arc::new(AlwaysSimulate);
    let decision = client.decide(&[], "anything").await.unwrap();
    assert!(decision);
}
