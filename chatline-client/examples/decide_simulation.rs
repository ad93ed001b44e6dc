use chatline_client::{DecisionClient, SimulationDecisionClient, TruthinessPolicy};
use chatline_types::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Classifier base URL, e.g. the front-end dev server
    let base_url = std::env::var("CHATLINE_CLASSIFIER_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = SimulationDecisionClient::builder()
        .base_url(base_url)
        .truthiness(TruthinessPolicy::Strict)
        .build()?;

    let history = vec![
        Message::user("u1", "Build a signup form with email validation"),
        Message::assistant("a1", "Here is a form with an email field and a submit button."),
    ];

    let use_simulation = client
        .decide(&history, "Type an invalid email and press submit")
        .await?;

    println!("POST {}", client.url());
    println!("Simulation: {}", use_simulation);

    Ok(())
}
