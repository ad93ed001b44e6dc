mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::TestRequest;
use chatline_client::DecisionError;
use common::{setup_test_app, text_chunk};
use serde_json::json;

#[actix_rt::test]
async fn test_streamed_chunks_merge_into_one_message() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    for chunk in [
        text_chunk("u1", "user", "Build a todo app"),
        text_chunk("a1", "assistant", "Sure, "),
        text_chunk("a1", "assistant", "starting now."),
    ] {
        let req = TestRequest::post()
            .uri("/api/conversations/conv-1/messages")
            .set_json(chunk)
            .to_request();
        let resp = test::call_service(&test_app.app, req).await;
        assert!(resp.status().is_success());
    }

    let req = TestRequest::get()
        .uri("/api/conversations/conv-1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["conversationId"], "conv-1");
    assert_eq!(body["version"], 3);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2, "Expected the assistant chunks to merge");
    assert_eq!(messages[1]["id"], "a1");
    assert_eq!(messages[1]["type"], "text");
    assert_eq!(messages[1]["content"], "Sure, starting now.");

    Ok(())
}

#[actix_rt::test]
async fn test_get_unknown_conversation_returns_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get()
        .uri("/api/conversations/missing")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("missing"));

    Ok(())
}

#[actix_rt::test]
async fn test_image_chunk_onto_text_tail_is_rejected() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(text_chunk("a1", "assistant", "Here is the mockup"))
        .to_request();
    test::call_service(&test_app.app, req).await;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(json!({
            "id": "a1",
            "role": "assistant",
            "type": "image",
            "content": { "url": "https://cdn.example.com/mockup.png" }
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let session = test_app.state.conversations.get("conv-1").await.unwrap();
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].text_content(), Some("Here is the mockup"));

    Ok(())
}

#[actix_rt::test]
async fn test_finalized_message_rejects_further_chunks() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(text_chunk("a1", "assistant", "Done."))
        .to_request();
    test::call_service(&test_app.app, req).await;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages/a1/finalize")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(text_chunk("a1", "assistant", " More."))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages/nope/finalize")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[actix_rt::test]
async fn test_rewind_rolls_back_to_previous_checkpoint() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    for chunk in [
        text_chunk("u1", "user", "Make a landing page"),
        json!({"id": "a1", "role": "assistant", "repositoryId": "repo-1", "type": "text", "content": "v1"}),
        json!({"id": "a2", "role": "assistant", "repositoryId": "repo-2", "type": "text", "content": "v2"}),
    ] {
        let req = TestRequest::post()
            .uri("/api/conversations/conv-1/messages")
            .set_json(chunk)
            .to_request();
        test::call_service(&test_app.app, req).await;
    }

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/rewind")
        .set_json(json!({ "rejectedId": "a2" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["index"], 1);
    assert_eq!(body["version"], 4);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["id"], "a1");

    Ok(())
}

#[actix_rt::test]
async fn test_rewind_with_nothing_to_roll_back_is_noop() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(text_chunk("a1", "assistant", "Hello"))
        .to_request();
    test::call_service(&test_app.app, req).await;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/rewind")
        .set_json(json!({ "rejectedId": "a1" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("index").is_none());
    assert_eq!(body["version"], 1);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);

    Ok(())
}

#[actix_rt::test]
async fn test_rewind_with_stale_version_conflicts() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    for chunk in [
        text_chunk("u1", "user", "Hi"),
        text_chunk("a1", "assistant", "Hello"),
    ] {
        let req = TestRequest::post()
            .uri("/api/conversations/conv-1/messages")
            .set_json(chunk)
            .to_request();
        test::call_service(&test_app.app, req).await;
    }

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/rewind")
        .set_json(json!({ "rejectedId": "a1", "expectedVersion": 1 }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let session = test_app.state.conversations.get("conv-1").await.unwrap();
    assert_eq!(session.snapshot().await.messages.len(), 2);

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/rewind")
        .set_json(json!({ "rejectedId": "a1", "expectedVersion": 2 }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["index"], 0);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);

    Ok(())
}

#[actix_rt::test]
async fn test_rewind_unknown_conversation_returns_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/conversations/missing/rewind")
        .set_json(json!({ "rejectedId": "a1" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_rt::test]
async fn test_simulation_decision_uses_conversation_history() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    test_app.mock_decision_client.push_response(Ok(true));

    for chunk in [
        text_chunk("u1", "user", "Build a signup form"),
        text_chunk("a1", "assistant", "Here it is"),
    ] {
        let req = TestRequest::post()
            .uri("/api/conversations/conv-1/messages")
            .set_json(chunk)
            .to_request();
        test::call_service(&test_app.app, req).await;
    }

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/simulation")
        .set_json(json!({ "messageInput": "Click the submit button" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["useSimulation"], true);
    assert_eq!(
        test_app.mock_decision_client.get_calls(),
        vec![(2, "Click the submit button".to_string())]
    );

    Ok(())
}

#[actix_rt::test]
async fn test_simulation_decision_failure_defaults_to_false() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    test_app
        .mock_decision_client
        .push_response(Err(DecisionError::api_error(503, "classifier down")));

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/simulation")
        .set_json(json!({ "messageInput": "Try it out" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["useSimulation"], false);
    assert_eq!(test_app.mock_decision_client.get_call_count(), 1);

    Ok(())
}

#[actix_rt::test]
async fn test_simulation_decision_does_not_create_conversation() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    test_app.mock_decision_client.push_response(Ok(true));

    let req = TestRequest::post()
        .uri("/api/conversations/never-seen/simulation")
        .set_json(json!({ "messageInput": "Open the menu" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["useSimulation"], true);
    assert_eq!(
        test_app.mock_decision_client.get_calls(),
        vec![(0, "Open the menu".to_string())]
    );
    assert_eq!(test_app.state.conversations.len().await, 0);

    let req = TestRequest::get()
        .uri("/api/conversations/never-seen")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[actix_rt::test]
async fn test_delete_conversation() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/conversations/conv-1/messages")
        .set_json(text_chunk("u1", "user", "Hello"))
        .to_request();
    test::call_service(&test_app.app, req).await;
    assert_eq!(test_app.state.conversations.len().await, 1);

    let req = TestRequest::delete()
        .uri("/api/conversations/conv-1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(test_app.state.conversations.len().await, 0);

    let req = TestRequest::delete()
        .uri("/api/conversations/conv-1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
