use crate::handlers::{conversation_not_found, session_error_response};
use crate::state::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chatline_core::{ConversationSession, SessionError, TimelineError};
use chatline_types::{
    ConversationResponse, Message, RewindRequest, RewindResponse, SimulationDecisionRequest,
    SimulationDecisionResponse,
};
use tracing::{error, info, warn};

async fn conversation_response(session: &ConversationSession) -> ConversationResponse {
    let snapshot = session.snapshot().await;
    ConversationResponse {
        conversation_id: session.id().to_string(),
        version: snapshot.version,
        messages: snapshot.messages,
    }
}

#[get("/api/conversations/{conversation_id}")]
pub async fn get_conversation(
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    let Some(session) = state.conversations.get(&id).await else {
        warn!(conversation_id = %id, "Conversation not found");
        return conversation_not_found(&id);
    };

    HttpResponse::Ok().json(conversation_response(&session).await)
}

#[post("/api/conversations/{conversation_id}/messages")]
pub async fn append_message(
    conversation_id: web::Path<String>,
    message: web::Json<Message>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();
    let message = message.into_inner();
    let message_id = message.id.clone();

    let session = state.conversations.get_or_create(&id).await;

    match session.merge_or_append(message).await {
        Ok(_) => HttpResponse::Ok().json(conversation_response(&session).await),
        Err(e) => {
            if matches!(e, SessionError::Timeline(TimelineError::TypeMismatch { .. })) {
                error!(
                    conversation_id = %id,
                    message_id = %message_id,
                    error = %e,
                    "Message stream mixed content kinds"
                );
            }
            session_error_response(&e)
        }
    }
}

#[post("/api/conversations/{conversation_id}/messages/{message_id}/finalize")]
pub async fn finalize_message(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> impl Responder {
    let (id, message_id) = path.into_inner();

    let Some(session) = state.conversations.get(&id).await else {
        return conversation_not_found(&id);
    };

    match session.finalize(&message_id).await {
        Ok(version) => {
            info!(conversation_id = %id, message_id = %message_id, version, "Message finalized");
            HttpResponse::Ok().json(conversation_response(&session).await)
        }
        Err(e) => {
            warn!(conversation_id = %id, message_id = %message_id, error = %e, "Finalize rejected");
            session_error_response(&e)
        }
    }
}

#[post("/api/conversations/{conversation_id}/rewind")]
pub async fn rewind_conversation(
    conversation_id: web::Path<String>,
    request: web::Json<RewindRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();
    let request = request.into_inner();

    let Some(session) = state.conversations.get(&id).await else {
        return conversation_not_found(&id);
    };

    let result = match request.expected_version {
        Some(expected) => session.rewind_if_version(expected, &request.rejected_id).await,
        None => Ok(session.rewind(&request.rejected_id).await),
    };

    match result {
        Ok(result) => {
            let snapshot = session.snapshot().await;
            HttpResponse::Ok().json(RewindResponse {
                index: result.index,
                version: snapshot.version,
                messages: snapshot.messages,
            })
        }
        Err(e) => session_error_response(&e),
    }
}

/// Drop a conversation along with its running preview
#[delete("/api/conversations/{conversation_id}")]
pub async fn delete_conversation(
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    if state.conversations.get(&id).await.is_none() {
        return conversation_not_found(&id);
    }
    state.previews.stop(&id).await;
    state.conversations.remove(&id).await;

    info!(
        conversation_id = %id,
        remaining = state.conversations.len().await,
        "Conversation deleted"
    );
    HttpResponse::NoContent().finish()
}

/// Decide whether the pending turn runs in simulation mode.
///
/// An unknown conversation is asked about with an empty history and is not
/// created. A failed decision is not surfaced to the caller; the turn runs
/// without simulation.
#[post("/api/conversations/{conversation_id}/simulation")]
pub async fn decide_simulation(
    conversation_id: web::Path<String>,
    request: web::Json<SimulationDecisionRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();
    let client = state.decision_client.as_ref();

    let decision = match state.conversations.get(&id).await {
        Some(session) => session.should_simulate(client, &request.message_input).await,
        None => client.decide(&[], &request.message_input).await,
    };

    let use_simulation = match decision {
        Ok(decision) => decision,
        Err(e) => {
            warn!(
                conversation_id = %id,
                client = state.decision_client.name(),
                error = %e,
                "Simulation decision failed, continuing without simulation"
            );
            false
        }
    };

    HttpResponse::Ok().json(SimulationDecisionResponse { use_simulation })
}
