use crate::handlers::conversation_not_found;
use crate::state::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chatline_types::{ErrorResponse, PreviewResponse, SimulationEvent, SimulationEventsResponse};
use tracing::{error, info, warn};

#[post("/api/conversations/{conversation_id}/preview")]
pub async fn start_preview(
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    let Some(session) = state.conversations.get(&id).await else {
        return conversation_not_found(&id);
    };

    if let Err(e) = state.previews.start(&id, session).await {
        error!(conversation_id = %id, error = %e, "Failed to start preview");
        return HttpResponse::InternalServerError().json(ErrorResponse::new(format!(
            "Failed to start preview: {}",
            e
        )));
    }

    info!(conversation_id = %id, "Preview started");
    HttpResponse::Ok().json(PreviewResponse {
        conversation_id: id,
        active: true,
        buffered_events: 0,
    })
}

#[post("/api/conversations/{conversation_id}/preview/events")]
pub async fn push_preview_events(
    conversation_id: web::Path<String>,
    events: web::Json<Vec<SimulationEvent>>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    match state.previews.push(&id, events.into_inner()).await {
        Ok(Some(buffered_events)) => HttpResponse::Ok().json(PreviewResponse {
            conversation_id: id,
            active: true,
            buffered_events,
        }),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(format!(
            "No preview is running for conversation {}",
            id
        ))),
        Err(e) => {
            warn!(conversation_id = %id, error = %e, "Preview events rejected");
            HttpResponse::Conflict().json(ErrorResponse::new(e.to_string()))
        }
    }
}

#[delete("/api/conversations/{conversation_id}/preview")]
pub async fn stop_preview(
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    match state.previews.stop(&id).await {
        Some(stats) => {
            info!(
                conversation_id = %id,
                events = stats.events_forwarded,
                "Preview stopped"
            );
            HttpResponse::Ok().json(PreviewResponse {
                conversation_id: id,
                active: false,
                buffered_events: 0,
            })
        }
        None => HttpResponse::NotFound().json(ErrorResponse::new(format!(
            "No preview is running for conversation {}",
            id
        ))),
    }
}

#[get("/api/conversations/{conversation_id}/simulation-events")]
pub async fn list_simulation_events(
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = conversation_id.into_inner();

    let Some(session) = state.conversations.get(&id).await else {
        return conversation_not_found(&id);
    };

    HttpResponse::Ok().json(SimulationEventsResponse {
        events: session.simulation_events().await,
        conversation_id: id,
    })
}
