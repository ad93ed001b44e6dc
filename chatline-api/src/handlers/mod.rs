pub mod conversations;
pub mod preview;
pub mod telemetry;

use actix_web::HttpResponse;
use chatline_core::{SessionError, TimelineError};
use chatline_types::ErrorResponse;

/// Map a rejected timeline write to its HTTP response
pub(crate) fn session_error_response(e: &SessionError) -> HttpResponse {
    match e {
        SessionError::Timeline(TimelineError::UnknownMessage(_)) => {
            HttpResponse::NotFound().json(ErrorResponse::new(e.to_string()))
        }
        SessionError::Timeline(TimelineError::IndexOutOfBounds { .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))
        }
        SessionError::Timeline(TimelineError::TypeMismatch { .. })
        | SessionError::Timeline(TimelineError::MessageFinalized(_))
        | SessionError::VersionConflict { .. } => {
            HttpResponse::Conflict().json(ErrorResponse::new(e.to_string()))
        }
    }
}

pub(crate) fn conversation_not_found(conversation_id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(format!(
        "Conversation {} not found",
        conversation_id
    )))
}
