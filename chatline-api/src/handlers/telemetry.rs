use actix_web::{post, web, HttpResponse, Responder};
use chatline_types::{TelemetryPingRequest, TelemetryPingResponse};
use tracing::info;

/// Diagnostic ping from the front-end; only recorded in the service log
#[post("/api/telemetry")]
pub async fn telemetry_ping(request: web::Json<TelemetryPingRequest>) -> impl Responder {
    let request = request.into_inner();
    info!(event = %request.event, data = %request.data, "Telemetry ping");

    HttpResponse::Ok().json(TelemetryPingResponse { success: true })
}
