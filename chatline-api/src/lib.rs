pub mod config;
pub mod handlers;
pub mod state;

use actix_web::web;

pub use state::{AppState, PreviewManager};

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::conversations::get_conversation)
        .service(handlers::conversations::append_message)
        .service(handlers::conversations::finalize_message)
        .service(handlers::conversations::rewind_conversation)
        .service(handlers::conversations::delete_conversation)
        .service(handlers::conversations::decide_simulation)
        .service(handlers::preview::start_preview)
        .service(handlers::preview::push_preview_events)
        .service(handlers::preview::stop_preview)
        .service(handlers::preview::list_simulation_events)
        .service(handlers::telemetry::telemetry_ping);
}
