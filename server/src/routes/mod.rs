use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::events::{
    create_event, delete_event, list_registrations, my_events, update_event,
};
use crate::handlers::health_check;
use crate::state::AppState;
use crate::storage::UPLOADS_PREFIX;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/events", post(create_event))
        .route("/my-events", get(my_events))
        .route("/event/:event_id", put(update_event).delete(delete_event))
        .route("/event/:event_id/registrations", get(list_registrations))
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&config.upload_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state);

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}
