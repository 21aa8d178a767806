use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::client::ForwardClient;

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

#[derive(Clone)]
pub struct GatewayState {
    pub client: ForwardClient,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The gateway mirrors the server's resource layout; every handler
/// validates shape and forwards.
pub fn build_router(state: GatewayState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/users", users::router())
        .nest("/items", items::router())
        .nest("/bookings", bookings::router())
        .nest("/requests", requests::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
