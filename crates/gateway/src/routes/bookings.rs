use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::GatewayError;
use crate::routes::GatewayState;
use crate::validate;
use common::dto::NewBookingDto;
use common::identity::UserId;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", post(create_booking).get(list_own_bookings))
        .route("/owner", get(list_owner_bookings))
        .route("/:id", patch(approve_booking).get(get_booking))
        .route("/:id/cancel", patch(cancel_booking))
}

#[derive(Debug, Deserialize)]
struct ApproveQuery {
    approved: bool,
}

/// The state string is forwarded verbatim; the server owns its vocabulary.
#[derive(Debug, Deserialize)]
struct RawStateQuery {
    state: Option<String>,
    from: Option<i64>,
    size: Option<i64>,
}

async fn create_booking(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewBookingDto>,
) -> Result<Response, GatewayError> {
    validate::new_booking(&dto)?;
    info!(user_id, "forwarding booking creation");
    state.client.post_json("/bookings", Some(user_id), &dto).await
}

async fn approve_booking(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> Result<Response, GatewayError> {
    info!(user_id, booking_id = id, approved = query.approved, "forwarding booking decision");
    state
        .client
        .patch(
            &format!("/bookings/{id}"),
            Some(user_id),
            &[("approved", query.approved.to_string())],
        )
        .await
}

async fn cancel_booking(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    info!(user_id, booking_id = id, "forwarding booking cancellation");
    state.client.patch(&format!("/bookings/{id}/cancel"), Some(user_id), &[]).await
}

async fn get_booking(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    state.client.get(&format!("/bookings/{id}"), Some(user_id), &[]).await
}

async fn list_own_bookings(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Query(query): Query<RawStateQuery>,
) -> Result<Response, GatewayError> {
    forward_listing(&state, "/bookings", user_id, query).await
}

async fn list_owner_bookings(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Query(query): Query<RawStateQuery>,
) -> Result<Response, GatewayError> {
    forward_listing(&state, "/bookings/owner", user_id, query).await
}

async fn forward_listing(
    state: &GatewayState,
    path: &str,
    user_id: i64,
    query: RawStateQuery,
) -> Result<Response, GatewayError> {
    let (from, size) = validate::pagination(query.from, query.size)?;
    let state_param = query.state.unwrap_or_else(|| "ALL".to_string());
    state
        .client
        .get(
            path,
            Some(user_id),
            &[
                ("state", state_param),
                ("from", from.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
}
