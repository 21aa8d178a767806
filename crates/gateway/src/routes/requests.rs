use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::GatewayError;
use crate::routes::GatewayState;
use crate::validate;
use common::dto::NewItemRequestDto;
use common::identity::UserId;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", post(create_request).get(list_own_requests))
        .route("/all", get(list_other_requests))
        .route("/:id", get(get_request))
}

#[derive(Debug, Deserialize)]
struct RawPageQuery {
    from: Option<i64>,
    size: Option<i64>,
}

async fn create_request(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewItemRequestDto>,
) -> Result<Response, GatewayError> {
    validate::new_request(&dto)?;
    info!(user_id, "forwarding item request creation");
    state.client.post_json("/requests", Some(user_id), &dto).await
}

async fn list_own_requests(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
) -> Result<Response, GatewayError> {
    state.client.get("/requests", Some(user_id), &[]).await
}

async fn list_other_requests(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Query(query): Query<RawPageQuery>,
) -> Result<Response, GatewayError> {
    let (from, size) = validate::pagination(query.from, query.size)?;
    state
        .client
        .get(
            "/requests/all",
            Some(user_id),
            &[("from", from.to_string()), ("size", size.to_string())],
        )
        .await
}

async fn get_request(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    state.client.get(&format!("/requests/{id}"), Some(user_id), &[]).await
}
