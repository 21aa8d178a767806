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
use common::dto::{NewCommentDto, NewItemDto, UpdateItemDto};
use common::identity::UserId;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).patch(update_item))
        .route("/:id/comment", post(add_comment))
}

/// Raw pagination query; bounds are checked before forwarding.
#[derive(Debug, Deserialize)]
struct RawPageQuery {
    from: Option<i64>,
    size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawSearchQuery {
    text: Option<String>,
    from: Option<i64>,
    size: Option<i64>,
}

async fn create_item(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewItemDto>,
) -> Result<Response, GatewayError> {
    validate::new_item(&dto)?;
    info!(user_id, "forwarding item creation");
    state.client.post_json("/items", Some(user_id), &dto).await
}

async fn update_item(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateItemDto>,
) -> Result<Response, GatewayError> {
    validate::update_item(&dto)?;
    info!(user_id, item_id = id, "forwarding item update");
    state.client.patch_json(&format!("/items/{id}"), Some(user_id), &dto).await
}

async fn get_item(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    state.client.get(&format!("/items/{id}"), Some(user_id), &[]).await
}

async fn list_items(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Query(query): Query<RawPageQuery>,
) -> Result<Response, GatewayError> {
    let (from, size) = validate::pagination(query.from, query.size)?;
    state
        .client
        .get("/items", Some(user_id), &[("from", from.to_string()), ("size", size.to_string())])
        .await
}

async fn search_items(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Query(query): Query<RawSearchQuery>,
) -> Result<Response, GatewayError> {
    let (from, size) = validate::pagination(query.from, query.size)?;
    let text = query.text.unwrap_or_default();
    state
        .client
        .get(
            "/items/search",
            Some(user_id),
            &[("text", text), ("from", from.to_string()), ("size", size.to_string())],
        )
        .await
}

async fn add_comment(
    State(state): State<GatewayState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Json(dto): Json<NewCommentDto>,
) -> Result<Response, GatewayError> {
    validate::comment(&dto)?;
    info!(user_id, item_id = id, "forwarding comment");
    state.client.post_json(&format!("/items/{id}/comment"), Some(user_id), &dto).await
}
