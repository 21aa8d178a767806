use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::routes::AppState;
use common::dto::{CommentDto, ItemDto, NewCommentDto, NewItemDto, UpdateItemDto};
use common::identity::UserId;
use common::pagination::{PageQuery, Pagination};
use service::item_service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).patch(update_item))
        .route("/:id/comment", post(add_comment))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    text: Option<String>,
    #[serde(default)]
    from: u64,
    #[serde(default = "default_size")]
    size: u64,
}

fn default_size() -> u64 {
    20
}

async fn create_item(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewItemDto>,
) -> Result<Json<ItemDto>, ApiError> {
    Ok(Json(item_service::add_item(&state.db, user_id, &dto).await?))
}

async fn update_item(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateItemDto>,
) -> Result<Json<ItemDto>, ApiError> {
    Ok(Json(item_service::update_item(&state.db, user_id, id, &dto).await?))
}

async fn get_item(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Json<ItemDto>, ApiError> {
    Ok(Json(item_service::get_item(&state.db, id, user_id).await?))
}

async fn list_items(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    Ok(Json(item_service::get_items_for_owner(&state.db, user_id, page.into()).await?))
}

async fn search_items(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let page = Pagination { from: query.from, size: query.size };
    Ok(Json(item_service::find_available(&state.db, query.text.as_deref(), page).await?))
}

async fn add_comment(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Json(dto): Json<NewCommentDto>,
) -> Result<Json<CommentDto>, ApiError> {
    Ok(Json(item_service::add_comment(&state.db, id, user_id, &dto).await?))
}
