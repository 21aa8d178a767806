use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::errors::ApiError;
use crate::routes::AppState;
use common::dto::{ItemRequestDto, NewItemRequestDto};
use common::identity::UserId;
use common::pagination::PageQuery;
use service::request_service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_request).get(list_own_requests))
        .route("/all", get(list_other_requests))
        .route("/:id", get(get_request))
}

async fn create_request(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewItemRequestDto>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    Ok(Json(request_service::add_request(&state.db, user_id, &dto).await?))
}

async fn list_own_requests(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    Ok(Json(request_service::get_own(&state.db, user_id).await?))
}

async fn list_other_requests(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    Ok(Json(request_service::get_all(&state.db, user_id, page.into()).await?))
}

async fn get_request(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    Ok(Json(request_service::get_one(&state.db, user_id, id).await?))
}
