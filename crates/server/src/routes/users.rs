use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::errors::ApiError;
use crate::routes::AppState;
use common::dto::{NewUserDto, UpdateUserDto, UserDto};
use service::user_service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(dto): Json<NewUserDto>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(user_service::create_user(&state.db, &dto).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(user_service::update_user(&state.db, id, &dto).await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApiError> {
    Ok(Json(user_service::list_users(&state.db).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(user_service::delete_user(&state.db, id).await?))
}
