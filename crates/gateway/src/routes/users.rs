//! User signup and profile management do not carry an identity header;
//! everything else does.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::errors::GatewayError;
use crate::routes::GatewayState;
use crate::validate;
use common::dto::{NewUserDto, UpdateUserDto};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

async fn create_user(
    State(state): State<GatewayState>,
    Json(dto): Json<NewUserDto>,
) -> Result<Response, GatewayError> {
    validate::new_user(&dto)?;
    info!("forwarding user signup");
    state.client.post_json("/users", None, &dto).await
}

async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Response, GatewayError> {
    validate::update_user(&dto)?;
    info!(user_id = id, "forwarding user update");
    state.client.patch_json(&format!("/users/{id}"), None, &dto).await
}

async fn get_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    state.client.get(&format!("/users/{id}"), None, &[]).await
}

async fn list_users(State(state): State<GatewayState>) -> Result<Response, GatewayError> {
    state.client.get("/users", None, &[]).await
}

async fn delete_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Response, GatewayError> {
    info!(user_id = id, "forwarding user deletion");
    state.client.delete(&format!("/users/{id}"), None).await
}
