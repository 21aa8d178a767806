use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::routes::AppState;
use common::dto::{BookingDto, NewBookingDto};
use common::identity::UserId;
use common::pagination::Pagination;
use service::booking_service;

pub fn router() -> Router<AppState> {
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

#[derive(Debug, Deserialize)]
struct StateQuery {
    #[serde(default = "default_state")]
    state: String,
    #[serde(default)]
    from: u64,
    #[serde(default = "default_size")]
    size: u64,
}

fn default_state() -> String {
    "ALL".to_string()
}

fn default_size() -> u64 {
    20
}

impl StateQuery {
    fn page(&self) -> Pagination {
        Pagination { from: self.from, size: self.size }
    }
}

async fn create_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(dto): Json<NewBookingDto>,
) -> Result<Json<BookingDto>, ApiError> {
    Ok(Json(booking_service::add_booking(&state.db, user_id, &dto).await?))
}

async fn approve_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> Result<Json<BookingDto>, ApiError> {
    Ok(Json(booking_service::approve_booking(&state.db, id, user_id, query.approved).await?))
}

async fn cancel_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Json<BookingDto>, ApiError> {
    Ok(Json(booking_service::cancel_booking(&state.db, id, user_id).await?))
}

async fn get_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<i64>,
) -> Result<Json<BookingDto>, ApiError> {
    Ok(Json(booking_service::get_booking(&state.db, id, user_id).await?))
}

async fn list_own_bookings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<StateQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    Ok(Json(
        booking_service::get_own_bookings(&state.db, user_id, &query.state, query.page()).await?,
    ))
}

async fn list_owner_bookings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<StateQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    Ok(Json(
        booking_service::get_bookings_for_own_items(&state.db, user_id, &query.state, query.page())
            .await?,
    ))
}
