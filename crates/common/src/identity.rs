//! Caller identity: every endpoint reads the acting user id from a header.
//!
//! Identity is consumed as an opaque integer id; there is no authentication
//! layer in front of it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Acting user id extracted from the `X-Sharer-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| reject(format!("missing {} header", USER_ID_HEADER)))?;
        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| reject(format!("malformed {} header", USER_ID_HEADER)))?;
        Ok(UserId(id))
    }
}

fn reject(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
