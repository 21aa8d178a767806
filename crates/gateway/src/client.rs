//! HTTP client forwarding validated requests to the backing server,
//! passing the upstream status and body through untouched.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use reqwest::Method;
use serde::Serialize;

use crate::errors::GatewayError;
use common::identity::USER_ID_HEADER;

#[derive(Clone)]
pub struct ForwardClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForwardClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub async fn get(
        &self,
        path: &str,
        user_id: Option<i64>,
        query: &[(&str, String)],
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::GET, path, user_id).query(query)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        user_id: Option<i64>,
        body: &B,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::POST, path, user_id).json(body)).await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        user_id: Option<i64>,
        body: &B,
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::PATCH, path, user_id).json(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        user_id: Option<i64>,
        query: &[(&str, String)],
    ) -> Result<Response, GatewayError> {
        self.send(self.request(Method::PATCH, path, user_id).query(query)).await
    }

    pub async fn delete(&self, path: &str, user_id: Option<i64>) -> Result<Response, GatewayError> {
        self.send(self.request(Method::DELETE, path, user_id)).await
    }

    fn request(&self, method: Method, path: &str, user_id: Option<i64>) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(id) = user_id {
            req = req.header(USER_ID_HEADER, id);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response, GatewayError> {
        let upstream = req.send().await.map_err(|e| GatewayError::Upstream(e.to_string()))?;
        into_response(upstream).await
    }
}

/// Re-emit the upstream response verbatim: status, content type, body.
async fn into_response(upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let mut builder = Response::builder().status(status);
    if let Some(ct) = content_type {
        builder = builder.header(CONTENT_TYPE, ct);
    }
    builder
        .body(Body::from(bytes))
        .map_err(|e| GatewayError::Upstream(e.to_string()))
}
