use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::client::ForwardClient;
use crate::routes::{self, GatewayState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: resolve the gateway configuration, build the forwarding
/// client, and serve.
pub async fn run() -> anyhow::Result<()> {
    // A missing config file is fine; env vars take over.
    let mut gw = configs::load_default().map(|cfg| cfg.gateway).unwrap_or_default();
    gw.normalize_from_env()?;
    info!(server_url = %gw.server_url, "gateway configuration resolved");

    let client = ForwardClient::new(&gw.server_url)?;
    let app: Router = routes::build_router(GatewayState { client }, build_cors());

    let addr: SocketAddr = format!("{}:{}", gw.host, gw.port).parse()?;
    info!(%addr, "starting gateway");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
