use std::{env, net::SocketAddr};

use axum::Router;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use common::logging::init_logging_default;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks.
fn load_bind_addr(cfg: Option<&configs::AppConfig>) -> anyhow::Result<SocketAddr> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(9090);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: connect the database, apply migrations, and serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // A missing config file is fine; env vars take over.
    let cfg = configs::AppConfig::load_and_validate().ok();

    let db = match cfg.as_ref() {
        Some(cfg) => models::db::connect_with(&cfg.database).await?,
        None => models::db::connect().await?,
    };
    Migrator::up(&db, None).await?;
    info!("database ready");

    let state = AppState { db };
    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
