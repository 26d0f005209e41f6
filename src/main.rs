mod api;
mod catalog;
mod config;
mod gemini;
mod reply;
mod resolver;

use anyhow::{Context, Result};
use axum::http::Method;
use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenv().ok();

    let config = config::Config::from_env();
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("failed to build http client")?;

    // API router
    let api_router = api::routes(api::AppState {
        http,
        config: config.clone(),
        parser: Arc::new(reply::NumberedSplit),
        analysis_gate: Arc::new(Semaphore::new(1)),
    });

    // Static files under ./public with SPA-ish index fallback
    let static_service = ServeDir::new("public").not_found_service(ServeFile::new("public/index.html"));
    // CORS (dev use: allow any origin/method/header)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = axum::Router::new()
        .merge(api_router)
        .nest_service("/", static_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse().context("invalid HOST/PORT")?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
