mod config;
mod errors;
mod layout;
mod post;
mod probe;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::render::SvgRasterizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Postframe API v{}", env!("CARGO_PKG_VERSION"));

    // Shared fetch client for avatar/embedded-image retrieval. No explicit
    // timeout is configured; a failed or slow fetch degrades to the layout
    // fallbacks rather than failing the request.
    let http = reqwest::Client::new();

    // The rasterizer loads system fonts once at startup.
    let renderer = Arc::new(SvgRasterizer::new());
    info!(
        "SVG rasterizer initialized ({} font faces)",
        renderer.font_count()
    );

    let state = AppState { http, renderer };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
