mod config;
mod errors;
mod layout;
mod pricing;
mod quote;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::default_page_config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("clearquote_api={},tower_http=info", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ClearQuote API v{}", env!("CARGO_PKG_VERSION"));

    // Pricing profiles must be valid before we accept any request.
    let pricing = config.load_pricing()?;
    match &config.pricing_config_path {
        Some(path) => info!("Pricing profiles loaded from {}", path.display()),
        None => info!("Using built-in reference pricing profiles"),
    }
    info!(
        "Terrains: {:?}, tax rate {}",
        pricing.terrains(),
        pricing.tax_rate
    );

    let page_config = default_page_config();
    info!(
        "Page: {}x{} mm, fonts from {}",
        page_config.width_mm,
        page_config.height_mm,
        config.font_dir.display()
    );

    let state = AppState::new(config.clone(), pricing, page_config);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict origins once the form is served from a fixed host
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
