//! Proxy backend: geocodes and queries Geoapify on behalf of browser clients
//! so the API key never leaves the server.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use handlers::DEFAULT_LOCATION;
pub use state::AppState;

use crate::config::Config;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/gyms", get(handlers::gyms))
        .route("/api/static-map", get(handlers::static_map))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(config: &Config, host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(config));
    if state.geoapify.is_none() {
        log::warn!("GEOAPIFY_API_KEY is not set; /api routes will answer 400");
    }

    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Gym finder proxy listening on http://{}", addr);
    axum::serve(listener, app).await
}
