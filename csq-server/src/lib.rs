//! CSQ Server - out-of-process move chooser
//!
//! This crate serves the JSON move protocol:
//! - `POST /move`: pick a line for the current player of a board snapshot
//! - `GET /health`: liveness probe
//! - `GET /bot-params`: tunables accepted in `bot_params`

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use routes::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Strategy used when a request names no `bot_id`
    pub default_strategy: String,
    /// Fixed seed for reproducible answers; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            default_strategy: "hard".to_string(),
            seed: None,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/move", post(routes::moves::choose_move))
        .route("/health", get(routes::health::health_handler))
        .route("/bot-params", get(routes::params::bot_params_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Serve on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::new(&config)?);
    let router = create_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("CSQ move server listening on http://0.0.0.0:{}", config.port);
    tracing::info!("Default strategy: {}", config.default_strategy);

    serve(listener, config).await
}
