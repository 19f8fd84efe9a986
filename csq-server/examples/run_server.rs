//! Example to run the CSQ move server standalone
//!
//! Run with: cargo run -p csq-server --example run_server

use csq_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::default();
    println!("Starting CSQ move server on port {}", config.port);
    println!("Try: curl http://localhost:{}/health", config.port);

    run_server(config).await
}
