//! Server command - start the move server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to csq-server crate)

use anyhow::Result;
use clap::Args;

use csq_server::{run_server, ServerConfig, ServerState};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "3001")]
    pub port: u16,

    /// Strategy used when a request names no bot_id
    #[arg(long, default_value = "hard")]
    pub strategy: String,

    /// Seed answers for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting CSQ move server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    let config = ServerConfig {
        port: args.port,
        default_strategy: args.strategy.clone(),
        seed: args.seed,
    };
    // Fail before binding when the strategy id is unknown
    ServerState::new(&config)?;
    Ok(config)
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_server_defaults() {
        let args = ServerArgs {
            port: 3001,
            strategy: "hard".to_string(),
            seed: None,
        };

        let config = configure_server(&args).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.default_strategy, "hard");
    }

    #[test]
    fn test_configure_server_unknown_strategy() {
        let args = ServerArgs {
            port: 3001,
            strategy: "oracle".to_string(),
            seed: None,
        };
        assert!(configure_server(&args).is_err());
    }
}
