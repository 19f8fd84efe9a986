//! CSQ Remote - delegate turns to an out-of-process move chooser
//!
//! This crate provides:
//! - `RemoteClient`: blocking HTTP client for `/move`, `/health`, `/bot-params`
//! - `RemoteStrategy`: a `Strategy` that asks a remote server for each move
//! - `install`: registers the remote factory on a `StrategyRegistry`

mod client;
mod strategy;

pub use client::{RemoteClient, RemoteConfig, RemoteError};
pub use strategy::RemoteStrategy;

use csq_core::StrategyRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Let `registry` materialise `PlayerKind::Remote` seats
pub fn install(registry: &mut StrategyRegistry, timeout: Duration) {
    registry.set_remote_factory(Box::new(move |url, params| {
        let config = RemoteConfig::new(url).with_timeout(timeout);
        Arc::new(RemoteStrategy::new(config, params.cloned()))
    }));
}
