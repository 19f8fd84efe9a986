//! Strategy backed by a remote move server

use crate::client::{RemoteClient, RemoteConfig};
use csq_core::wire::MoveRequest;
use csq_core::{BotContext, Move, Strategy, StrategyError};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

/// Delegates every decision over HTTP
///
/// The answer is handed back unvalidated; the game's own legality check
/// rejects illegal replies.
pub struct RemoteStrategy {
    config: RemoteConfig,
    params: Option<Value>,
    label: String,
}

impl RemoteStrategy {
    pub fn new(config: RemoteConfig, params: Option<Value>) -> Self {
        let label = format!("Remote ({})", config.base_url);
        Self {
            config,
            params,
            label,
        }
    }
}

impl Strategy for RemoteStrategy {
    fn id(&self) -> &str {
        "remote"
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        "Asks an external move server for each move"
    }

    fn select_move(
        &self,
        _moves: &[Move],
        ctx: &BotContext,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError> {
        let client = RemoteClient::new(self.config.clone())
            .map_err(|e| StrategyError::Delegation(Box::new(e)))?;
        let req = MoveRequest::from_context(ctx, self.params.clone());

        match client.request_move(&req) {
            Ok(answer) => {
                tracing::debug!(url = %self.config.base_url, ?answer, "remote move");
                Ok(answer)
            }
            Err(e) => {
                tracing::warn!(url = %self.config.base_url, error = %e, "remote move failed");
                Err(StrategyError::Delegation(Box::new(e)))
            }
        }
    }
}
