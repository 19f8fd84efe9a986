//! Server state
//!
//! Read-only after startup apart from the request counter.

use crate::ServerConfig;
use csq_core::{CoreError, HardBot, HardConfig, Strategy, StrategyRegistry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Server-wide shared state
pub struct ServerState {
    pub registry: StrategyRegistry,
    pub default_strategy: String,
    seed: Option<u64>,
    requests: AtomicU64,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Result<Self, CoreError> {
        let registry = StrategyRegistry::with_defaults();
        if registry.get(&config.default_strategy).is_none() {
            return Err(CoreError::UnknownStrategy(config.default_strategy.clone()));
        }
        Ok(Self {
            registry,
            default_strategy: config.default_strategy.clone(),
            seed: config.seed,
            requests: AtomicU64::new(0),
        })
    }

    /// Strategy for a request, with hard-bot tunables applied from `params`
    pub fn strategy(
        &self,
        id: Option<&str>,
        params: Option<&serde_json::Value>,
    ) -> Result<Arc<dyn Strategy>, CoreError> {
        let id = id.unwrap_or(&self.default_strategy);
        let strategy = self
            .registry
            .get(id)
            .ok_or_else(|| CoreError::UnknownStrategy(id.to_string()))?;

        match params {
            Some(p) if id == "hard" => {
                let config = HardConfig::default().with_params(p)?;
                Ok(Arc::new(HardBot::new(config)))
            }
            _ => Ok(strategy),
        }
    }

    /// Per-request generator; sequential seeds when the server is seeded
    pub fn next_rng(&self) -> ChaCha8Rng {
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(n)),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    pub fn requests_served(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_unknown_default() {
        let config = ServerConfig {
            default_strategy: "oracle".to_string(),
            ..ServerConfig::default()
        };
        assert!(ServerState::new(&config).is_err());
    }

    #[test]
    fn test_strategy_lookup() {
        let state = ServerState::new(&ServerConfig::default()).unwrap();
        assert_eq!(state.strategy(None, None).unwrap().id(), "hard");
        assert_eq!(state.strategy(Some("greedy"), None).unwrap().id(), "greedy");
        let tuned = state
            .strategy(Some("hard"), Some(&json!({"bot_id": "hard", "top_k": 2})))
            .unwrap();
        assert_eq!(tuned.id(), "hard");
        assert!(state.strategy(Some("nope"), None).is_err());
    }

    #[test]
    fn test_seeded_rngs_are_sequential() {
        use rand::Rng;
        let config = ServerConfig {
            seed: Some(5),
            ..ServerConfig::default()
        };
        let a = ServerState::new(&config).unwrap();
        let b = ServerState::new(&config).unwrap();
        assert_eq!(a.next_rng().gen::<u64>(), b.next_rng().gen::<u64>());
        assert_eq!(a.requests_served(), 1);
    }
}
