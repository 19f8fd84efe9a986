//! Strategy parameter listing

use crate::state::ServerState;
use axum::{extract::State, Json};
use csq_core::wire::{BotParamsResponse, ParamDescriptor};
use csq_core::HardConfig;
use std::sync::Arc;

/// `bot_id` first, then the hard bot's tunables
pub async fn bot_params_handler(State(state): State<Arc<ServerState>>) -> Json<BotParamsResponse> {
    let ids: Vec<&str> = state.registry.available().map(|s| s.id()).collect();
    let mut params = vec![ParamDescriptor::choice(
        "bot_id",
        "Strategy",
        &state.default_strategy,
        &format!("One of: {}", ids.join(", ")),
    )];
    params.extend(HardConfig::param_descriptors());
    Json(BotParamsResponse { params })
}
