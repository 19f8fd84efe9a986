//! Move selection endpoint

use super::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use csq_core::wire::{MoveRequest, MoveResponse};
use std::sync::Arc;

/// Choose a line for `current_player_id`, or `null` when there is none
pub async fn choose_move(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<Option<MoveResponse>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let strategy = state.strategy(req.bot_id(), req.bot_params.as_ref())?;
    let ctx = req.into_context()?;
    let moves = ctx.board.valid_moves(ctx.current_player);
    let mut rng = state.next_rng();

    tracing::debug!(
        strategy = strategy.id(),
        player = ctx.current_player,
        moves = moves.len(),
        "move requested"
    );

    // CPU-bound; runs on the blocking pool
    let decision = tokio::task::spawn_blocking(move || {
        strategy.select_move(&moves, &ctx, &mut rng)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(decision.map(MoveResponse::from)))
}
