//! Move-selection strategies and the driver that runs them
//!
//! Strategies only ever see a `BotContext` snapshot; the live game is mutated
//! exclusively through `Game::resolve_decision`.

use crate::board::{Board, Move, PlayerId};
use crate::chain::{chain_yield, DEFAULT_CHAIN_DEPTH};
use crate::error::{CoreError, StrategyError};
use crate::eval::{refine_score, score_move, Heuristics};
use crate::game::{Game, Player, Resolution};
use crate::search::{Minimax, SearchLimits};
use crate::setup::PlayerKind;
use crate::wire::ParamDescriptor;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// CONTEXT
// ============================================================================

/// Immutable snapshot handed to a strategy
#[derive(Clone, Debug)]
pub struct BotContext {
    pub board: Board,
    pub players: Vec<Player>,
    pub current_player: PlayerId,
}

impl BotContext {
    /// Non-eliminated seats in turn order
    pub fn active_seats(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.eliminated)
            .map(|p| p.id)
            .collect()
    }

    /// Active seats other than the one deciding
    pub fn opponents(&self) -> Vec<PlayerId> {
        self.active_seats()
            .into_iter()
            .filter(|&p| p != self.current_player)
            .collect()
    }

    /// Legal moves left in the game, summed over active seats
    pub fn remaining_moves(&self) -> usize {
        self.active_seats()
            .into_iter()
            .map(|p| self.board.valid_moves(p).len())
            .sum()
    }
}

// ============================================================================
// STRATEGY INTERFACE
// ============================================================================

/// A way of choosing a move
///
/// `Ok(None)` means "no move" and passes the turn; `Err` means the strategy
/// could not decide and leaves the turn with the caller.
pub trait Strategy: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn select_move(
        &self,
        moves: &[Move],
        ctx: &BotContext,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError>;
}

/// Uniformly random legal move
pub struct RandomBot;

impl Strategy for RandomBot {
    fn id(&self) -> &str {
        "random"
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn description(&self) -> &str {
        "Picks a random valid move"
    }

    fn select_move(
        &self,
        moves: &[Move],
        _ctx: &BotContext,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError> {
        Ok(moves.choose(rng).copied())
    }
}

/// First capturing move in generation order, else random
pub struct GreedyBot;

impl Strategy for GreedyBot {
    fn id(&self) -> &str {
        "greedy"
    }

    fn name(&self) -> &str {
        "Greedy"
    }

    fn description(&self) -> &str {
        "Prioritizes moves that capture squares"
    }

    fn select_move(
        &self,
        moves: &[Move],
        ctx: &BotContext,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError> {
        let capture = moves
            .iter()
            .find(|&&m| !ctx.board.captures_for(m).is_empty());
        Ok(capture.or_else(|| moves.choose(rng)).copied())
    }
}

// ============================================================================
// HARD BOT
// ============================================================================

/// Knobs for `HardBot`
#[derive(Clone, Debug)]
pub struct HardConfig {
    /// Wall-clock budget per decision
    pub time_budget_ms: u64,
    /// Remaining legal moves below which minimax replaces the heuristic
    pub exhaustive_threshold: usize,
    /// Node budget per root move
    pub max_nodes: u64,
    /// Minimax ply limit
    pub max_depth: u32,
    /// Follow-up levels in chain simulation
    pub chain_depth: u32,
    /// Heuristic candidates re-scored by simulation
    pub top_k: usize,
    pub heuristics: Heuristics,
}

impl Default for HardConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 700,
            exhaustive_threshold: 14,
            max_nodes: 200_000,
            max_depth: 24,
            chain_depth: DEFAULT_CHAIN_DEPTH,
            top_k: 6,
            heuristics: Heuristics::default(),
        }
    }
}

/// Partial overrides accepted from opaque strategy parameters
#[derive(Debug, Default, Deserialize)]
struct HardOverrides {
    time_budget_ms: Option<u64>,
    exhaustive_threshold: Option<usize>,
    max_nodes: Option<u64>,
    max_depth: Option<u32>,
    chain_depth: Option<u32>,
    top_k: Option<usize>,
}

impl HardConfig {
    pub fn with_time_budget(mut self, ms: u64) -> Self {
        self.time_budget_ms = ms;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Apply overrides from a JSON object; unknown keys are ignored
    pub fn with_params(mut self, params: &serde_json::Value) -> Result<Self, CoreError> {
        let o: HardOverrides = serde_json::from_value(params.clone())
            .map_err(|e| CoreError::InvalidParams(e.to_string()))?;
        if let Some(v) = o.time_budget_ms {
            self.time_budget_ms = v;
        }
        if let Some(v) = o.exhaustive_threshold {
            self.exhaustive_threshold = v;
        }
        if let Some(v) = o.max_nodes {
            self.max_nodes = v;
        }
        if let Some(v) = o.max_depth {
            self.max_depth = v;
        }
        if let Some(v) = o.chain_depth {
            self.chain_depth = v;
        }
        if let Some(v) = o.top_k {
            self.top_k = v.max(1);
        }
        Ok(self)
    }

    /// Tunables as advertised over the wire
    pub fn param_descriptors() -> Vec<ParamDescriptor> {
        let d = HardConfig::default();
        vec![
            ParamDescriptor::int(
                "time_budget_ms",
                "Time budget (ms)",
                d.time_budget_ms,
                50,
                10_000,
                "Wall-clock budget for one decision",
            ),
            ParamDescriptor::int(
                "exhaustive_threshold",
                "Endgame threshold",
                d.exhaustive_threshold as u64,
                0,
                64,
                "Remaining legal moves below which minimax search is used",
            ),
            ParamDescriptor::int(
                "max_nodes",
                "Node budget",
                d.max_nodes,
                100,
                10_000_000,
                "Search nodes per candidate move",
            ),
            ParamDescriptor::int(
                "max_depth",
                "Search depth",
                d.max_depth as u64,
                1,
                64,
                "Turn changes searched before scoring",
            ),
            ParamDescriptor::int(
                "chain_depth",
                "Chain depth",
                d.chain_depth as u64,
                0,
                16,
                "Follow-up captures simulated per candidate",
            ),
            ParamDescriptor::int(
                "top_k",
                "Candidates",
                d.top_k as u64,
                1,
                32,
                "Heuristic candidates re-scored by simulation",
            ),
        ]
    }
}

/// Heuristic play with chain lookahead, minimax once few moves remain
pub struct HardBot {
    pub config: HardConfig,
}

impl HardBot {
    pub fn new(config: HardConfig) -> Self {
        Self { config }
    }

    fn endgame_choice(&self, moves: &[Move], ctx: &BotContext, deadline: Instant) -> Option<Move> {
        let seats = ctx.active_seats();
        let limits = SearchLimits {
            max_depth: self.config.max_depth,
            max_nodes: self.config.max_nodes,
            deadline: Some(deadline),
        };
        Minimax::new(ctx.current_player, &seats, limits)
            .best_move(&ctx.board, moves)
            .map(|(mv, _)| mv)
    }

    fn heuristic_choice(
        &self,
        moves: &[Move],
        ctx: &BotContext,
        rng: &mut ChaCha8Rng,
    ) -> Option<Move> {
        let board = &ctx.board;
        let player = ctx.current_player;
        let opponents = ctx.opponents();
        let h = &self.config.heuristics;

        let capturing: Vec<(Move, usize)> = moves
            .iter()
            .filter(|&&m| !board.captures_for(m).is_empty())
            .map(|&m| (m, chain_yield(board, m, player, self.config.chain_depth)))
            .collect();
        if !capturing.is_empty() {
            return pick_best(&capturing, rng);
        }

        let mut scored: Vec<(Move, f32)> = moves
            .iter()
            .map(|&m| (m, score_move(board, m, player, &opponents, h)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        truncate_keeping_ties(&mut scored, self.config.top_k.max(1));

        let refined: Vec<(Move, f32)> = scored
            .into_iter()
            .map(|(m, s)| (m, s + refine_score(board, m, player, &opponents, h)))
            .collect();
        pick_best(&refined, rng)
    }
}

impl Default for HardBot {
    fn default() -> Self {
        Self::new(HardConfig::default())
    }
}

impl Strategy for HardBot {
    fn id(&self) -> &str {
        "hard"
    }

    fn name(&self) -> &str {
        "Hard"
    }

    fn description(&self) -> &str {
        "Heuristic play with chain lookahead and endgame minimax"
    }

    fn select_move(
        &self,
        moves: &[Move],
        ctx: &BotContext,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError> {
        match moves {
            [] => return Ok(None),
            [only] => return Ok(Some(*only)),
            _ => {}
        }

        let deadline = Instant::now() + Duration::from_millis(self.config.time_budget_ms);
        let remaining = ctx.remaining_moves();

        let choice = if remaining < self.config.exhaustive_threshold {
            self.endgame_choice(moves, ctx, deadline)
        } else {
            self.heuristic_choice(moves, ctx, rng)
        };
        Ok(choice)
    }
}

/// Keep the first `k` of a descending list plus everything tied with the k-th
fn truncate_keeping_ties(scored: &mut Vec<(Move, f32)>, k: usize) {
    let Some(&(_, cutoff)) = scored.get(k.saturating_sub(1)) else {
        return;
    };
    let keep = k + scored[k..].iter().take_while(|&&(_, s)| s == cutoff).count();
    scored.truncate(keep);
}

/// Uniform choice among the entries with the maximal score
fn pick_best<S: PartialOrd + Copy>(scored: &[(Move, S)], rng: &mut ChaCha8Rng) -> Option<Move> {
    let best = scored
        .iter()
        .map(|&(_, s)| s)
        .fold(None, |acc: Option<S>, s| match acc {
            Some(a) if a >= s => Some(a),
            _ => Some(s),
        })?;
    let tied: Vec<Move> = scored
        .iter()
        .filter(|&&(_, s)| s == best)
        .map(|&(m, _)| m)
        .collect();
    tied.choose(rng).copied()
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Builds a strategy for a `PlayerKind::Remote` seat from its url and params
pub type RemoteFactory =
    Box<dyn Fn(&str, Option<&serde_json::Value>) -> Arc<dyn Strategy> + Send + Sync>;

/// Strategy id -> implementation, filled explicitly at startup
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
    remote: Option<RemoteFactory>,
}

impl StrategyRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Random, Greedy and Hard
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RandomBot));
        registry.register(Arc::new(GreedyBot));
        registry.register(Arc::new(HardBot::default()));
        registry
    }

    /// Add or replace by id
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.retain(|s| s.id() != strategy.id());
        self.strategies.push(strategy);
    }

    pub fn set_remote_factory(&mut self, factory: RemoteFactory) {
        self.remote = Some(factory);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.id() == id).cloned()
    }

    pub fn available(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.strategies.iter()
    }

    /// Strategy that decides for a seat of the given kind
    pub fn resolve(&self, kind: &PlayerKind) -> Result<Arc<dyn Strategy>, CoreError> {
        match kind {
            PlayerKind::Human => Err(CoreError::UnknownStrategy("human".to_string())),
            PlayerKind::Bot { strategy } => self
                .get(strategy)
                .ok_or_else(|| CoreError::UnknownStrategy(strategy.clone())),
            PlayerKind::Remote { url, params } => match &self.remote {
                Some(factory) => Ok(factory(url, params.as_ref())),
                None => Err(CoreError::UnknownStrategy(format!("remote:{url}"))),
            },
        }
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Strategy used when a seat's own strategy fails or answers illegally
const FALLBACK_STRATEGY: &str = "random";

/// Let strategies play every non-human turn until the game finishes, a human
/// is to move, or `max_decisions` have been made. Returns decisions made.
pub fn play_out(
    game: &mut Game,
    registry: &StrategyRegistry,
    rng: &mut ChaCha8Rng,
    max_decisions: usize,
) -> Result<usize, CoreError> {
    let mut decisions = 0;

    while decisions < max_decisions {
        let Some(ticket) = game.begin_decision() else {
            break;
        };
        decisions += 1;

        let strategy = match registry.resolve(&ticket.kind) {
            Ok(s) => s,
            Err(e) => {
                game.resolve_decision(ticket, Err(StrategyError::Delegation(e.to_string().into())));
                return Err(e);
            }
        };

        let moves = ticket.context.board.valid_moves(ticket.player);
        let decision = strategy.select_move(&moves, &ticket.context, rng);

        match game.resolve_decision(ticket, decision) {
            Resolution::Rejected(_) | Resolution::Failed => {
                let Some(fallback) = registry.get(FALLBACK_STRATEGY) else {
                    break;
                };
                let Some(retry) = game.begin_decision() else {
                    break;
                };
                tracing::warn!(
                    player = retry.player,
                    strategy = strategy.id(),
                    "falling back to {}",
                    FALLBACK_STRATEGY
                );
                let moves = retry.context.board.valid_moves(retry.player);
                let decision = fallback.select_move(&moves, &retry.context, rng);
                game.resolve_decision(retry, decision);
            }
            _ => {}
        }
    }

    Ok(decisions)
}
