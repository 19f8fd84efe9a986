//! Integration tests for the game engine
//!
//! Drives complete games through the public API: humans via `execute_move`,
//! bots via the strategy registry and `play_out`.

use csq_core::{
    play_out, BotContext, Game, GameEvent, GamePhase, GameSetup, HardBot,
    HardConfig, Move, PlayerConfig, Point, Square, Strategy, StrategyError, StrategyRegistry,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn mv(r1: i8, c1: i8, r2: i8, c2: i8) -> Move {
    Move::new(Point::new(r1, c1), Point::new(r2, c2))
}

/// Never offers a move
struct PassBot;

impl Strategy for PassBot {
    fn id(&self) -> &str {
        "pass"
    }

    fn name(&self) -> &str {
        "Pass"
    }

    fn description(&self) -> &str {
        "Always passes"
    }

    fn select_move(
        &self,
        _moves: &[Move],
        _ctx: &BotContext,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Option<Move>, StrategyError> {
        Ok(None)
    }
}

/// Defaults plus a fast hard bot and the passing bot
fn registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::with_defaults();
    registry.register(Arc::new(HardBot::new(
        HardConfig::default().with_time_budget(50).with_max_nodes(5_000),
    )));
    registry.register(Arc::new(PassBot));
    registry
}

fn start(size: i8, players: Vec<PlayerConfig>) -> Game {
    let mut game = Game::new();
    game.start(&GameSetup::new(size, players)).unwrap();
    game
}

fn assert_consistent(game: &Game) {
    let total: usize = game.players().iter().map(|p| p.score).sum();
    assert_eq!(total, game.board().captured_count());
    for (square, _) in game.board().captured() {
        assert!(game.phase() == GamePhase::Finished || game.board().is_square_filled(square));
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_single_cell_game() {
    let mut game = start(
        1,
        vec![PlayerConfig::human("A"), PlayerConfig::bot("B", "pass")],
    );
    let registry = registry();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let edges = [mv(0, 0, 0, 1), mv(0, 1, 1, 1), mv(1, 1, 1, 0), mv(1, 0, 0, 0)];
    for (i, &edge) in edges.iter().enumerate() {
        assert_eq!(game.current_index(), 0);
        assert!(game.execute_move(edge));
        if i < 3 {
            assert_eq!(game.board().captured_count(), 0);
            assert_eq!(play_out(&mut game, &registry, &mut rng, 1).unwrap(), 1);
        }
    }

    assert_eq!(game.phase(), GamePhase::Finished);
    assert_eq!(game.last_captures().len(), 1);
    assert_eq!(game.scores(), vec![(0, 1), (1, 0)]);
    assert_eq!(game.winner().map(|p| p.id), Some(0));
    // Eliminations are settled before the full-board finish
    assert!(game.players().iter().all(|p| p.eliminated));
}

#[test]
fn test_last_survivor_takes_the_rest() {
    let mut game = start(3, vec![PlayerConfig::human("A"), PlayerConfig::human("B")]);

    // Wall in B's corner using A's lines
    game.toggle_edit_mode();
    assert!(game.edit_toggle_edge(Point::new(3, 3), Point::new(2, 3), 0));
    assert!(game.edit_toggle_edge(Point::new(3, 3), Point::new(3, 2), 0));
    assert!(game.edit_toggle_edge(Point::new(3, 3), Point::new(2, 2), 0));
    game.toggle_edit_mode();
    assert!(game.board().valid_moves(1).is_empty());
    assert_eq!(game.board().captured_count(), 0);

    assert!(game.execute_move(mv(0, 0, 0, 1)));

    assert_eq!(game.phase(), GamePhase::Finished);
    assert!(game.players()[1].eliminated);
    assert_eq!(game.scores(), vec![(0, 9), (1, 0)]);
    assert_eq!(game.winner().map(|p| p.id), Some(0));

    let events = game.take_events();
    assert!(events.contains(&GameEvent::PlayerEliminated { player: 1 }));
    assert!(events.contains(&GameEvent::SurvivorSweep { player: 0, squares: 9 }));
}

#[test]
fn test_survivor_sweep_leaves_owned_squares_alone() {
    let mut game = start(3, vec![PlayerConfig::human("A"), PlayerConfig::human("B")]);
    let edit = |game: &mut Game, edges: &[(i8, i8, i8, i8)], player| {
        for &(r1, c1, r2, c2) in edges {
            assert!(game.edit_toggle_edge(Point::new(r1, c1), Point::new(r2, c2), player));
        }
    };

    game.toggle_edit_mode();
    // A fills squares (2,0), (1,0) and (1,1) and walls around the bottom-right pair
    edit(
        &mut game,
        &[
            (2, 0, 2, 1),
            (3, 0, 3, 1),
            (2, 0, 3, 0),
            (2, 1, 3, 1),
            (1, 0, 1, 1),
            (1, 0, 2, 0),
            (1, 1, 2, 1),
            (1, 1, 1, 2),
            (1, 2, 2, 2),
            (2, 1, 2, 2),
            (2, 2, 2, 3),
            (2, 3, 3, 3),
            (2, 2, 3, 2),
        ],
        0,
    );
    // B closes (2,2) and (2,1), which leaves B's bottom-row points with no line to draw
    edit(&mut game, &[(3, 2, 3, 3), (3, 1, 3, 2)], 1);
    game.toggle_edit_mode();

    assert_eq!(game.scores(), vec![(0, 3), (1, 2)]);
    assert!(game.board().valid_moves(1).is_empty());
    let b_squares = [Square::new(2, 1), Square::new(2, 2)];
    for &sq in &b_squares {
        assert_eq!(game.board().captured_owner(sq), Some(1));
    }

    assert!(game.board().captures_for(mv(0, 0, 0, 1)).is_empty());
    assert!(game.execute_move(mv(0, 0, 0, 1)));

    assert_eq!(game.phase(), GamePhase::Finished);
    assert!(game.players()[1].eliminated);
    assert_eq!(game.scores(), vec![(0, 7), (1, 2)]);
    for &sq in &b_squares {
        assert_eq!(game.board().captured_owner(sq), Some(1));
    }
    for sq in [Square::new(0, 0), Square::new(0, 1), Square::new(0, 2), Square::new(1, 2)] {
        assert_eq!(game.board().captured_owner(sq), Some(0));
    }
    assert_eq!(game.winner().map(|p| p.id), Some(0));
    assert!(game
        .take_events()
        .contains(&GameEvent::SurvivorSweep { player: 0, squares: 4 }));
}

#[test]
fn test_illegal_moves_change_nothing() {
    let mut game = start(4, vec![PlayerConfig::human("A"), PlayerConfig::human("B")]);
    let before = game.bot_context();

    // Not from a marked point, not adjacent, off the board, wrong player's corner
    for bad in [mv(1, 1, 1, 2), mv(0, 0, 2, 0), mv(0, 0, -1, 0), mv(4, 4, 3, 4)] {
        assert!(!game.execute_move(bad));
    }
    assert_eq!(game.current_index(), 0);
    assert_eq!(game.board().edge_count(), 0);
    assert_eq!(game.valid_moves_for_current(), before.board.valid_moves(0));
}

#[test]
fn test_bot_games_keep_scores_consistent() {
    let registry = registry();
    let lineups: [(i8, &[&str]); 4] = [
        (2, &["random", "random"]),
        (3, &["greedy", "hard"]),
        (4, &["hard", "random", "greedy"]),
        (5, &["random", "greedy", "random", "hard"]),
    ];

    for (seed, (size, strategies)) in lineups.iter().enumerate() {
        let players = strategies
            .iter()
            .enumerate()
            .map(|(i, s)| PlayerConfig::bot(&format!("bot{i}"), s))
            .collect();
        let mut game = start(*size, players);
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);

        let mut guard = 0;
        while game.phase() == GamePhase::Playing {
            play_out(&mut game, &registry, &mut rng, 1).unwrap();
            assert_consistent(&game);
            guard += 1;
            assert!(guard < 2_000, "game on size {size} did not finish");
        }

        for player in game.players().iter().filter(|p| p.eliminated) {
            assert!(game.board().valid_moves(player.id).is_empty());
        }
    }
}

#[test]
fn test_seeded_games_replay_identically() {
    let registry = registry();
    let setup = || {
        vec![
            PlayerConfig::bot("a", "greedy"),
            PlayerConfig::bot("b", "random"),
            PlayerConfig::bot("c", "greedy"),
        ]
    };

    let mut first = start(4, setup());
    let mut second = start(4, setup());
    play_out(&mut first, &registry, &mut ChaCha8Rng::seed_from_u64(11), 10_000).unwrap();
    play_out(&mut second, &registry, &mut ChaCha8Rng::seed_from_u64(11), 10_000).unwrap();

    assert_eq!(first.history(), second.history());
    assert_eq!(first.scores(), second.scores());
}

#[test]
fn test_unknown_strategy_surfaces_error() {
    let mut game = start(3, vec![PlayerConfig::bot("a", "missing"), PlayerConfig::human("b")]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(play_out(&mut game, &registry(), &mut rng, 10).is_err());
    // The failed decision released its slot
    assert!(game.begin_decision().is_some());
}
