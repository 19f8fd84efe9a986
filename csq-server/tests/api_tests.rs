//! Integration tests for csq-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use csq_core::wire::MoveRequest;
use csq_core::{Game, GameSetup, Move, PlayerConfig};
use csq_server::{create_router, ServerConfig, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let config = ServerConfig {
        seed: Some(7),
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(&config).unwrap());
    create_router(state)
}

fn started_game(size: i8) -> Game {
    let mut game = Game::new();
    game.start(&GameSetup::new(
        size,
        vec![PlayerConfig::human("a"), PlayerConfig::human("b")],
    ))
    .unwrap();
    game
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_move(app: axum::Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/move")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_bot_params_endpoint() {
    let (status, json) = get_json(test_app(), "/bot-params").await;
    assert_eq!(status, StatusCode::OK);

    let params = json["params"].as_array().unwrap();
    assert_eq!(params[0]["name"], "bot_id");
    assert_eq!(params[0]["default_value"], "hard");
    let budget = params
        .iter()
        .find(|p| p["name"] == "time_budget_ms")
        .unwrap();
    assert_eq!(budget["param_type"], "int");
    assert_eq!(budget["default_value"], 700);
    assert!(budget["min"].is_number());
}

#[tokio::test]
async fn test_move_endpoint_returns_legal_move() {
    let game = started_game(4);
    let ctx = game.bot_context();

    for bot in ["random", "greedy", "hard"] {
        let req = MoveRequest::from_context(&ctx, Some(json!({"bot_id": bot, "time_budget_ms": 100})));
        let (status, json) = post_move(test_app(), serde_json::to_string(&req).unwrap()).await;
        assert_eq!(status, StatusCode::OK, "{bot}");

        let mv: Move = serde_json::from_value::<csq_core::MoveResponse>(json).unwrap().into();
        assert!(ctx.board.is_valid_move(mv, 0), "{bot} answered {mv:?}");
    }
}

#[tokio::test]
async fn test_move_endpoint_null_without_moves() {
    let game = started_game(3);
    let mut req = MoveRequest::from_context(&game.bot_context(), Some(json!({"bot_id": "greedy"})));
    req.marked_points[0].points.clear();

    let (status, json) = post_move(test_app(), serde_json::to_string(&req).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.is_null());
}

#[tokio::test]
async fn test_move_endpoint_rejects_bad_input() {
    let (status, json) = post_move(test_app(), "{\"board_size\": 3}".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let game = started_game(3);
    let mut req = MoveRequest::from_context(&game.bot_context(), None);
    req.board_size = 42;
    let (status, json) = post_move(test_app(), serde_json::to_string(&req).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("board size"));

    let req = MoveRequest::from_context(&game.bot_context(), Some(json!({"bot_id": "oracle"})));
    let (status, _) = post_move(test_app(), serde_json::to_string(&req).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
