//! `HttpGameApi` against a stand-in game server built with axum.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use doodlesync_protocol::GamePhase;
use doodlesync_session::{ApiError, GameApi, HttpGameApi};
use serde_json::{Value, json};

/// One request as the server saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    body: Option<Value>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn record(log: &Log, method: Method, uri: &Uri, body: Option<Value>) {
    log.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        body,
    });
}

async fn create_game(State(log): State<Log>, method: Method, uri: Uri) -> Json<Value> {
    record(&log, method, &uri, None);
    Json(json!({ "game_id": "ab12cd34", "message": "Game created successfully" }))
}

async fn join_game(
    State(log): State<Log>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    record(&log, method, &uri, Some(body));
    if id != "ab12cd34" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Game not found" }))).into_response();
    }
    Json(json!({ "player_id": "p-1", "message": "Joined game as Bob" })).into_response()
}

async fn game_state(
    State(log): State<Log>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
) -> Response {
    record(&log, method, &uri, None);
    if id == "garbled" {
        return "not json".into_response();
    }
    Json(json!({
        "game_id": id,
        "state": "playing",
        "players": [{ "id": "p-1", "name": "Bob", "score": 10, "is_connected": true }],
        "current_player_index": 0,
        "time_left": 31,
        "round_number": 2,
        "word": null
    }))
    .into_response()
}

async fn start_game() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "Need at least 2 players to start" })),
    )
        .into_response()
}

async fn submit_guess(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> Json<Value> {
    let correct = body["guess"] == "cat";
    record(&log, method, &uri, Some(body));
    let message = if correct { "Correct!" } else { "Wrong guess" };
    Json(json!({ "correct": correct, "message": message }))
}

async fn reset_game() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response()
}

async fn random_word(State(log): State<Log>, method: Method, uri: Uri) -> Json<Value> {
    record(&log, method, &uri, None);
    Json(json!({ "word": "bicycle" }))
}

/// Starts the server on a free local port and returns its base URL and
/// the request log.
async fn serve() -> (String, Log) {
    let log = Log::default();
    let app = Router::new()
        .route("/api/games", post(create_game))
        .route("/api/games/{id}", get(game_state))
        .route("/api/games/{id}/join", post(join_game))
        .route("/api/games/{id}/start", post(start_game))
        .route("/api/games/{id}/guess", post(submit_guess))
        .route("/api/games/{id}/reset", post(reset_game))
        .route("/api/words/random", get(random_word))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), log)
}

fn last(log: &Log) -> Seen {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_create_and_join_hit_the_game_routes() {
    let (url, log) = serve().await;
    let api = HttpGameApi::new(format!("{url}/")).unwrap();
    assert_eq!(api.base_url(), url);

    let created = api.create_game().await.unwrap();
    assert_eq!(created.game_id, "ab12cd34");
    let request = last(&log);
    assert_eq!((request.method, request.path.as_str()), (Method::POST, "/api/games"));

    let joined = api.join_game("ab12cd34", "Bob").await.unwrap();
    assert_eq!(joined.player_id, "p-1");
    let request = last(&log);
    assert_eq!(request.path, "/api/games/ab12cd34/join");
    assert_eq!(request.body, Some(json!({ "name": "Bob" })));
}

#[tokio::test]
async fn test_join_unknown_game_reports_detail() {
    let (url, _log) = serve().await;
    let api = HttpGameApi::new(url).unwrap();

    match api.join_game("nope", "Bob").await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Failed to join game: Game not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_snapshot_and_guess() {
    let (url, log) = serve().await;
    let api = HttpGameApi::new(url).unwrap();

    let snapshot = api.fetch_snapshot("g1").await.unwrap();
    assert_eq!(snapshot.state, GamePhase::Playing);
    assert_eq!(snapshot.players[0].score, 10);
    assert_eq!(snapshot.word, None);
    let request = last(&log);
    assert_eq!((request.method, request.path.as_str()), (Method::GET, "/api/games/g1"));

    let outcome = api.submit_guess("g1", "p-1", "dog").await.unwrap();
    assert!(!outcome.correct);
    let request = last(&log);
    assert_eq!(request.path, "/api/games/g1/guess");
    assert_eq!(request.body, Some(json!({ "player_id": "p-1", "guess": "dog" })));

    assert!(api.submit_guess("g1", "p-1", "cat").await.unwrap().correct);
}

#[tokio::test]
async fn test_error_detail_becomes_status_message() {
    let (url, _log) = serve().await;
    let api = HttpGameApi::new(url).unwrap();

    match api.start_game("g1").await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Failed to start game: Need at least 2 players to start");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    match api.reset_game("g1").await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.starts_with("Failed to reset game"), "{message}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_random_word_and_malformed_body() {
    let (url, log) = serve().await;
    let api = HttpGameApi::new(url).unwrap();

    assert_eq!(api.random_word().await.unwrap(), "bicycle");
    assert_eq!(last(&log).path, "/api/words/random");

    assert!(matches!(api.fetch_snapshot("garbled").await, Err(ApiError::Decode(_))));
}

#[test]
fn test_rejects_non_http_base_url() {
    assert!(matches!(
        HttpGameApi::new("ws://localhost:8000"),
        Err(ApiError::InvalidBaseUrl(_))
    ));
}
