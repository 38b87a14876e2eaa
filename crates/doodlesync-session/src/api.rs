//! The request/response game API.
//!
//! The server owns every authoritative decision (turn order, scoring,
//! timing, word choice). Clients reach it through the [`GameApi`] trait;
//! [`HttpGameApi`] is the production implementation, tests supply their
//! own.

use std::time::Duration;

use doodlesync_protocol::GameSnapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Reply to a create-game request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedGame {
    pub game_id: String,
    #[serde(default)]
    pub message: String,
}

/// Reply to a join request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinedGame {
    pub player_id: String,
    #[serde(default)]
    pub message: String,
}

/// Reply to a guess.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuessOutcome {
    pub correct: bool,
    #[serde(default)]
    pub message: String,
}

/// The operations a client needs from the game server.
///
/// Every call is fallible. Non-success replies surface as
/// [`ApiError::Status`] carrying the server's human-readable message.
pub trait GameApi: Send + Sync + 'static {
    /// Creates a game and returns its id.
    async fn create_game(&self) -> Result<CreatedGame, ApiError>;

    /// Adds a participant named `name` and returns their id.
    async fn join_game(&self, game_id: &str, name: &str) -> Result<JoinedGame, ApiError>;

    /// Fetches the authoritative game view.
    async fn fetch_snapshot(&self, game_id: &str) -> Result<GameSnapshot, ApiError>;

    /// Leaves the lobby and starts the first round.
    async fn start_game(&self, game_id: &str) -> Result<(), ApiError>;

    /// Submits a guess for the current round.
    async fn submit_guess(
        &self,
        game_id: &str,
        player_id: &str,
        guess: &str,
    ) -> Result<GuessOutcome, ApiError>;

    /// Resets scores and rounds, back to the lobby.
    async fn reset_game(&self, game_id: &str) -> Result<(), ApiError>;

    /// A word from the server's word list.
    async fn random_word(&self) -> Result<String, ApiError>;
}

// ---------------------------------------------------------------------------
// HttpGameApi
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JoinBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct GuessBody<'a> {
    player_id: &'a str,
    guess: &'a str,
}

#[derive(Deserialize)]
struct RandomWord {
    word: String,
}

/// Error body the server sends with non-success statuses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// [`GameApi`] over HTTP+JSON.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    /// Creates a client for the server at `base_url` (e.g.
    /// `http://localhost:8000`).
    ///
    /// # Errors
    /// Returns `ApiError::InvalidBaseUrl` for a non-HTTP URL, or
    /// `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, action: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        read_json(response, action).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        action: &str,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        read_json(response, action).await
    }

    /// POST with an empty JSON object, discarding the reply body.
    async fn post_empty(&self, path: &str, action: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url(path))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        check_status(response, action).await.map(drop)
    }
}

impl GameApi for HttpGameApi {
    async fn create_game(&self) -> Result<CreatedGame, ApiError> {
        self.post("/api/games", &serde_json::json!({}), "create game")
            .await
    }

    async fn join_game(&self, game_id: &str, name: &str) -> Result<JoinedGame, ApiError> {
        let path = format!("/api/games/{game_id}/join");
        self.post(&path, &JoinBody { name }, "join game").await
    }

    async fn fetch_snapshot(&self, game_id: &str) -> Result<GameSnapshot, ApiError> {
        self.get(&format!("/api/games/{game_id}"), "get game state")
            .await
    }

    async fn start_game(&self, game_id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("/api/games/{game_id}/start"), "start game")
            .await
    }

    async fn submit_guess(
        &self,
        game_id: &str,
        player_id: &str,
        guess: &str,
    ) -> Result<GuessOutcome, ApiError> {
        let path = format!("/api/games/{game_id}/guess");
        self.post(&path, &GuessBody { player_id, guess }, "make guess")
            .await
    }

    async fn reset_game(&self, game_id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("/api/games/{game_id}/reset"), "reset game")
            .await
    }

    async fn random_word(&self) -> Result<String, ApiError> {
        let reply: RandomWord = self.get("/api/words/random", "get random word").await?;
        Ok(reply.word)
    }
}

/// Turns a non-success status into `ApiError::Status`, preferring the
/// server's `detail` message over the bare status text.
async fn check_status(
    response: reqwest::Response,
    action: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let reason = serde_json::from_slice::<ErrorBody>(&body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message: format!("Failed to {action}: {reason}"),
    })
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> Result<T, ApiError> {
    let response = check_status(response, action).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
