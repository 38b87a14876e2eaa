//! Addressing of a game session's persistent connection.

use std::fmt;

/// The logical address of one participant's connection to one game.
///
/// Resolves to `{base_url}/ws/{game_id}/{player_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    game_id: String,
    player_id: String,
}

impl Endpoint {
    /// Creates an endpoint. A trailing `/` on `base_url` is ignored.
    pub fn new(
        base_url: impl Into<String>,
        game_id: impl Into<String>,
        player_id: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            game_id: game_id.into(),
            player_id: player_id.into(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// The full connection URL.
    pub fn url(&self) -> String {
        format!("{}/ws/{}/{}", self.base_url, self.game_id, self.player_id)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
