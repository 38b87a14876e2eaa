//! The real-time message set exchanged over a game's persistent connection.
//!
//! The protocol is deliberately asymmetric:
//!
//! - `drawing` and `clear_canvas` are **peer-authored**: the client that is
//!   currently the drawer sends them, the server relays them to everyone
//!   else in the game.
//! - Everything else is a **lifecycle notification** authored by the
//!   server (round started, time ticking, somebody guessed...).
//! - `ping` / `pong` is a liveness exchange: the server pings, the client
//!   answers immediately. The client never initiates pings.
//!
//! Lifecycle payloads are treated as triggers. Consumers re-fetch the
//! canonical [`GameSnapshot`](crate::GameSnapshot) instead of trusting the
//! embedded fields; the only exception is `time_update`, whose `time_left`
//! is patched in place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Player, ProtocolError, Stroke};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Every message that can travel over the persistent connection.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces the flat,
/// internally tagged JSON the game server speaks:
///   `{ "type": "time_update", "time_left": 42 }`
///
/// Optional informational fields default to `None` when the server omits
/// them and are skipped on serialization. Unknown extra fields are ignored,
/// so the server can grow payloads without breaking clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    // -- Peer-authored drawing data --

    /// A completed stroke, sent as one atomic unit at pointer-up.
    Drawing { stroke: Stroke },

    /// The drawer wiped the canvas.
    ClearCanvas,

    // -- Server-authored lifecycle notifications --

    /// The game left the lobby and the first round began.
    GameStarted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_player_index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_left: Option<u32>,
    },

    /// Somebody joined the game.
    PlayerJoined {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Player>,
    },

    /// Somebody guessed the word; the round is over.
    CorrectGuess {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Player>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        word: Option<String>,
    },

    /// A wrong guess, broadcast for display purposes.
    GuessMade {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Player>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        guess: Option<String>,
    },

    /// Round clock tick. The one lifecycle payload clients trust.
    TimeUpdate { time_left: u32 },

    /// The round clock ran out.
    TimeUp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        word: Option<String>,
    },

    /// The next drawer's round began.
    NextRound {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round_number: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_player_index: Option<usize>,
    },

    /// Scores and rounds were reset; the game is back in the lobby.
    GameReset,

    // -- Liveness --

    /// Server → client liveness check.
    Ping,

    /// Client → server answer to [`Message::Ping`].
    Pong,
}

impl Message {
    /// Returns the fieldless discriminant of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Drawing { .. } => MessageKind::Drawing,
            Self::ClearCanvas => MessageKind::ClearCanvas,
            Self::GameStarted { .. } => MessageKind::GameStarted,
            Self::PlayerJoined { .. } => MessageKind::PlayerJoined,
            Self::CorrectGuess { .. } => MessageKind::CorrectGuess,
            Self::GuessMade { .. } => MessageKind::GuessMade,
            Self::TimeUpdate { .. } => MessageKind::TimeUpdate,
            Self::TimeUp { .. } => MessageKind::TimeUp,
            Self::NextRound { .. } => MessageKind::NextRound,
            Self::GameReset => MessageKind::GameReset,
            Self::Ping => MessageKind::Ping,
            Self::Pong => MessageKind::Pong,
        }
    }

    /// Checks payload invariants that serde alone cannot express.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if a `drawing` message
    /// carries an invalid stroke.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Self::Drawing { stroke } => stroke.validate(),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// The discriminant of a [`Message`], used as the subscription key.
///
/// Keying subscriptions by this enum (rather than by a free-form string)
/// means a typo is a compile error and adding a kind forces every
/// exhaustive `match` to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Drawing,
    ClearCanvas,
    GameStarted,
    PlayerJoined,
    CorrectGuess,
    GuessMade,
    TimeUpdate,
    TimeUp,
    NextRound,
    GameReset,
    Ping,
    Pong,
}

impl MessageKind {
    /// Every kind, in declaration order.
    pub const ALL: [MessageKind; 12] = [
        Self::Drawing,
        Self::ClearCanvas,
        Self::GameStarted,
        Self::PlayerJoined,
        Self::CorrectGuess,
        Self::GuessMade,
        Self::TimeUpdate,
        Self::TimeUp,
        Self::NextRound,
        Self::GameReset,
        Self::Ping,
        Self::Pong,
    ];

    /// The literal `type` tag used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::ClearCanvas => "clear_canvas",
            Self::GameStarted => "game_started",
            Self::PlayerJoined => "player_joined",
            Self::CorrectGuess => "correct_guess",
            Self::GuessMade => "guess_made",
            Self::TimeUpdate => "time_update",
            Self::TimeUp => "time_up",
            Self::NextRound => "next_round",
            Self::GameReset => "game_reset",
            Self::Ping => "ping",
            Self::Pong => "pong",
        }
    }

    /// Returns `true` for kinds a client may author itself (only while it
    /// is the drawer). The server does not enforce this; senders check it
    /// locally.
    pub fn is_peer_authored(self) -> bool {
        matches!(self, Self::Drawing | Self::ClearCanvas)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================================
// Tests
// =========================================================================
