//! Per-message policy and the client's view of the game.
//!
//! [`react`] maps each inbound [`Message`] to a [`Reaction`]; it is pure so
//! the policy table can be tested without a network. [`SessionController`]
//! holds the state those reactions mutate: the latest [`GameSnapshot`] and
//! the local "word revealed" toggle.

use doodlesync_canvas::Role;
use doodlesync_protocol::{GamePhase, GameSnapshot, Message, Player, Stroke};

/// What the session must do in response to an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Re-fetch the authoritative snapshot and replace it wholesale.
    ///
    /// With `reset_round`, the local surface is wiped and the word is
    /// hidden first, since a new round (or lobby) starts from a blank canvas.
    Refresh { reset_round: bool },
    /// Patch `time_left` in place without a round trip.
    PatchTimeLeft(u32),
    /// Apply a stroke the drawer finished.
    RemoteStroke(Stroke),
    /// The drawer wiped the canvas.
    RemoteClear,
    /// Nothing to change locally.
    Ignore,
}

/// The policy table.
///
/// Exhaustive on purpose: a new message kind does not compile until it has
/// a row here.
pub fn react(message: Message) -> Reaction {
    match message {
        Message::GameStarted { .. } | Message::NextRound { .. } | Message::GameReset => {
            Reaction::Refresh { reset_round: true }
        }
        Message::PlayerJoined { .. } | Message::CorrectGuess { .. } | Message::TimeUp { .. } => {
            Reaction::Refresh { reset_round: false }
        }
        Message::TimeUpdate { time_left } => Reaction::PatchTimeLeft(time_left),
        Message::Drawing { stroke } => Reaction::RemoteStroke(stroke),
        Message::ClearCanvas => Reaction::RemoteClear,
        // Informational only.
        Message::GuessMade { .. } => Reaction::Ignore,
        // The transport answers pings itself.
        Message::Ping | Message::Pong => Reaction::Ignore,
    }
}

/// The local participant's view of one game.
#[derive(Debug, Clone)]
pub struct SessionController {
    player_id: String,
    snapshot: Option<GameSnapshot>,
    word_revealed: bool,
}

impl SessionController {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            snapshot: None,
            word_revealed: false,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// The last snapshot fetched, if any.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Replaces the snapshot wholesale.
    pub fn apply_snapshot(&mut self, snapshot: GameSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Patches the round clock. Returns `false` if there is no snapshot yet.
    pub fn patch_time_left(&mut self, time_left: u32) -> bool {
        match self.snapshot.as_mut() {
            Some(snapshot) => {
                snapshot.time_left = time_left;
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.snapshot.as_ref().map(|s| s.state).unwrap_or_default()
    }

    pub fn is_drawer(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| s.is_drawer(&self.player_id))
    }

    /// The drawing permissions implied by the current snapshot.
    pub fn role(&self) -> Role {
        Role::new(self.is_drawer(), self.phase())
    }

    /// This participant's entry in the player list.
    pub fn me(&self) -> Option<&Player> {
        self.snapshot
            .as_ref()?
            .players
            .iter()
            .find(|p| p.id == self.player_id)
    }

    pub fn drawer(&self) -> Option<&Player> {
        self.snapshot.as_ref()?.drawer()
    }

    pub fn word_revealed(&self) -> bool {
        self.word_revealed
    }

    /// Flips the local "show word" toggle and returns the new value.
    pub fn toggle_word_revealed(&mut self) -> bool {
        self.word_revealed = !self.word_revealed;
        self.word_revealed
    }

    pub fn hide_word(&mut self) {
        self.word_revealed = false;
    }

    /// The word this participant may see right now.
    ///
    /// Always shown once a round has ended; during play only to the drawer
    /// or after the local toggle; never in the lobby.
    pub fn visible_word(&self) -> Option<&str> {
        let snapshot = self.snapshot.as_ref()?;
        let word = snapshot.word.as_deref()?;
        match snapshot.state {
            GamePhase::Ended => Some(word),
            GamePhase::Playing if self.word_revealed || self.is_drawer() => Some(word),
            _ => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
