//! The per-game session: joining, inbound message handling, local drawing
//! and the game actions that go through the API.
//!
//! A session is built by [`GameSession::create`] or [`GameSession::join`]
//! and torn down by [`GameSession::leave`]. Joining is all-or-nothing: if
//! any step fails after the connection opened, the connection is closed
//! again before the error is returned.

use doodlesync_canvas::{DrawingSurface, RawPointer};
use doodlesync_protocol::{GameSnapshot, Message, MessageKind, Stroke};
use doodlesync_transport::{ConnectionState, Endpoint, HandlerId, TransportClient};
use tokio::sync::mpsc;

use crate::api::{GameApi, GuessOutcome};
use crate::controller::{Reaction, SessionController, react};
use crate::{SessionConfig, SessionError};

/// One participant's connection to one game.
///
/// Owns the transport handle, the drawing surface and the controller
/// state. Inbound messages are forwarded from the transport's handlers
/// into a private inbox and applied on the caller's task by
/// [`process`](Self::process), so the surface is never shared across
/// tasks.
///
/// ```rust,no_run
/// use doodlesync_session::{GameSession, HttpGameApi, SessionConfig};
/// use doodlesync_transport::TransportClient;
///
/// # async fn example() -> Result<(), doodlesync_session::SessionError> {
/// let config = SessionConfig::from_env().validated()?;
/// let api = HttpGameApi::new(&config.api_base_url)?;
/// let transport = TransportClient::websocket(config.transport.clone());
///
/// let mut session = GameSession::create(api, transport, &config, "Alice").await?;
/// println!("share this id: {}", session.game_id());
///
/// while session.run_once().await.is_some() {}
/// # Ok(())
/// # }
/// ```
pub struct GameSession<A: GameApi> {
    api: A,
    transport: TransportClient,
    inbox: mpsc::UnboundedReceiver<Message>,
    subscriptions: Vec<(MessageKind, HandlerId)>,
    controller: SessionController,
    surface: DrawingSurface,
    game_id: String,
}

impl<A: GameApi> GameSession<A> {
    /// Creates a new game and joins it as `name`.
    ///
    /// # Errors
    /// Any API or connect failure along the way.
    pub async fn create(
        api: A,
        transport: TransportClient,
        config: &SessionConfig,
        name: &str,
    ) -> Result<Self, SessionError> {
        let created = api.create_game().await?;
        tracing::info!(game_id = %created.game_id, "game created");
        Self::join(api, transport, config, &created.game_id, name).await
    }

    /// Joins an existing game as `name`, opens the persistent connection
    /// and fetches the first snapshot.
    ///
    /// # Errors
    /// Any API or connect failure along the way. On failure the transport
    /// is left disconnected with no handlers registered.
    pub async fn join(
        api: A,
        transport: TransportClient,
        config: &SessionConfig,
        game_id: &str,
        name: &str,
    ) -> Result<Self, SessionError> {
        let config = config.clone().validated()?;
        let joined = api.join_game(game_id, name).await?;
        let player_id = joined.player_id;

        let (tx, inbox) = mpsc::unbounded_channel();
        let subscriptions = MessageKind::ALL
            .into_iter()
            .map(|kind| {
                let tx = tx.clone();
                let id = transport.on(kind, move |message| {
                    let _ = tx.send(message.clone());
                });
                (kind, id)
            })
            .collect();
        drop(tx);

        let endpoint = Endpoint::new(&config.ws_base_url, game_id, &player_id);
        if let Err(e) = transport.connect(endpoint).await {
            transport.disconnect().await;
            return Err(e.into());
        }

        let mut session = Self {
            api,
            transport,
            inbox,
            subscriptions,
            controller: SessionController::new(player_id),
            surface: DrawingSurface::default(),
            game_id: game_id.to_string(),
        };
        if let Err(e) = session.refresh().await {
            session.transport.disconnect().await;
            return Err(e);
        }

        tracing::info!(
            game_id = %session.game_id,
            player_id = %session.controller.player_id(),
            "joined game"
        );
        Ok(session)
    }

    // -- Inbound --

    /// Waits for the next message from the server.
    ///
    /// Returns `None` once the session has been left.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.inbox.recv().await
    }

    /// Applies one inbound message and returns what was done.
    pub async fn process(&mut self, message: Message) -> Reaction {
        let kind = message.kind();
        let reaction = react(message);
        match &reaction {
            Reaction::Refresh { reset_round } => {
                if *reset_round {
                    self.surface.reset();
                    self.controller.hide_word();
                }
                if let Err(e) = self.refresh().await {
                    tracing::warn!(
                        game_id = %self.game_id,
                        kind = %kind,
                        error = %e,
                        "snapshot refresh failed, keeping stale state"
                    );
                }
            }
            Reaction::PatchTimeLeft(time_left) => {
                self.controller.patch_time_left(*time_left);
            }
            Reaction::RemoteStroke(stroke) => {
                if let Err(e) = self.surface.apply_remote_stroke(stroke.clone()) {
                    tracing::warn!(game_id = %self.game_id, error = %e, "dropping remote stroke");
                }
            }
            Reaction::RemoteClear => self.surface.apply_remote_clear(),
            Reaction::Ignore => {
                tracing::debug!(game_id = %self.game_id, kind = %kind, "ignored");
            }
        }
        reaction
    }

    /// Waits for and applies one message. `None` once the session is left.
    pub async fn run_once(&mut self) -> Option<Reaction> {
        let message = self.next_message().await?;
        Some(self.process(message).await)
    }

    // -- Drawing --

    pub fn begin_stroke(&mut self, raw: RawPointer) {
        self.surface.begin_stroke(raw);
    }

    pub fn extend_stroke(&mut self, raw: RawPointer) {
        self.surface.extend_stroke(raw);
    }

    /// Pointer-up. Returns the stroke that was finalized, if any; it has
    /// already been sent to peers when this participant is the drawer.
    pub fn end_stroke(&mut self) -> Option<Stroke> {
        self.surface.end_stroke(&self.transport).cloned()
    }

    /// Wipes the canvas here and, for the drawer, on every peer.
    pub fn clear_canvas(&mut self) {
        self.surface.clear(&self.transport);
    }

    /// Picks the brush colour. Returns `false` for a blank colour, which
    /// is ignored.
    pub fn select_color(&mut self, color: impl Into<String>) -> bool {
        self.surface.select_color(color)
    }

    pub fn set_width(&mut self, width: f64) {
        self.surface.set_width(width);
    }

    pub fn thicker_brush(&mut self) -> f64 {
        self.surface.thicker()
    }

    pub fn thinner_brush(&mut self) -> f64 {
        self.surface.thinner()
    }

    pub fn toggle_erase(&mut self) -> bool {
        self.surface.toggle_erase()
    }

    // -- Game actions --

    /// Starts the game. The resulting `game_started` broadcast drives the
    /// refresh.
    pub async fn start_game(&self) -> Result<(), SessionError> {
        self.api.start_game(&self.game_id).await?;
        Ok(())
    }

    /// Submits a guess. Blank input is not sent and yields `Ok(None)`.
    pub async fn guess(&self, guess: &str) -> Result<Option<GuessOutcome>, SessionError> {
        if guess.trim().is_empty() {
            return Ok(None);
        }
        let outcome = self
            .api
            .submit_guess(&self.game_id, self.controller.player_id(), guess)
            .await?;
        if outcome.correct {
            tracing::info!(game_id = %self.game_id, "correct guess");
        }
        Ok(Some(outcome))
    }

    pub async fn reset_game(&self) -> Result<(), SessionError> {
        self.api.reset_game(&self.game_id).await?;
        Ok(())
    }

    /// Re-fetches the snapshot and re-derives the drawing role from it.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let snapshot = self.api.fetch_snapshot(&self.game_id).await?;
        self.controller.apply_snapshot(snapshot);
        self.surface.set_role(self.controller.role());
        Ok(())
    }

    pub fn toggle_word_revealed(&mut self) -> bool {
        self.controller.toggle_word_revealed()
    }

    /// Closes the connection and drops every subscription. Pending inbox
    /// messages can still be drained; after that `next_message` returns
    /// `None`.
    pub async fn leave(&mut self) {
        for (kind, id) in self.subscriptions.drain(..) {
            self.transport.off(kind, id);
        }
        self.transport.disconnect().await;
        tracing::info!(game_id = %self.game_id, "left game");
    }

    // -- Accessors --

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn player_id(&self) -> &str {
        self.controller.player_id()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.controller.snapshot()
    }

    pub fn visible_word(&self) -> Option<&str> {
        self.controller.visible_word()
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Direct access for geometry updates and the less common tool knobs.
    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
