//! The transport client: a cloneable handle to one driver task.
//!
//! All connection state lives inside a single Tokio task (the "driver").
//! Handles talk to it through an unbounded command channel; the driver
//! multiplexes those commands, inbound frames and the reconnect timer
//! with `tokio::select!`. Handlers therefore run one at a time, in the
//! order the server sent the messages, and nothing needs a lock.
//!
//! An open handshake is raced against the command channel as well, so a
//! `disconnect` or a newer `connect` issued while a handshake hangs
//! cancels it instead of queueing behind it.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use std::sync::atomic::{AtomicU64, Ordering};

use doodlesync_protocol::{Codec, JsonCodec, Message, MessageKind, Outbox};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};

use crate::{
    Backoff, Connection, ConnectionId, Connector, Endpoint, EventBus, Handler,
    HandlerId, TransportConfig, TransportError,
};

/// Lifecycle of the persistent connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// An open handshake is in flight (initial connect or reconnect).
    Connecting,
    /// Messages can be sent and are being received.
    Open,
    /// No connection. Either never connected, disconnected on purpose,
    /// waiting for a reconnect timer, or given up.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Commands sent from handles to the driver task.
enum Command {
    Connect {
        endpoint: Endpoint,
        reply: oneshot::Sender<Result<(), TransportError>>,
    },
    Send(Message),
    On {
        kind: MessageKind,
        id: HandlerId,
        handler: Handler,
    },
    Off {
        kind: MessageKind,
        id: HandlerId,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a running transport driver.
///
/// Cheap to clone; every clone controls the same connection. When the
/// last handle is dropped the driver closes the connection and exits.
#[derive(Clone)]
pub struct TransportClient {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    next_handler: Arc<AtomicU64>,
}

impl TransportClient {
    /// Spawns a driver over `connector` and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<C: Connector>(connector: C, config: TransportConfig) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(ConnectionState::Closed);

        let driver = Driver {
            connector: Arc::new(connector),
            connect_timeout: config.connect_timeout,
            codec: JsonCodec,
            commands: receiver,
            deferred: None,
            state: state_tx,
            bus: EventBus::new(),
            endpoint: None,
            conn: None,
            backoff: Backoff::new(config.reconnect),
            reconnect_at: None,
            opened: 0,
        };
        tokio::spawn(driver.run());

        Self {
            commands,
            state,
            next_handler: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Spawns a driver that connects over WebSocket.
    #[cfg(feature = "websocket")]
    pub fn websocket(config: TransportConfig) -> Self {
        Self::new(crate::WebSocketConnector, config)
    }

    /// Opens the connection to `endpoint`, replacing any current one.
    ///
    /// Resolves once the connection is `Open`. A failed or timed-out
    /// handshake is returned here and does not start the reconnect loop.
    /// A `disconnect` or another `connect` issued before the handshake
    /// finishes resolves this call with [`TransportError::Cancelled`].
    pub async fn connect(&self, endpoint: Endpoint) -> Result<(), TransportError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Connect { endpoint, reply })
            .map_err(|_| TransportError::Closed)?;
        rx.await.map_err(|_| TransportError::Closed)?
    }

    /// Writes `message` if the connection is open; otherwise drops it
    /// with a warning. No queue, no retry.
    pub fn send(&self, message: Message) {
        if self.commands.send(Command::Send(message)).is_err() {
            tracing::warn!("transport driver gone, message not sent");
        }
    }

    /// Registers `handler` for every inbound message of `kind`.
    pub fn on<F>(&self, kind: MessageKind, handler: F) -> HandlerId
    where
        F: FnMut(&Message) + Send + 'static,
    {
        let id = HandlerId::new(self.next_handler.fetch_add(1, Ordering::Relaxed));
        let _ = self.commands.send(Command::On {
            kind,
            id,
            handler: Box::new(handler),
        });
        id
    }

    /// Unregisters the handler returned by [`on`](Self::on).
    pub fn off(&self, kind: MessageKind, id: HandlerId) {
        let _ = self.commands.send(Command::Off { kind, id });
    }

    /// Closes the connection, cancels any pending reconnect, clears every
    /// handler and forgets the endpoint.
    pub async fn disconnect(&self) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Disconnect { reply }).is_ok() {
            let _ = rx.await;
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// A receiver that observes every state change. Useful to surface
    /// staleness once the client has given up reconnecting.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

impl Outbox for TransportClient {
    fn is_open(&self) -> bool {
        TransportClient::is_open(self)
    }

    fn send(&self, message: Message) {
        TransportClient::send(self, message);
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

struct Driver<C: Connector> {
    connector: Arc<C>,
    /// Upper bound on one open handshake.
    connect_timeout: Duration,
    codec: JsonCodec,
    commands: mpsc::UnboundedReceiver<Command>,
    /// A `Connect` or `Disconnect` that interrupted a handshake, run
    /// before anything else on the next loop turn.
    deferred: Option<Command>,
    state: watch::Sender<ConnectionState>,
    bus: EventBus,
    /// Where to reconnect to. `None` after `disconnect`.
    endpoint: Option<Endpoint>,
    conn: Option<(ConnectionId, C::Connection)>,
    backoff: Backoff,
    /// Deadline of the pending reconnect, if one is scheduled.
    reconnect_at: Option<Instant>,
    /// Connections opened so far, used to mint ids.
    opened: u64,
}

impl<C: Connector> Driver<C> {
    async fn run(mut self) {
        tracing::debug!("transport driver started");

        loop {
            if let Some(cmd) = self.deferred.take() {
                self.handle_command(cmd).await;
                continue;
            }

            tokio::select! {
                biased;

                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                frame = next_frame(self.conn.as_ref().map(|(_, c)| c)) => {
                    self.handle_frame(frame).await;
                }
                () = reconnect_timer(self.reconnect_at) => {
                    self.reconnect().await;
                }
            }
        }

        self.close_connection().await;
        tracing::debug!("transport driver stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Connect { endpoint, reply } => {
                self.reconnect_at = None;
                self.close_connection().await;
                self.backoff.reset();

                let result = self.open(&endpoint).await;
                if result.is_ok() {
                    self.endpoint = Some(endpoint);
                } else {
                    self.endpoint = None;
                    self.set_state(ConnectionState::Closed);
                }
                let _ = reply.send(result);
            }
            Command::Send(message) => self.send(&message).await,
            Command::On { kind, id, handler } => self.bus.on(kind, id, handler),
            Command::Off { kind, id } => {
                self.bus.off(kind, id);
            }
            Command::Disconnect { reply } => {
                self.reconnect_at = None;
                self.close_connection().await;
                self.bus.clear();
                self.endpoint = None;
                self.backoff.reset();
                self.set_state(ConnectionState::Closed);
                tracing::info!("disconnected");
                let _ = reply.send(());
            }
        }
    }

    async fn handle_frame(&mut self, frame: Result<Option<Vec<u8>>, TransportError>) {
        match frame {
            Ok(Some(bytes)) => match self.codec.decode_message(&bytes) {
                Ok(message) => {
                    let kind = message.kind();
                    let handled = self.bus.dispatch(&message);
                    tracing::trace!(%kind, handled, "dispatched message");
                    if kind == MessageKind::Ping {
                        self.send(&Message::Pong).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "dropping malformed message");
                }
            },
            Ok(None) => {
                tracing::info!("connection closed by server");
                self.connection_lost();
            }
            Err(e) => {
                tracing::warn!(error = %e, "connection failed");
                self.connection_lost();
            }
        }
    }

    async fn send(&mut self, message: &Message) {
        let open = self.is_open();
        let Some((id, conn)) = self.conn.as_ref().filter(|_| open) else {
            tracing::warn!(kind = %message.kind(), "connection not open, message not sent");
            return;
        };
        if let Err(e) = Self::write(&self.codec, conn, message).await {
            tracing::warn!(conn = %id, kind = %message.kind(), error = %e, "message not sent");
        }
    }

    /// Checks and encodes `message`, then hands it to `conn`.
    async fn write(
        codec: &JsonCodec,
        conn: &C::Connection,
        message: &Message,
    ) -> Result<(), TransportError> {
        message.validate()?;
        let bytes = codec.encode(message)?;
        conn.send(&bytes).await
    }

    /// Performs one open handshake and installs the connection.
    ///
    /// While the handshake is in flight, `Send`, `On` and `Off` are served
    /// as usual. A `Connect` or `Disconnect` abandons the handshake, is
    /// parked in `deferred` and the call returns `Cancelled`.
    async fn open(&mut self, endpoint: &Endpoint) -> Result<(), TransportError> {
        self.set_state(ConnectionState::Connecting);
        let url = endpoint.url();
        let connector = Arc::clone(&self.connector);
        let limit = self.connect_timeout;
        let handshake = async move {
            match time::timeout(limit, connector.connect(&url)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::ConnectFailed(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("handshake timed out after {}ms", limit.as_millis()),
                ))),
            }
        };
        tokio::pin!(handshake);

        let conn = loop {
            tokio::select! {
                biased;

                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send(message)) => self.send(&message).await,
                    Some(Command::On { kind, id, handler }) => self.bus.on(kind, id, handler),
                    Some(Command::Off { kind, id }) => {
                        self.bus.off(kind, id);
                    }
                    Some(cmd) => {
                        tracing::debug!("handshake abandoned");
                        self.deferred = Some(cmd);
                        return Err(TransportError::Cancelled);
                    }
                    None => return Err(TransportError::Cancelled),
                },
                result = &mut handshake => break result?,
            }
        };

        self.opened += 1;
        let id = ConnectionId::new(self.opened);
        tracing::info!(
            conn = %id,
            game_id = %endpoint.game_id(),
            player_id = %endpoint.player_id(),
            "connected"
        );
        self.conn = Some((id, conn));
        self.set_state(ConnectionState::Open);
        Ok(())
    }

    fn connection_lost(&mut self) {
        self.conn = None;
        self.set_state(ConnectionState::Closed);
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        if self.endpoint.is_none() {
            return;
        }
        match self.backoff.next_delay() {
            Some((attempt, delay)) => {
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "scheduling reconnect"
                );
                self.reconnect_at = Some(Instant::now() + delay);
            }
            None => {
                tracing::warn!(
                    attempts = self.backoff.attempts(),
                    "giving up on reconnecting"
                );
            }
        }
    }

    async fn reconnect(&mut self) {
        self.reconnect_at = None;
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        match self.open(&endpoint).await {
            Ok(()) => self.backoff.reset(),
            // The command that interrupted the attempt decides what happens next.
            Err(TransportError::Cancelled) => {}
            Err(e) => {
                tracing::warn!(attempt = self.backoff.attempts(), error = %e, "reconnect failed");
                self.set_state(ConnectionState::Closed);
                self.schedule_reconnect();
            }
        }
    }

    async fn close_connection(&mut self) {
        if let Some((id, conn)) = self.conn.take() {
            if let Err(e) = conn.close().await {
                tracing::debug!(conn = %id, error = %e, "close failed");
            }
        }
    }

    fn is_open(&self) -> bool {
        *self.state.borrow() == ConnectionState::Open
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }
}

/// Next inbound frame, or pending forever when there is no connection.
async fn next_frame<T: Connection>(
    conn: Option<&T>,
) -> Result<Option<Vec<u8>>, TransportError> {
    match conn {
        Some(conn) => conn.recv().await,
        None => std::future::pending().await,
    }
}

/// Fires at `at`, or never when no reconnect is scheduled.
async fn reconnect_timer(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
