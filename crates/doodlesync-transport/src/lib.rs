//! Persistent-connection client for doodlesync.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! how a byte-level connection to the game server is opened, and the
//! [`TransportClient`] built on top of them: one connection per game
//! session, linear-backoff reconnects, and typed publish/subscribe keyed
//! by [`MessageKind`](doodlesync_protocol::MessageKind).
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket connector via `tokio-tungstenite`

mod client;
mod config;
mod dispatch;
mod endpoint;
mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use client::{ConnectionState, TransportClient};
pub use config::{Backoff, ReconnectPolicy, TransportConfig};
pub use dispatch::{EventBus, Handler, HandlerId};
pub use endpoint::Endpoint;
pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;
use std::future::Future;

/// Opaque identifier for one opened connection.
///
/// Every successful open (initial or reconnect) gets a fresh id, so log
/// lines from consecutive connections of the same client can be told
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outbound connections.
///
/// The returned futures are `Send` so a generic driver task owning the
/// connector can be handed to `tokio::spawn`.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Performs the open handshake against `url`.
    fn connect(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single open connection that can send and receive bytes.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the server.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next frame from the server.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed. Must be
    /// cancel-safe: the client races it against commands and timers.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;
}
