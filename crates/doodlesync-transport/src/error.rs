use doodlesync_protocol::ProtocolError;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The open handshake failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The client's driver task is gone (every handle was dropped or the
    /// runtime is shutting down).
    #[error("transport client closed")]
    Closed,

    /// A `connect` was superseded by a `disconnect` or a newer `connect`
    /// before its handshake finished.
    #[error("connect cancelled")]
    Cancelled,

    /// An outbound message failed validation or could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
