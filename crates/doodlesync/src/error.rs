//! Unified error type for doodlesync.

use doodlesync_canvas::CanvasError;
use doodlesync_protocol::ProtocolError;
use doodlesync_session::{ApiError, SessionError};
use doodlesync_transport::TransportError;

/// Top-level error that wraps every crate-specific error, so `?` works
/// across layers.
#[derive(Debug, thiserror::Error)]
pub enum DoodleError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// The game API rejected or failed a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
