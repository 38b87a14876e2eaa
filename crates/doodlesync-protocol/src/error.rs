//! Error types for the protocol layer.
//!
//! Each crate in doodlesync defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization or message
//! validation, not in networking or game state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, missing
    /// required fields, or wrong data types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates protocol rules, e.g. a `drawing`
    /// message whose stroke has no points.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
