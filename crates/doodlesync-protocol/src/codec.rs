//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The transport doesn't care HOW messages are serialized; it just needs
//! something that implements [`Codec`]. The game server speaks JSON, so
//! [`JsonCodec`] is the only implementation today.

use serde::{Serialize, de::DeserializeOwned};

use crate::{Message, ProtocolError};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the transport's
/// long-running driver task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes an inbound [`Message`] and checks its payload invariants.
    ///
    /// A `drawing` message that parses but carries an empty or otherwise
    /// invalid stroke is rejected here, so handlers never observe it.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` or `ProtocolError::InvalidMessage`.
    fn decode_message(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        let message: Message = self.decode(data)?;
        message.validate()?;
        Ok(message)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use doodlesync_protocol::{Codec, JsonCodec, Message};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&Message::TimeUpdate { time_left: 42 }).unwrap();
/// assert_eq!(bytes, br#"{"type":"time_update","time_left":42}"#);
///
/// let decoded = codec.decode_message(&bytes).unwrap();
/// assert_eq!(decoded, Message::TimeUpdate { time_left: 42 });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
