//! Wire protocol for doodlesync.
//!
//! This crate defines the "language" spoken over a game's persistent
//! connection and by the request/response game API:
//!
//! - **Messages** ([`Message`], [`MessageKind`]): the closed set of
//!   real-time notifications, discriminated by a `type` field.
//! - **Types** ([`Point`], [`Stroke`], [`GameSnapshot`], etc.): the data
//!   carried inside those messages and returned by the game API.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages are
//!   converted to/from bytes.
//! - **Outbox** ([`Outbox`]): the seam through which the drawing surface
//!   emits messages without knowing about sockets.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding/validation.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Canvas / Session (game view)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod message;
mod outbox;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{Message, MessageKind};
pub use outbox::Outbox;
pub use types::{GamePhase, GameSnapshot, Player, Point, Stroke};
