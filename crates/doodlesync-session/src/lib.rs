//! Game session layer for doodlesync.
//!
//! Ties the lower layers together for one participant in one game:
//!
//! 1. **Game API**: the request/response collaborator that owns the
//!    authoritative game state ([`GameApi`], [`HttpGameApi`])
//! 2. **Policy**: what each inbound message does locally ([`react`],
//!    [`SessionController`])
//! 3. **Session**: the per-game object that owns the transport handle
//!    and the drawing surface ([`GameSession`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (this crate)  ← refreshes snapshots, resets the canvas per round
//!     ↕                 ↕
//! Canvas Layer      Transport Layer  ← strokes in, messages out
//!     ↕                 ↕
//! Protocol Layer (below)  ← Message, Stroke, GameSnapshot
//! ```

#![allow(async_fn_in_trait)]

mod api;
mod config;
mod controller;
mod error;
mod session;

pub use api::{CreatedGame, GameApi, GuessOutcome, HttpGameApi, JoinedGame};
pub use config::{API_URL_ENV, SessionConfig, WS_URL_ENV};
pub use controller::{Reaction, SessionController, react};
pub use error::{ApiError, SessionError};
pub use session::GameSession;
