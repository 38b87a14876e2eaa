//! # doodlesync
//!
//! Real-time sync layer for multiplayer drawing-and-guessing games.
//!
//! One participant draws; everyone else watches the strokes appear and
//! guesses. doodlesync keeps every participant's canvas identical and
//! follows the server's round lifecycle:
//!
//! - [`protocol`]: the wire messages and game snapshot types
//! - [`transport`]: a reconnecting WebSocket client with typed dispatch
//! - [`canvas`]: the drawing surface (strokes, erase, replay, raster)
//! - [`session`]: one participant in one game, tying it all together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doodlesync::prelude::*;
//!
//! # async fn example() -> Result<(), DoodleError> {
//! doodlesync::init_tracing();
//!
//! let config = SessionConfig::from_env().validated()?;
//! let api = HttpGameApi::new(&config.api_base_url)?;
//! let transport = TransportClient::websocket(config.transport.clone());
//! let mut session = GameSession::join(api, transport, &config, "abc123", "Bob").await?;
//!
//! while let Some(reaction) = session.run_once().await {
//!     tracing::debug!(?reaction, "applied");
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use doodlesync_canvas as canvas;
pub use doodlesync_protocol as protocol;
pub use doodlesync_session as session;
pub use doodlesync_transport as transport;
pub use error::DoodleError;

/// Installs a `tracing` subscriber that logs to stderr, filtered by
/// `RUST_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}

/// Everything a typical client needs.
pub mod prelude {
    pub use crate::DoodleError;
    pub use doodlesync_canvas::{
        DrawingSurface, Painter, RawPointer, RecordingPainter, Role, SurfaceGeometry,
        ToolSettings,
    };
    #[cfg(feature = "raster")]
    pub use doodlesync_canvas::PixmapPainter;
    pub use doodlesync_protocol::{
        GamePhase, GameSnapshot, Message, MessageKind, Outbox, Player, Point, Stroke,
    };
    pub use doodlesync_session::{
        GameApi, GameSession, HttpGameApi, Reaction, SessionConfig, SessionController,
    };
    pub use doodlesync_transport::{
        ConnectionState, Endpoint, ReconnectPolicy, TransportClient, TransportConfig,
    };
}
