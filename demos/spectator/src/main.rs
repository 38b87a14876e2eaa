//! Headless participant: joins a game, logs what happens and keeps a PNG
//! of the shared canvas up to date.
//!
//! ```text
//! spectator [GAME_ID] [NAME] [--png PATH] [--api-url URL] [--ws-url URL]
//! ```
//!
//! Without a game id a new game is created. Server URLs may also come from
//! `DOODLESYNC_API_URL` / `DOODLESYNC_WS_URL`.

use std::path::PathBuf;

use clap::Parser;
use doodlesync::prelude::*;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "spectator", about = "Watch a doodlesync game and keep a PNG of its canvas")]
struct Args {
    /// Game to join. A new game is created when omitted.
    game_id: Option<String>,

    /// Display name in the game.
    #[arg(default_value = "Spectator")]
    name: String,

    /// Where to write the rendered canvas.
    #[arg(long, default_value = "canvas.png")]
    png: PathBuf,

    #[arg(long, env = "DOODLESYNC_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[arg(long, env = "DOODLESYNC_WS_URL", default_value = "ws://localhost:8000")]
    ws_url: String,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig, DoodleError> {
        let config = SessionConfig {
            api_base_url: self.api_url.clone(),
            ws_base_url: self.ws_url.clone(),
            ..SessionConfig::default()
        };
        Ok(config.validated()?)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(surface: &DrawingSurface) -> Result<Vec<u8>, DoodleError> {
    let mut painter = PixmapPainter::for_geometry(&surface.geometry())?;
    surface.redraw(&mut painter);
    Ok(painter.encode_png()?)
}

fn log_snapshot(session: &GameSession<HttpGameApi>) {
    let Some(snapshot) = session.snapshot() else {
        return;
    };
    let drawer = session
        .controller()
        .drawer()
        .map(|p| p.name.as_str())
        .unwrap_or("-");
    tracing::info!(
        state = %snapshot.state,
        round = snapshot.round_number,
        players = snapshot.players.len(),
        drawer,
        word = session.visible_word().unwrap_or("?"),
        "game"
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    doodlesync::init_tracing();
    let args = Args::parse();

    let config = args.session_config()?;
    let api = HttpGameApi::new(&config.api_base_url)?;
    let transport = TransportClient::websocket(config.transport.clone());
    let mut state_changes = transport.watch_state();

    let mut session = match &args.game_id {
        Some(game_id) => GameSession::join(api, transport, &config, game_id, &args.name).await?,
        None => GameSession::create(api, transport, &config, &args.name).await?,
    };
    eprintln!("joined game {} as {}", session.game_id(), session.player_id());
    log_snapshot(&session);

    let mut rendered = None;
    loop {
        tokio::select! {
            reaction = session.run_once() => {
                let Some(reaction) = reaction else { break };
                match reaction {
                    Reaction::Refresh { .. } => log_snapshot(&session),
                    Reaction::PatchTimeLeft(t) if t % 10 == 0 => {
                        tracing::info!(time_left = t, "tick");
                    }
                    _ => {}
                }
                let revision = session.surface().revision();
                if rendered != Some(revision) {
                    tokio::fs::write(&args.png, render(session.surface())?).await?;
                    rendered = Some(revision);
                    tracing::debug!(path = %args.png.display(), revision, "canvas written");
                }
            }
            changed = state_changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_changes.borrow_and_update();
                tracing::info!(%state, "connection");
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.leave().await;
    Ok(())
}
