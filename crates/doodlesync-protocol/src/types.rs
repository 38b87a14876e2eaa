//! Core data types for doodlesync's wire format.
//!
//! Two families live here:
//!
//! - **Drawing data** ([`Point`], [`Stroke`]): what the drawer's client
//!   sends to its peers inside a `drawing` message.
//! - **Snapshot data** ([`GameSnapshot`], [`Player`], [`GamePhase`]):
//!   the authoritative game view returned by the request/response API.
//!   The server owns this state; clients only ever replace it wholesale
//!   (except for the `time_left` patch applied on `time_update`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D coordinate in canvas pixel space (the backing grid, not the
/// displayed/viewport size).
///
/// Serialized as `{ "x": 10.0, "y": 20.0 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// Stroke
// ---------------------------------------------------------------------------

/// One continuous pointer-down-to-pointer-up gesture.
///
/// Points are kept in capture order; replaying them in order reproduces
/// the gesture exactly. A stroke is immutable once finalized. `color` is
/// a CSS colour string (the palette uses `#RRGGBB`), `width` is the line
/// width in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
}

impl Stroke {
    /// Checks the invariants every stroke must satisfy before it may enter
    /// a drawing surface: at least one point, a non-empty colour, and a
    /// finite positive width.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` describing the violation.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.points.is_empty() {
            return Err(ProtocolError::InvalidMessage(
                "stroke has no points".into(),
            ));
        }
        if self.color.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage(
                "stroke has no color".into(),
            ));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ProtocolError::InvalidMessage(format!(
                "stroke width must be positive, got {}",
                self.width
            )));
        }
        if self
            .points
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(ProtocolError::InvalidMessage(
                "stroke contains a non-finite point".into(),
            ));
        }
        Ok(())
    }

    /// Returns `true` if any point of this stroke lies within `radius`
    /// (inclusive) of `center`.
    pub fn touches(&self, center: Point, radius: f64) -> bool {
        self.points
            .iter()
            .any(|p| p.distance_to(center) <= radius)
    }
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Coarse phase of a game session as reported by the server.
///
/// Lowercase on the wire: `"waiting"`, `"playing"`, `"ended"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Lobby: players are joining, nobody draws yet.
    #[default]
    Waiting,
    /// A round is running; the drawer may draw.
    Playing,
    /// The round is over and the word is revealed.
    Ended,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// A participant as listed in a [`GameSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Server-assigned unique id.
    pub id: String,
    /// Display name (the server de-duplicates names within a game).
    pub name: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default = "connected_by_default")]
    pub is_connected: bool,
}

fn connected_by_default() -> bool {
    true
}

/// The authoritative game view fetched from the request/response API.
///
/// Consumed, never owned: clients replace it wholesale after each refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: String,
    /// Serialized as `state` to match the server's field name.
    pub state: GamePhase,
    /// Ordered list; ids are unique.
    pub players: Vec<Player>,
    /// Index into `players` of the participant currently drawing.
    pub current_player_index: usize,
    /// Seconds left in the current round.
    pub time_left: u32,
    pub round_number: u32,
    /// The round's word; the server only reveals it once a round has ended.
    #[serde(default)]
    pub word: Option<String>,
}

impl GameSnapshot {
    /// The participant currently authorized to draw, if the index is valid.
    pub fn drawer(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Returns `true` if `player_id` is the active drawer.
    pub fn is_drawer(&self, player_id: &str) -> bool {
        self.drawer().is_some_and(|p| p.id == player_id)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64)]) -> Stroke {
        Stroke {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            color: "#FF0000".into(),
            width: 3.0,
        }
    }

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            game_id: "abc123".into(),
            state: GamePhase::Playing,
            players: vec![
                Player {
                    id: "p1".into(),
                    name: "Alice".into(),
                    score: 0,
                    is_connected: true,
                },
                Player {
                    id: "p2".into(),
                    name: "Bob".into(),
                    score: 10,
                    is_connected: true,
                },
            ],
            current_player_index: 1,
            time_left: 60,
            round_number: 1,
            word: None,
        }
    }

    // =====================================================================
    // Point / Stroke
    // =====================================================================

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stroke_json_shape() {
        let json = serde_json::to_value(stroke(&[(10.0, 10.0)])).unwrap();
        assert_eq!(json["points"][0]["x"], 10.0);
        assert_eq!(json["points"][0]["y"], 10.0);
        assert_eq!(json["color"], "#FF0000");
        assert_eq!(json["width"], 3.0);
    }

    #[test]
    fn test_stroke_validate_accepts_single_point() {
        assert!(stroke(&[(1.0, 1.0)]).validate().is_ok());
    }

    #[test]
    fn test_stroke_validate_rejects_empty_points() {
        assert!(stroke(&[]).validate().is_err());
    }

    #[test]
    fn test_stroke_validate_rejects_bad_width() {
        let mut s = stroke(&[(1.0, 1.0)]);
        s.width = 0.0;
        assert!(s.validate().is_err());
        s.width = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_stroke_validate_rejects_blank_color() {
        let mut s = stroke(&[(1.0, 1.0)]);
        s.color = "  ".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_stroke_touches_is_inclusive() {
        let s = stroke(&[(0.0, 0.0), (100.0, 0.0)]);
        assert!(s.touches(Point::new(0.0, 20.0), 20.0));
        assert!(!s.touches(Point::new(50.0, 20.5), 20.0));
    }

    // =====================================================================
    // Snapshot
    // =====================================================================

    #[test]
    fn test_game_phase_is_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&GamePhase::Playing).unwrap(),
            "\"playing\""
        );
        let phase: GamePhase = serde_json::from_str("\"ended\"").unwrap();
        assert_eq!(phase, GamePhase::Ended);
    }

    #[test]
    fn test_snapshot_parses_server_payload() {
        // Shape returned by GET /api/games/{id}.
        let json = r#"{
            "game_id": "abc123",
            "state": "waiting",
            "players": [{"id": "p1", "name": "Alice", "score": 0, "is_connected": true}],
            "current_player_index": 0,
            "time_left": 60,
            "round_number": 0,
            "word": null
        }"#;
        let snap: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.state, GamePhase::Waiting);
        assert_eq!(snap.players.len(), 1);
        assert_eq!(snap.word, None);
    }

    #[test]
    fn test_player_defaults_when_fields_missing() {
        let p: Player =
            serde_json::from_str(r#"{"id": "p9", "name": "Zed"}"#).unwrap();
        assert_eq!(p.score, 0);
        assert!(p.is_connected);
    }

    #[test]
    fn test_snapshot_drawer_lookup() {
        let snap = snapshot();
        assert_eq!(snap.drawer().map(|p| p.id.as_str()), Some("p2"));
        assert!(snap.is_drawer("p2"));
        assert!(!snap.is_drawer("p1"));
    }

    #[test]
    fn test_snapshot_drawer_out_of_range() {
        let mut snap = snapshot();
        snap.current_player_index = 7;
        assert!(snap.drawer().is_none());
        assert!(!snap.is_drawer("p1"));
    }
}
