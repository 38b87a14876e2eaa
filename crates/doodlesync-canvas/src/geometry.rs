//! Mapping raw pointer positions onto the backing pixel grid.
//!
//! A surface is usually displayed at a different size than its backing
//! grid (the host scales it to fit). Strokes are always recorded in
//! backing coordinates so every client replays them identically,
//! whatever size their own surface is shown at.

use doodlesync_protocol::Point;

use crate::consts::{DEFAULT_BACKING_HEIGHT, DEFAULT_BACKING_WIDTH};

/// A pointer or touch position in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    pub client_x: f64,
    pub client_y: f64,
}

impl RawPointer {
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    /// Picks the position of a multi-touch event. The first touch wins;
    /// an empty touch list yields `None`.
    pub fn from_touches(touches: &[RawPointer]) -> Option<Self> {
        touches.first().copied()
    }
}

/// Where the surface sits on screen and how big its backing grid is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub backing_width: u32,
    pub backing_height: u32,
    /// Client-space offset of the displayed surface's top-left corner.
    pub display_left: f64,
    pub display_top: f64,
    /// Displayed size in client units.
    pub display_width: f64,
    pub display_height: f64,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_BACKING_WIDTH, DEFAULT_BACKING_HEIGHT)
    }
}

impl SurfaceGeometry {
    /// A surface displayed at exactly its backing size, at the origin.
    pub fn new(backing_width: u32, backing_height: u32) -> Self {
        Self {
            backing_width,
            backing_height,
            display_left: 0.0,
            display_top: 0.0,
            display_width: f64::from(backing_width),
            display_height: f64::from(backing_height),
        }
    }

    /// Returns a copy displayed at the given client-space rectangle.
    #[must_use]
    pub fn with_display(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.display_left = left;
        self.display_top = top;
        self.display_width = width;
        self.display_height = height;
        self
    }

    /// Backing-to-displayed ratio on each axis, or `None` while the
    /// displayed size is degenerate.
    pub fn scale(&self) -> Option<(f64, f64)> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.display_width) || !usable(self.display_height) {
            return None;
        }
        Some((
            f64::from(self.backing_width) / self.display_width,
            f64::from(self.backing_height) / self.display_height,
        ))
    }

    /// Converts a client-space pointer position to canvas space.
    ///
    /// Returns `None` when the surface has no usable displayed size or
    /// the mapped position is not finite, in which case the event should
    /// be ignored.
    pub fn to_canvas(&self, raw: RawPointer) -> Option<Point> {
        let (sx, sy) = self.scale()?;
        let x = (raw.client_x - self.display_left) * sx;
        let y = (raw.client_y - self.display_top) * sy;
        (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
    }
}
