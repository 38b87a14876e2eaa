//! The drawing surface model: finalized strokes, the in-progress gesture,
//! erase-by-proximity and deterministic replay.
//!
//! # Gesture state
//!
//! ```text
//!            begin (draw mode)              end
//!   Idle ─────────────────────▶ Drawing ───────────▶ Idle
//!    │                                                ▲
//!    │ begin (erase mode)                   end       │
//!    └──────────────────────▶ Erasing ────────────────┘
//! ```
//!
//! Erase mode is a tool setting, orthogonal to this machine: while it is
//! on, pointer-down starts an `Erasing` gesture instead of a stroke and
//! every pointer-move while held erases again (drag-to-erase).
//!
//! Only the drawer, while the game is `playing`, can start gestures.
//! Anyone else calling the pointer operations gets a silent no-op.

use doodlesync_protocol::{GamePhase, Message, Outbox, Point, ProtocolError, Stroke};

use crate::consts::{BACKGROUND, ERASE_RADIUS};
use crate::{Painter, RawPointer, SurfaceGeometry, ToolSettings};

/// What the local participant may do to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Role {
    /// Whether the local participant is the active drawer.
    pub is_drawer: bool,
    /// The session's current phase.
    pub phase: GamePhase,
}

impl Role {
    pub fn new(is_drawer: bool, phase: GamePhase) -> Self {
        Self { is_drawer, phase }
    }

    /// Pointer input is accepted only from the drawer during a round.
    pub fn can_draw(&self) -> bool {
        self.is_drawer && self.phase == GamePhase::Playing
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Drawing(Vec<Point>),
    Erasing,
}

/// One participant's view of the shared drawing.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    /// Finalized strokes in paint order.
    strokes: Vec<Stroke>,
    gesture: Gesture,
    tool: ToolSettings,
    role: Role,
    geometry: SurfaceGeometry,
    revision: u64,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new(SurfaceGeometry::default())
    }
}

impl DrawingSurface {
    pub fn new(geometry: SurfaceGeometry) -> Self {
        Self {
            strokes: Vec::new(),
            gesture: Gesture::Idle,
            tool: ToolSettings::default(),
            role: Role::default(),
            geometry,
            revision: 0,
        }
    }

    // -- Accessors --

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Points of the stroke being drawn right now, if any.
    pub fn in_progress(&self) -> Option<&[Point]> {
        match &self.gesture {
            Gesture::Drawing(points) => Some(points),
            _ => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing(_))
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    /// Bumped on every change that alters what [`redraw`](Self::redraw)
    /// paints. Hosts compare it to decide when to repaint.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- Configuration --

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Updates the on-screen placement, e.g. after the host resized.
    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
    }

    /// Picks the brush colour. Blank colours are refused.
    pub fn select_color(&mut self, color: impl Into<String>) -> bool {
        let taken = self.tool.select_color(color);
        if taken {
            self.touch();
        }
        taken
    }

    pub fn set_width(&mut self, width: f64) {
        self.tool.set_width(width);
        self.touch();
    }

    /// Widens the brush by one step, up to the maximum.
    pub fn thicker(&mut self) -> f64 {
        self.tool.thicker();
        self.touch();
        self.tool.width()
    }

    /// Narrows the brush by one step, down to the minimum.
    pub fn thinner(&mut self) -> f64 {
        self.tool.thinner();
        self.touch();
        self.tool.width()
    }

    /// Flips erase mode. A stroke in progress is abandoned.
    pub fn toggle_erase(&mut self) -> bool {
        if self.is_drawing() {
            self.gesture = Gesture::Idle;
            self.touch();
        }
        self.tool.toggle_erase()
    }

    // -- Pointer input --

    /// Pointer-down. Starts a stroke, or erases under the pointer when
    /// erase mode is on.
    pub fn begin_stroke(&mut self, raw: RawPointer) {
        if !self.role.can_draw() {
            return;
        }
        let Some(point) = self.geometry.to_canvas(raw) else {
            return;
        };

        if self.tool.is_erasing() {
            self.gesture = Gesture::Erasing;
            self.erase_at(point, ERASE_RADIUS);
        } else {
            self.gesture = Gesture::Drawing(vec![point]);
            self.touch();
        }
    }

    /// Pointer-move. Grows the stroke in progress, or erases again while
    /// an erase gesture is held.
    pub fn extend_stroke(&mut self, raw: RawPointer) {
        if !self.role.can_draw() {
            return;
        }
        let Some(point) = self.geometry.to_canvas(raw) else {
            return;
        };

        match &mut self.gesture {
            Gesture::Drawing(points) => {
                points.push(point);
                self.touch();
            }
            Gesture::Erasing => {
                self.erase_at(point, ERASE_RADIUS);
            }
            Gesture::Idle => {}
        }
    }

    /// Pointer-up. Freezes the stroke in progress with the current brush
    /// and, when the local participant is the drawer and `outbox` is open,
    /// sends it whole as a `drawing` message.
    ///
    /// Returns the finalized stroke, if there was one. A gesture that
    /// would make an invalid stroke is discarded without being kept or
    /// sent.
    pub fn end_stroke(&mut self, outbox: &impl Outbox) -> Option<&Stroke> {
        let points = match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing(points) if !points.is_empty() => points,
            _ => return None,
        };

        let stroke = Stroke {
            points,
            color: self.tool.color().to_string(),
            width: self.tool.width(),
        };
        if let Err(e) = stroke.validate() {
            tracing::warn!(error = %e, "discarding invalid stroke");
            self.touch();
            return None;
        }
        if self.role.is_drawer && outbox.is_open() {
            outbox.send(Message::Drawing {
                stroke: stroke.clone(),
            });
        }
        tracing::trace!(points = stroke.points.len(), "stroke finalized");

        self.strokes.push(stroke);
        self.touch();
        self.strokes.last()
    }

    // -- Mutations --

    /// Removes every finalized stroke with at least one point within
    /// `radius` (inclusive) of `point`. Returns how many were removed.
    pub fn erase_at(&mut self, point: Point, radius: f64) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|s| !s.touches(point, radius));
        let removed = before - self.strokes.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Wipes the surface and, when the local participant is the drawer
    /// and `outbox` is open, tells the peers to do the same.
    pub fn clear(&mut self, outbox: &impl Outbox) {
        self.reset();
        if self.role.is_drawer && outbox.is_open() {
            outbox.send(Message::ClearCanvas);
        }
    }

    /// Wipes the surface without telling anyone. Used when a round
    /// transition already clears every client.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.gesture = Gesture::Idle;
        self.touch();
    }

    /// Appends a stroke received from the drawer.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if the stroke is empty or
    /// otherwise malformed; the surface is left unchanged.
    pub fn apply_remote_stroke(&mut self, stroke: Stroke) -> Result<(), ProtocolError> {
        stroke.validate()?;
        self.strokes.push(stroke);
        self.touch();
        Ok(())
    }

    /// Applies a `clear_canvas` received from the drawer.
    pub fn apply_remote_clear(&mut self) {
        self.reset();
    }

    // -- Rendering --

    /// Full repaint: background, every finalized stroke in order, then
    /// the stroke in progress with the current brush.
    ///
    /// Paints only; calling it repeatedly with unchanged state issues the
    /// same calls.
    pub fn redraw<P: Painter + ?Sized>(&self, painter: &mut P) {
        painter.clear(BACKGROUND);
        for stroke in &self.strokes {
            painter.polyline(&stroke.points, &stroke.color, stroke.width);
        }
        if let Gesture::Drawing(points) = &self.gesture {
            if !points.is_empty() {
                painter.polyline(points, self.tool.color(), self.tool.width());
            }
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
