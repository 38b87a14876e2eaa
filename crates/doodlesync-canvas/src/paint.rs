//! The painting seam between a surface and whatever renders it.

use doodlesync_protocol::Point;

/// A render target a [`DrawingSurface`](crate::DrawingSurface) can replay
/// itself onto.
pub trait Painter {
    /// Fills the whole target with `background`.
    fn clear(&mut self, background: &str);

    /// Draws `points` as one continuous, joined line. A single point is
    /// drawn as a dot of diameter `width`.
    fn polyline(&mut self, points: &[Point], color: &str, width: f64);
}

/// One recorded [`Painter`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Clear {
        background: String,
    },
    Polyline {
        points: Vec<Point>,
        color: String,
        width: f64,
    },
}

/// A [`Painter`] that records calls instead of rendering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Returns the recorded ops, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self, background: &str) {
        self.ops.push(PaintOp::Clear {
            background: background.to_string(),
        });
    }

    fn polyline(&mut self, points: &[Point], color: &str, width: f64) {
        self.ops.push(PaintOp::Polyline {
            points: points.to_vec(),
            color: color.to_string(),
            width,
        });
    }
}
