//! Software rasterisation of a drawing surface with `tiny-skia`.

use doodlesync_protocol::Point;
use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::{CanvasError, Painter, SurfaceGeometry};

/// A [`Painter`] that renders into an RGBA pixmap.
pub struct PixmapPainter {
    pixmap: Pixmap,
}

impl PixmapPainter {
    /// Allocates a transparent pixmap of the given size.
    ///
    /// # Errors
    /// Returns `CanvasError::InvalidSize` for a zero or oversized area.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocates a pixmap matching the surface's backing grid.
    pub fn for_geometry(geometry: &SurfaceGeometry) -> Result<Self, CanvasError> {
        Self::new(geometry.backing_width, geometry.backing_height)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the pixmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encodes the current image as PNG.
    ///
    /// # Errors
    /// Returns `CanvasError::Encode` if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(e.to_string()))
    }
}

impl Painter for PixmapPainter {
    fn clear(&mut self, background: &str) {
        let color = parse_color(background).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "bad background, using white");
            Color::WHITE
        });
        self.pixmap.fill(color);
    }

    fn polyline(&mut self, points: &[Point], color: &str, width: f64) {
        let color = match parse_color(color) {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(error = %e, "skipping stroke");
                return;
            }
        };
        let Some(first) = points.first() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        // A click (or a drag that never moved) leaves a dot.
        if points.iter().all(|p| p == first) {
            let radius = (width / 2.0).max(0.5) as f32;
            if let Some(path) = PathBuilder::from_circle(first.x as f32, first.y as f32, radius) {
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        let stroke = tiny_skia::Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

/// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
///
/// # Errors
/// Returns `CanvasError::InvalidColor` for anything else.
pub fn parse_color(s: &str) -> Result<Color, CanvasError> {
    let invalid = || CanvasError::InvalidColor(s.to_string());
    let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let nibble = |i: usize| {
        u8::from_str_radix(&hex[i..=i], 16)
            .map(|n| n * 17)
            .map_err(|_| invalid())
    };

    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return Err(invalid()),
    };
    Ok(Color::from_rgba8(r, g, b, a))
}
