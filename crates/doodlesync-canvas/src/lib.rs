//! Drawing surface model for doodlesync.
//!
//! A [`DrawingSurface`] holds the finalized strokes of one participant's
//! view of the shared drawing plus, on the drawer's own surface, the
//! stroke being drawn. It turns pointer input into strokes, erases whole
//! strokes by proximity, applies strokes and clears received from the
//! drawer, and replays everything onto a [`Painter`].
//!
//! The surface never touches the network. It emits through the
//! [`Outbox`](doodlesync_protocol::Outbox) passed to the operations that
//! may notify peers (`end_stroke`, `clear`).
//!
//! # Feature Flags
//!
//! - `raster` (default): [`PixmapPainter`], a `tiny-skia` software
//!   renderer with PNG export

pub mod consts;
mod error;
mod geometry;
mod paint;
#[cfg(feature = "raster")]
mod raster;
mod surface;
mod tool;

pub use error::CanvasError;
pub use geometry::{RawPointer, SurfaceGeometry};
pub use paint::{PaintOp, Painter, RecordingPainter};
#[cfg(feature = "raster")]
pub use raster::{PixmapPainter, parse_color};
pub use surface::{DrawingSurface, Role};
pub use tool::ToolSettings;
