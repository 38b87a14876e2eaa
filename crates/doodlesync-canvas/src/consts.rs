//! Shared constants for drawing surfaces.

// -- Tools ------------------------------------------------------------------

/// Colours offered by the drawing tools, in display order.
pub const PALETTE: [&str; 10] = [
    "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF",
    "#00FFFF", "#FFA500", "#800080", "#008000",
];

/// Colour selected when a surface is created.
pub const DEFAULT_COLOR: &str = "#000000";

/// Brush width selected when a surface is created, in canvas pixels.
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Smallest brush width the tools allow.
pub const MIN_WIDTH: f64 = 1.0;

/// Largest brush width the tools allow.
pub const MAX_WIDTH: f64 = 20.0;

/// Distance from the pointer within which a stroke point gets its whole
/// stroke erased.
pub const ERASE_RADIUS: f64 = 20.0;

// -- Surface ----------------------------------------------------------------

/// Fill painted under every redraw.
pub const BACKGROUND: &str = "#ffffff";

/// Default backing grid size.
pub const DEFAULT_BACKING_WIDTH: u32 = 800;
pub const DEFAULT_BACKING_HEIGHT: u32 = 500;
