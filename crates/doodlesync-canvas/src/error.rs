/// Errors that can occur while rendering a drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A colour string could not be parsed as `#RGB`, `#RRGGBB` or
    /// `#RRGGBBAA`.
    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    /// A raster target of this size cannot be allocated.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Encoding the rendered image failed.
    #[error("image encode failed: {0}")]
    Encode(String),
}
