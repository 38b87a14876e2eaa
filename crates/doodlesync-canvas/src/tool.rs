use crate::consts::{DEFAULT_COLOR, DEFAULT_WIDTH, MAX_WIDTH, MIN_WIDTH};

/// The drawer's current brush.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    color: String,
    width: f64,
    erasing: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            width: DEFAULT_WIDTH,
            erasing: false,
        }
    }
}

impl ToolSettings {
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// Picks a brush colour. Picking a colour also leaves erase mode.
    ///
    /// A blank colour is ignored and leaves the brush unchanged. Returns
    /// whether the colour was taken.
    pub fn select_color(&mut self, color: impl Into<String>) -> bool {
        let color = color.into();
        if color.trim().is_empty() {
            return false;
        }
        self.color = color;
        self.erasing = false;
        true
    }

    /// Sets the brush width, clamped to the allowed range. Non-finite
    /// values are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        }
    }

    pub fn thicker(&mut self) {
        self.set_width(self.width + 1.0);
    }

    pub fn thinner(&mut self) {
        self.set_width(self.width - 1.0);
    }

    /// Flips erase mode and returns the new setting.
    pub fn toggle_erase(&mut self) -> bool {
        self.erasing = !self.erasing;
        self.erasing
    }
}
