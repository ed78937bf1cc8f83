/// Last known pointer position
use nalgebra::Point2;

use crate::viewport::Viewport;

/// Shared pointer value. Each move overwrites it; nothing is queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub ndc: Point2<f32>,
    /// Raw pixel position, kept for orbit gestures
    pub pixels: Point2<f32>,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            ndc: Point2::origin(),
            pixels: Point2::origin(),
        }
    }

    pub fn track(&mut self, px: f32, py: f32, viewport: &Viewport) {
        self.pixels = Point2::new(px, py);
        self.ndc = viewport.normalize(px, py);
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
