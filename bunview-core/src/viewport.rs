/// Viewport size tracking and pointer normalization
use nalgebra::Point2;

use crate::projection::Camera;

/// Host render target that follows the viewport
pub trait RenderSurface {
    fn set_size(&mut self, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, ratio: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
    pub max_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            max_pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Ratio handed to the render surface, capped to bound fill cost
    pub fn render_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(self.max_pixel_ratio)
    }

    /// Apply a resize: record the size, then update the camera projection and
    /// the surface. Repeating the same call changes nothing.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        camera: &mut Camera,
        surface: &mut dyn RenderSurface,
    ) {
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;

        camera.set_aspect(width as f32, height as f32);
        surface.set_size(width, height);
        surface.set_pixel_ratio(self.render_pixel_ratio());
    }

    /// Pixel position to normalized device coordinates. Not clamped: points
    /// outside the surface map outside `[-1, 1]`.
    pub fn normalize(&self, px: f32, py: f32) -> Point2<f32> {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;
        Point2::new(px / width * 2.0 - 1.0, -(py / height) * 2.0 + 1.0)
    }
}
