/// Scene graph root: background, lights and the (eventually) loaded model
use nalgebra::{Point3, Vector3};

use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    /// Resolved path of an image the host decodes
    Texture(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    /// Light shining from `position` toward the origin
    Directional {
        color: Color,
        intensity: f32,
        position: Point3<f32>,
    },
}

impl Light {
    /// Unit vector pointing from the surface toward the light
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional { position, .. } => position.coords.try_normalize(1e-12),
        }
    }
}

/// Created once per session; the model arrives when loading completes and is
/// never removed.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Background,
    pub lights: Vec<Light>,
    pub model: Option<Model>,
}

impl Scene {
    pub fn new(background: Background) -> Self {
        Self {
            background,
            lights: vec![
                Light::Ambient {
                    color: Color::WHITE,
                    intensity: 1.0,
                },
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 3.0,
                    position: Point3::new(1.0, 1.0, 0.0),
                },
            ],
            model: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}
