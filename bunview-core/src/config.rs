/// Stage configuration.
///
/// Every section falls back to the tuned defaults, so a partial TOML or JSON
/// document only needs to name the values it changes.
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub camera: CameraConfig,
    pub controls: OrbitConfig,
    pub model: ModelConfig,
    pub drag: DragConfig,
    pub viewport: ViewportConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 1.0, 3.6],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Damping and clamps for the orbit controls. Angles are radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_azimuth: f32,
    pub max_azimuth: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 2.5,
            max_distance: 5.0,
            min_polar: FRAC_PI_4,
            max_polar: PI - FRAC_PI_4,
            min_azimuth: -FRAC_PI_2,
            max_azimuth: FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub rest_scale: f32,
    pub hover_scale: f32,
    /// Rotation about Y applied once when the model is attached
    pub yaw: f32,
    pub wiggle_velocity: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rest_scale: 0.9,
            hover_scale: 1.0,
            yaw: -FRAC_PI_2,
            wiggle_velocity: 0.6,
        }
    }
}

/// Pointer-to-world scale for dragging, X maps to world X and Y to world Z
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragRatio {
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub desktop: DragRatio,
    pub touch: DragRatio,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            desktop: DragRatio { x: 4.0, z: 1.5 },
            touch: DragRatio { x: 2.0, z: 0.9 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { max_pixel_ratio: 2.0 }
    }
}

/// Static asset paths, relative to `base_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub base_dir: String,
    pub model: String,
    pub baked_texture: String,
    pub background: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_dir: "static".to_string(),
            model: "models/bunny.stl".to_string(),
            baked_texture: "textures/baked.jpg".to_string(),
            background: "textures/eveningSkyTexture02.png".to_string(),
        }
    }
}
