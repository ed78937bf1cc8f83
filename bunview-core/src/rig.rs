/// Orbit camera rig: a perspective camera plus damped orbit controls.
use log::debug;
use nalgebra::{Point2, Vector3};
use std::f32::consts::{PI, TAU};

use crate::config::OrbitConfig;
use crate::projection::Camera;

const EPS: f32 = 1e-6;
/// Multiplicative zoom step per wheel notch at `zoom_speed = 1`
const ZOOM_STEP: f32 = 0.95;

/// Orbit controls around the camera target. Input accumulates as a pending
/// delta that `update` integrates a fraction at a time.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub config: OrbitConfig,
    pub enabled: bool,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    gesture: Option<Point2<f32>>,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            enabled: true,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            gesture: None,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn begin_rotate(&mut self, at: Point2<f32>) {
        if self.enabled {
            self.gesture = Some(at);
        }
    }

    /// Continue a rotate gesture; `viewport_height` converts pixels to angle.
    pub fn rotate_to(&mut self, at: Point2<f32>, viewport_height: f32) {
        let Some(last) = self.gesture else { return };
        self.gesture = Some(at);
        if !self.enabled {
            return;
        }
        let moved = at - last;
        let per_pixel = TAU / viewport_height.max(1.0) * self.config.rotate_speed;
        self.delta_theta -= moved.x * per_pixel;
        self.delta_phi -= moved.y * per_pixel;
    }

    pub fn end_rotate(&mut self) {
        self.gesture = None;
    }

    /// Wheel input: negative `delta` zooms in.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled || delta == 0.0 {
            return;
        }
        let step = ZOOM_STEP.powf(self.config.zoom_speed);
        if delta < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// One damping step. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius < EPS {
            return false;
        }

        let damping = if self.config.damping_factor > 0.0 {
            self.config.damping_factor.min(1.0)
        } else {
            1.0
        };

        let theta = (offset.x.atan2(offset.z) + self.delta_theta * damping)
            .clamp(self.config.min_azimuth, self.config.max_azimuth);
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.delta_phi * damping)
            .clamp(self.config.min_polar.max(EPS), self.config.max_polar.min(PI - EPS));
        let radius = (radius * self.scale).clamp(self.config.min_distance, self.config.max_distance);

        let next = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        self.delta_theta *= 1.0 - damping;
        self.delta_phi *= 1.0 - damping;
        self.scale = 1.0;

        let moved = (next - offset).norm() > 1e-5;
        camera.position = camera.target + next;
        moved
    }
}

/// Camera plus controls. A locked rig keeps its controls disabled for the
/// whole session.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Camera,
    pub controls: OrbitControls,
    locked: bool,
}

impl CameraRig {
    pub fn new(camera: Camera, config: OrbitConfig, locked: bool) -> Self {
        let mut controls = OrbitControls::new(config);
        controls.enabled = !locked;
        Self {
            camera,
            controls,
            locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls.enabled
    }

    pub fn set_controls_enabled(&mut self, enabled: bool) {
        let enabled = enabled && !self.locked;
        if self.controls.enabled != enabled {
            debug!("orbit controls {}", if enabled { "enabled" } else { "disabled" });
        }
        self.controls.enabled = enabled;
        if !enabled {
            self.controls.end_rotate();
        }
    }

    /// Advance controls by one frame; must run before any ray is cast.
    pub fn update(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }
}
