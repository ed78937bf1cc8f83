/// Interaction session: pointer picking, hover scaling and drag-to-move.
///
/// All state lives on one [`InteractionSession`] owned by the host's event
/// loop. Pointer and resize events mutate it between frames; `tick` runs
/// once per frame before the host renders.
use log::{debug, info, trace, warn};
use nalgebra::Vector3;

use crate::assets::{AssetError, AssetManifest};
use crate::config::StageConfig;
use crate::device::DeviceProfile;
use crate::model::Model;
use crate::motion::{SecondaryMotion, WiggleBone, WiggleConfig};
use crate::pointer::PointerState;
use crate::projection::Camera;
use crate::ray::RayHit;
use crate::rig::CameraRig;
use crate::scene::{Background, Scene};
use crate::transform::RotationState;
use crate::viewport::{RenderSurface, Viewport};

/// Cursor affordance shown over the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
}

impl Cursor {
    /// CSS class the web host toggles on the canvas
    pub const GRAB_CLASS: &'static str = "grabbing";

    pub fn is_grab(&self) -> bool {
        matches!(self, Cursor::Grab)
    }
}

/// `dragging` only becomes true on pointer-down while `hovered`, and
/// `hover_applied` records whether the hover scale is currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub hovered: bool,
    pub dragging: bool,
    pub hover_applied: bool,
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub hit: Option<RayHit>,
    pub camera_moved: bool,
    pub scale_changed: bool,
    pub cursor: Cursor,
    pub state: InteractionState,
}

pub struct InteractionSession {
    config: StageConfig,
    device: DeviceProfile,
    scene: Scene,
    rig: CameraRig,
    viewport: Viewport,
    pointer: PointerState,
    motions: Vec<Box<dyn SecondaryMotion>>,
    state: InteractionState,
    cursor: Cursor,
}

impl InteractionSession {
    pub fn new(
        config: StageConfig,
        device: DeviceProfile,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
    ) -> Self {
        let viewport = Viewport::new(
            width,
            height,
            device_pixel_ratio,
            config.viewport.max_pixel_ratio,
        );
        let camera = Camera::from_config(&config.camera, viewport.aspect());
        let rig = CameraRig::new(camera, config.controls.clone(), device.touch_primary);
        let manifest = AssetManifest::from_config(&config.assets);
        let scene = Scene::new(Background::Texture(manifest.background));

        Self {
            config,
            device,
            scene,
            rig,
            viewport,
            pointer: PointerState::new(),
            motions: Vec::new(),
            state: InteractionState::default(),
            cursor: Cursor::Default,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn model(&self) -> Option<&Model> {
        self.scene.model.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.rig.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Place the loaded model in the scene at rest scale and load yaw, and
    /// register one wiggle handle per bone.
    pub fn attach_model(&mut self, mut model: Model) {
        let settings = &self.config.model;
        model.transform.position = Vector3::zeros();
        model.transform.rotation = RotationState::new(0.0, settings.yaw, 0.0);
        model.transform.scale = settings.rest_scale;
        for bone in &mut model.skeleton.bones {
            bone.offset = Vector3::zeros();
        }

        let wiggle = WiggleConfig::with_velocity(settings.wiggle_velocity);
        self.motions = (0..model.skeleton.len())
            .map(|bone| Box::new(WiggleBone::new(bone, wiggle)) as Box<dyn SecondaryMotion>)
            .collect();

        info!(
            "attached model '{}' ({} triangles, {} bones)",
            model.name,
            model.triangle_count(),
            model.skeleton.len()
        );
        if self.scene.model.replace(model).is_some() {
            warn!("replaced an already attached model");
        }
        self.state.hover_applied = false;
    }

    /// Consume a load outcome. Failures leave the scene without a model, so
    /// interaction stays inert. Returns whether a model was attached.
    pub fn on_load(&mut self, outcome: Result<Model, AssetError>) -> bool {
        match outcome {
            Ok(model) => {
                self.attach_model(model);
                true
            }
            Err(err) => {
                warn!("model load failed, interaction disabled: {err}");
                false
            }
        }
    }

    pub fn pointer_move(&mut self, px: f32, py: f32) {
        self.pointer.track(px, py, &self.viewport);
        if self.rig.controls.is_rotating() {
            self.rig
                .controls
                .rotate_to(self.pointer.pixels, self.viewport.height as f32);
        }
    }

    pub fn pointer_down(&mut self) {
        if self.state.hovered {
            self.rig.set_controls_enabled(false);
            self.state.dragging = true;
            debug!("drag started");
        } else {
            self.state.dragging = false;
            self.rig.controls.begin_rotate(self.pointer.pixels);
        }
    }

    pub fn pointer_up(&mut self) {
        self.rig.controls.end_rotate();
        let was_dragging = std::mem::take(&mut self.state.dragging);
        if !was_dragging {
            return;
        }

        self.cursor = Cursor::Default;
        if let Some(model) = self.scene.model.as_mut() {
            model.transform.position = Vector3::zeros();
        }
        self.rig.set_controls_enabled(true);
        debug!("drag released, model returned to origin");
    }

    pub fn wheel(&mut self, delta: f32) {
        self.rig.controls.zoom(delta);
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        surface: &mut dyn RenderSurface,
    ) {
        self.viewport
            .resize(width, height, device_pixel_ratio, &mut self.rig.camera, surface);
        info!(
            "viewport {}x{} at pixel ratio {}",
            width,
            height,
            self.viewport.render_pixel_ratio()
        );
    }

    /// Advance one frame: controls, picking, hover and drag, then secondary
    /// motion. Without a model only the controls advance.
    pub fn tick(&mut self) -> FrameReport {
        let camera_moved = self.rig.update();

        let Some(model) = self.scene.model.as_mut() else {
            return FrameReport {
                hit: None,
                camera_moved,
                scale_changed: false,
                cursor: self.cursor,
                state: self.state,
            };
        };

        let hit = self
            .rig
            .camera
            .ray_from_ndc(self.pointer.ndc)
            .and_then(|ray| model.intersect(&ray));

        let touch = self.device.touch_primary;
        let mut scale_changed = false;
        if hit.is_some() {
            if !self.state.hovered {
                trace!("pointer entered model");
            }
            self.state.hovered = true;
            self.cursor = Cursor::Grab;
            if !self.state.hover_applied && !touch {
                scale_changed = model.snap_scale(self.config.model.hover_scale);
                self.state.hover_applied = true;
            }
        } else {
            if self.state.hovered {
                trace!("pointer left model");
            }
            self.state.hovered = false;
            if !self.state.dragging {
                self.cursor = Cursor::Default;
                if self.state.hover_applied && !touch {
                    scale_changed = model.snap_scale(self.config.model.rest_scale);
                    self.state.hover_applied = false;
                }
            }
        }

        if self.state.dragging {
            let ratio = self.device.drag_ratio;
            model.transform.position.x = self.pointer.ndc.x * ratio.x;
            model.transform.position.z = -self.pointer.ndc.y * ratio.z;
        }

        let world = model.world_matrix();
        for motion in &mut self.motions {
            motion.update(&mut model.skeleton, &world);
        }

        FrameReport {
            hit,
            camera_moved,
            scale_changed,
            cursor: self.cursor,
            state: self.state,
        }
    }
}
