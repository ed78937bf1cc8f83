/// Bunview Web - WASM entry point for the browser scene
///
/// The session runs in Rust; drawing is left to a JS render callback that
/// receives a [`FrameSnapshot`] once per animation frame.
use log::debug;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use bunview_core::assets::{builtin_bunny, decode_model, AssetManifest};
use bunview_core::frame::{FrameView, Rasterizer};
use bunview_core::{DeviceProfile, InteractionSession, RenderSurface, StageConfig};

mod dom;

pub use dom::start;

/// Decode a JSON config; missing fields keep their defaults.
pub fn stage_config_from_json(json: Option<&str>) -> Result<StageConfig, serde_json::Error> {
    match json {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text),
        _ => Ok(StageConfig::default()),
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Canvas backing store that follows the viewport, sized in device pixels
#[derive(Default)]
pub(crate) struct CanvasSurface {
    canvas: Option<HtmlCanvasElement>,
    width: u32,
    height: u32,
    ratio: f32,
}

impl CanvasSurface {
    fn apply(&self) {
        let Some(canvas) = &self.canvas else { return };
        let ratio = if self.ratio > 0.0 { self.ratio } else { 1.0 };
        canvas.set_width((self.width as f32 * ratio).round() as u32);
        canvas.set_height((self.height as f32 * ratio).round() as u32);
        let style = canvas.style();
        for (property, pixels) in [("width", self.width), ("height", self.height)] {
            if let Err(err) = style.set_property(property, &format!("{pixels}px")) {
                debug!("canvas style {property} not applied: {err:?}");
            }
        }
    }
}

impl RenderSurface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.apply();
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.apply();
    }
}

/// Browser-side handle to one interaction session
#[wasm_bindgen]
pub struct WebStage {
    session: InteractionSession,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl WebStage {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        user_agent: &str,
        config_json: Option<String>,
    ) -> Result<WebStage, JsValue> {
        let config = stage_config_from_json(config_json.as_deref()).map_err(js_error)?;
        let device = DeviceProfile::from_user_agent(user_agent, &config.drag);
        let session =
            InteractionSession::new(config, device, width, height, device_pixel_ratio);
        Ok(WebStage {
            session,
            surface: CanvasSurface::default(),
        })
    }

    /// Let resizes drive this canvas's backing store
    #[wasm_bindgen(js_name = "attachCanvas")]
    pub fn attach_canvas(&mut self, canvas: HtmlCanvasElement) {
        self.surface.canvas = Some(canvas);
        let viewport = *self.session.viewport();
        self.session.resize(
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio,
            &mut self.surface,
        );
    }

    /// Decode STL bytes fetched by the page. On failure the stage stays
    /// without a model and the error is returned.
    #[wasm_bindgen(js_name = "loadModel")]
    pub fn load_model(&mut self, name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let outcome = decode_model(name, bytes);
        let failure = outcome.as_ref().err().map(ToString::to_string);
        self.session.on_load(outcome);
        match failure {
            Some(message) => Err(JsValue::from_str(&message)),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = "loadBuiltinModel")]
    pub fn load_builtin_model(&mut self) {
        self.session.attach_model(builtin_bunny());
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.session.pointer_move(client_x, client_y);
    }

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self) {
        self.session.pointer_down();
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.session.wheel(delta_y);
    }

    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.session
            .resize(width, height, device_pixel_ratio, &mut self.surface);
    }

    /// Advance one frame without rendering. Returns whether the pointer hit
    /// the model.
    pub fn tick(&mut self) -> bool {
        self.session.tick().hit.is_some()
    }

    /// Current frame state for a renderer
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&FrameView::of(&self.session))
    }

    /// Column-major world matrix, empty until a model is loaded
    #[wasm_bindgen(js_name = "modelMatrix")]
    pub fn model_matrix(&self) -> Vec<f32> {
        self.session
            .model()
            .map(|model| model.world_matrix().as_slice().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "modelPosition")]
    pub fn model_position(&self) -> Vec<f32> {
        self.session
            .model()
            .map(|model| model.transform.position.as_slice().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "isHovered")]
    pub fn is_hovered(&self) -> bool {
        self.session.state().hovered
    }

    #[wasm_bindgen(js_name = "isDragging")]
    pub fn is_dragging(&self) -> bool {
        self.session.state().dragging
    }

    #[wasm_bindgen(js_name = "cursorGrab")]
    pub fn cursor_grab(&self) -> bool {
        self.session.cursor().is_grab()
    }

    #[wasm_bindgen(js_name = "isTouch")]
    pub fn is_touch(&self) -> bool {
        self.session.device().touch_primary
    }

    #[wasm_bindgen(js_name = "isLoaded")]
    pub fn is_loaded(&self) -> bool {
        self.session.model().is_some()
    }

    #[wasm_bindgen(js_name = "controlsEnabled")]
    pub fn controls_enabled(&self) -> bool {
        self.session.rig().controls_enabled()
    }

    /// Model path resolved against the asset base directory
    #[wasm_bindgen(js_name = "modelPath")]
    pub fn model_path(&self) -> String {
        AssetManifest::from_config(&self.session.config().assets).model
    }

    #[wasm_bindgen(js_name = "bakedTexturePath")]
    pub fn baked_texture_path(&self) -> String {
        AssetManifest::from_config(&self.session.config().assets).baked_texture
    }

    #[wasm_bindgen(js_name = "backgroundPath")]
    pub fn background_path(&self) -> String {
        AssetManifest::from_config(&self.session.config().assets).background
    }
}

/// Matrices are column-major, ready for `uniformMatrix4fv`.
#[wasm_bindgen]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    view: Vec<f32>,
    projection: Vec<f32>,
    part_matrices: Vec<f32>,
    bone_offsets: Vec<f32>,
    grab: bool,
    hovered: bool,
    dragging: bool,
    loaded: bool,
}

impl FrameSnapshot {
    pub fn capture(frame: &FrameView<'_>) -> Self {
        let mut snapshot = FrameSnapshot {
            view: frame.camera.view_matrix().as_slice().to_vec(),
            projection: frame.camera.projection_matrix().as_slice().to_vec(),
            grab: frame.cursor.is_grab(),
            hovered: frame.state.hovered,
            dragging: frame.state.dragging,
            ..Default::default()
        };
        if let Some(model) = frame.scene.model.as_ref() {
            snapshot.loaded = true;
            for index in 0..model.parts.len() {
                snapshot
                    .part_matrices
                    .extend_from_slice(model.part_matrix(index).as_slice());
            }
            for bone in &model.skeleton.bones {
                snapshot.bone_offsets.extend_from_slice(bone.offset.as_slice());
            }
        }
        snapshot
    }
}

#[wasm_bindgen]
impl FrameSnapshot {
    #[wasm_bindgen(getter)]
    pub fn view(&self) -> Vec<f32> {
        self.view.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn projection(&self) -> Vec<f32> {
        self.projection.clone()
    }

    /// One 16-float matrix per model part, concatenated
    #[wasm_bindgen(getter, js_name = "partMatrices")]
    pub fn part_matrices(&self) -> Vec<f32> {
        self.part_matrices.clone()
    }

    /// xyz per bone, concatenated
    #[wasm_bindgen(getter, js_name = "boneOffsets")]
    pub fn bone_offsets(&self) -> Vec<f32> {
        self.bone_offsets.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn grab(&self) -> bool {
        self.grab
    }

    #[wasm_bindgen(getter)]
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    #[wasm_bindgen(getter)]
    pub fn loaded(&self) -> bool {
        self.loaded
    }
}

/// Hands each frame to a JS function as a [`FrameSnapshot`]
pub(crate) struct JsRasterizer {
    callback: js_sys::Function,
}

impl JsRasterizer {
    pub(crate) fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl Rasterizer for JsRasterizer {
    type Error = JsValue;

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error> {
        let snapshot = FrameSnapshot::capture(frame);
        self.callback.call1(&JsValue::NULL, &snapshot.into())?;
        Ok(())
    }
}

fn init_logging_once() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            wasm_logger::init(wasm_logger::Config::default());
        }
    });
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    init_logging_once();
    Ok(())
}
