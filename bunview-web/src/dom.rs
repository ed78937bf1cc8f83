/// Browser wiring: window listeners feed the stage, an animation frame loop
/// drives it and mirrors the cursor onto the canvas.
use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, PointerEvent, WheelEvent, Window};

use bunview_core::drive_frame;
use bunview_core::session::Cursor;

use crate::{init_logging_once, JsRasterizer, WebStage};

type Shared = Rc<RefCell<WebStage>>;

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn window_size(window: &Window) -> (u32, u32) {
    let read = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    (read(window.inner_width()), read(window.inner_height()))
}

fn listen<E, F>(target: &EventTarget, kind: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Mount a stage on `canvas_id` and run it until the page goes away.
///
/// `render` is called every frame with a `FrameSnapshot`. Without
/// `model_bytes` the built-in bunny is shown.
#[wasm_bindgen]
pub fn start(
    canvas_id: &str,
    render: js_sys::Function,
    model_bytes: Option<Vec<u8>>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    init_logging_once();
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into()?;

    let (width, height) = window_size(&window);
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let mut stage = WebStage::new(
        width,
        height,
        window.device_pixel_ratio() as f32,
        &user_agent,
        config_json,
    )?;
    stage.attach_canvas(canvas.clone());
    match model_bytes {
        Some(bytes) => {
            // A bad file leaves the stage empty but running
            if let Err(err) = stage.load_model("bunny", &bytes) {
                error!("{}", err.as_string().unwrap_or_default());
            }
        }
        None => stage.load_builtin_model(),
    }
    info!("stage mounted on #{canvas_id} ({width}x{height})");

    let shared: Shared = Rc::new(RefCell::new(stage));
    install_listeners(&window, &canvas, &shared)?;
    run_frames(&window, canvas, shared, render)
}

fn install_listeners(
    window: &Window,
    canvas: &HtmlCanvasElement,
    stage: &Shared,
) -> Result<(), JsValue> {
    let target: &EventTarget = window.as_ref();
    let canvas_target: &EventTarget = canvas.as_ref();

    let s = stage.clone();
    listen(target, "pointermove", move |event: PointerEvent| {
        s.borrow_mut()
            .pointer_move(event.client_x() as f32, event.client_y() as f32);
    })?;

    // Taps arrive without a prior move; record where the press landed
    let s = stage.clone();
    listen(target, "pointerdown", move |event: PointerEvent| {
        let mut stage = s.borrow_mut();
        stage.pointer_move(event.client_x() as f32, event.client_y() as f32);
        stage.pointer_down();
    })?;

    let s = stage.clone();
    listen(target, "pointerup", move |_: PointerEvent| {
        s.borrow_mut().pointer_up();
    })?;

    let s = stage.clone();
    listen(canvas_target, "wheel", move |event: WheelEvent| {
        s.borrow_mut().wheel(event.delta_y() as f32);
    })?;

    let s = stage.clone();
    let resize_window = window.clone();
    listen(target, "resize", move |_: Event| {
        let (width, height) = window_size(&resize_window);
        s.borrow_mut()
            .resize(width, height, resize_window.device_pixel_ratio() as f32);
    })?;

    Ok(())
}

fn run_frames(
    window: &Window,
    canvas: HtmlCanvasElement,
    stage: Shared,
    render: js_sys::Function,
) -> Result<(), JsValue> {
    let mut rasterizer = JsRasterizer::new(render);
    let mut last_cursor = None;

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let loop_window = window.clone();

    *frame.borrow_mut() = Some(Closure::new(move || {
        let report = {
            let mut stage = stage.borrow_mut();
            drive_frame(&mut stage.session, &mut rasterizer)
        };
        match report {
            Ok(report) => {
                if last_cursor != Some(report.cursor) {
                    match canvas
                        .class_list()
                        .toggle_with_force(Cursor::GRAB_CLASS, report.cursor.is_grab())
                    {
                        Ok(_) => last_cursor = Some(report.cursor),
                        Err(err) => debug!("cursor class not toggled: {err:?}"),
                    }
                }
            }
            Err(err) => error!("render callback failed: {err:?}"),
        }

        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) =
                loop_window.request_animation_frame(callback.as_ref().unchecked_ref())
            {
                error!("animation frame request failed: {err:?}");
            }
        }
    }));

    let first = frame.borrow();
    if let Some(callback) = first.as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
