use bunview_core::assets::builtin_bunny;
use bunview_core::config::StageConfig;
use bunview_core::{
    drive_frame, Cursor, DeviceProfile, FrameView, InteractionSession, Rasterizer, RenderSurface,
};
use nalgebra::Vector3;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loaded_session(touch: bool) -> InteractionSession {
    init_logging();
    let config = StageConfig::default();
    let device = if touch {
        DeviceProfile::touch(&config.drag)
    } else {
        DeviceProfile::desktop(&config.drag)
    };
    let mut session = InteractionSession::new(config, device, WIDTH, HEIGHT, 1.0);
    session.attach_model(builtin_bunny());
    session
}

fn scale(session: &InteractionSession) -> f32 {
    session.model().unwrap().transform.scale
}

fn center(session: &mut InteractionSession) {
    session.pointer_move(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
}

fn corner(session: &mut InteractionSession) {
    session.pointer_move(WIDTH as f32 - 10.0, 10.0);
}

#[derive(Default)]
struct Surface {
    size: (u32, u32),
    ratio: f32,
}

impl RenderSurface for Surface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
    }
}

#[test]
fn hover_snaps_scale_once_and_back() {
    let mut session = loaded_session(false);
    assert_eq!(scale(&session), 0.9);

    center(&mut session);
    let first = session.tick();
    assert!(first.hit.is_some());
    assert!(first.scale_changed);
    assert_eq!(first.cursor, Cursor::Grab);
    assert_eq!(scale(&session), 1.0);

    for _ in 0..5 {
        let again = session.tick();
        assert!(again.hit.is_some());
        assert!(!again.scale_changed);
        assert!(again.state.hover_applied);
    }

    corner(&mut session);
    let left = session.tick();
    assert!(left.hit.is_none());
    assert!(left.scale_changed);
    assert_eq!(left.cursor, Cursor::Default);
    assert_eq!(scale(&session), 0.9);
    assert!(!left.state.hovered);
    assert!(!left.state.hover_applied);
}

#[test]
fn drag_follows_pointer_and_snaps_home() {
    let mut session = loaded_session(false);
    center(&mut session);
    session.tick();

    session.pointer_down();
    assert!(session.state().dragging);
    assert!(!session.rig().controls_enabled());

    // Normalized (0.5, 0.5)
    session.pointer_move(600.0, 150.0);
    let report = session.tick();
    assert_eq!(report.cursor, Cursor::Grab);
    let position = session.model().unwrap().transform.position;
    assert!((position.x - 2.0).abs() < 1e-6);
    assert!((position.z + 0.75).abs() < 1e-6);
    assert_eq!(position.y, 0.0);

    // Position is recomputed from the pointer every frame
    session.pointer_move(200.0, 450.0);
    session.tick();
    let position = session.model().unwrap().transform.position;
    assert!((position.x + 2.0).abs() < 1e-6);
    assert!((position.z - 0.75).abs() < 1e-6);

    session.pointer_up();
    assert!(!session.state().dragging);
    assert_eq!(session.cursor(), Cursor::Default);
    assert_eq!(session.model().unwrap().transform.position, Vector3::zeros());
    assert!(session.rig().controls_enabled());
}

#[test]
fn release_resets_position_wherever_the_pointer_is() {
    for (px, py) in [(0.0, 0.0), (799.0, 599.0), (-300.0, 1200.0)] {
        let mut session = loaded_session(false);
        center(&mut session);
        session.tick();
        session.pointer_down();
        session.pointer_move(px, py);
        session.tick();
        session.pointer_up();
        assert_eq!(session.model().unwrap().transform.position, Vector3::zeros());
    }
}

#[test]
fn touch_devices_never_scale_or_orbit() {
    let mut session = loaded_session(true);
    assert!(!session.rig().controls_enabled());

    center(&mut session);
    let report = session.tick();
    assert!(report.hit.is_some());
    assert!(!report.scale_changed);
    assert_eq!(report.cursor, Cursor::Grab);
    assert_eq!(scale(&session), 0.9);

    session.pointer_down();
    session.pointer_move(600.0, 150.0);
    session.tick();
    let position = session.model().unwrap().transform.position;
    assert!((position.x - 1.0).abs() < 1e-6);
    assert!((position.z + 0.45).abs() < 1e-6);

    session.pointer_up();
    assert!(!session.rig().controls_enabled());
    corner(&mut session);
    session.tick();
    assert_eq!(scale(&session), 0.9);
}

#[test]
fn pointer_up_without_drag_leaves_model_alone() {
    let mut session = loaded_session(false);
    corner(&mut session);
    session.tick();
    session.pointer_down();
    assert!(!session.state().dragging);
    session.pointer_up();
    assert!(session.rig().controls_enabled());
    assert_eq!(session.model().unwrap().transform.position, Vector3::zeros());
}

#[test]
fn resize_updates_camera_and_surface() {
    let mut session = loaded_session(false);
    let mut surface = Surface::default();

    session.resize(800, 600, 3.0, &mut surface);
    assert!((session.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    assert_eq!(surface.size, (800, 600));
    assert_eq!(surface.ratio, 2.0);

    session.resize(800, 600, 1.25, &mut surface);
    assert_eq!(surface.ratio, 1.25);
}

#[test]
fn ears_jiggle_while_dragging() {
    let mut session = loaded_session(false);
    center(&mut session);
    session.tick();
    session.pointer_down();
    session.pointer_move(700.0, 300.0);
    session.tick();

    let model = session.model().unwrap();
    let ear = model.skeleton.find("ear.L").unwrap();
    assert!(model.skeleton.bones[ear].offset.norm() > 0.0);

    session.pointer_up();
    for _ in 0..300 {
        session.tick();
    }
    let model = session.model().unwrap();
    assert!(model.skeleton.bones[ear].offset.norm() < 1e-3);
}

struct Recorder {
    cursors: Vec<Cursor>,
}

impl Rasterizer for Recorder {
    type Error = String;

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error> {
        if frame.scene.model.is_none() {
            return Err("no model".to_string());
        }
        self.cursors.push(frame.cursor);
        Ok(())
    }
}

#[test]
fn render_sees_state_after_the_tick() {
    let mut session = loaded_session(false);
    let mut recorder = Recorder { cursors: Vec::new() };
    center(&mut session);
    drive_frame(&mut session, &mut recorder).unwrap();
    corner(&mut session);
    drive_frame(&mut session, &mut recorder).unwrap();
    assert_eq!(recorder.cursors, vec![Cursor::Grab, Cursor::Default]);
}

#[test]
fn picking_uses_the_camera_after_the_controls_step() {
    let mut session = loaded_session(false);
    corner(&mut session);
    session.tick();

    // Queue a vertical orbit off the model, then aim at the center
    session.pointer_down();
    session.pointer_move(WIDTH as f32 - 10.0, 110.0);
    session.pointer_up();
    center(&mut session);

    let ndc = session.pointer().ndc;
    let before = session.camera().clone();
    let stale = before
        .ray_from_ndc(ndc)
        .and_then(|ray| session.model().unwrap().intersect(&ray))
        .expect("center ray should hit from the old pose");

    let report = session.tick();
    assert!(report.camera_moved);
    let hit = report.hit.expect("center ray should hit from the new pose");
    let fresh = session
        .camera()
        .ray_from_ndc(ndc)
        .and_then(|ray| session.model().unwrap().intersect(&ray))
        .unwrap();

    assert!((hit.distance - fresh.distance).abs() < 1e-4);
    assert!((hit.distance - stale.distance).abs() > 1e-3);
}

#[test]
fn leaving_the_model_mid_drag_keeps_grab_until_release() {
    let mut session = loaded_session(false);
    center(&mut session);
    session.tick();
    session.pointer_down();

    session.pointer_move(WIDTH as f32 / 2.0, 10.0);
    let report = session.tick();
    assert!(report.hit.is_none());
    assert!(!report.state.hovered);
    assert!(report.state.dragging);
    assert!(!report.scale_changed);
    assert_eq!(report.cursor, Cursor::Grab);
    assert_eq!(scale(&session), 1.0);

    session.pointer_up();
    assert_eq!(session.cursor(), Cursor::Default);
    let settled = session.tick();
    assert!(settled.hit.is_none());
    assert!(settled.scale_changed);
    assert_eq!(settled.cursor, Cursor::Default);
    assert_eq!(scale(&session), 0.9);
}
