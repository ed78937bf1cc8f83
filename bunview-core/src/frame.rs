/// Per-frame driver: tick the session, then hand a snapshot to the rasterizer
use std::time::{Duration, Instant};

use crate::projection::Camera;
use crate::scene::Scene;
use crate::session::{Cursor, FrameReport, InteractionSession, InteractionState};
use crate::viewport::Viewport;

/// Read-only view of everything a rasterizer needs for one frame
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub viewport: &'a Viewport,
    pub cursor: Cursor,
    pub state: InteractionState,
}

impl<'a> FrameView<'a> {
    pub fn of(session: &'a InteractionSession) -> Self {
        Self {
            scene: session.scene(),
            camera: session.camera(),
            viewport: session.viewport(),
            cursor: session.cursor(),
            state: session.state(),
        }
    }
}

/// External renderer invoked once per frame after interaction state settles
pub trait Rasterizer {
    type Error;

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error>;
}

/// One full frame: session update first, then render.
pub fn drive_frame<R: Rasterizer>(
    session: &mut InteractionSession,
    rasterizer: &mut R,
) -> Result<FrameReport, R::Error> {
    let report = session.tick();
    rasterizer.render(&FrameView::of(session))?;
    Ok(report)
}

/// Elapsed and per-frame time since start
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the previous call
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last;
        self.last = now;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
