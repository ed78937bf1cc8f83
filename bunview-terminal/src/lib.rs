/// Terminal host: drives the interaction session from mouse events and
/// renders it with the ASCII rasterizer
use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::info;
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use bunview_core::{
    drive_frame, AssetError, DeviceProfile, FrameClock, FrameReport, InteractionSession, Model,
    StageConfig,
};

pub mod renderer;
pub mod settings;

pub use renderer::{AsciiRenderer, ROW_SCALE};

/// Main application struct for the terminal scene
pub struct TerminalApp {
    session: InteractionSession,
    renderer: AsciiRenderer<Stdout>,
    running: bool,
    clock: FrameClock,
    frame_count: u32,
    fps_window: Duration,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: StageConfig, model: Result<Model, AssetError>) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let device = DeviceProfile::desktop(&config.drag);
        let mut session = InteractionSession::new(
            config,
            device,
            width as u32,
            (height as f32 * ROW_SCALE) as u32,
            1.0,
        );
        session.on_load(model);

        Ok(Self {
            session,
            renderer: AsciiRenderer::new(stdout(), width as usize, height as usize),
            running: true,
            clock: FrameClock::new(),
            frame_count: 0,
            fps_window: Duration::ZERO,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = self.clock.elapsed();

            // Drain everything that arrived since the last frame
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            let report = drive_frame(&mut self.session, &mut self.renderer)?;
            self.draw_status(&report)?;

            // Frame timing
            let elapsed = self.clock.elapsed() - frame_start;
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
            self.sample_fps();
        }

        info!("terminal session closed");
        Ok(())
    }

    fn sample_fps(&mut self) {
        self.frame_count += 1;
        self.fps_window += self.clock.delta();
        if self.fps_window >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / self.fps_window.as_secs_f32();
            self.frame_count = 0;
            self.fps_window = Duration::ZERO;
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                kind: KeyEventKind::Press,
                ..
            }) => self.running = false,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.session.resize(
                width as u32,
                (height as f32 * ROW_SCALE) as u32,
                1.0,
                &mut self.renderer,
            ),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Sample the middle of the cell
        let px = mouse.column as f32 + 0.5;
        let py = (mouse.row as f32 + 0.5) * ROW_SCALE;

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                self.session.pointer_move(px, py);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.session.pointer_move(px, py);
                self.session.pointer_down();
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.session.pointer_move(px, py);
                self.session.pointer_up();
            }
            MouseEventKind::ScrollUp => self.session.wheel(-1.0),
            MouseEventKind::ScrollDown => self.session.wheel(1.0),
            _ => {}
        }
    }

    fn draw_status(&mut self, report: &FrameReport) -> Result<()> {
        let status = if self.session.model().is_none() {
            "no model"
        } else if report.state.dragging {
            "dragging"
        } else if report.state.hovered {
            "hover"
        } else {
            "idle"
        };

        let out = self.renderer.writer_mut();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Bunview | FPS: {:.1} | {} | Drag bunny=Move  Drag background=Orbit  Wheel=Zoom  Q=Quit",
                self.fps, status
            )),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }
}
