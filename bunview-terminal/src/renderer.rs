/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::{self, Write};

use bunview_core::frame::{FrameView, Rasterizer};
use bunview_core::scene::Light;
use bunview_core::{Camera, RenderSurface, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are about twice as tall as they are wide. The session sees
/// a pixel grid with doubled rows so its aspect ratio matches what is drawn.
pub const ROW_SCALE: f32 = 2.0;

const AMBIENT: f32 = 0.15;

/// ASCII renderer that converts the scene to terminal characters and writes
/// them to `out`
pub struct AsciiRenderer<W: Write> {
    out: W,
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    highlight: bool,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            out,
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            highlight: false,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Row-major character buffer of the last frame
    pub fn chars(&self) -> &[char] {
        &self.char_buffer
    }

    pub fn rasterize(&mut self, frame: &FrameView<'_>) {
        self.clear();
        self.highlight = frame.cursor.is_grab();

        let Some(model) = frame.scene.model.as_ref() else {
            return;
        };
        let light = frame
            .scene
            .lights
            .iter()
            .find_map(Light::direction)
            .unwrap_or_else(Vector3::z);

        for (index, part) in model.parts.iter().enumerate() {
            let world = model.part_matrix(index);
            for triangle in &part.mesh.triangles {
                self.render_triangle(triangle, &world, frame.camera, &light);
            }
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        world: &Matrix4<f32>,
        camera: &Camera,
        light: &Vector3<f32>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                world,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        // Smooth normal in world space for shading
        let normal: Vector3<f32> = triangle.vertices.iter().map(|v| v.normal).sum();
        let normal = world
            .transform_vector(&normal)
            .try_normalize(1e-12)
            .unwrap_or_else(|| triangle.calculate_normal());
        let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).max(0.0);

        // Map brightness to character, skipping the blank first entry
        let steps = LUMINOSITY_RAMP.len() - 1;
        let char_index = 1 + (brightness * (steps - 1) as f32).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(steps)];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw(&mut self) -> io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            self.out.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];
                let color = shade_color(c, self.highlight);
                if current != Some(color) {
                    self.out.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                self.out.queue(Print(c))?;
            }
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Rasterizer for AsciiRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error> {
        self.rasterize(frame);
        self.draw()
    }
}

impl<W: Write> RenderSurface for AsciiRenderer<W> {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = (height as f32 / ROW_SCALE).round() as usize;
        let size = self.width * self.height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
    }

    // One cell per logical pixel; nothing to scale.
    fn set_pixel_ratio(&mut self, _ratio: f32) {}
}

fn shade_color(c: char, highlight: bool) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        '#' | '%' | '@' if highlight => Color::Yellow,
        '#' | '%' | '@' => Color::Cyan,
        _ => Color::White,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
