//! CPU-side RGBA canvas that widgets paint into before the bytes are
//! uploaded to a texture.
//!
//! Coordinates are pixels with the origin at the top-left corner. Anything
//! drawn outside the canvas is clipped; the canvas never grows.

pub mod font;

pub use font::{BitmapFont, Font};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0x00, 0x00, 0x00, 0xff);

    pub const fn grey(level: u8) -> Rgba {
        Rgba(level, level, level, 0xff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some(Rgba(p[0], p[1], p[2], p[3]))
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.0, color.1, color.2, color.3]);
    }

    pub fn fill(&mut self, color: Rgba) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, color.3]);
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width as i64);
        let y1 = (y + h as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// 1px line between two points (Bresenham), endpoints included.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Rgba) {
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Connects consecutive points with 1px segments.
    pub fn stroke_polyline(&mut self, points: &[Point], color: Rgba) {
        match points {
            [] => {}
            [only] => self.set_pixel(only.x.round() as i64, only.y.round() as i64, color),
            _ => {
                for pair in points.windows(2) {
                    self.draw_line(pair[0], pair[1], color);
                }
            }
        }
    }

    /// Draws `text` with its top-left at `(x, y)` and returns the cursor
    /// after the last glyph. `\n` returns to `x` one line lower, space and
    /// tab advance by one and two cells, glyphs the font lacks are skipped
    /// without moving the cursor.
    pub fn draw_text(&mut self, font: &dyn Font, x: i64, y: i64, text: &str, color: Rgba) -> (i64, i64) {
        let advance = font.advance() as i64;
        let (mut cx, mut cy) = (x, y);
        for ch in text.chars() {
            match ch {
                '\n' => {
                    cx = x;
                    cy += font.line_height() as i64;
                }
                ' ' => cx += advance,
                '\t' => cx += advance * 2,
                _ => {
                    if font.draw_glyph(self, cx, cy, ch, color) {
                        cx += advance;
                    }
                }
            }
        }
        (cx, cy)
    }
}
