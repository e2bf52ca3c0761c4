// Stepped line graphs: one flat `pitch`-wide segment per sample.

use crate::series::{SeriesBuffer, normalize};
use crate::surface::{PixelSurface, Point, Rgba};

/// Where a graph goes inside a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphArea {
    /// Pixels available for the line, starting at x = 0.
    pub available_width: u32,
    /// Horizontal pixels per sample.
    pub pitch: u32,
    pub height: f64,
    /// Top of the graph within the surface.
    pub y_offset: f64,
}

/// How many samples fit; older ones are left out, never averaged in.
pub fn max_items(available_width: u32, pitch: u32) -> usize {
    available_width.checked_div(pitch).unwrap_or(0) as usize
}

/// Polyline for the most recent samples that fit `area`, scaled against the
/// series' bounds. Two points per sample: `(i*pitch, y)` and `(i*pitch + pitch, y)`.
pub fn step_points(series: &SeriesBuffer, area: &GraphArea) -> Vec<Point> {
    let Some((min, max)) = series.bounds() else {
        return Vec::new();
    };
    let window = series.window(max_items(area.available_width, area.pitch));
    let pitch = area.pitch as f64;
    let mut points = Vec::with_capacity(window.len() * 2);
    for (i, value) in window.enumerate() {
        let y = normalize(value, min, max, area.height) + area.y_offset;
        let x = i as f64 * pitch;
        points.push(Point::new(x, y));
        points.push(Point::new(x + pitch, y));
    }
    points
}

pub fn draw_graph(surface: &mut PixelSurface, series: &SeriesBuffer, area: &GraphArea, color: Rgba) {
    surface.stroke_polyline(&step_points(series, area), color);
}
