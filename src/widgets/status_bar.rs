// Full-width strip: clock on the left, every reading on the right.

use super::{Layer, Widget, metric_label};
use crate::models::MetricId;
use crate::redraw::Topic;
use crate::state::{Telemetry, lock};
use crate::surface::{Font, Rgba};

const BACKGROUND: Rgba = Rgba::grey(0xcc);
const SEPARATOR: &str = "  |  ";

pub struct StatusBar {
    layer: Layer,
    padding: u32,
}

impl StatusBar {
    /// Spans the screen width along its top edge.
    pub fn new(screen_width: u32, screen_height: u32, padding: u32, font: &dyn Font) -> Self {
        let height = font.height() + 2 * padding;
        Self {
            layer: Layer::new(0.0, screen_height as f32, screen_width, height),
            padding,
        }
    }
}

/// Right-hand text: memory, fan, thermal, cpu, network, battery. Empty
/// sections (no interfaces, no battery) are left out.
pub fn status_line(telemetry: &Telemetry) -> String {
    let mut parts = vec![
        metric_label(MetricId::Memory, telemetry),
        metric_label(MetricId::Fan, telemetry),
        metric_label(MetricId::Thermal, telemetry),
        metric_label(MetricId::Cpu, telemetry),
    ];
    let network = lock(&telemetry.network).summary();
    if !network.is_empty() {
        parts.push(network);
    }
    if let Some(battery) = lock(&telemetry.battery).as_ref() {
        parts.push(battery.summary());
    }
    parts.join(SEPARATOR)
}

impl Widget for StatusBar {
    fn topics(&self) -> &'static [Topic] {
        &[Topic::Metrics, Topic::Status]
    }

    fn paint(&mut self, telemetry: &Telemetry, font: &dyn Font) {
        let surface = &mut self.layer.surface;
        surface.fill(BACKGROUND);

        let y = self.padding as i64;
        let clock = lock(&telemetry.clock).clone();
        surface.draw_text(font, font.advance() as i64, y, &clock, Rgba::BLACK);

        let line = status_line(telemetry);
        let right = surface.width() as i64 - (font.measure(&line) + font.advance()) as i64;
        surface.draw_text(font, right, y, &line, Rgba::BLACK);
    }

    fn layer(&self) -> &Layer {
        &self.layer
    }

    fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatterySnapshot, InterfaceCounters};
    use crate::surface::BitmapFont;
    use std::time::{Duration, Instant};

    #[test]
    fn status_line_joins_every_section() {
        let t = Telemetry::new(10, 0.0, 10_000.0);
        lock(&t.memory).record(41.5);
        lock(&t.fan).record(3200, 8);
        lock(&t.thermal).record(52.0);
        lock(&t.cpu).record(7.25);
        let t0 = Instant::now();
        let lan = |recv| InterfaceCounters {
            name: "lan".into(),
            bytes_recv: recv,
            bytes_sent: 0,
        };
        lock(&t.network).update(&[lan(0)], t0);
        lock(&t.network).update(&[lan(1024)], t0 + Duration::from_secs(1));
        *lock(&t.battery) = Some(BatterySnapshot::from_uevent(
            "BAT0",
            "STATUS=Unknown\nENERGY_FULL=100\nENERGY_NOW=0\n",
        ));

        assert_eq!(
            status_line(&t),
            "41.50% RAM  |  3200 RPM L8  |  52C  |  7.25% CPU  |  1.0-lan-0.0  |  idle 0%"
        );
    }

    #[test]
    fn bar_height_fits_one_text_row() {
        let bar = StatusBar::new(800, 600, 3, &BitmapFont);
        assert_eq!(bar.layer().surface.height(), BitmapFont.height() + 6);
        assert_eq!(bar.layer().surface.width(), 800);
    }

    #[test]
    fn paint_fills_background_and_draws_text() {
        let t = Telemetry::new(10, 0.0, 10_000.0);
        *lock(&t.clock) = "12:00 01.01.2026".into();
        let mut bar = StatusBar::new(400, 300, 3, &BitmapFont);
        bar.paint(&t, &BitmapFont);
        let surface = &bar.layer().surface;
        assert_eq!(surface.pixel(0, 0), Some(BACKGROUND));
        let inked = surface
            .as_bytes()
            .chunks_exact(4)
            .filter(|p| p[0] == 0 && p[3] == 0xff)
            .count();
        assert!(inked > 0);
    }
}
