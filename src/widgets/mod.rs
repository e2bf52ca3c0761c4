// Overlay widgets: each repaints a pixel surface from telemetry and pushes
// it into its own texture.

mod graph_panel;
mod status_bar;

pub use graph_panel::GraphPanel;
pub use status_bar::StatusBar;

use crate::gpu::{GraphicsContext, GraphicsError};
use crate::models::MetricId;
use crate::redraw::Topic;
use crate::state::{Telemetry, lock};
use crate::surface::{Font, PixelSurface};
use crate::texture::TextureWidget;

/// A pixel surface and the texture it is uploaded into, same size.
#[derive(Debug)]
pub struct Layer {
    pub surface: PixelSurface,
    pub texture: TextureWidget,
}

impl Layer {
    pub fn new(x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            surface: PixelSurface::new(width, height),
            texture: TextureWidget::setup(x, y, width, height),
        }
    }

    pub fn upload(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), GraphicsError> {
        self.texture.write(ctx, self.surface.as_bytes())
    }
}

pub trait Widget {
    /// Updates on these topics make the widget repaint.
    fn topics(&self) -> &'static [Topic];
    /// Repaints the whole surface from current telemetry.
    fn paint(&mut self, telemetry: &Telemetry, font: &dyn Font);
    fn layer(&self) -> &Layer;
    fn layer_mut(&mut self) -> &mut Layer;

    fn refresh(
        &mut self,
        telemetry: &Telemetry,
        font: &dyn Font,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<(), GraphicsError> {
        self.paint(telemetry, font);
        self.layer_mut().upload(ctx)
    }

    fn draw(&self, ctx: &mut dyn GraphicsContext) {
        self.layer().texture.draw(ctx);
    }
}

/// Short value label for a metric, e.g. `52C` or `3200 RPM L2`.
pub fn metric_label(id: MetricId, telemetry: &Telemetry) -> String {
    match id {
        MetricId::Cpu => format!("{:.2}% CPU", lock(&telemetry.cpu).current),
        MetricId::Memory => format!("{:.2}% RAM", lock(&telemetry.memory).current),
        MetricId::Thermal => format!("{:.0}C", lock(&telemetry.thermal).current),
        MetricId::Fan => {
            let fan = lock(&telemetry.fan);
            format!("{:.0} RPM L{}", fan.rpm.current, fan.level)
        }
    }
}
