// The render reactor. Runs on the thread that owns the graphics context:
// waits for a redraw reason, repaints the widgets it concerns, then draws
// every widget.

use std::future::Future;

use anyhow::Context;

use crate::config::AppConfig;
use crate::gpu::{GraphicsContext, GraphicsError};
use crate::redraw::{RedrawCoordinator, Topic, Wake};
use crate::state::Telemetry;
use crate::surface::Font;
use crate::widgets::{GraphPanel, StatusBar, Widget};

pub struct Overlay {
    widgets: Vec<Box<dyn Widget>>,
    font: Box<dyn Font>,
}

impl Overlay {
    /// Status bar along the top edge plus the graph panel.
    pub fn new(config: &AppConfig, font: Box<dyn Font>) -> Self {
        let widgets: Vec<Box<dyn Widget>> = vec![
            Box::new(StatusBar::new(
                config.display.width,
                config.display.height,
                config.status_bar.padding,
                font.as_ref(),
            )),
            Box::new(GraphPanel::new(&config.graphs, font.as_ref())),
        ];
        Self { widgets, font }
    }

    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    /// Repaints and uploads the widgets subscribed to `topic`, or all of them
    /// for `None`. Returns how many were refreshed.
    pub fn refresh(
        &mut self,
        topic: Option<Topic>,
        telemetry: &Telemetry,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<usize, GraphicsError> {
        let mut refreshed = 0;
        for widget in &mut self.widgets {
            if topic.is_none_or(|t| widget.topics().contains(&t)) {
                widget.refresh(telemetry, self.font.as_ref(), ctx)?;
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }

    /// One frame: every widget is drawn whether or not it changed.
    pub fn draw_frame(&self, ctx: &mut dyn GraphicsContext) {
        ctx.begin_frame();
        for widget in &self.widgets {
            widget.draw(ctx);
        }
        ctx.end_frame();
    }
}

/// Which widgets a wake-up concerns. Triggers and timeouts repaint everything.
pub fn wake_topic(wake: Wake) -> Option<Topic> {
    match wake {
        Wake::Updated(topic) => Some(topic),
        Wake::Trigger | Wake::Timeout => None,
    }
}

/// Paints once, then redraws on every wake until `shutdown` resolves.
/// Graphics failures are fatal.
pub async fn run(
    overlay: &mut Overlay,
    coordinator: &mut RedrawCoordinator,
    telemetry: &Telemetry,
    ctx: &mut dyn GraphicsContext,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    overlay
        .refresh(None, telemetry, ctx)
        .context("initial paint")?;
    overlay.draw_frame(ctx);
    tracing::info!(widgets = overlay.widgets.len(), "overlay ready");

    tokio::pin!(shutdown);
    loop {
        let wake = tokio::select! {
            wake = coordinator.wait() => wake,
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal");
                return Ok(());
            }
        };
        let refreshed = overlay
            .refresh(wake_topic(wake), telemetry, ctx)
            .with_context(|| format!("redraw after {:?}", wake))?;
        tracing::trace!(?wake, refreshed, "frame");
        overlay.draw_frame(ctx);
    }
}
