use anyhow::Result;
use statusglass::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        width = app_config.display.width,
        height = app_config.display.height,
        "Starting overlay"
    );

    let source: Arc<dyn telemetry_repo::TelemetrySource> =
        Arc::new(telemetry_repo::SystemTelemetry::new(&app_config.sensors));
    let telemetry = Arc::new(state::Telemetry::from_config(&app_config));
    let mut coordinator = redraw::RedrawCoordinator::new(
        app_config.display.redraw_queue_capacity,
        Duration::from_secs(app_config.display.max_redraw_delay_secs),
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let sampler_handles = sampler::spawn_samplers(
        sampler::SamplerDeps {
            source,
            telemetry: telemetry.clone(),
            updates: coordinator.updates(),
            network: Arc::new(app_config.network.clone()),
            shutdown_rx,
        },
        &app_config.sampling,
    );
    forward_resizes(coordinator.trigger_handle());

    // No windowing backend is linked: frames go to the in-memory context.
    let mut ctx = gpu::HeadlessContext::new();
    let mut overlay = render_loop::Overlay::new(&app_config, Box::new(surface::BitmapFont));

    let result = render_loop::run(
        &mut overlay,
        &mut coordinator,
        &telemetry,
        &mut ctx,
        shutdown_signal(),
    )
    .await;

    let _ = shutdown_tx.send(true);
    for handle in sampler_handles {
        let _ = handle.await;
    }

    match &result {
        Ok(()) => tracing::info!(
            frames = ctx.frames,
            uploads = ctx.uploads,
            "Overlay stopped"
        ),
        Err(e) => tracing::error!(error = %e, "Overlay failed"),
    }
    result
}

/// Terminal resizes arrive as SIGWINCH and become redraw triggers.
#[cfg(unix)]
fn forward_resizes(trigger: redraw::RedrawTrigger) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut winch = match signal(SignalKind::window_change()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, operation = "sigwinch", "resize notifications unavailable");
            return;
        }
    };
    tokio::spawn(async move {
        while winch.recv().await.is_some() {
            if !trigger.trigger() {
                tracing::debug!(pending = trigger.pending(), "redraw trigger dropped");
            }
        }
    });
}

#[cfg(not(unix))]
fn forward_resizes(_trigger: redraw::RedrawTrigger) {}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
