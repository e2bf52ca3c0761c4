use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::models::MetricId;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub sampling: SamplingConfig,
    pub sensors: SensorsConfig,
    pub network: NetworkConfig,
    pub graphs: GraphsConfig,
    pub status_bar: StatusBarConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screen size the widgets are laid out against.
    pub width: u32,
    pub height: u32,
    /// Upper bound between two frames even when nothing signalled a change.
    pub max_redraw_delay_secs: u64,
    /// Bounded redraw trigger queue; triggers are dropped once it is half full.
    pub redraw_queue_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1366,
            height: 768,
            max_redraw_delay_secs: 20,
            redraw_queue_capacity: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub cpu_interval_ms: u64,
    pub memory_interval_ms: u64,
    pub thermal_interval_ms: u64,
    pub fan_interval_ms: u64,
    pub clock_interval_ms: u64,
    pub network_interval_ms: u64,
    pub battery_interval_ms: u64,
    /// Samples kept per metric.
    pub history_len: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cpu_interval_ms: 5000,
            memory_interval_ms: 10_000,
            thermal_interval_ms: 5000,
            fan_interval_ms: 5000,
            clock_interval_ms: 5000,
            network_interval_ms: 5000,
            battery_interval_ms: 10_000,
            history_len: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    /// Millidegree `temp*_input` files; the hottest one wins. Empty = discover under /sys/class/hwmon.
    pub thermal: Vec<PathBuf>,
    pub fan: PathBuf,
    pub power_supply_dir: PathBuf,
    pub battery: String,
    pub fan_min_rpm: f64,
    pub fan_max_rpm: f64,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            thermal: (1..=3)
                .map(|i| {
                    PathBuf::from(format!(
                        "/sys/devices/platform/coretemp.0/hwmon/hwmon0/temp{i}_input"
                    ))
                })
                .collect(),
            fan: PathBuf::from("/proc/acpi/ibm/fan"),
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
            battery: "BAT0".into(),
            fan_min_rpm: 0.0,
            fan_max_rpm: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub ignore: Vec<String>,
    /// Interface name -> display name.
    pub aliases: HashMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ignore: vec!["lo".into()],
            aliases: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphsConfig {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
    /// Horizontal pixels per sample.
    pub pitch: u32,
    pub graph_height: u32,
    /// Vertical distance between the tops of two stacked graphs.
    pub spacing: u32,
    pub metrics: Vec<MetricId>,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            x: 20.0,
            y: 768.0 - 36.0,
            width: 300,
            height: 200,
            pitch: 8,
            graph_height: 40,
            spacing: 60,
            metrics: vec![MetricId::Thermal, MetricId::Fan],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusBarConfig {
    pub padding: u32,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self { padding: 3 }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`). A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found, using defaults");
                Self::load_from_str("")
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.display.width > 0 && self.display.height > 0,
            "display.width and display.height must be > 0, got {}x{}",
            self.display.width,
            self.display.height
        );
        anyhow::ensure!(
            self.display.max_redraw_delay_secs > 0,
            "display.max_redraw_delay_secs must be > 0, got {}",
            self.display.max_redraw_delay_secs
        );
        anyhow::ensure!(
            self.display.redraw_queue_capacity >= 2,
            "display.redraw_queue_capacity must be >= 2, got {}",
            self.display.redraw_queue_capacity
        );
        for (key, value) in [
            ("cpu_interval_ms", self.sampling.cpu_interval_ms),
            ("memory_interval_ms", self.sampling.memory_interval_ms),
            ("thermal_interval_ms", self.sampling.thermal_interval_ms),
            ("fan_interval_ms", self.sampling.fan_interval_ms),
            ("clock_interval_ms", self.sampling.clock_interval_ms),
            ("network_interval_ms", self.sampling.network_interval_ms),
            ("battery_interval_ms", self.sampling.battery_interval_ms),
        ] {
            anyhow::ensure!(value > 0, "sampling.{} must be > 0, got {}", key, value);
        }
        anyhow::ensure!(
            self.sampling.history_len > 0,
            "sampling.history_len must be > 0, got {}",
            self.sampling.history_len
        );
        anyhow::ensure!(
            self.sensors.fan_max_rpm > self.sensors.fan_min_rpm,
            "sensors.fan_max_rpm must be > sensors.fan_min_rpm, got {}..{}",
            self.sensors.fan_min_rpm,
            self.sensors.fan_max_rpm
        );
        anyhow::ensure!(
            self.graphs.width > 0 && self.graphs.height > 0,
            "graphs.width and graphs.height must be > 0, got {}x{}",
            self.graphs.width,
            self.graphs.height
        );
        anyhow::ensure!(
            self.graphs.pitch > 0,
            "graphs.pitch must be > 0, got {}",
            self.graphs.pitch
        );
        anyhow::ensure!(
            self.graphs.graph_height > 0,
            "graphs.graph_height must be > 0, got {}",
            self.graphs.graph_height
        );
        Ok(())
    }
}
