// Raw telemetry reads: sysinfo for cpu/memory/network, sysfs for the rest.

pub mod linux;

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use sysinfo::{Networks, System};
use tracing::instrument;

use crate::config::SensorsConfig;
use crate::models::{BatterySnapshot, InterfaceCounters};
use crate::state::lock;
pub use linux::FanReading;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {what}: {value:?}")]
    Parse { what: &'static str, value: String },
    #[error("{0} unavailable")]
    Unavailable(&'static str),
}

/// Blocking reads of the machine's current state. Implementations are
/// called from `spawn_blocking`, one probe at a time per cadence.
pub trait TelemetrySource: Send + Sync + 'static {
    fn cpu_percent(&self) -> Result<f64, TelemetryError>;
    fn memory_percent(&self) -> Result<f64, TelemetryError>;
    /// Hottest sensor, whole degrees Celsius.
    fn thermal_celsius(&self) -> Result<u64, TelemetryError>;
    fn fan(&self) -> Result<FanReading, TelemetryError>;
    /// Cumulative counters for every interface, unfiltered.
    fn network_counters(&self) -> Result<Vec<InterfaceCounters>, TelemetryError>;
    fn battery(&self) -> Result<BatterySnapshot, TelemetryError>;

    fn clock(&self) -> String {
        chrono::Local::now().format("%H:%M %d.%m.%Y").to_string()
    }
}

pub struct SystemTelemetry {
    sys: Mutex<System>,
    networks: Mutex<Networks>,
    cpu_primed: AtomicBool,
    thermal_sensors: Vec<PathBuf>,
    fan_path: PathBuf,
    power_supply_dir: PathBuf,
    battery: String,
}

impl SystemTelemetry {
    pub fn new(sensors: &SensorsConfig) -> Self {
        let thermal_sensors = if sensors.thermal.is_empty() {
            linux::discover_hwmon_sensors(std::path::Path::new("/sys/class/hwmon"))
        } else {
            sensors.thermal.clone()
        };
        tracing::debug!(sensors = thermal_sensors.len(), "thermal sensors configured");
        Self {
            sys: Mutex::new(System::new()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            cpu_primed: AtomicBool::new(false),
            thermal_sensors,
            fan_path: sensors.fan.clone(),
            power_supply_dir: sensors.power_supply_dir.clone(),
            battery: sensors.battery.clone(),
        }
    }
}

impl TelemetrySource for SystemTelemetry {
    #[instrument(skip(self), fields(repo = "telemetry", operation = "cpu_percent"))]
    fn cpu_percent(&self) -> Result<f64, TelemetryError> {
        let mut sys = lock(&self.sys);
        // Usage is a delta between two refreshes; the very first read needs a baseline.
        if !self.cpu_primed.swap(true, Ordering::Relaxed) {
            sys.refresh_cpu_usage();
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        }
        sys.refresh_cpu_usage();
        Ok((sys.global_cpu_usage() as f64).clamp(0.0, 100.0))
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "memory_percent"))]
    fn memory_percent(&self) -> Result<f64, TelemetryError> {
        let mut sys = lock(&self.sys);
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(TelemetryError::Unavailable("memory totals"));
        }
        let used = total.saturating_sub(sys.available_memory());
        Ok(used as f64 / total as f64 * 100.0)
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "thermal_celsius"))]
    fn thermal_celsius(&self) -> Result<u64, TelemetryError> {
        linux::read_max_celsius(&self.thermal_sensors)
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "fan"))]
    fn fan(&self) -> Result<FanReading, TelemetryError> {
        linux::parse_fan(&linux::read_file(&self.fan_path)?)
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "network_counters"))]
    fn network_counters(&self) -> Result<Vec<InterfaceCounters>, TelemetryError> {
        let mut networks = lock(&self.networks);
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| InterfaceCounters {
                name: name.clone(),
                bytes_recv: data.total_received(),
                bytes_sent: data.total_transmitted(),
            })
            .collect())
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "battery"))]
    fn battery(&self) -> Result<BatterySnapshot, TelemetryError> {
        if self.battery.is_empty() {
            return linux::read_batteries(&self.power_supply_dir)?
                .into_iter()
                .next()
                .ok_or(TelemetryError::Unavailable("battery"));
        }
        linux::read_battery(&self.power_supply_dir, &self.battery)
    }
}
