// Shared telemetry: written by sampler tasks, read by widgets at render time.
// One lock per metric group so a slow writer never blocks unrelated readers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::AppConfig;
use crate::models::{BatterySnapshot, FanState, Metric, MetricId, NetworkTable};

pub struct Telemetry {
    pub cpu: Mutex<Metric>,
    pub memory: Mutex<Metric>,
    pub thermal: Mutex<Metric>,
    pub fan: Mutex<FanState>,
    pub network: Mutex<NetworkTable>,
    pub battery: Mutex<Option<BatterySnapshot>>,
    pub clock: Mutex<String>,
}

impl Telemetry {
    pub fn new(history_len: usize, fan_min: f64, fan_max: f64) -> Self {
        Self {
            cpu: Mutex::new(Metric::new(MetricId::Cpu, history_len)),
            memory: Mutex::new(Metric::new(MetricId::Memory, history_len)),
            thermal: Mutex::new(Metric::new(MetricId::Thermal, history_len)),
            fan: Mutex::new(FanState::new(history_len, fan_min, fan_max)),
            network: Mutex::new(NetworkTable::new()),
            battery: Mutex::new(None),
            clock: Mutex::new(String::new()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.sampling.history_len,
            config.sensors.fan_min_rpm,
            config.sensors.fan_max_rpm,
        )
    }

    /// Runs `f` against the series-backed metric `id` under its lock.
    pub fn with_metric<R>(&self, id: MetricId, f: impl FnOnce(&Metric) -> R) -> R {
        match id {
            MetricId::Cpu => f(&lock(&self.cpu)),
            MetricId::Memory => f(&lock(&self.memory)),
            MetricId::Thermal => f(&lock(&self.thermal)),
            MetricId::Fan => f(&lock(&self.fan).rpm),
        }
    }
}

/// Locks a metric group. A writer that panicked mid-update can only leave a
/// stale value behind, so a poisoned lock is still readable.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
