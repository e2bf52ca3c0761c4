// Shared test helpers
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use statusglass::models::{BatterySnapshot, InterfaceCounters};
use statusglass::telemetry_repo::{FanReading, TelemetryError, TelemetrySource};

pub const DISCHARGING_UEVENT: &str = "POWER_SUPPLY_NAME=BAT0
POWER_SUPPLY_STATUS=Discharging
POWER_SUPPLY_ENERGY_FULL=50000000
POWER_SUPPLY_ENERGY_NOW=25000000
POWER_SUPPLY_POWER_NOW=10000000
";

pub const FAN_DISENGAGED: &str = "status:\t\tenabled\nspeed:\t\t3200\nlevel:\t\tdisengaged\n";

/// Canned readings. While `fail` is set every fallible read errors out.
#[derive(Default)]
pub struct FakeSource {
    pub fail: AtomicBool,
    pub reads: AtomicUsize,
    pub counters: Mutex<Vec<InterfaceCounters>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_counters(&self, counters: Vec<InterfaceCounters>) {
        *self.counters.lock().unwrap() = counters;
    }

    fn give<T>(&self, what: &'static str, value: T) -> Result<T, TelemetryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(TelemetryError::Unavailable(what));
        }
        Ok(value)
    }
}

impl TelemetrySource for FakeSource {
    fn cpu_percent(&self) -> Result<f64, TelemetryError> {
        self.give("cpu", 12.5)
    }

    fn memory_percent(&self) -> Result<f64, TelemetryError> {
        self.give("memory", 40.0)
    }

    fn thermal_celsius(&self) -> Result<u64, TelemetryError> {
        self.give("thermal", 52)
    }

    fn fan(&self) -> Result<FanReading, TelemetryError> {
        self.give("fan", FanReading { rpm: 3200, level: 2 })
    }

    fn network_counters(&self) -> Result<Vec<InterfaceCounters>, TelemetryError> {
        let counters = self.counters.lock().unwrap().clone();
        self.give("network", counters)
    }

    fn battery(&self) -> Result<BatterySnapshot, TelemetryError> {
        self.give(
            "battery",
            BatterySnapshot::from_uevent("BAT0", DISCHARGING_UEVENT),
        )
    }

    fn clock(&self) -> String {
        "12:00 01.01.2026".into()
    }
}

pub fn counters(name: &str, recv: u64, sent: u64) -> InterfaceCounters {
    InterfaceCounters {
        name: name.into(),
        bytes_recv: recv,
        bytes_sent: sent,
    }
}

/// Writes `contents` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}
