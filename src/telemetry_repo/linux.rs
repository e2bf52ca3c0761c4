// Linux sysfs/procfs readers: hwmon temperatures, thinkpad_acpi fan, power_supply uevents.

use std::path::{Path, PathBuf};

use super::TelemetryError;
use crate::models::BatterySnapshot;

/// Fan level reported for `disengaged` (full speed, outside firmware control).
pub const FAN_LEVEL_DISENGAGED: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanReading {
    pub rpm: u64,
    pub level: u8,
}

pub(super) fn read_file(path: &Path) -> Result<String, TelemetryError> {
    std::fs::read_to_string(path).map_err(|source| TelemetryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `/proc/acpi/ibm/fan`: a `speed:` and a `level:` line.
/// `disengaged` maps to level 8; any other non-numeric level (e.g. `auto`) to 0.
pub fn parse_fan(text: &str) -> Result<FanReading, TelemetryError> {
    let mut speed = None;
    let mut level = None;
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "speed" => speed = Some(value.trim()),
            "level" => level = Some(value.trim()),
            _ => {}
        }
    }

    let speed = speed.ok_or_else(|| TelemetryError::Parse {
        what: "fan speed",
        value: text.to_string(),
    })?;
    let level = level.ok_or_else(|| TelemetryError::Parse {
        what: "fan level",
        value: text.to_string(),
    })?;

    let rpm = speed.parse::<u64>().map_err(|_| TelemetryError::Parse {
        what: "fan speed",
        value: speed.to_string(),
    })?;
    let level = if level == "disengaged" {
        FAN_LEVEL_DISENGAGED
    } else {
        level.parse::<u8>().unwrap_or(0).min(FAN_LEVEL_DISENGAGED)
    };
    Ok(FanReading { rpm, level })
}

/// Parses a hwmon `temp*_input` value (millidegrees Celsius).
pub fn parse_millidegrees(text: &str) -> Result<u64, TelemetryError> {
    let trimmed = text.trim();
    trimmed.parse::<u64>().map_err(|_| TelemetryError::Parse {
        what: "temperature",
        value: trimmed.to_string(),
    })
}

/// Hottest readable sensor in whole degrees. Unreadable sensors are skipped;
/// fails only when none of them could be read.
pub fn read_max_celsius(sensors: &[PathBuf]) -> Result<u64, TelemetryError> {
    sensors
        .iter()
        .filter_map(|path| read_file(path).and_then(|s| parse_millidegrees(&s)).ok())
        .max()
        .map(|milli| milli / 1000)
        .ok_or(TelemetryError::Unavailable("thermal sensors"))
}

/// Every `temp*_input` under `/sys/class/hwmon/hwmon*`.
pub fn discover_hwmon_sensors(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let mut sensors = Vec::new();
    for entry in entries.flatten() {
        let Ok(files) = std::fs::read_dir(entry.path()) else {
            continue;
        };
        for file in files.flatten() {
            let name = file.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("temp") && name.ends_with("_input") {
                sensors.push(file.path());
            }
        }
    }
    sensors.sort();
    sensors
}

pub fn read_battery(power_supply_dir: &Path, name: &str) -> Result<BatterySnapshot, TelemetryError> {
    let text = read_file(&power_supply_dir.join(name).join("uevent"))?;
    Ok(BatterySnapshot::from_uevent(name, &text))
}

/// All batteries under the power_supply dir. Mains adapters (`AC`, or any
/// supply whose uevent declares a non-battery type) are skipped.
pub fn read_batteries(power_supply_dir: &Path) -> Result<Vec<BatterySnapshot>, TelemetryError> {
    let entries = std::fs::read_dir(power_supply_dir).map_err(|source| TelemetryError::Io {
        path: power_supply_dir.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.eq_ignore_ascii_case("ac"))
        .collect();
    names.sort();

    let mut batteries = Vec::with_capacity(names.len());
    for name in names {
        let text = read_file(&power_supply_dir.join(&name).join("uevent"))?;
        let is_battery = text
            .lines()
            .filter_map(|l| l.split_once('='))
            .find(|(k, _)| k.trim_start_matches("POWER_SUPPLY_") == "TYPE")
            .is_none_or(|(_, v)| v.trim() == "Battery");
        if is_battery {
            batteries.push(BatterySnapshot::from_uevent(&name, &text));
        }
    }
    Ok(batteries)
}
