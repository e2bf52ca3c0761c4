// Battery state derived from a power_supply uevent block

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeStatus {
    Charging,
    Discharging,
    Full,
    NotCharging,
    /// Reported by the kernel as `Unknown`.
    Idle,
    Other(String),
}

impl ChargeStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Charging" => ChargeStatus::Charging,
            "Discharging" => ChargeStatus::Discharging,
            "Full" => ChargeStatus::Full,
            "Not charging" => ChargeStatus::NotCharging,
            "Unknown" | "" => ChargeStatus::Idle,
            other => ChargeStatus::Other(other.to_string()),
        }
    }

    /// Lowercase label used in the status bar.
    pub fn label(&self) -> String {
        match self {
            ChargeStatus::Charging => "charging".into(),
            ChargeStatus::Discharging => "discharging".into(),
            ChargeStatus::Full => "full".into(),
            ChargeStatus::NotCharging => "not charging".into(),
            ChargeStatus::Idle => "idle".into(),
            ChargeStatus::Other(s) => s.to_lowercase(),
        }
    }
}

/// One battery reading. Every field is derived from a single uevent read;
/// nothing is carried over from earlier snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySnapshot {
    pub id: String,
    pub status: ChargeStatus,
    /// Energy now, in units of 10 mWh.
    pub capacity: f64,
    /// Energy when full, in units of 10 mWh.
    pub capacity_full: f64,
    pub percent: f64,
    /// Power draw, in units of 10 mW (shown as mA).
    pub amps: f64,
    /// Time to empty (discharging) or to full (charging) as `HH:MM`.
    pub remaining: String,
}

impl BatterySnapshot {
    /// Parses `KEY=value` lines. Keys may carry the `POWER_SUPPLY_` prefix.
    /// Missing or malformed numeric fields read as zero.
    pub fn from_uevent(id: &str, text: &str) -> Self {
        let vars: HashMap<&str, &str> = text
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().trim_start_matches("POWER_SUPPLY_"), v.trim()))
            .collect();
        let number = |key: &str| -> u64 {
            vars.get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
        };

        let status = ChargeStatus::parse(vars.get("STATUS").copied().unwrap_or_default());
        let capacity_full = (number("ENERGY_FULL") / 10_000) as f64;
        let capacity = (number("ENERGY_NOW") / 10_000) as f64;
        let amps = (number("POWER_NOW") / 10_000) as f64;

        let percent = if capacity_full > 0.0 {
            capacity * 100.0 / capacity_full
        } else {
            0.0
        };

        let hours = if amps > 0.0 {
            match status {
                ChargeStatus::Charging => (capacity_full - capacity).max(0.0) / amps,
                ChargeStatus::Discharging => capacity / amps,
                _ => 0.0,
            }
        } else {
            0.0
        };

        Self {
            id: id.to_string(),
            status,
            capacity,
            capacity_full,
            percent,
            amps,
            remaining: format_hours(hours),
        }
    }

    /// `"idle 50%"` when idle, otherwise `"discharging 02:30h 1000mA 50%"`.
    pub fn summary(&self) -> String {
        match self.status {
            ChargeStatus::Idle => format!("idle {:.0}%", self.percent),
            _ => format!(
                "{} {}h {:.0}mA {:.0}%",
                self.status.label(),
                self.remaining,
                self.amps,
                self.percent
            ),
        }
    }
}

fn format_hours(hours: f64) -> String {
    let seconds = (hours * 3600.0) as i64;
    let h = seconds / 3600;
    let m = (seconds - h * 3600) / 60;
    format!("{:02}:{:02}", h, m)
}
