// Periodic telemetry probes.
// Probes that share an interval and a topic run in one task, one after
// another; the task then signals the render loop once per tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::{NetworkConfig, SamplingConfig};
use crate::models::{BatterySnapshot, InterfaceCounters, NetworkTable};
use crate::redraw::{Topic, Updates};
use crate::state::{Telemetry, lock};
use crate::telemetry_repo::{FanReading, TelemetryError, TelemetrySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    Cpu,
    Memory,
    Thermal,
    Fan,
    Clock,
    Network,
    Battery,
}

impl Probe {
    pub const ALL: [Probe; 7] = [
        Probe::Cpu,
        Probe::Memory,
        Probe::Thermal,
        Probe::Fan,
        Probe::Clock,
        Probe::Network,
        Probe::Battery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Probe::Cpu => "cpu",
            Probe::Memory => "memory",
            Probe::Thermal => "thermal",
            Probe::Fan => "fan",
            Probe::Clock => "clock",
            Probe::Network => "network",
            Probe::Battery => "battery",
        }
    }

    /// Graphed metrics are `Metrics`; text-only readings are `Status`.
    pub fn topic(self) -> Topic {
        match self {
            Probe::Cpu | Probe::Memory | Probe::Thermal | Probe::Fan => Topic::Metrics,
            Probe::Clock | Probe::Network | Probe::Battery => Topic::Status,
        }
    }

    pub fn interval(self, sampling: &SamplingConfig) -> Duration {
        Duration::from_millis(match self {
            Probe::Cpu => sampling.cpu_interval_ms,
            Probe::Memory => sampling.memory_interval_ms,
            Probe::Thermal => sampling.thermal_interval_ms,
            Probe::Fan => sampling.fan_interval_ms,
            Probe::Clock => sampling.clock_interval_ms,
            Probe::Network => sampling.network_interval_ms,
            Probe::Battery => sampling.battery_interval_ms,
        })
    }
}

/// One sampler task's work: probes run in order on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cadence {
    pub period: Duration,
    pub topic: Topic,
    pub probes: Vec<Probe>,
}

/// Groups probes by (interval, topic), keeping `Probe::ALL` order.
pub fn schedule(sampling: &SamplingConfig) -> Vec<Cadence> {
    let mut cadences: Vec<Cadence> = Vec::new();
    for probe in Probe::ALL {
        let period = probe.interval(sampling);
        let topic = probe.topic();
        match cadences
            .iter_mut()
            .find(|c| c.period == period && c.topic == topic)
        {
            Some(cadence) => cadence.probes.push(probe),
            None => cadences.push(Cadence {
                period,
                topic,
                probes: vec![probe],
            }),
        }
    }
    cadences
}

/// One successful probe read, not yet applied.
#[derive(Debug, Clone)]
pub enum Reading {
    Cpu(f64),
    Memory(f64),
    Thermal(u64),
    Fan(FanReading),
    Clock(String),
    Network(Vec<InterfaceCounters>),
    Battery(BatterySnapshot),
}

/// Blocking read for one probe.
pub fn read(probe: Probe, source: &dyn TelemetrySource) -> Result<Reading, TelemetryError> {
    Ok(match probe {
        Probe::Cpu => Reading::Cpu(source.cpu_percent()?),
        Probe::Memory => Reading::Memory(source.memory_percent()?),
        Probe::Thermal => Reading::Thermal(source.thermal_celsius()?),
        Probe::Fan => Reading::Fan(source.fan()?),
        Probe::Clock => Reading::Clock(source.clock()),
        Probe::Network => Reading::Network(source.network_counters()?),
        Probe::Battery => Reading::Battery(source.battery()?),
    })
}

/// Writes a reading into shared state, holding only that group's lock.
pub fn apply(reading: Reading, telemetry: &Telemetry, network: &NetworkConfig) {
    match reading {
        Reading::Cpu(v) => lock(&telemetry.cpu).record(v),
        Reading::Memory(v) => lock(&telemetry.memory).record(v),
        Reading::Thermal(c) => lock(&telemetry.thermal).record(c as f64),
        Reading::Fan(fan) => lock(&telemetry.fan).record(fan.rpm, fan.level),
        Reading::Clock(text) => *lock(&telemetry.clock) = text,
        Reading::Network(counters) => apply_network(
            &mut lock(&telemetry.network),
            counters,
            network,
            Instant::now(),
        ),
        Reading::Battery(snapshot) => *lock(&telemetry.battery) = Some(snapshot),
    }
}

/// Drops ignored and idle (never received anything) interfaces and renames
/// the rest through the alias table.
pub fn filter_interfaces(
    counters: Vec<InterfaceCounters>,
    config: &NetworkConfig,
) -> Vec<InterfaceCounters> {
    counters
        .into_iter()
        .filter(|c| c.bytes_recv > 0 && !config.ignore.contains(&c.name))
        .map(|mut c| {
            if let Some(alias) = config.aliases.get(&c.name) {
                c.name = alias.clone();
            }
            c
        })
        .collect()
}

pub fn apply_network(
    table: &mut NetworkTable,
    counters: Vec<InterfaceCounters>,
    config: &NetworkConfig,
    now: Instant,
) {
    table.update(&filter_interfaces(counters, config), now);
}

/// Reads one probe off the runtime and applies it. A failed read leaves the
/// previous value in place.
pub async fn sample(
    probe: Probe,
    source: &Arc<dyn TelemetrySource>,
    telemetry: &Telemetry,
    network: &NetworkConfig,
) {
    let source = source.clone();
    match tokio::task::spawn_blocking(move || read(probe, source.as_ref())).await {
        Ok(Ok(reading)) => apply(reading, telemetry, network),
        Ok(Err(e)) => {
            tracing::debug!(
                error = %e,
                operation = probe.as_str(),
                "telemetry read failed, keeping last value"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = probe.as_str(),
                "telemetry read task failed"
            );
        }
    }
}

/// Shared handles for every sampler task.
#[derive(Clone)]
pub struct SamplerDeps {
    pub source: Arc<dyn TelemetrySource>,
    pub telemetry: Arc<Telemetry>,
    pub updates: Arc<Updates>,
    pub network: Arc<NetworkConfig>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Spawns one task per cadence. Tasks stop between ticks once shutdown is
/// signalled (or its sender is dropped).
pub fn spawn_samplers(
    deps: SamplerDeps,
    sampling: &SamplingConfig,
) -> Vec<tokio::task::JoinHandle<()>> {
    schedule(sampling)
        .into_iter()
        .map(|cadence| spawn(cadence, deps.clone()))
        .collect()
}

fn spawn(cadence: Cadence, deps: SamplerDeps) -> tokio::task::JoinHandle<()> {
    let SamplerDeps {
        source,
        telemetry,
        updates,
        network,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        let mut tick = interval(cadence.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(
            period_ms = cadence.period.as_millis() as u64,
            probes = ?cadence.probes,
            "sampler started"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    for &probe in &cadence.probes {
                        sample(probe, &source, &telemetry, &network).await;
                    }
                    updates.notify(cadence.topic);
                }
                _ = shutdown_rx.changed() => {
                    tracing::debug!(topic = ?cadence.topic, "sampler shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_intervals_make_four_cadences() {
        let cadences = schedule(&SamplingConfig::default());
        let fast = Duration::from_millis(5000);
        let slow = Duration::from_millis(10_000);
        assert_eq!(
            cadences,
            vec![
                Cadence {
                    period: fast,
                    topic: Topic::Metrics,
                    probes: vec![Probe::Cpu, Probe::Thermal, Probe::Fan],
                },
                Cadence {
                    period: slow,
                    topic: Topic::Metrics,
                    probes: vec![Probe::Memory],
                },
                Cadence {
                    period: fast,
                    topic: Topic::Status,
                    probes: vec![Probe::Clock, Probe::Network],
                },
                Cadence {
                    period: slow,
                    topic: Topic::Status,
                    probes: vec![Probe::Battery],
                },
            ]
        );
    }

    #[test]
    fn every_probe_is_scheduled_once() {
        let sampling = SamplingConfig {
            cpu_interval_ms: 1000,
            memory_interval_ms: 2000,
            thermal_interval_ms: 3000,
            ..SamplingConfig::default()
        };
        let mut probes: Vec<Probe> = schedule(&sampling)
            .into_iter()
            .flat_map(|c| c.probes)
            .collect();
        probes.sort_by_key(|p| p.as_str());
        assert_eq!(probes.len(), Probe::ALL.len());
        probes.dedup();
        assert_eq!(probes.len(), Probe::ALL.len());
    }

    #[test]
    fn interfaces_are_filtered_and_aliased() {
        let config = NetworkConfig {
            ignore: vec!["lo".into()],
            aliases: HashMap::from([("enp0s25".to_string(), "lan".to_string())]),
        };
        let counters = |name: &str, recv| InterfaceCounters {
            name: name.into(),
            bytes_recv: recv,
            bytes_sent: 7,
        };
        let kept = filter_interfaces(
            vec![
                counters("lo", 100),
                counters("enp0s25", 100),
                counters("wlan0", 0),
                counters("wwan0", 5),
            ],
            &config,
        );
        let names: Vec<_> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["lan", "wwan0"]);
    }
}
