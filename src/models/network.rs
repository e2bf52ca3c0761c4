// Per-interface throughput derived from cumulative byte counters

use std::collections::BTreeMap;
use std::time::Instant;

/// One interface's cumulative counters as read in a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

/// Throughput in bytes per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetRate {
    pub recv: f64,
    pub sent: f64,
}

#[derive(Debug, Clone)]
pub struct NetworkInterface {
    pub name: String,
    pub last_bytes_recv: u64,
    pub last_bytes_sent: u64,
    pub last_seen: Instant,
    /// `None` until a second sample has been observed.
    pub rate: Option<NetRate>,
}

impl NetworkInterface {
    fn first_seen(counters: &InterfaceCounters, now: Instant) -> Self {
        Self {
            name: counters.name.clone(),
            last_bytes_recv: counters.bytes_recv,
            last_bytes_sent: counters.bytes_sent,
            last_seen: now,
            rate: None,
        }
    }

    fn observe(&mut self, counters: &InterfaceCounters, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_seen).as_secs_f64();
        // No time passed: keep the baseline so these bytes count toward the next rate.
        if elapsed <= 0.0 {
            return;
        }
        // A counter that went backwards was reset; report no traffic for this tick.
        let recv = counters.bytes_recv.saturating_sub(self.last_bytes_recv);
        let sent = counters.bytes_sent.saturating_sub(self.last_bytes_sent);
        self.rate = Some(NetRate {
            recv: recv as f64 / elapsed,
            sent: sent as f64 / elapsed,
        });
        self.last_bytes_recv = counters.bytes_recv;
        self.last_bytes_sent = counters.bytes_sent;
        self.last_seen = now;
    }
}

/// Interfaces seen in the latest poll, keyed by (display) name.
#[derive(Debug, Clone, Default)]
pub struct NetworkTable {
    interfaces: BTreeMap<String, NetworkInterface>,
}

impl NetworkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one poll. Interfaces absent from `polled` are removed.
    pub fn update(&mut self, polled: &[InterfaceCounters], now: Instant) {
        self.interfaces
            .retain(|name, _| polled.iter().any(|c| &c.name == name));
        for counters in polled {
            match self.interfaces.get_mut(&counters.name) {
                Some(iface) => iface.observe(counters, now),
                None => {
                    self.interfaces.insert(
                        counters.name.clone(),
                        NetworkInterface::first_seen(counters, now),
                    );
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NetworkInterface> {
        self.interfaces.get(name)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkInterface> {
        self.interfaces.values()
    }

    /// `"<recv KiB/s>-<name>-<sent KiB/s>"` per interface, joined by `" | "`.
    pub fn summary(&self) -> String {
        self.interfaces
            .values()
            .map(|iface| {
                let rate = iface.rate.unwrap_or_default();
                format!(
                    "{:.1}-{}-{:.1}",
                    rate.recv / 1024.0,
                    iface.name,
                    rate.sent / 1024.0
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
