// Scalar metrics backed by a bounded history

use serde::Deserialize;

use crate::series::{Scale, SeriesBuffer};

/// Metrics that keep a graphable history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricId {
    Cpu,
    Memory,
    Thermal,
    Fan,
}

impl MetricId {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricId::Cpu => "cpu",
            MetricId::Memory => "memory",
            MetricId::Thermal => "thermal",
            MetricId::Fan => "fan",
        }
    }
}

/// Current value plus history. `current` is whatever was last recorded;
/// a failed read leaves it untouched.
#[derive(Debug, Clone)]
pub struct Metric {
    pub id: MetricId,
    pub current: f64,
    pub series: SeriesBuffer,
}

impl Metric {
    pub fn new(id: MetricId, capacity: usize) -> Self {
        Self::with_scale(id, capacity, Scale::Auto)
    }

    pub fn with_scale(id: MetricId, capacity: usize, scale: Scale) -> Self {
        Self {
            id,
            current: 0.0,
            series: SeriesBuffer::with_scale(capacity, scale),
        }
    }

    /// Pushes into the history and updates `current` with the stored value.
    pub fn record(&mut self, value: f64) {
        self.current = self.series.push(value);
    }

    /// Whether at least one sample has been recorded.
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}

/// Fan speed history plus the discrete level (0..=8, 8 = disengaged).
#[derive(Debug, Clone)]
pub struct FanState {
    pub rpm: Metric,
    pub level: u8,
}

impl FanState {
    pub fn new(capacity: usize, min_rpm: f64, max_rpm: f64) -> Self {
        Self {
            rpm: Metric::with_scale(
                MetricId::Fan,
                capacity,
                Scale::Fixed {
                    min: min_rpm,
                    max: max_rpm,
                },
            ),
            level: 0,
        }
    }

    pub fn record(&mut self, rpm: u64, level: u8) {
        self.rpm.record(rpm as f64);
        self.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_current_and_history() {
        let mut m = Metric::new(MetricId::Thermal, 3);
        assert!(!m.has_data());
        m.record(40.0);
        m.record(45.0);
        assert_eq!(m.current, 45.0);
        assert_eq!(m.series.len(), 2);
    }

    #[test]
    fn fan_rpm_is_clamped_into_fixed_range() {
        let mut fan = FanState::new(60, 0.0, 10_000.0);
        fan.record(12_000, 7);
        assert_eq!(fan.rpm.current, 10_000.0);
        assert_eq!(fan.level, 7);
        assert_eq!(fan.rpm.series.bounds(), Some((0.0, 10_000.0)));
    }
}
