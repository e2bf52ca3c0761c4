// Telemetry data model shared by samplers and widgets

mod battery;
mod metric;
mod network;

pub use battery::{BatterySnapshot, ChargeStatus};
pub use metric::{FanState, Metric, MetricId};
pub use network::{InterfaceCounters, NetRate, NetworkInterface, NetworkTable};
