// Config loading and validation tests

use statusglass::config::AppConfig;
use statusglass::models::MetricId;

const VALID_CONFIG: &str = r#"
[display]
width = 1920
height = 1080
max_redraw_delay_secs = 20
redraw_queue_capacity = 10

[sampling]
cpu_interval_ms = 1000
memory_interval_ms = 10000
thermal_interval_ms = 5000
fan_interval_ms = 5000
clock_interval_ms = 5000
network_interval_ms = 2000
battery_interval_ms = 20000
history_len = 90

[sensors]
thermal = ["/sys/class/hwmon/hwmon2/temp1_input"]
fan = "/proc/acpi/ibm/fan"
battery = "BAT1"
fan_min_rpm = 0.0
fan_max_rpm = 6000.0

[network]
ignore = ["lo", "docker0"]
aliases = { enp0s25 = "lan", wlp3s0 = "wifi" }

[graphs]
metrics = ["thermal", "fan", "cpu"]
spacing = 50

[status_bar]
padding = 4
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.display.width, 1920);
    assert_eq!(config.sampling.cpu_interval_ms, 1000);
    assert_eq!(config.sampling.history_len, 90);
    assert_eq!(config.sensors.thermal.len(), 1);
    assert_eq!(config.sensors.battery, "BAT1");
    assert_eq!(config.sensors.fan_max_rpm, 6000.0);
    assert_eq!(config.network.ignore, ["lo", "docker0"]);
    assert_eq!(config.network.aliases["enp0s25"], "lan");
    assert_eq!(
        config.graphs.metrics,
        [MetricId::Thermal, MetricId::Fan, MetricId::Cpu]
    );
    assert_eq!(config.graphs.spacing, 50);
    assert_eq!(config.status_bar.padding, 4);
}

#[test]
fn test_config_empty_is_all_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.display.max_redraw_delay_secs, 20);
    assert_eq!(config.display.redraw_queue_capacity, 10);
    assert_eq!(config.sampling.memory_interval_ms, 10_000);
    assert_eq!(config.sampling.history_len, 60);
    assert_eq!(config.network.ignore, ["lo"]);
    assert_eq!(config.graphs.pitch, 8);
    assert_eq!(config.graphs.metrics, [MetricId::Thermal, MetricId::Fan]);
    assert_eq!(config.status_bar.padding, 3);
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[graphs]\npitch = 4\n").expect("valid");
    assert_eq!(config.graphs.pitch, 4);
    assert_eq!(config.graphs.width, 300);
    assert_eq!(config.sampling.cpu_interval_ms, 5000);
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("network_interval_ms = 2000", "network_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sampling.network_interval_ms"));
}

#[test]
fn test_config_validation_rejects_history_len_zero() {
    let bad = VALID_CONFIG.replace("history_len = 90", "history_len = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("history_len"));
}

#[test]
fn test_config_validation_rejects_tiny_redraw_queue() {
    let bad = VALID_CONFIG.replace("redraw_queue_capacity = 10", "redraw_queue_capacity = 1");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("redraw_queue_capacity"));
}

#[test]
fn test_config_validation_rejects_inverted_fan_range() {
    let bad = VALID_CONFIG.replace("fan_max_rpm = 6000.0", "fan_max_rpm = 0.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("fan_max_rpm"));
}

#[test]
fn test_config_validation_rejects_pitch_zero() {
    let err = AppConfig::load_from_str("[graphs]\npitch = 0\n").unwrap_err();
    assert!(err.to_string().contains("graphs.pitch"));
}

#[test]
fn test_config_rejects_unknown_metric() {
    let bad = VALID_CONFIG.replace(r#""cpu"]"#, r#""gpu"]"#);
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.display.height, 1080);
    assert_eq!(config.sensors.battery, "BAT1");
}
