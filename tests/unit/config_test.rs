//! Tests for configuration validation

use service_station::config::{SimulationConfig, SourceConfig, StationConfig};
use service_station::core::SchedulingPolicy;

fn station() -> StationConfig {
    StationConfig {
        buffer_capacity: 5,
        scheduling_policy: SchedulingPolicy::Fifo,
        total_resource_capacity: 10,
        sampling_interval: 1.0,
    }
}

fn source() -> SourceConfig {
    SourceConfig {
        id: "source[0]".into(),
        interarrival: 1.0,
        required_resource: 2,
        service_time: 3.0,
        start: 0.0,
        limit: None,
    }
}

#[test]
fn test_station_config_validation() {
    assert!(station().validate().is_ok());
}

#[test]
fn test_station_config_invalid_values() {
    let mut cfg = station();
    cfg.buffer_capacity = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = station();
    cfg.total_resource_capacity = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = station();
    cfg.sampling_interval = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = station();
    cfg.sampling_interval = f64::INFINITY;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_source_config_invalid_values() {
    let mut cfg = source();
    cfg.interarrival = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = source();
    cfg.required_resource = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = source();
    cfg.service_time = -1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_simulation_config_reports_source_name() {
    let mut bad = source();
    bad.id = "source[7]".into();
    bad.interarrival = -2.0;
    let cfg = SimulationConfig {
        station: station(),
        sources: vec![source(), bad],
        duration: 10.0,
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("source[7]"));
}

#[test]
fn test_simulation_config_from_json() {
    let json = r#"{
        "station": {
            "buffer_capacity": 4,
            "scheduling_policy": "priority",
            "total_resource_capacity": 16,
            "sampling_interval": 0.5
        },
        "sources": [
            { "id": "source[0]", "interarrival": 1.5, "required_resource": 4, "service_time": 2.0 },
            { "id": "source[1]", "interarrival": 2.0, "required_resource": 8, "service_time": 3.0, "limit": 10 }
        ],
        "duration": 100.0
    }"#;

    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.station.scheduling_policy, SchedulingPolicy::PriorityByDemand);
    assert_eq!(cfg.sources.len(), 2);
    assert_eq!(cfg.sources[1].limit, Some(10));
    assert_eq!(cfg.sources[0].start, 0.0);
}

#[test]
fn test_policy_defaults_to_fifo() {
    let json = r#"{
        "station": { "buffer_capacity": 1, "total_resource_capacity": 1, "sampling_interval": 1.0 },
        "duration": 1.0
    }"#;
    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.station.scheduling_policy, SchedulingPolicy::Fifo);
    assert!(cfg.sources.is_empty());
}

#[test]
fn test_simulation_config_rejects_bad_json() {
    let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_load_missing_file_has_context() {
    let err = SimulationConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("reading config"));
}

#[test]
fn test_load_from_file() {
    let dir = std::env::temp_dir().join(format!("service-station-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sim.json");
    let cfg = SimulationConfig {
        station: station(),
        sources: vec![source()],
        duration: 25.0,
    };
    std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();

    let loaded = SimulationConfig::load(&path).unwrap();
    assert_eq!(loaded, cfg);
    std::fs::remove_dir_all(&dir).unwrap();
}
