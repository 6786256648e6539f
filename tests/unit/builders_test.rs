//! Tests for station and simulation builders

use service_station::builders::{build_simulation, build_station};
use service_station::config::{SimulationConfig, SourceConfig, StationConfig};
use service_station::core::{SchedulingPolicy, SourceId, StationError};
use service_station::infra::InMemorySink;

fn station() -> StationConfig {
    StationConfig {
        buffer_capacity: 3,
        scheduling_policy: SchedulingPolicy::PriorityByDemand,
        total_resource_capacity: 6,
        sampling_interval: 1.0,
    }
}

#[test]
fn test_build_station_rejects_invalid_config() {
    let mut cfg = station();
    cfg.total_resource_capacity = 0;
    let err = build_station(&cfg, InMemorySink::new()).err().unwrap();
    assert!(matches!(err, StationError::Config(_)));
}

#[test]
fn test_build_simulation_rejects_invalid_source() {
    let cfg = SimulationConfig {
        station: station(),
        sources: vec![SourceConfig {
            id: "source[0]".into(),
            interarrival: 0.0,
            required_resource: 1,
            service_time: 1.0,
            start: 0.0,
            limit: None,
        }],
        duration: 10.0,
    };
    let err = build_simulation(&cfg, InMemorySink::new()).err().unwrap();
    assert!(matches!(err, StationError::Config(_)));
}

#[test]
fn test_build_simulation_runs_configured_sources() {
    let cfg = SimulationConfig {
        station: station(),
        sources: vec![
            SourceConfig {
                id: "source[0]".into(),
                interarrival: 1.0,
                required_resource: 2,
                service_time: 1.5,
                start: 0.0,
                limit: Some(20),
            },
            SourceConfig {
                id: "source[1]".into(),
                interarrival: 2.0,
                required_resource: 4,
                service_time: 3.0,
                start: 0.5,
                limit: Some(10),
            },
            SourceConfig {
                id: "garbage".into(),
                interarrival: 5.0,
                required_resource: 1,
                service_time: 0.5,
                start: 1.0,
                limit: Some(2),
            },
        ],
        duration: 200.0,
    };

    let mut sim = build_simulation(&cfg, InMemorySink::new()).unwrap();
    assert_eq!(sim.horizon(), Some(200.0));
    sim.run().unwrap();
    assert_eq!(sim.now(), 200.0);
    assert_eq!(sim.station().arrivals(), 32);

    let (report, sink) = sim.finish().unwrap();
    assert_eq!(report.processed() + report.dropped(), 32);
    assert_eq!(report.processed(), sink.len() as u64);
    let unknown = report.source(&SourceId::Unknown).unwrap();
    assert_eq!(unknown.processed + unknown.dropped, 2);
    assert!(report.utilization.is_some());
}

#[test]
fn test_run_without_horizon_is_rejected() {
    let station = build_station(&station(), InMemorySink::new()).unwrap();
    let mut sim = service_station::runtime::Simulation::new(station);
    let err = sim.run().unwrap_err();
    assert!(matches!(err, StationError::Config(_)));
    assert_eq!(sim.delivered(), 0);
}
