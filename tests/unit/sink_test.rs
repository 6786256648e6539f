//! Tests for completion sinks

use service_station::config::StationConfig;
use service_station::core::{
    CompletedJob, CompletionSink, JobId, JobSpec, SchedulingPolicy, SourceId, Station,
    StationError,
};
use service_station::infra::{InMemorySink, JsonlSink};
use service_station::runtime::Simulation;

fn config() -> StationConfig {
    StationConfig {
        buffer_capacity: 8,
        scheduling_policy: SchedulingPolicy::Fifo,
        total_resource_capacity: 4,
        sampling_interval: 1.0,
    }
}

fn run<K: CompletionSink>(sink: K) -> K {
    let mut sim = Simulation::new(Station::new(&config(), sink).unwrap());
    sim.inject(0.0, JobSpec::new(0_u32, 2, 1.0));
    sim.inject(0.0, JobSpec::new(1_u32, 2, 2.0));
    sim.inject(0.5, JobSpec::new(0_u32, 4, 1.0));
    sim.run_until(10.0).unwrap();
    let (_, sink) = sim.finish().unwrap();
    sink
}

#[test]
fn test_in_memory_sink_by_source() {
    let sink = run(InMemorySink::new());
    assert_eq!(sink.len(), 3);
    assert_eq!(sink.ids(), vec![JobId(0), JobId(1), JobId(2)]);

    let first = sink.by_source(&SourceId::Indexed(0), None, 10);
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].wait_time, 1.5);
    assert_eq!(first[1].response_time, 2.5);

    let late = sink.by_source(&SourceId::Indexed(0), Some(2.0), 10);
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].id, JobId(2));

    assert_eq!(sink.by_source(&SourceId::Indexed(0), None, 1).len(), 1);
    assert!(sink.by_source(&SourceId::Unknown, None, 10).is_empty());
}

#[test]
fn test_jsonl_sink_round_trip() {
    let dir = std::env::temp_dir().join(format!("service-station-jsonl-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let sink = JsonlSink::new(&dir, "completions").unwrap();
    let path = sink.path().to_path_buf();
    let mut sink = run(sink);
    assert_eq!(sink.written(), 3);
    sink.flush().unwrap();
    drop(sink);

    let loaded = JsonlSink::load(&path).unwrap();
    let expected = run(InMemorySink::new());
    assert_eq!(loaded.as_slice(), expected.completed());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_jsonl_load_missing_file_is_empty() {
    let loaded = JsonlSink::load("/definitely/not/here.jsonl").unwrap();
    assert!(loaded.is_empty());
}

/// Refuses its first delivery, then behaves like an in-memory sink.
#[derive(Default)]
struct FlakySink {
    failed: bool,
    inner: InMemorySink,
}

impl CompletionSink for FlakySink {
    fn deliver(&mut self, job: CompletedJob) -> Result<(), StationError> {
        if !self.failed {
            self.failed = true;
            return Err(StationError::Sink("disk full".into()));
        }
        self.inner.deliver(job)
    }
}

#[test]
fn test_sink_failure_keeps_station_dispatching() {
    let cfg = StationConfig {
        total_resource_capacity: 4,
        ..config()
    };
    let mut sim = Simulation::new(Station::new(&cfg, FlakySink::default()).unwrap());
    sim.inject(0.0, JobSpec::new(0_u32, 4, 1.0));
    sim.inject(0.0, JobSpec::new(1_u32, 4, 1.0));

    let err = sim.run_until(50.0).unwrap_err();
    assert_eq!(err, StationError::Sink("disk full".into()));
    assert!(!err.is_engine_defect());

    // the second job was admitted before the error surfaced
    let station = sim.station();
    assert!(station.buffer().is_empty());
    assert_eq!(station.active_count(), 1);
    assert_eq!(station.available(), 0);
    station.check_invariants().unwrap();

    sim.run_until(99.0).unwrap();
    let (report, sink) = sim.finish().unwrap();
    assert_eq!(sink.inner.ids(), vec![JobId(1)]);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.undelivered(), 1);
    assert_eq!(report.source(&SourceId::Indexed(0)).unwrap().undelivered, 1);
    assert_eq!(
        report.processed() + report.dropped() + report.undelivered(),
        2
    );
}
