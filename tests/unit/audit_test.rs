//! Tests for audit sink

use std::sync::Arc;

use parking_lot::Mutex;
use service_station::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, JobId, SourceId,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let event = build_audit_event(1.5, JobId(1), &SourceId::Indexed(0), AuditAction::Admitted);

    sink.record(event.clone());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], event);
    assert_eq!(events[0].origin, SourceId::Indexed(0));
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);
    let origin = SourceId::Indexed(0);
    sink.record(build_audit_event(0.0, JobId(1), &origin, AuditAction::Buffered));
    sink.record(build_audit_event(0.0, JobId(2), &origin, AuditAction::Buffered));
    sink.record(build_audit_event(0.0, JobId(3), &origin, AuditAction::Dropped));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].job_id, JobId(2)); // First one popped
    assert_eq!(sink.jobs_with(AuditAction::Dropped), vec![JobId(3)]);
}

#[test]
fn test_shared_audit_sink() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(4)));
    let mut writer: Box<dyn AuditSink> = Box::new(Arc::clone(&shared));
    writer.record(build_audit_event(
        2.0,
        JobId(5),
        &SourceId::Unknown,
        AuditAction::Completed,
    ));
    assert_eq!(shared.lock().jobs_with(AuditAction::Completed), vec![JobId(5)]);
}
