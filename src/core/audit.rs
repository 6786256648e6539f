//! Audit trail of job lifecycle transitions.
//!
//! Provides an in-memory bounded sink and a shared wrapper so a caller can
//! keep reading the trail while the station owns the sink.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::job::{JobId, SimTime, SourceId};

/// Lifecycle transition recorded for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Accepted into the buffer.
    Buffered,
    /// Rejected on a full buffer.
    Dropped,
    /// Moved into service.
    Admitted,
    /// Finished service.
    Completed,
    /// Still in service when the station was torn down.
    Cancelled,
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Virtual time of the transition.
    pub at: SimTime,
    /// Job concerned.
    pub job_id: JobId,
    /// Source of the job.
    pub origin: SourceId,
    /// Transition taken.
    pub action: AuditAction,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
#[derive(Debug)]
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink keeping at most `max_events`, oldest evicted first.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(4096)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Jobs that took `action`, in recording order.
    pub fn jobs_with(&self, action: AuditAction) -> Vec<JobId> {
        self.events
            .iter()
            .filter(|e| e.action == action)
            .map(|e| e.job_id)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Share a sink between the station and an observer.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    at: SimTime,
    job_id: JobId,
    origin: &SourceId,
    action: AuditAction,
) -> AuditEvent {
    AuditEvent {
        at,
        job_id,
        origin: origin.clone(),
        action,
    }
}
