//! In-memory completion sink.

use crate::core::{CompletedJob, CompletionSink, JobId, SourceId, StationError};

/// Keeps every completed job in completion order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    completed: Vec<CompletedJob>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All completed jobs in completion order.
    pub fn completed(&self) -> &[CompletedJob] {
        &self.completed
    }

    /// Completion order as job ids.
    pub fn ids(&self) -> Vec<JobId> {
        self.completed.iter().map(|job| job.id).collect()
    }

    /// Completed jobs from one source, optionally only those finished at or after `since`.
    pub fn by_source(&self, source: &SourceId, since: Option<f64>, limit: usize) -> Vec<CompletedJob> {
        self.completed
            .iter()
            .filter(|job| &job.origin == source)
            .filter(|job| since.is_none_or(|s| job.completion_time >= s))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of completed jobs.
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Whether nothing has completed.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl CompletionSink for InMemorySink {
    fn deliver(&mut self, job: CompletedJob) -> Result<(), StationError> {
        self.completed.push(job);
        Ok(())
    }
}
