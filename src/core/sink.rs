//! Downstream collaborator receiving completed jobs.

use crate::core::job::CompletedJob;
use crate::core::StationError;

/// Receives one record per completed job, in completion order.
pub trait CompletionSink {
    /// Take ownership of a completed job.
    fn deliver(&mut self, job: CompletedJob) -> Result<(), StationError>;
}

impl<S: CompletionSink + ?Sized> CompletionSink for Box<S> {
    fn deliver(&mut self, job: CompletedJob) -> Result<(), StationError> {
        (**self).deliver(job)
    }
}
