//! Bounded buffer of arrived-but-not-admitted jobs.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::core::job::{Job, JobId, SimTime, SourceId};
use crate::core::policy::SelectionPolicy;

/// Jobs waiting for admission, kept in arrival order.
///
/// Which job leaves next is delegated to the configured [`SelectionPolicy`].
pub struct Buffer {
    capacity: usize,
    jobs: VecDeque<Job>,
    policy: Box<dyn SelectionPolicy>,
}

impl Buffer {
    /// Create an empty buffer holding at most `capacity` jobs.
    pub fn new(capacity: usize, policy: Box<dyn SelectionPolicy>) -> Self {
        Self {
            capacity,
            jobs: VecDeque::with_capacity(capacity.min(1024)),
            policy,
        }
    }

    /// Stamp the arrival time and append the job.
    ///
    /// When the buffer is full the job is handed back untouched.
    pub fn try_insert(&mut self, mut job: Job, now: SimTime) -> Result<(), Job> {
        if self.jobs.len() >= self.capacity {
            return Err(job);
        }
        job.stamp_arrival(now);
        self.jobs.push_back(job);
        Ok(())
    }

    /// The job the policy would pick next.
    pub fn peek_next(&self, available: u32) -> Option<&Job> {
        self.policy
            .select(&self.jobs, available)
            .and_then(|index| self.jobs.get(index))
    }

    /// Remove and return the job the policy picks next.
    pub fn pop_next(&mut self, available: u32) -> Option<Job> {
        let index = self.policy.select(&self.jobs, available)?;
        self.jobs.remove(index)
    }

    /// Remove a specific job.
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.id() == id)?;
        self.jobs.remove(index)
    }

    /// Number of buffered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job is buffered.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Maximum number of buffered jobs.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the next insert would fail.
    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    /// Buffered jobs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Name of the configured policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Buffered job count per source.
    pub fn counts_by_source(&self) -> BTreeMap<SourceId, usize> {
        let mut counts = BTreeMap::new();
        for job in &self.jobs {
            *counts.entry(job.origin().clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy.name())
            .field("jobs", &self.jobs)
            .finish()
    }
}
