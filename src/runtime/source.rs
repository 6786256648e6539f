//! Job sources feeding a simulation.

use crate::config::SourceConfig;
use crate::core::{JobSpec, SimTime, SourceId};

/// Produces jobs at virtual times chosen by the source.
pub trait JobSource {
    /// Identity stamped on every job.
    fn origin(&self) -> &SourceId;

    /// Time of the first job, or `None` if the source never fires.
    fn first_arrival(&self) -> Option<SimTime>;

    /// Emit the job due at `now` and the time of the next one.
    fn fire(&mut self, now: SimTime) -> (JobSpec, Option<SimTime>);
}

/// Emits identical jobs at a fixed interarrival time.
#[derive(Debug, Clone)]
pub struct PeriodicSource {
    origin: SourceId,
    interarrival: SimTime,
    required: u32,
    service_time: SimTime,
    start: SimTime,
    limit: Option<u64>,
    emitted: u64,
}

impl PeriodicSource {
    /// Create a source firing at `start`, then every `interarrival`.
    pub const fn new(
        origin: SourceId,
        interarrival: SimTime,
        required: u32,
        service_time: SimTime,
    ) -> Self {
        Self {
            origin,
            interarrival,
            required,
            service_time,
            start: 0.0,
            limit: None,
            emitted: 0,
        }
    }

    /// Build from configuration; a malformed id falls back to the unknown bucket.
    pub fn from_config(cfg: &SourceConfig) -> Self {
        Self::new(
            SourceId::parse_lenient(&cfg.id),
            cfg.interarrival,
            cfg.required_resource,
            cfg.service_time,
        )
        .starting_at(cfg.start)
        .with_limit(cfg.limit)
    }

    /// Set the time of the first job.
    #[must_use]
    pub const fn starting_at(mut self, start: SimTime) -> Self {
        self.start = start;
        self
    }

    /// Stop after `limit` jobs.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Jobs emitted so far.
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    fn exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.emitted >= limit)
    }
}

impl JobSource for PeriodicSource {
    fn origin(&self) -> &SourceId {
        &self.origin
    }

    fn first_arrival(&self) -> Option<SimTime> {
        (!self.exhausted()).then_some(self.start)
    }

    fn fire(&mut self, now: SimTime) -> (JobSpec, Option<SimTime>) {
        self.emitted += 1;
        tracing::debug!("{} generated job #{} at {}", self.origin, self.emitted, now);
        let spec = JobSpec {
            origin: self.origin.clone(),
            required: self.required,
            service_duration: self.service_time,
        };
        let next = (!self.exhausted()).then_some(now + self.interarrival);
        (spec, next)
    }
}
