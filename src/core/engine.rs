//! The station: admission, dispatch, completion and sampling.
//!
//! Every transition runs inside one handler call driven by a [`Scheduler`],
//! so the buffer, the resource pool and the active set have a single writer
//! and need no locking. Jobs in service are kept in an arena keyed by
//! [`JobId`]; completion events carry that id, never a reference.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::StationConfig;
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::buffer::Buffer;
use crate::core::job::{Job, JobId, JobSpec, SimTime, SourceId};
use crate::core::resource_pool::ResourcePool;
use crate::core::scheduler::{Scheduler, StationEvent, TimerHandle};
use crate::core::sink::CompletionSink;
use crate::core::stats::{StationReport, StationStats};
use crate::core::StationError;

/// What happened to an arriving job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// The job was buffered (and possibly admitted straight away).
    Accepted(JobId),
    /// The buffer was full; the job was discarded.
    Dropped(JobId),
}

impl ArrivalOutcome {
    /// Id assigned to the arriving job.
    pub const fn job_id(self) -> JobId {
        match self {
            Self::Accepted(id) | Self::Dropped(id) => id,
        }
    }
}

/// A job in service together with its pending completion.
#[derive(Debug)]
struct ActiveJob {
    job: Job,
    completion: TimerHandle,
}

/// Single service station with a bounded buffer and a finite resource pool.
pub struct Station<K> {
    buffer: Buffer,
    pool: ResourcePool,
    active: BTreeMap<JobId, ActiveJob>,
    stats: StationStats,
    sink: K,
    audit: Option<Box<dyn AuditSink>>,
    sampling_interval: SimTime,
    sample_timer: Option<TimerHandle>,
    next_job_id: u64,
}

impl<K> Station<K>
where
    K: CompletionSink,
{
    /// Create a station from validated configuration.
    pub fn new(config: &StationConfig, sink: K) -> Result<Self, StationError> {
        config.validate().map_err(StationError::Config)?;
        Ok(Self {
            buffer: Buffer::new(config.buffer_capacity, config.scheduling_policy.build()),
            pool: ResourcePool::new(config.total_resource_capacity),
            active: BTreeMap::new(),
            stats: StationStats::default(),
            sink,
            audit: None,
            sampling_interval: config.sampling_interval,
            sample_timer: None,
            next_job_id: 0,
        })
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Make a source appear in the report even if it never sends a job.
    pub fn register_source(&mut self, source: SourceId) {
        self.stats.register(source);
    }

    /// Schedule the first sampling tick one interval from now.
    pub fn start<S: Scheduler + ?Sized>(&mut self, clock: &mut S) {
        if let Some(previous) = self.sample_timer.take() {
            clock.cancel(previous);
        }
        let at = clock.now() + self.sampling_interval;
        self.sample_timer = Some(clock.schedule(at, StationEvent::Sample));
        tracing::info!(
            capacity = self.pool.total(),
            buffer = self.buffer.capacity(),
            policy = self.buffer.policy_name(),
            interval = self.sampling_interval,
            "station started"
        );
    }

    /// Route an event delivered by the scheduler.
    pub fn handle<S: Scheduler + ?Sized>(
        &mut self,
        event: StationEvent,
        clock: &mut S,
    ) -> Result<(), StationError> {
        match event {
            StationEvent::Arrival(spec) => self.on_arrival(spec, clock).map(|_| ()),
            StationEvent::Completion(id) => self.on_completion(id, clock),
            StationEvent::Sample => {
                self.on_sample(clock);
                Ok(())
            }
        }
    }

    /// Buffer an arriving job, or drop it when the buffer is full.
    pub fn on_arrival<S: Scheduler + ?Sized>(
        &mut self,
        spec: JobSpec,
        clock: &mut S,
    ) -> Result<ArrivalOutcome, StationError> {
        let now = clock.now();
        let id = JobId(self.next_job_id);
        let job = Job::new(id, spec)?;
        self.next_job_id += 1;

        if job.required() > self.pool.total() {
            tracing::warn!(
                "{} from {} needs {} units but the pool only has {}; it will block the buffer",
                id,
                job.origin(),
                job.required(),
                self.pool.total()
            );
        }

        let origin = job.origin().clone();
        match self.buffer.try_insert(job, now) {
            Err(_discarded) => {
                tracing::warn!(
                    "{} from {} dropped: buffer full (depth={})",
                    id,
                    origin,
                    self.buffer.len()
                );
                self.stats.record_drop(&origin);
                self.record_audit(now, id, &origin, AuditAction::Dropped);
                Ok(ArrivalOutcome::Dropped(id))
            }
            Ok(()) => {
                self.record_audit(now, id, &origin, AuditAction::Buffered);
                tracing::debug!("{} buffered (depth={})", id, self.buffer.len());
                self.dispatch(clock)?;
                self.check_invariants()?;
                Ok(ArrivalOutcome::Accepted(id))
            }
        }
    }

    /// Finish a job: release its units, hand it downstream and refill the pool.
    ///
    /// A sink failure does not stop the station: the job is counted as
    /// undelivered, dispatch still runs, and the sink error is returned after.
    pub fn on_completion<S: Scheduler + ?Sized>(
        &mut self,
        id: JobId,
        clock: &mut S,
    ) -> Result<(), StationError> {
        let now = clock.now();
        let Some(ActiveJob { job, .. }) = self.active.remove(&id) else {
            tracing::error!("completion fired for {} which is not in service", id);
            return Err(StationError::UnknownCompletion(id));
        };
        let required = job.required();
        let done = job.complete(now)?;
        self.pool.release(required).inspect_err(|e| {
            tracing::error!("releasing {} failed: {}", id, e);
        })?;

        let record = done.clone();
        let delivered = self.sink.deliver(done);
        match &delivered {
            Ok(()) => {
                self.stats.record_completion(&record);
                tracing::info!(
                    "{} from {} completed: wait={} service={} released={} available={}",
                    id,
                    record.origin,
                    record.wait_time,
                    record.service_time,
                    required,
                    self.pool.available()
                );
                self.record_audit(now, id, &record.origin, AuditAction::Completed);
            }
            Err(e) => {
                self.stats.record_undelivered(&record.origin);
                tracing::error!("{} from {} not delivered: {}", id, record.origin, e);
            }
        }

        self.dispatch(clock)?;
        self.check_invariants()?;
        delivered
    }

    /// Accumulate occupancy and schedule the next tick.
    pub fn on_sample<S: Scheduler + ?Sized>(&mut self, clock: &mut S) {
        let in_use: u32 = self.active.values().map(|a| a.job.required()).sum();
        let mut in_service = BTreeMap::new();
        for active in self.active.values() {
            *in_service.entry(active.job.origin().clone()).or_insert(0) += 1;
        }
        let in_buffer = self.buffer.counts_by_source();
        self.stats.record_sample(in_use, &in_service, &in_buffer);
        tracing::trace!(
            tick = self.stats.ticks(),
            in_use,
            active = self.active.len(),
            buffered = self.buffer.len(),
            "sampled occupancy"
        );

        let at = clock.now() + self.sampling_interval;
        self.sample_timer = Some(clock.schedule(at, StationEvent::Sample));
    }

    /// Admit jobs while the policy's candidate fits.
    ///
    /// Stops at the first candidate that does not fit, even if a smaller job
    /// further back would.
    fn dispatch<S: Scheduler + ?Sized>(&mut self, clock: &mut S) -> Result<(), StationError> {
        while let Some(candidate) = self.buffer.peek_next(self.pool.available()) {
            let (candidate_id, required) = (candidate.id(), candidate.required());
            if !self.pool.can_acquire(required) {
                tracing::debug!(
                    "{} needs {} units, {} available; dispatch paused",
                    candidate_id,
                    required,
                    self.pool.available()
                );
                break;
            }
            let job = self
                .buffer
                .pop_next(self.pool.available())
                .filter(|job| job.id() == candidate_id)
                .ok_or_else(|| {
                    tracing::error!("buffer did not yield peeked candidate {}", candidate_id);
                    StationError::Invariant(format!(
                        "buffer did not yield peeked candidate {candidate_id}"
                    ))
                })?;
            self.admit(job, clock)?;
        }
        Ok(())
    }

    fn admit<S: Scheduler + ?Sized>(
        &mut self,
        mut job: Job,
        clock: &mut S,
    ) -> Result<(), StationError> {
        let now = clock.now();
        job.stamp_service_start(now);
        let wait = job.wait_time();
        self.pool.acquire(job.required())?;
        self.stats.record_admission(job.origin(), wait);

        let id = job.id();
        let completion = clock.schedule(now + job.service_duration(), StationEvent::Completion(id));
        tracing::info!(
            "{} from {} started: consumed={} remaining={} wait={}",
            id,
            job.origin(),
            job.required(),
            self.pool.available(),
            wait
        );
        let origin = job.origin().clone();
        self.active.insert(id, ActiveJob { job, completion });
        self.record_audit(now, id, &origin, AuditAction::Admitted);
        Ok(())
    }

    /// Tear the station down and return the final report and the sink.
    ///
    /// Cancels the sampling timer and the completion of every job still in
    /// service so no callback outlives the station.
    pub fn finish<S: Scheduler + ?Sized>(
        mut self,
        clock: &mut S,
    ) -> Result<(StationReport, K), StationError> {
        let now = clock.now();
        if let Some(timer) = self.sample_timer.take() {
            clock.cancel(timer);
        }
        let active = std::mem::take(&mut self.active);
        for (id, ActiveJob { job, completion }) in active {
            if !clock.cancel(completion) {
                return Err(StationError::Invariant(format!(
                    "{id} in service without a pending completion"
                )));
            }
            self.record_audit(now, id, job.origin(), AuditAction::Cancelled);
        }
        let report = self.report();
        tracing::info!(
            processed = report.processed(),
            dropped = report.dropped(),
            buffered = self.buffer.len(),
            utilization = report.utilization_percent(),
            "station finished"
        );
        Ok((report, self.sink))
    }
}

impl<K> Station<K> {
    /// Aggregate statistics so far. Does not mutate the station.
    pub fn report(&self) -> StationReport {
        self.stats.report(self.pool.total())
    }

    /// Check the capacity and bound invariants.
    ///
    /// `available + sum(required over active jobs) == total` and
    /// `buffer.len() <= buffer.capacity()`.
    pub fn check_invariants(&self) -> Result<(), StationError> {
        let held: u64 = self
            .active
            .values()
            .map(|a| u64::from(a.job.required()))
            .sum();
        if held + u64::from(self.pool.available()) != u64::from(self.pool.total()) {
            tracing::error!(
                held,
                available = self.pool.available(),
                total = self.pool.total(),
                "resource accounting mismatch"
            );
            return Err(StationError::Invariant(format!(
                "{held} held + {} available != {} total",
                self.pool.available(),
                self.pool.total()
            )));
        }
        if self.buffer.len() > self.buffer.capacity() {
            return Err(StationError::Invariant(format!(
                "buffer holds {} jobs over capacity {}",
                self.buffer.len(),
                self.buffer.capacity()
            )));
        }
        Ok(())
    }

    /// Units not held by any job.
    pub const fn available(&self) -> u32 {
        self.pool.available()
    }

    /// Total pool capacity.
    pub const fn total_capacity(&self) -> u32 {
        self.pool.total()
    }

    /// Buffered jobs.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Ids of jobs in service.
    pub fn active_jobs(&self) -> impl Iterator<Item = &Job> {
        self.active.values().map(|a| &a.job)
    }

    /// Number of jobs in service.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether `id` is in service.
    pub fn is_active(&self, id: JobId) -> bool {
        self.active.contains_key(&id)
    }

    /// Running statistics.
    pub const fn stats(&self) -> &StationStats {
        &self.stats
    }

    /// Downstream sink.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Number of jobs the station has seen.
    pub const fn arrivals(&self) -> u64 {
        self.next_job_id
    }

    fn record_audit(&mut self, at: SimTime, id: JobId, origin: &SourceId, action: AuditAction) {
        if let Some(audit) = self.audit.as_mut() {
            audit.record(build_audit_event(at, id, origin, action));
        }
    }
}

impl<K> fmt::Debug for Station<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Station")
            .field("buffer", &self.buffer)
            .field("pool", &self.pool)
            .field("active", &self.active.len())
            .field("sampling_interval", &self.sampling_interval)
            .finish_non_exhaustive()
    }
}
