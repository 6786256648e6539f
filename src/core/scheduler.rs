//! Virtual-time scheduling contract consumed by the station.

use serde::{Deserialize, Serialize};

use crate::core::job::{JobId, JobSpec, SimTime};

/// Handle to a scheduled event, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Events the station schedules for itself or receives from sources.
#[derive(Debug, Clone, PartialEq)]
pub enum StationEvent {
    /// A job arrives from a source.
    Arrival(JobSpec),
    /// The job with this id finishes service.
    Completion(JobId),
    /// Periodic occupancy sample.
    Sample,
}

/// Delivers events at virtual times.
///
/// Implementations must deliver events one at a time in non-decreasing time
/// order, and events scheduled for the same time in the order they were
/// scheduled.
pub trait Scheduler {
    /// Current virtual time.
    fn now(&self) -> SimTime;

    /// Deliver `event` at time `at`.
    fn schedule(&mut self, at: SimTime, event: StationEvent) -> TimerHandle;

    /// Withdraw a pending event. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}
