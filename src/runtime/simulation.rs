//! Event loop driving a station from a virtual-time queue.

use crate::core::{
    CompletionSink, JobSpec, SimTime, Station, StationError, StationEvent, StationReport,
    TimerHandle,
};
use crate::infra::clock::EventQueue;
use crate::runtime::source::JobSource;

/// Events delivered by the simulation's queue.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// An event for the station.
    Station(StationEvent),
    /// The source at this index is due to emit a job.
    Source(usize),
}

impl From<StationEvent> for SimEvent {
    fn from(event: StationEvent) -> Self {
        Self::Station(event)
    }
}

/// A station, its sources and the clock, run one event at a time.
pub struct Simulation<K> {
    clock: EventQueue<SimEvent>,
    station: Station<K>,
    sources: Vec<Box<dyn JobSource>>,
    delivered: u64,
    horizon: Option<SimTime>,
}

impl<K> Simulation<K>
where
    K: CompletionSink,
{
    /// Wrap a station and start its sampling.
    pub fn new(mut station: Station<K>) -> Self {
        let mut clock = EventQueue::new();
        station.start(&mut clock);
        Self {
            clock,
            station,
            sources: Vec::new(),
            delivered: 0,
            horizon: None,
        }
    }

    /// Set the time at which [`Simulation::run`] stops.
    #[must_use]
    pub fn with_horizon(mut self, end: SimTime) -> Self {
        self.horizon = Some(end);
        self
    }

    /// Configured end of the run, if any.
    pub const fn horizon(&self) -> Option<SimTime> {
        self.horizon
    }

    /// Attach a source; its first job is scheduled right away.
    pub fn add_source(&mut self, source: Box<dyn JobSource>) {
        let index = self.sources.len();
        self.station.register_source(source.origin().clone());
        if let Some(at) = source.first_arrival() {
            self.clock.push(at, SimEvent::Source(index));
        }
        self.sources.push(source);
    }

    /// Schedule a single arrival at `at`.
    pub fn inject(&mut self, at: SimTime, spec: JobSpec) -> TimerHandle {
        self.clock
            .push(at, SimEvent::Station(StationEvent::Arrival(spec)))
    }

    /// Deliver the next event. Returns its time, or `None` when nothing is pending.
    pub fn step(&mut self) -> Result<Option<SimTime>, StationError> {
        let Some((at, event)) = self.clock.pop() else {
            return Ok(None);
        };
        self.delivered += 1;
        match event {
            SimEvent::Station(event) => self.station.handle(event, &mut self.clock)?,
            SimEvent::Source(index) => {
                let source = self.sources.get_mut(index).ok_or_else(|| {
                    StationError::Invariant(format!("event for unregistered source #{index}"))
                })?;
                let (spec, next) = source.fire(at);
                if let Some(next) = next {
                    self.clock.push(next, SimEvent::Source(index));
                }
                self.station.on_arrival(spec, &mut self.clock)?;
            }
        }
        Ok(Some(at))
    }

    /// Deliver every event due at or before `end`, then move the clock to `end`.
    ///
    /// Stops at the first error. After an engine defect the station must not
    /// be driven further; a sink error leaves it consistent and the run may
    /// resume.
    pub fn run_until(&mut self, end: SimTime) -> Result<u64, StationError> {
        let before = self.delivered;
        while self.clock.peek_time().is_some_and(|at| at <= end) {
            if let Err(e) = self.step() {
                tracing::error!(now = self.clock.now(), "simulation aborted: {}", e);
                return Err(e);
            }
        }
        self.clock.advance_to(end);
        Ok(self.delivered - before)
    }

    /// Run until the configured horizon.
    pub fn run(&mut self) -> Result<u64, StationError> {
        let end = self
            .horizon
            .ok_or_else(|| StationError::Config("no run horizon configured".into()))?;
        self.run_until(end)
    }

    /// Current virtual time.
    pub const fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// The station being driven.
    pub const fn station(&self) -> &Station<K> {
        &self.station
    }

    /// Events delivered so far.
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Live events still pending.
    pub fn pending(&self) -> usize {
        self.clock.len()
    }

    /// Tear the station down and return its report and sink.
    pub fn finish(mut self) -> Result<(StationReport, K), StationError> {
        self.station.finish(&mut self.clock)
    }
}
