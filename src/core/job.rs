//! Jobs, source identities and completion records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::StationError;

/// Virtual simulation time.
pub type SimTime = f64;

/// Stable job identifier assigned by the station on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Identity of the source a job came from.
///
/// Carried on every job from creation. Text forms are only parsed at the
/// boundary (configuration, serialized records).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceId {
    /// A numbered source.
    Indexed(u32),
    /// Bucket for identifiers that could not be parsed.
    Unknown,
}

impl SourceId {
    /// Parse an identifier, falling back to [`SourceId::Unknown`] with a warning.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}; bucketing as unknown");
            Self::Unknown
        })
    }
}

impl FromStr for SourceId {
    type Err = StationError;

    /// Accepts `source[3]`, `source3` and `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "unknown" {
            return Ok(Self::Unknown);
        }
        let rest = trimmed.strip_prefix("source").unwrap_or(trimmed);
        let digits = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .unwrap_or(rest);
        digits
            .parse::<u32>()
            .map(Self::Indexed)
            .map_err(|_| StationError::InvalidSource(s.to_string()))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(i) => write!(f, "source[{i}]"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl From<String> for SourceId {
    fn from(raw: String) -> Self {
        Self::parse_lenient(&raw)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.to_string()
    }
}

impl From<u32> for SourceId {
    fn from(index: u32) -> Self {
        Self::Indexed(index)
    }
}

/// Inbound job description produced by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Originating source.
    pub origin: SourceId,
    /// Resource units held while in service.
    pub required: u32,
    /// Time the job occupies its units once admitted.
    pub service_duration: SimTime,
}

impl JobSpec {
    /// Create a job specification.
    pub fn new(origin: impl Into<SourceId>, required: u32, service_duration: SimTime) -> Self {
        Self {
            origin: origin.into(),
            required,
            service_duration,
        }
    }

    /// Reject zero demand and negative or non-finite durations.
    pub fn validate(&self) -> Result<(), StationError> {
        if self.required == 0 {
            return Err(StationError::InvalidJob(format!(
                "job from {} requires zero units",
                self.origin
            )));
        }
        if !self.service_duration.is_finite() || self.service_duration < 0.0 {
            return Err(StationError::InvalidJob(format!(
                "job from {} has service duration {}",
                self.origin, self.service_duration
            )));
        }
        Ok(())
    }
}

/// A job owned by the station, either buffered or in service.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    origin: SourceId,
    required: u32,
    service_duration: SimTime,
    arrival_time: Option<SimTime>,
    service_start: Option<SimTime>,
}

impl Job {
    /// Build a job from a validated specification.
    pub fn new(id: JobId, spec: JobSpec) -> Result<Self, StationError> {
        spec.validate()?;
        Ok(Self {
            id,
            origin: spec.origin,
            required: spec.required,
            service_duration: spec.service_duration,
            arrival_time: None,
            service_start: None,
        })
    }

    /// Job identifier.
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Originating source.
    pub const fn origin(&self) -> &SourceId {
        &self.origin
    }

    /// Resource units held while in service.
    pub const fn required(&self) -> u32 {
        self.required
    }

    /// Service duration.
    pub const fn service_duration(&self) -> SimTime {
        self.service_duration
    }

    /// Time the job entered the buffer.
    pub const fn arrival_time(&self) -> Option<SimTime> {
        self.arrival_time
    }

    /// Time the job was admitted into service.
    pub const fn service_start(&self) -> Option<SimTime> {
        self.service_start
    }

    pub(crate) fn stamp_arrival(&mut self, now: SimTime) {
        self.arrival_time = Some(now);
    }

    pub(crate) fn stamp_service_start(&mut self, now: SimTime) {
        self.service_start = Some(now);
    }

    /// Time spent buffered; zero until the job has both stamps.
    pub fn wait_time(&self) -> SimTime {
        match (self.arrival_time, self.service_start) {
            (Some(arrival), Some(start)) => start - arrival,
            _ => 0.0,
        }
    }

    /// Close out the job at `now`, deriving its timing fields.
    pub(crate) fn complete(self, now: SimTime) -> Result<CompletedJob, StationError> {
        let (Some(arrival_time), Some(service_start)) = (self.arrival_time, self.service_start)
        else {
            return Err(StationError::Invariant(format!(
                "{} completed without arrival and start stamps",
                self.id
            )));
        };
        let wait_time = service_start - arrival_time;
        let service_time = now - service_start;
        Ok(CompletedJob {
            id: self.id,
            origin: self.origin,
            required: self.required,
            arrival_time,
            service_start,
            completion_time: now,
            wait_time,
            service_time,
            response_time: wait_time + service_time,
        })
    }
}

/// Outbound record emitted once per completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedJob {
    /// Job identifier.
    pub id: JobId,
    /// Originating source.
    pub origin: SourceId,
    /// Resource units the job held.
    pub required: u32,
    /// Time the job entered the buffer.
    pub arrival_time: SimTime,
    /// Time the job was admitted.
    pub service_start: SimTime,
    /// Time the job finished.
    pub completion_time: SimTime,
    /// `service_start - arrival_time`.
    pub wait_time: SimTime,
    /// `completion_time - service_start`.
    pub service_time: SimTime,
    /// `wait_time + service_time`.
    pub response_time: SimTime,
}
