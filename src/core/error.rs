//! Error types for station operations.

use thiserror::Error;

use crate::core::job::JobId;

/// Errors produced by station components.
///
/// Buffer overflow is not represented here: a full buffer drops the job and
/// counts it, which is a normal outcome of an arrival.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StationError {
    /// An inbound job specification is malformed.
    #[error("invalid job: {0}")]
    InvalidJob(String),
    /// A source identifier could not be parsed.
    #[error("invalid source identifier: {0}")]
    InvalidSource(String),
    /// More units were requested than the pool has available.
    #[error("insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity {
        /// Units requested.
        requested: u32,
        /// Units available at the time of the request.
        available: u32,
    },
    /// A release would push the pool above its total capacity.
    #[error("capacity overflow: releasing {released} with {available} of {total} available")]
    CapacityOverflow {
        /// Units being released.
        released: u32,
        /// Units available before the release.
        available: u32,
        /// Total pool capacity.
        total: u32,
    },
    /// A completion fired for a job that is not in service.
    #[error("completion for unknown job {0}")]
    UnknownCompletion(JobId),
    /// Internal accounting no longer holds.
    #[error("invariant violated: {0}")]
    Invariant(String),
    /// Configuration rejected during construction.
    #[error("config invalid: {0}")]
    Config(String),
    /// Downstream sink failure with context.
    #[error("sink error: {0}")]
    Sink(String),
}

impl StationError {
    /// Whether the error signals a defect in the engine itself.
    ///
    /// Such errors leave the accounting in an unknown state; the run must stop.
    pub const fn is_engine_defect(&self) -> bool {
        matches!(
            self,
            Self::InsufficientCapacity { .. }
                | Self::CapacityOverflow { .. }
                | Self::UnknownCompletion(_)
                | Self::Invariant(_)
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
