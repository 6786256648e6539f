//! Core station abstractions and capacity accounting.

pub mod audit;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod job;
pub mod policy;
pub mod resource_pool;
pub mod scheduler;
pub mod sink;
pub mod stats;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use buffer::Buffer;
pub use engine::{ArrivalOutcome, Station};
pub use error::{AppResult, StationError};
pub use job::{CompletedJob, Job, JobId, JobSpec, SimTime, SourceId};
pub use policy::{Fifo, PriorityByDemand, SchedulingPolicy, SelectionPolicy};
pub use resource_pool::ResourcePool;
pub use scheduler::{Scheduler, StationEvent, TimerHandle};
pub use sink::CompletionSink;
pub use stats::{SourceReport, SourceStats, StationReport, StationStats};
