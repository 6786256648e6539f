//! # Service Station
//!
//! An event-driven engine for a single resource-constrained service station.
//!
//! Jobs arrive from several sources, wait in a bounded buffer and are admitted
//! into service under a pluggable selection policy whenever the finite resource
//! pool can cover their demand. Completing jobs release their units, which
//! triggers another admission pass.
//!
//! ## Core Problem Solved
//!
//! - **Bounded buffering**: a full buffer drops the arriving job and counts it
//!   against its source; there are no retries
//! - **Policy-driven selection**: FIFO or largest-demand-first, decided by a
//!   [`core::SelectionPolicy`]
//! - **Resource accounting**: `available + held == total` after every transition
//! - **Per-source statistics**: wait, service and response means plus
//!   time-averaged occupancy from a periodic sampling tick
//!
//! The engine is a single-threaded state machine. Every transition happens
//! inside one handler call delivered by a [`core::Scheduler`] in
//! non-decreasing virtual-time order, with equal-time events delivered in
//! scheduling order.
//!
//! ## Example
//!
//! ```rust
//! use service_station::config::StationConfig;
//! use service_station::core::{JobSpec, SchedulingPolicy, Station};
//! use service_station::infra::InMemorySink;
//! use service_station::runtime::Simulation;
//!
//! let cfg = StationConfig {
//!     buffer_capacity: 2,
//!     scheduling_policy: SchedulingPolicy::Fifo,
//!     total_resource_capacity: 10,
//!     sampling_interval: 1.0,
//! };
//! let station = Station::new(&cfg, InMemorySink::new()).unwrap();
//! let mut sim = Simulation::new(station);
//! sim.inject(0.0, JobSpec::new(0_u32, 4, 2.0));
//! sim.inject(0.0, JobSpec::new(1_u32, 4, 3.0));
//! sim.run_until(10.0).unwrap();
//!
//! let (report, sink) = sim.finish().unwrap();
//! assert_eq!(report.processed(), 2);
//! assert_eq!(sink.len(), 2);
//! ```
//!
//! For complete scenarios, see `tests/station_algorithm_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Builders to construct stations and simulations from configuration.
pub mod builders;
/// Configuration models for the station and a simulation run.
pub mod config;
/// Core station abstractions and capacity accounting.
pub mod core;
/// Infrastructure adapters: virtual-time scheduler and completion sinks.
pub mod infra;
/// Simulation driver and job sources.
pub mod runtime;
/// Shared utilities.
pub mod util;
