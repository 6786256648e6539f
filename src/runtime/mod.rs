//! Simulation driver and job sources.

pub mod simulation;
pub mod source;

pub use simulation::{SimEvent, Simulation};
pub use source::{JobSource, PeriodicSource};
