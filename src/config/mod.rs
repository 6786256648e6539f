//! Configuration models for the station, its sources and a simulation run.

pub mod station;

pub use station::{SimulationConfig, SourceConfig, StationConfig};
