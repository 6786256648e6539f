//! Builders to construct stations and simulations from configuration.

pub mod station_builder;

pub use station_builder::{build_simulation, build_station};
