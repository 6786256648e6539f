//! Builders to construct stations and simulations from configuration.

use crate::config::{SimulationConfig, StationConfig};
use crate::core::{CompletionSink, Station, StationError};
use crate::runtime::{PeriodicSource, Simulation};

/// Build a station from configuration.
pub fn build_station<K>(cfg: &StationConfig, sink: K) -> Result<Station<K>, StationError>
where
    K: CompletionSink,
{
    Station::new(cfg, sink)
}

/// Build a ready-to-run simulation with one periodic source per configured source.
pub fn build_simulation<K>(cfg: &SimulationConfig, sink: K) -> Result<Simulation<K>, StationError>
where
    K: CompletionSink,
{
    cfg.validate().map_err(StationError::Config)?;

    let station = build_station(&cfg.station, sink)?;
    let mut simulation = Simulation::new(station).with_horizon(cfg.duration);
    for source_cfg in &cfg.sources {
        simulation.add_source(Box::new(PeriodicSource::from_config(source_cfg)));
    }
    tracing::info!(
        sources = cfg.sources.len(),
        duration = cfg.duration,
        "simulation built"
    );
    Ok(simulation)
}
