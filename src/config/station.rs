//! Station, source and simulation configuration structures.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, SchedulingPolicy};

/// Station configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Maximum buffered jobs before arrivals are dropped.
    pub buffer_capacity: usize,
    /// Which buffered job is tried next.
    #[serde(default)]
    pub scheduling_policy: SchedulingPolicy,
    /// Resource units in the pool.
    pub total_resource_capacity: u32,
    /// Period of the occupancy sampling tick.
    pub sampling_interval: f64,
}

/// Deterministic job source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source identifier, e.g. `source[0]`.
    pub id: String,
    /// Time between consecutive jobs.
    pub interarrival: f64,
    /// Units each job requires.
    pub required_resource: u32,
    /// Service duration of each job.
    pub service_time: f64,
    /// Time of the first job.
    #[serde(default)]
    pub start: f64,
    /// Maximum number of jobs to emit.
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Root simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// The station under test.
    pub station: StationConfig,
    /// Job sources feeding the station.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Virtual time at which the run ends.
    pub duration: f64,
}

fn positive(value: f64, name: &str) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a positive finite number"))
    }
}

impl StationConfig {
    /// Validate station configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_capacity == 0 {
            return Err("buffer_capacity must be greater than 0".into());
        }
        if self.total_resource_capacity == 0 {
            return Err("total_resource_capacity must be greater than 0".into());
        }
        positive(self.sampling_interval, "sampling_interval")
    }
}

impl SourceConfig {
    /// Validate source configuration values.
    pub fn validate(&self) -> Result<(), String> {
        positive(self.interarrival, "interarrival")?;
        if self.required_resource == 0 {
            return Err("required_resource must be greater than 0".into());
        }
        if !self.service_time.is_finite() || self.service_time < 0.0 {
            return Err("service_time must be a non-negative finite number".into());
        }
        if !self.start.is_finite() || self.start < 0.0 {
            return Err("start must be a non-negative finite number".into());
        }
        Ok(())
    }
}

impl SimulationConfig {
    /// Validate the station and every source.
    pub fn validate(&self) -> Result<(), String> {
        self.station
            .validate()
            .map_err(|e| format!("station invalid: {e}"))?;
        for source in &self.sources {
            source
                .validate()
                .map_err(|e| format!("source `{}` invalid: {e}", source.id))?;
        }
        positive(self.duration, "duration")
    }

    /// Parse simulation configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading config {}", path.display()))
    }
}
