//! Selection policies deciding which buffered job is tried next.
//!
//! A policy only answers "which job is preferred". Whether the station can
//! afford that job is decided by the dispatch loop, so the `available`
//! argument is informational for both shipped policies.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::job::Job;

/// Chooses the next candidate from the buffered jobs.
pub trait SelectionPolicy: Send + Sync {
    /// Index of the preferred job in `buffered` (arrival order), or `None` when empty.
    fn select(&self, buffered: &VecDeque<Job>, available: u32) -> Option<usize>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Earliest arrival first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl SelectionPolicy for Fifo {
    fn select(&self, buffered: &VecDeque<Job>, _available: u32) -> Option<usize> {
        if buffered.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}

/// Largest resource demand first; equal demands keep arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityByDemand;

impl SelectionPolicy for PriorityByDemand {
    fn select(&self, buffered: &VecDeque<Job>, _available: u32) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, job) in buffered.iter().enumerate() {
            // strict comparison keeps the earliest of equal demands
            if best.is_none_or(|(_, demand)| job.required() > demand) {
                best = Some((index, job.required()));
            }
        }
        best.map(|(index, _)| index)
    }

    fn name(&self) -> &'static str {
        "priority_by_demand"
    }
}

/// Policy selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// [`Fifo`].
    #[default]
    Fifo,
    /// [`PriorityByDemand`].
    #[serde(alias = "priority")]
    PriorityByDemand,
}

impl SchedulingPolicy {
    /// Instantiate the configured policy.
    pub fn build(self) -> Box<dyn SelectionPolicy> {
        match self {
            Self::Fifo => Box::new(Fifo),
            Self::PriorityByDemand => Box::new(PriorityByDemand),
        }
    }
}
