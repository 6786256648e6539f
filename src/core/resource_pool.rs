//! Resource pool capacity accounting.

use crate::core::StationError;

/// Finite pool of interchangeable resource units.
///
/// `0 <= available <= total` holds after every successful call; a failing
/// call leaves the pool untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    total: u32,
    available: u32,
}

impl ResourcePool {
    /// Create a pool with every unit available.
    pub const fn new(total: u32) -> Self {
        Self {
            total,
            available: total,
        }
    }

    /// Total capacity.
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Units not held by any job.
    pub const fn available(&self) -> u32 {
        self.available
    }

    /// Units held by jobs in service.
    pub const fn in_use(&self) -> u32 {
        self.total - self.available
    }

    /// Whether `units` could be acquired right now.
    pub const fn can_acquire(&self, units: u32) -> bool {
        units <= self.available
    }

    /// Take `units` out of the pool.
    pub fn acquire(&mut self, units: u32) -> Result<(), StationError> {
        if !self.can_acquire(units) {
            return Err(StationError::InsufficientCapacity {
                requested: units,
                available: self.available,
            });
        }
        self.available -= units;
        Ok(())
    }

    /// Return `units` to the pool.
    pub fn release(&mut self, units: u32) -> Result<(), StationError> {
        match self.available.checked_add(units) {
            Some(after) if after <= self.total => {
                self.available = after;
                Ok(())
            }
            _ => Err(StationError::CapacityOverflow {
                released: units,
                available: self.available,
                total: self.total,
            }),
        }
    }
}
