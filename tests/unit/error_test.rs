//! Tests for error types

use service_station::core::{JobId, StationError};

#[test]
fn test_insufficient_capacity_error() {
    let err = StationError::InsufficientCapacity {
        requested: 6,
        available: 5,
    };
    assert_eq!(
        format!("{}", err),
        "insufficient capacity: requested 6, available 5"
    );
    assert!(err.is_engine_defect());
}

#[test]
fn test_unknown_completion_error() {
    let err = StationError::UnknownCompletion(JobId(9));
    assert_eq!(format!("{}", err), "completion for unknown job job-9");
    assert!(err.is_engine_defect());
}

#[test]
fn test_capacity_overflow_error() {
    let err = StationError::CapacityOverflow {
        released: 4,
        available: 8,
        total: 10,
    };
    assert_eq!(
        format!("{}", err),
        "capacity overflow: releasing 4 with 8 of 10 available"
    );
}

#[test]
fn test_recoverable_errors_are_not_defects() {
    assert!(!StationError::InvalidJob("zero units".into()).is_engine_defect());
    assert!(!StationError::Config("bad".into()).is_engine_defect());
    assert!(!StationError::Sink("disk full".into()).is_engine_defect());
    assert_eq!(
        format!("{}", StationError::InvalidSource("sauce".into())),
        "invalid source identifier: sauce"
    );
}
