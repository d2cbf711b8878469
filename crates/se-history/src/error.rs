//! History and profile errors.

use se_core::{Real, SeError};
use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// Profile requests need exactly one of index, step or age.
    #[error("Exactly one of index, step or age must be given ({given} given)")]
    AmbiguousSelector { given: usize },

    /// Forward scan ran past the last available snapshot.
    #[error("No snapshot at or after step {requested} for mass {mass}")]
    NoSnapshotAvailable { mass: Real, requested: u32 },

    #[error("Skipping {skip} snapshots from step {step} leaves the available range")]
    SkipOutOfRange { step: u32, skip: i64 },

    #[error("Step {step} is beyond the end of the series ({len} steps)")]
    StepOutOfRange { step: u32, len: usize },

    #[error("No step reaches age {age}")]
    AgeOutOfRange { age: Real },

    #[error("No series for mass {mass}")]
    SeriesNotFound { mass: Real },

    #[error("No snapshot for mass {mass} at step {step}")]
    SnapshotNotFound { mass: Real, step: u32 },

    /// Backend failure (I/O, decoding, ...).
    #[error("Source error: {message}")]
    Source { message: String },

    #[error("Core error: {0}")]
    Core(#[from] SeError),
}
