//! se-store: directory-backed evolution data.
//!
//! Layout, one directory per mass:
//!
//! ```text
//! <root>/M=1.0/history.json
//! <root>/M=1.0/profiles/296.json
//! ```
//!
//! The set of stored steps is whatever `profiles/` holds.

pub mod store;

pub use store::DataStore;

use se_core::{Real, SeError};
use se_history::HistoryError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data for mass {mass}")]
    MassNotFound { mass: Real },

    #[error("No snapshot for mass {mass} at step {step}")]
    SnapshotNotFound { mass: Real, step: u32 },

    #[error("Not a data store directory: {path}")]
    NotADirectory { path: String },

    #[error("Core error: {0}")]
    Core(#[from] SeError),
}

impl From<StoreError> for HistoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MassNotFound { mass } => HistoryError::SeriesNotFound { mass },
            StoreError::SnapshotNotFound { mass, step } => {
                HistoryError::SnapshotNotFound { mass, step }
            }
            StoreError::Core(e) => HistoryError::Core(e),
            other => HistoryError::Source {
                message: other.to_string(),
            },
        }
    }
}
