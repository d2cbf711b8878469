//! Error types for the se-app service layer.

use std::path::PathBuf;

use se_history::HistoryError;

/// Application error type that wraps errors from the backend crates.
///
/// Empty selections and undetected milestones are not errors and never
/// show up here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid catalog; fatal at startup.
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for se-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Caller mistakes and configuration problems, as opposed to data that
    /// is simply not there.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Catalog(_)
                | AppError::ConfigRead { .. }
                | AppError::Config(_)
                | AppError::History(HistoryError::AmbiguousSelector { .. })
        )
    }
}

// Conversions from backend error types
impl From<se_catalog::CatalogError> for AppError {
    fn from(err: se_catalog::CatalogError) -> Self {
        AppError::Catalog(err.to_string())
    }
}

impl From<se_store::StoreError> for AppError {
    fn from(err: se_store::StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<se_core::SeError> for AppError {
    fn from(err: se_core::SeError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_config_and_selector_errors_are_fatal() {
        assert!(AppError::Catalog("bad".into()).is_fatal());
        assert!(AppError::from(HistoryError::AmbiguousSelector { given: 0 }).is_fatal());
        assert!(
            !AppError::from(HistoryError::NoSnapshotAvailable {
                mass: 1.0,
                requested: 9
            })
            .is_fatal()
        );
        assert!(!AppError::Store("io".into()).is_fatal());
    }
}
