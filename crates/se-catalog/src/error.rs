//! Catalog configuration errors.
//!
//! Every variant here is fatal at startup: a catalog that fails validation
//! is never handed to the selection engine.

use se_core::Real;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Substage '{id}': mass interval [{mass_min}, {mass_max}] is empty or inverted")]
    InvalidMassInterval {
        id: String,
        mass_min: Real,
        mass_max: Real,
    },

    #[error("Substage '{id}': non-finite {what}")]
    NonFinite { id: String, what: &'static str },

    #[error("Substage '{id}': example at mass {mass} lies outside [{mass_min}, {mass_max}]")]
    ModelOutsideInterval {
        id: String,
        mass: Real,
        mass_min: Real,
        mass_max: Real,
    },

    #[error("Substage '{id}': {count} models are flagged as default (at most one allowed)")]
    MultipleDefaults { id: String, count: usize },

    #[error("Substage '{id}': example at mass {mass} has inconsistent step bounds ({reason})")]
    ModelStepBounds {
        id: String,
        mass: Real,
        reason: &'static str,
    },

    #[error("Duplicate substage id: {id}")]
    DuplicateId { id: String },

    #[error("Invalid mass range '{input}': {reason}")]
    InvalidMassRange { input: String, reason: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_substage() {
        let err = CatalogError::MultipleDefaults {
            id: "med_ms".into(),
            count: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("med_ms"));
        assert!(msg.contains('2'));
    }
}
