//! Session configuration.

use se_catalog::Catalog;
use se_history::MilestoneConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Settings for one explorer session.
///
/// ```yaml
/// catalog: catalogs/custom.yaml   # optional, built-in catalog otherwise
/// data_dir: /data/tracks          # optional
/// milestones:
///   zams_luminosity_fraction: 0.999
///   he_depletion_fraction: 0.0001
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub catalog: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub milestones: MilestoneConfig,
}

impl SessionConfig {
    pub fn load_yaml(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// The configured catalog file, or the built-in catalog.
    pub fn load_catalog(&self) -> AppResult<Catalog> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::load_yaml(path)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SessionConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.milestones.zams_luminosity_fraction, 0.999);
        assert_eq!(config.load_catalog().unwrap().len(), 14);
    }

    #[test]
    fn partial_milestone_config() {
        let config =
            SessionConfig::from_yaml_str("milestones:\n  he_depletion_fraction: 0.001\n").unwrap();
        assert_eq!(config.milestones.he_depletion_fraction, 0.001);
        assert_eq!(config.milestones.zams_luminosity_fraction, 0.999);
    }

    #[test]
    fn unreadable_config_is_reported() {
        let path = std::env::temp_dir().join("se_app_config_missing.yaml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            SessionConfig::load_yaml(&path),
            Err(AppError::ConfigRead { .. })
        ));
    }
}
