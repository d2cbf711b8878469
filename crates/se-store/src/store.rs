//! Data store API.

use se_core::{MassKey, Real, StepNumber};
use se_history::{EvolutionSource, HistoryResult, SeriesRecord, SnapshotRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{StoreError, StoreResult};

const HISTORY_FILE: &str = "history.json";
const PROFILES_DIR: &str = "profiles";

#[derive(Debug, Clone)]
pub struct DataStore {
    root_dir: PathBuf,
}

impl DataStore {
    /// Open (and create if needed) a store for writing.
    pub fn new(root_dir: PathBuf) -> StoreResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Open an existing store.
    pub fn open(root_dir: &Path) -> StoreResult<Self> {
        if !root_dir.is_dir() {
            return Err(StoreError::NotADirectory {
                path: root_dir.display().to_string(),
            });
        }
        Ok(Self {
            root_dir: root_dir.to_path_buf(),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn mass_dir(&self, mass: Real) -> StoreResult<PathBuf> {
        let key = MassKey::new(mass)?;
        Ok(self.root_dir.join(format!("M={key}")))
    }

    fn snapshot_path(&self, mass: Real, step: StepNumber) -> StoreResult<PathBuf> {
        Ok(self
            .mass_dir(mass)?
            .join(PROFILES_DIR)
            .join(format!("{step}.json")))
    }

    pub fn has_mass(&self, mass: Real) -> bool {
        self.mass_dir(mass)
            .map(|dir| dir.join(HISTORY_FILE).exists())
            .unwrap_or(false)
    }

    /// Masses with a stored series, ascending.
    pub fn list_masses(&self) -> StoreResult<Vec<Real>> {
        let mut masses = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().join(HISTORY_FILE).exists() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            match name.strip_prefix("M=").map(str::parse::<Real>) {
                Some(Ok(mass)) => masses.push(mass),
                _ => warn!(dir = %name, "skipping directory without a mass in its name"),
            }
        }
        masses.sort_by(|a, b| a.total_cmp(b));
        Ok(masses)
    }

    /// Write a series. `available_steps` is not stored; it is derived from
    /// the snapshot files on load.
    pub fn save_series(&self, mass: Real, series: &SeriesRecord) -> StoreResult<()> {
        let dir = self.mass_dir(mass)?;
        fs::create_dir_all(dir.join(PROFILES_DIR))?;

        let record = SeriesRecord {
            available_steps: Vec::new(),
            ..series.clone()
        };
        fs::write(dir.join(HISTORY_FILE), serde_json::to_string(&record)?)?;
        Ok(())
    }

    pub fn save_snapshot(
        &self,
        mass: Real,
        step: StepNumber,
        snapshot: &SnapshotRecord,
    ) -> StoreResult<()> {
        let path = self.snapshot_path(mass, step)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(snapshot)?)?;
        Ok(())
    }

    /// Steps with a snapshot file, ascending.
    pub fn snapshot_steps(&self, mass: Real) -> StoreResult<Vec<StepNumber>> {
        let dir = self.mass_dir(mass)?.join(PROFILES_DIR);
        let mut steps = Vec::new();
        if !dir.exists() {
            return Ok(steps);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
                .and_then(StepNumber::new);
            match parsed {
                Some(step) => steps.push(step),
                None => warn!(path = %path.display(), "skipping snapshot with unparsable step"),
            }
        }
        steps.sort_unstable();
        Ok(steps)
    }

    pub fn load_series_record(&self, mass: Real) -> StoreResult<SeriesRecord> {
        let path = self.mass_dir(mass)?.join(HISTORY_FILE);
        if !path.exists() {
            return Err(StoreError::MassNotFound { mass });
        }

        let content = fs::read_to_string(&path)?;
        let mut series: SeriesRecord = serde_json::from_str(&content)?;
        series.available_steps = self.snapshot_steps(mass)?;
        debug!(
            mass,
            steps = series.len(),
            snapshots = series.available_steps.len(),
            "loaded series"
        );
        Ok(series)
    }

    pub fn load_snapshot_record(
        &self,
        mass: Real,
        step: StepNumber,
    ) -> StoreResult<SnapshotRecord> {
        let path = self.snapshot_path(mass, step)?;
        if !path.exists() {
            return Err(StoreError::SnapshotNotFound {
                mass,
                step: step.get(),
            });
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl EvolutionSource for DataStore {
    fn load_series(&self, mass: Real) -> HistoryResult<SeriesRecord> {
        Ok(self.load_series_record(mass)?)
    }

    fn load_snapshot(&self, mass: Real, step: StepNumber) -> HistoryResult<SnapshotRecord> {
        Ok(self.load_snapshot_record(mass, step)?)
    }
}
