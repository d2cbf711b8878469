//! Session-scoped loading of histories and profiles.
//!
//! A `Session` owns a data source and a `SessionCache`. Each mass is read
//! and run through milestone detection at most once per cache; profiles are
//! cached by their resolved step, so differently phrased queries that land
//! on the same snapshot share one load.

use rayon::prelude::*;
use se_catalog::{Catalog, SubStage, SubStageModel};
use se_core::{MassKey, Real, StepNumber};
use se_history::{EvolutionSource, History, HistoryResult, Profile, ProfileQuery};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::selection::Selection;

/// Loaded histories and profiles, keyed by mass (and step).
///
/// Entries are only ever added. The cache can be built up front and handed
/// to a session, or taken back out of one with `Session::into_cache`.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    histories: HashMap<MassKey, Arc<History>>,
    profiles: HashMap<(MassKey, StepNumber), Arc<Profile>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self, mass: Real) -> Option<&Arc<History>> {
        self.histories.get(&MassKey::new(mass).ok()?)
    }

    pub fn profile(&self, mass: Real, step: StepNumber) -> Option<&Arc<Profile>> {
        self.profiles.get(&(MassKey::new(mass).ok()?, step))
    }

    pub fn history_count(&self) -> usize {
        self.histories.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Insert unless present; returns the cached entry either way.
    fn insert_history(&mut self, key: MassKey, history: History) -> Arc<History> {
        self.histories
            .entry(key)
            .or_insert_with(|| Arc::new(history))
            .clone()
    }

    fn insert_profile(&mut self, key: MassKey, profile: Profile) -> Arc<Profile> {
        self.profiles
            .entry((key, profile.step))
            .or_insert_with(|| Arc::new(profile))
            .clone()
    }
}

/// A resolved selection with its data loaded.
#[derive(Debug, Clone)]
pub struct ResolvedExample<'c> {
    pub substage: &'c SubStage,
    pub model: &'c SubStageModel,
    pub history: Arc<History>,
    pub profile: Arc<Profile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreloadFailure {
    pub mass: Real,
    pub step: Option<StepNumber>,
    pub message: String,
}

/// Outcome of a preload pass. Failures are collected, not raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreloadReport {
    pub histories: usize,
    pub profiles: usize,
    pub failures: Vec<PreloadFailure>,
}

impl PreloadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Session<S> {
    source: S,
    cache: SessionCache,
    config: SessionConfig,
}

impl<S: EvolutionSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, SessionCache::new(), SessionConfig::default())
    }

    pub fn with_config(source: S, config: SessionConfig) -> Self {
        Self::with_cache(source, SessionCache::new(), config)
    }

    pub fn with_cache(source: S, cache: SessionCache, config: SessionConfig) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn into_cache(self) -> SessionCache {
        self.cache
    }

    /// History for `mass`, loading and detecting milestones on first use.
    pub fn get_history(&mut self, mass: Real) -> AppResult<Arc<History>> {
        let key = MassKey::new(mass)?;
        if let Some(history) = self.cache.histories.get(&key) {
            return Ok(history.clone());
        }

        let series = self.source.load_series(mass)?;
        let history = History::new(mass, series, &self.config.milestones);
        debug!(mass, steps = history.len(), "history loaded");
        Ok(self.cache.insert_history(key, history))
    }

    /// Profile selected by `query` within an already loaded history.
    pub fn resolve_profile(
        &mut self,
        history: &History,
        query: &ProfileQuery,
    ) -> AppResult<Arc<Profile>> {
        let step = history.resolve_step(query)?;
        let key = MassKey::new(history.mass())?;
        if let Some(profile) = self.cache.profiles.get(&(key, step)) {
            return Ok(profile.clone());
        }

        let snapshot = self.source.load_snapshot(history.mass(), step)?;
        let profile = Profile::from_snapshot(history, step, snapshot)?;
        debug!(
            mass = history.mass(),
            %step,
            shells = profile.shell_count(),
            "profile loaded"
        );
        Ok(self.cache.insert_profile(key, profile))
    }

    pub fn get_profile(&mut self, mass: Real, query: &ProfileQuery) -> AppResult<Arc<Profile>> {
        let history = self.get_history(mass)?;
        self.resolve_profile(&history, query)
    }

    /// Load the data behind a resolved selection.
    ///
    /// Returns `None` for selections that have nothing to show.
    pub fn load_selection<'c>(
        &mut self,
        selection: &Selection<'c>,
    ) -> AppResult<Option<ResolvedExample<'c>>> {
        let Selection::Resolved { substage, model } = *selection else {
            return Ok(None);
        };

        let history = self.get_history(model.mass)?;
        let query = ProfileQuery::by_step(model.model_example);
        let profile = self.resolve_profile(&history, &query)?;
        Ok(Some(ResolvedExample {
            substage,
            model,
            history,
            profile,
        }))
    }

    /// Warm the cache with every example model in `catalog`.
    pub fn preload(&mut self, catalog: &Catalog) -> PreloadReport {
        let mut report = PreloadReport::default();
        for mass in catalog.model_masses() {
            match self.get_history(mass) {
                Ok(_) => report.histories += 1,
                Err(e) => report.record(mass, None, e.to_string()),
            }
        }
        self.preload_profiles(catalog, &mut report);
        report.log();
        report
    }

    fn preload_profiles(&mut self, catalog: &Catalog, report: &mut PreloadReport) {
        for model in catalog.models() {
            let Some(history) = self.cache.history(model.mass).cloned() else {
                continue;
            };
            let query = ProfileQuery::by_step(model.model_example);
            match self.resolve_profile(&history, &query) {
                Ok(_) => report.profiles += 1,
                Err(e) => report.record(model.mass, Some(model.model_example), e.to_string()),
            }
        }
    }
}

impl<S: EvolutionSource + Sync> Session<S> {
    /// Like `preload`, but histories for different masses are read in
    /// parallel.
    pub fn preload_parallel(&mut self, catalog: &Catalog) -> PreloadReport {
        let mut report = PreloadReport::default();
        let pending: Vec<Real> = catalog
            .model_masses()
            .into_iter()
            .filter(|&mass| self.cache.history(mass).is_none())
            .collect();
        report.histories = catalog.model_masses().len() - pending.len();

        let source = &self.source;
        let milestones = self.config.milestones;
        let loaded: Vec<(Real, HistoryResult<History>)> = pending
            .par_iter()
            .map(|&mass| {
                let history = source
                    .load_series(mass)
                    .map(|series| History::new(mass, series, &milestones));
                (mass, history)
            })
            .collect();

        for (mass, result) in loaded {
            let inserted: AppResult<()> = result.map_err(AppError::from).and_then(|history| {
                let key = MassKey::new(mass)?;
                self.cache.insert_history(key, history);
                Ok(())
            });
            match inserted {
                Ok(()) => report.histories += 1,
                Err(e) => report.record(mass, None, e.to_string()),
            }
        }

        self.preload_profiles(catalog, &mut report);
        report.log();
        report
    }
}

impl PreloadReport {
    fn record(&mut self, mass: Real, step: Option<StepNumber>, message: String) {
        match step {
            Some(step) => warn!(mass, %step, error = %message, "preload failed"),
            None => warn!(mass, error = %message, "preload failed"),
        }
        self.failures.push(PreloadFailure {
            mass,
            step,
            message,
        });
    }

    fn log(&self) {
        info!(
            histories = self.histories,
            profiles = self.profiles,
            failures = self.failures.len(),
            "preload finished"
        );
    }
}
