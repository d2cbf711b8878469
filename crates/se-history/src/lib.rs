//! se-history: evolution series, structural snapshots and milestones.
//!
//! Provides:
//! - Raw series / snapshot records as delivered by a data source
//! - `History`: one series per mass, with detected milestones and the list
//!   of steps that have a snapshot
//! - The milestone detector (hydrogen ignition, hydrogen exhaustion,
//!   helium ignition)
//! - Snapshot step resolution (forward scan + skip)
//! - The `EvolutionSource` trait plus an in-memory implementation
//!
//! # Architecture
//!
//! Nothing here reads the simulation's native files. A backend implements
//! `EvolutionSource` and hands over plain arrays; see `se-store` for the
//! directory-backed one.

pub mod error;
pub mod history;
pub mod milestones;
pub mod resolve;
pub mod series;
pub mod source;

// Re-exports for ergonomics
pub use error::{HistoryError, HistoryResult};
pub use history::{History, Profile};
pub use milestones::{Milestone, MilestoneConfig, MilestoneKind, Milestones, detect_milestones};
pub use resolve::{ProfileQuery, ProfileSelector, forward_scan, resolve_available_step};
pub use series::{SeriesRecord, SnapshotRecord};
pub use source::{EvolutionSource, InMemorySource};
