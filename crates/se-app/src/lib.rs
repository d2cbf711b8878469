//! Shared application service layer for the stellar evolution explorer.
//!
//! This crate is what a front end talks to: it resolves a user's selection
//! (a mass range or an evolutionary stage) to one example model, and loads
//! the matching history and profile through a session-scoped cache.

pub mod config;
pub mod error;
pub mod selection;
pub mod session;

// Re-export key types for convenience
pub use config::SessionConfig;
pub use error::{AppError, AppResult};
pub use selection::{
    Selection, SelectionQuery, SubStageTab, available_substages, choose_substage, resolve_model,
    select, select_model_mass_first, select_model_stage_first, tabs,
};
pub use session::{PreloadFailure, PreloadReport, ResolvedExample, Session, SessionCache};
