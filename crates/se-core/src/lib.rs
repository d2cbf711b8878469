//! se-core: stable foundation for the stellar evolution explorer.
//!
//! Contains:
//! - numeric (Real, finiteness/positivity checks, index-set minimum)
//! - ids (compact catalog IDs, 1-based step numbers, hashable mass keys)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SeError, SeResult};
pub use ids::*;
pub use numeric::*;
