//! se-catalog: the catalog of evolutionary phases.
//!
//! Provides:
//! - The fixed table of parent stages (Hayashi track .. white dwarf)
//! - Substages with their mass intervals, display text and example models
//! - A YAML catalog schema plus a validating builder
//! - The built-in reference catalog and read-only filters over it
//!
//! # Example
//!
//! ```
//! use se_catalog::{Catalog, MassRange, ParentStage};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let range: MassRange = "0.8-1.5".parse().unwrap();
//!
//! assert!(!catalog.filter_by_mass_range(&range).is_empty());
//! assert_eq!(catalog.filter_by_stage(ParentStage::MainSequence).len(), 3);
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod mass_range;
pub mod schema;
pub mod stage;
pub mod substage;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::CatalogBuilder;
pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use mass_range::MassRange;
pub use schema::{CatalogDef, SubStageDef, SubStageModelDef};
pub use stage::{ParentStage, ParentStageInfo, parent_stages};
pub use substage::{SubStage, SubStageModel, SubStageText};
