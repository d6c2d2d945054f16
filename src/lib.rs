//! Zene music catalog
//!
//! Albums, tracks, creators, genres, countries and record labels kept in a
//! SQLite database, with multi-step write workflows and text reports.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod ids;
pub mod report;
pub mod resolver;
pub mod sqlite_persistence;
pub mod workflow;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogSettings, OpOutcome, OutcomeKind};
pub use catalog_store::{CatalogError, CatalogResult, SqliteCatalogStore};
pub use ids::IdStrategy;
