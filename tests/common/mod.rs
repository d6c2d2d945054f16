//! Common test infrastructure
//!
//! Integration tests only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestCatalog, ALBUM_TITLE};
//!
//! #[test]
//! fn test_album_report() {
//!     let fixture = TestCatalog::seeded();
//!     let outcome = fixture.catalog.query_by_album_title(ALBUM_TITLE, true);
//!     assert!(outcome.status > 0);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{always_confirm, never_confirm, track_line_cells, TestCatalog};
