mod error;
mod models;
mod schema;
mod store;

pub use error::{CatalogError, CatalogResult};
pub use models::*;
pub use schema::CATALOG_SCHEMA;
pub use store::SqliteCatalogStore;
