mod versioned_schema;

pub use versioned_schema::*;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Creates `schema` on a database without user tables, otherwise checks the
/// stored `user_version` and validates the existing tables against `schema`.
pub fn prepare_database(conn: &Connection, schema: &VersionedSchema) -> Result<usize> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .context("Failed to enable foreign keys")?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;
    if table_count == 0 {
        info!("Creating catalog schema at version {}", schema.version);
        schema.create(conn)?;
        return Ok(schema.version);
    }

    let stored_version: i64 = conn
        .query_row("PRAGMA user_version;", [], |r| r.get(0))
        .context("Failed to read database version")?;
    let version = stored_version - BASE_DB_VERSION as i64;
    if version < 0 {
        bail!(
            "Database version {} does not contain base version {}, refusing to open a foreign database",
            stored_version,
            BASE_DB_VERSION
        );
    }
    if version as usize != schema.version {
        bail!(
            "Database is at schema version {}, expected {}",
            version,
            schema.version
        );
    }

    #[cfg(not(feature = "no_checks"))]
    schema
        .validate(conn)
        .with_context(|| format!("Catalog schema version {} failed validation", version))?;

    Ok(schema.version)
}
