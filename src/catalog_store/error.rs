use rusqlite::ffi;
use thiserror::Error;

/// Failures raised by catalog reads and writes.
///
/// Constraint violations reported by SQLite are split out of the generic
/// [`CatalogError::Lookup`] case so callers can tell "already exists" apart
/// from a broken store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Lookup(#[source] rusqlite::Error),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Creation of {0} was declined")]
    CreationDeclined(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            CatalogError::AlreadyExists(_) | CatalogError::MissingReference(_)
        )
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                        CatalogError::AlreadyExists(detail)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => CatalogError::MissingReference(detail),
                    _ => CatalogError::Lookup(err),
                }
            }
            _ => CatalogError::Lookup(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY, name TEXT UNIQUE);
             CREATE TABLE child (id INTEGER, parent_id INTEGER NOT NULL REFERENCES parent(id));
             INSERT INTO parent (id, name) VALUES (1, 'a');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn duplicate_primary_key_is_already_exists() {
        let err: CatalogError = conn()
            .execute("INSERT INTO parent (id, name) VALUES (1, 'b')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
    }

    #[test]
    fn duplicate_unique_column_is_already_exists() {
        let err: CatalogError = conn()
            .execute("INSERT INTO parent (id, name) VALUES (2, 'a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
    }

    #[test]
    fn dangling_reference_is_missing_reference() {
        let err: CatalogError = conn()
            .execute("INSERT INTO child (id, parent_id) VALUES (1, 42)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, CatalogError::MissingReference(_)));
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn not_null_violation_stays_a_lookup_failure() {
        let err: CatalogError = conn()
            .execute("INSERT INTO child (id, parent_id) VALUES (1, NULL)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, CatalogError::Lookup(_)));
    }

    #[test]
    fn malformed_query_is_lookup_failure() {
        let err: CatalogError = conn()
            .execute("SELEC nonsense", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, CatalogError::Lookup(_)));
        assert!(!err.is_constraint_violation());
    }
}
