use anyhow::{bail, Result};
use rusqlite::{params, Connection};

/// Offset added to a schema version before it is written to `PRAGMA user_version`,
/// so that databases created by other tools (user_version 0) are never mistaken
/// for one of ours.
pub const BASE_DB_VERSION: usize = 17000;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional field assignments are passed.
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                is_unique: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    Blob,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Blob => "BLOB",
        }
    }

    fn from_sql(s: &str) -> Option<Self> {
        match s {
            "TEXT" => Some(SqlType::Text),
            "INTEGER" => Some(SqlType::Integer),
            "REAL" => Some(SqlType::Real),
            "BLOB" => Some(SqlType::Blob),
            _ => None,
        }
    }
}

#[allow(unused)]
pub enum ForeignKeyOnChange {
    NoAction,
    Restrict,
    SetNull,
    Cascade,
}

impl ForeignKeyOnChange {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyOnChange::NoAction => "NO ACTION",
            ForeignKeyOnChange::Restrict => "RESTRICT",
            ForeignKeyOnChange::SetNull => "SET NULL",
            ForeignKeyOnChange::Cascade => "CASCADE",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub on_delete: ForeignKeyOnChange,
}

pub struct Column<'a, S: AsRef<str>> {
    pub name: S,
    pub sql_type: &'a SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub is_unique: bool,
    pub default_value: Option<S>,
    pub foreign_key: Option<&'a ForeignKey>,
}

impl Column<'static, &'static str> {
    fn definition_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.non_null {
            sql.push_str(" NOT NULL");
        }
        if self.is_unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default_value) = self.default_value {
            sql.push_str(&format!(" DEFAULT {}", default_value));
        }
        if let Some(fk) = self.foreign_key {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE {}",
                fk.foreign_table,
                fk.foreign_column,
                fk.on_delete.as_sql()
            ));
        }
        sql
    }
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<'static, &'static str>],
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(|c| c.definition_sql()).collect();
        for unique_constraint in self.unique_constraints {
            parts.push(format!("UNIQUE ({})", unique_constraint.join(", ")));
        }
        format!("CREATE TABLE {} ({});", self.name, parts.join(", "))
    }

    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_sql(), params![])?;
        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!("CREATE INDEX {} ON {}({});", index_name, self.name, column_name),
                params![],
            )?;
        }
        Ok(())
    }

    fn validate_columns(&self, conn: &Connection) -> Result<()> {
        struct ActualColumn {
            name: String,
            sql_type: Option<SqlType>,
            non_null: bool,
            is_primary_key: bool,
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<ActualColumn> = stmt
            .query_map(params![], |row| {
                Ok(ActualColumn {
                    name: row.get(1)?,
                    sql_type: SqlType::from_sql(&row.get::<_, String>(2)?),
                    non_null: row.get::<_, i32>(3)? == 1,
                    is_primary_key: row.get::<_, i32>(5)? == 1,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;

        if actual.len() != self.columns.len() {
            bail!(
                "Table {} has {} columns, expected {}. Found: {}",
                self.name,
                actual.len(),
                self.columns.len(),
                actual
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        for (actual, expected) in actual.iter().zip(self.columns.iter()) {
            if !actual.name.eq_ignore_ascii_case(expected.name) {
                bail!(
                    "Table {} column name mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    actual.name
                );
            }
            if actual.sql_type.as_ref() != Some(expected.sql_type) {
                bail!(
                    "Table {} column {} type mismatch: expected {:?}, got {:?}",
                    self.name,
                    expected.name,
                    expected.sql_type,
                    actual.sql_type
                );
            }
            // SQLite reports an INTEGER PRIMARY KEY as nullable, so only compare
            // nullability for ordinary columns.
            if !expected.is_primary_key && actual.non_null != expected.non_null {
                bail!(
                    "Table {} column {} non-null mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    expected.non_null,
                    actual.non_null
                );
            }
            if actual.is_primary_key != expected.is_primary_key {
                bail!(
                    "Table {} column {} primary key mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    expected.is_primary_key,
                    actual.is_primary_key
                );
            }
        }
        Ok(())
    }

    fn validate_indices(&self, conn: &Connection) -> Result<()> {
        for (index_name, _) in self.indices {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name=?2",
                    params![index_name, self.name],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !exists {
                bail!("Table {} is missing index '{}'", self.name, index_name);
            }
        }
        Ok(())
    }

    fn unique_column_sets(&self, conn: &Connection) -> Result<Vec<Vec<String>>> {
        let mut stmt = conn.prepare(&format!("PRAGMA index_list({})", self.name))?;
        let unique_indices: Vec<String> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i32>(2)?)))?
            .filter_map(|r| r.ok())
            .filter(|(_, unique)| *unique == 1)
            .map(|(name, _)| name)
            .collect();

        let mut sets = Vec::with_capacity(unique_indices.len());
        for index_name in unique_indices {
            let mut idx_stmt = conn.prepare(&format!("PRAGMA index_info({})", index_name))?;
            let mut columns: Vec<String> = idx_stmt
                .query_map([], |row| row.get::<_, String>(2))?
                .filter_map(|r| r.ok())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            columns.sort();
            sets.push(columns);
        }
        Ok(sets)
    }

    fn validate_unique_constraints(&self, conn: &Connection) -> Result<()> {
        if self.unique_constraints.is_empty() {
            return Ok(());
        }
        let actual_sets = self.unique_column_sets(conn)?;
        for expected in self.unique_constraints {
            let mut expected_sorted: Vec<String> =
                expected.iter().map(|c| c.to_ascii_lowercase()).collect();
            expected_sorted.sort();
            if !actual_sets.iter().any(|set| *set == expected_sorted) {
                bail!(
                    "Table {} is missing unique constraint on columns ({})",
                    self.name,
                    expected.join(", ")
                );
            }
        }
        Ok(())
    }

    fn validate_foreign_keys(&self, conn: &Connection) -> Result<()> {
        // PRAGMA foreign_key_list: id, seq, table, from, to, on_update, on_delete, match
        let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({})", self.name))?;
        let actual: Vec<(String, String, String, String)> = stmt
            .query_map([], |row| Ok((row.get(3)?, row.get(2)?, row.get(4)?, row.get(6)?)))?
            .filter_map(|r| r.ok())
            .collect();

        for column in self.columns {
            let Some(expected) = column.foreign_key else {
                continue;
            };
            let on_delete = expected.on_delete.as_sql();
            let matching = actual.iter().find(|(from, _, _, _)| from.eq_ignore_ascii_case(column.name));
            match matching {
                Some((_, table, to, actual_on_delete))
                    if table.eq_ignore_ascii_case(expected.foreign_table)
                        && to.eq_ignore_ascii_case(expected.foreign_column)
                        && actual_on_delete == on_delete => {}
                Some((_, table, to, actual_on_delete)) => bail!(
                    "Table {} column {} has foreign key mismatch: expected REFERENCES {}({}) ON DELETE {}, got REFERENCES {}({}) ON DELETE {}",
                    self.name,
                    column.name,
                    expected.foreign_table,
                    expected.foreign_column,
                    on_delete,
                    table,
                    to,
                    actual_on_delete
                ),
                None => bail!(
                    "Table {} column {} is missing foreign key: expected REFERENCES {}({}) ON DELETE {}",
                    self.name,
                    column.name,
                    expected.foreign_table,
                    expected.foreign_column,
                    on_delete
                ),
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + self.version)?;
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate_columns(conn)?;
            table.validate_indices(conn)?;
            table.validate_unique_constraints(conn)?;
            table.validate_foreign_keys(conn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATOR_FK: ForeignKey = ForeignKey {
        foreign_table: "creator",
        foreign_column: "CreatorID",
        on_delete: ForeignKeyOnChange::NoAction,
    };

    const CREATOR_TABLE: Table = Table {
        name: "creator",
        columns: &[
            sqlite_column!("CreatorID", &SqlType::Integer, is_primary_key = true),
            sqlite_column!("Name", &SqlType::Text, non_null = true),
        ],
        indices: &[("idx_creator_name", "Name")],
        unique_constraints: &[],
    };

    const CREDIT_TABLE: Table = Table {
        name: "credit",
        columns: &[
            sqlite_column!("TrackID", &SqlType::Integer, non_null = true),
            sqlite_column!(
                "CreatorID",
                &SqlType::Integer,
                non_null = true,
                foreign_key = Some(&CREATOR_FK)
            ),
        ],
        indices: &[],
        unique_constraints: &[&["TrackID", "CreatorID"]],
    };

    fn schema() -> VersionedSchema {
        VersionedSchema {
            version: 0,
            tables: &[CREATOR_TABLE, CREDIT_TABLE],
        }
    }

    #[test]
    fn create_sql_includes_constraints() {
        let sql = CREDIT_TABLE.create_sql();
        assert!(sql.starts_with("CREATE TABLE credit ("));
        assert!(sql.contains("CreatorID INTEGER NOT NULL REFERENCES creator(CreatorID) ON DELETE NO ACTION"));
        assert!(sql.contains("UNIQUE (TrackID, CreatorID)"));
    }

    #[test]
    fn created_schema_validates_and_sets_version() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = schema();
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version as usize, BASE_DB_VERSION);
    }

    #[test]
    fn validate_detects_missing_index() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE creator (CreatorID INTEGER PRIMARY KEY, Name TEXT NOT NULL)",
            [],
        )
        .unwrap();

        let err = CREATOR_TABLE.validate_indices(&conn).unwrap_err().to_string();
        assert!(err.contains("missing index"));
        assert!(err.contains("idx_creator_name"));
    }

    #[test]
    fn validate_detects_missing_unique_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE credit (TrackID INTEGER NOT NULL, CreatorID INTEGER NOT NULL REFERENCES creator(CreatorID) ON DELETE NO ACTION)",
            [],
        )
        .unwrap();

        let err = CREDIT_TABLE
            .validate_unique_constraints(&conn)
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing unique constraint"));
    }

    #[test]
    fn unique_constraint_column_order_does_not_matter() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE credit (TrackID INTEGER NOT NULL, CreatorID INTEGER NOT NULL, UNIQUE (CreatorID, TrackID))",
            [],
        )
        .unwrap();

        CREDIT_TABLE.validate_unique_constraints(&conn).unwrap();
    }

    #[test]
    fn validate_detects_wrong_on_delete_action() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE creator (CreatorID INTEGER PRIMARY KEY, Name TEXT NOT NULL)", [])
            .unwrap();
        conn.execute(
            "CREATE TABLE credit (TrackID INTEGER NOT NULL, CreatorID INTEGER NOT NULL REFERENCES creator(CreatorID) ON DELETE CASCADE, UNIQUE (TrackID, CreatorID))",
            [],
        )
        .unwrap();

        let err = CREDIT_TABLE.validate_foreign_keys(&conn).unwrap_err().to_string();
        assert!(err.contains("foreign key mismatch"));
        assert!(err.contains("CASCADE"));
    }

    #[test]
    fn validate_detects_column_type_change() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE creator (CreatorID INTEGER PRIMARY KEY, Name INTEGER NOT NULL)", [])
            .unwrap();

        let err = CREATOR_TABLE.validate_columns(&conn).unwrap_err().to_string();
        assert!(err.contains("type mismatch"));
    }
}
