//! SQLite-backed storage for the music catalog.
//!
//! `SqliteCatalogStore` owns the single connection used by a catalog. Every
//! mutating method is one independent step: it runs inside its own
//! `BEGIN IMMEDIATE` / `COMMIT` and rolls back only its own statements on
//! failure. Multi-step workflows are composed on top of these steps.

use super::error::{CatalogError, CatalogResult};
use super::models::*;
use super::schema::CATALOG_SCHEMA;
use crate::sqlite_persistence::prepare_database;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct SqliteCatalogStore {
    conn: Connection,
}

fn album_from_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get("AlbumID")?,
        name: row.get("AlbumName")?,
        media_type: row.get("MediaType")?,
        release_date: date_column(row, "ReleaseDate")?,
        label_id: row.get("LabelID")?,
    })
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get("TrackID")?,
        title: row.get("ReleaseName")?,
        rating: ExplicitRating::from_db_int(row.get("ExplicitRating")?),
        duration_secs: row.get("Duration")?,
        country_id: row.get("CountryID")?,
        album_id: row.get("AlbumID")?,
    })
}

fn label_from_row(row: &Row<'_>) -> rusqlite::Result<RecordLabel> {
    Ok(RecordLabel {
        id: row.get("LabelID")?,
        name: row.get("Name")?,
        founding_date: date_column(row, "FoundingDate")?,
        country_id: row.get("CountryID")?,
    })
}

fn date_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<CatalogDate>> {
    let raw: Option<String> = row.get(column)?;
    Ok(raw.as_deref().and_then(CatalogDate::from_db_str))
}

fn date_param(date: Option<CatalogDate>) -> Option<String> {
    date.map(|d| d.to_db_string())
}

impl SqliteCatalogStore {
    /// Opens (creating if needed) the catalog database at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let version = prepare_database(&conn, &CATALOG_SCHEMA)?;
        let store = SqliteCatalogStore { conn };
        let counts = store.counts().context("Failed to count catalog rows")?;
        info!(
            "Opened catalog (schema v{}): {} albums, {} tracks, {} creators, {} genres, {} countries, {} labels",
            version,
            counts.albums,
            counts.tracks,
            counts.creators,
            counts.genres,
            counts.countries,
            counts.labels
        );
        Ok(store)
    }

    /// Read access for report queries.
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn in_transaction<T>(
        &self,
        step: &str,
        body: impl FnOnce(&Connection) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        match body(&self.conn) {
            Ok(value) => {
                if let Err(e) = self.conn.execute("COMMIT", []) {
                    self.rollback(step);
                    return Err(e.into());
                }
                debug!("Committed step: {}", step);
                Ok(value)
            }
            Err(e) => {
                self.rollback(step);
                debug!("Rolled back step {}: {}", step, e);
                Err(e)
            }
        }
    }

    /// The step's own error is what callers see; a failed rollback is only logged.
    fn rollback(&self, step: &str) {
        if let Err(e) = self.conn.execute("ROLLBACK", []) {
            warn!("Rollback of step {} failed: {}", step, e);
        }
    }

    fn read_modify_write<T, K: ToSql>(
        &self,
        step: &str,
        select_sql: &str,
        key: K,
        read: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
        write: impl FnOnce(&Connection) -> rusqlite::Result<usize>,
    ) -> CatalogResult<Option<UpdateApplied<T>>> {
        self.in_transaction(step, |conn| {
            let Some(previous) = conn.query_row(select_sql, params![key], read).optional()? else {
                return Ok(None);
            };
            let rows = write(conn)?;
            Ok(Some(UpdateApplied { previous, rows }))
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Label lookup is a case-insensitive `LIKE` pattern match; the first hit wins.
    pub fn find_label_id(&self, name: &str) -> CatalogResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT LabelID FROM recordlabel WHERE Name LIKE ?1 ORDER BY LabelID LIMIT 1",
                params![name],
                |r| r.get(0),
            )
            .optional()?)
    }

    pub fn find_country_id(&self, name: &str) -> CatalogResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT CountryID FROM country WHERE Name = ?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?)
    }

    pub fn find_creator_id(&self, name: &str) -> CatalogResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT CreatorID FROM creator WHERE Name = ?1 ORDER BY CreatorID LIMIT 1",
                params![name],
                |r| r.get(0),
            )
            .optional()?)
    }

    pub fn get_album(&self, album_id: i64) -> CatalogResult<Option<Album>> {
        Ok(self
            .conn
            .query_row(
                "SELECT AlbumID, AlbumName, MediaType, ReleaseDate, LabelID FROM album WHERE AlbumID = ?1",
                params![album_id],
                album_from_row,
            )
            .optional()?)
    }

    pub fn get_track(&self, track_id: i64) -> CatalogResult<Option<Track>> {
        Ok(self
            .conn
            .query_row(
                "SELECT TrackID, ReleaseName, ExplicitRating, Duration, CountryID, AlbumID FROM audiofile WHERE TrackID = ?1",
                params![track_id],
                track_from_row,
            )
            .optional()?)
    }

    pub fn get_label(&self, label_id: i64) -> CatalogResult<Option<RecordLabel>> {
        Ok(self
            .conn
            .query_row(
                "SELECT LabelID, Name, FoundingDate, CountryID FROM recordlabel WHERE LabelID = ?1",
                params![label_id],
                label_from_row,
            )
            .optional()?)
    }

    pub fn get_genre(&self, name: &str) -> CatalogResult<Option<Genre>> {
        Ok(self
            .conn
            .query_row(
                "SELECT GenreID, Description FROM genre WHERE GenreID = ?1",
                params![name],
                |r| {
                    Ok(Genre {
                        name: r.get(0)?,
                        description: r.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn creators_of_track(&self, track_id: i64) -> CatalogResult<Vec<Creator>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.CreatorID, c.Name FROM createdby cb \
             JOIN creator c ON c.CreatorID = cb.CreatorID \
             WHERE cb.TrackID = ?1 ORDER BY c.Name",
        )?;
        let creators = stmt
            .query_map(params![track_id], |r| {
                Ok(Creator {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(creators)
    }

    pub fn tracks_of_album(&self, album_id: i64) -> CatalogResult<Vec<Track>> {
        let mut stmt = self.conn.prepare(
            "SELECT TrackID, ReleaseName, ExplicitRating, Duration, CountryID, AlbumID \
             FROM audiofile WHERE AlbumID = ?1 ORDER BY TrackID",
        )?;
        let tracks = stmt
            .query_map(params![album_id], track_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }

    pub fn counts(&self) -> CatalogResult<CatalogCounts> {
        let count = |table: &str| -> CatalogResult<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?)
        };
        Ok(CatalogCounts {
            albums: count("album")?,
            tracks: count("audiofile")?,
            creators: count("creator")?,
            genres: count("genre")?,
            countries: count("country")?,
            labels: count("recordlabel")?,
        })
    }

    // =========================================================================
    // Inserts
    //
    // `id` is the surrogate key to use, or `None` to let SQLite assign the rowid.
    // Either way the stored key is returned.
    // =========================================================================

    pub fn insert_country(&self, id: Option<i64>, name: &str) -> CatalogResult<i64> {
        self.in_transaction("insert country", |conn| {
            conn.execute(
                "INSERT INTO country (CountryID, Name) VALUES (?1, ?2)",
                params![id, name],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn insert_label(&self, id: Option<i64>, label: &NewRecordLabel) -> CatalogResult<i64> {
        self.in_transaction("insert record label", |conn| {
            conn.execute(
                "INSERT INTO recordlabel (LabelID, Name, FoundingDate, CountryID) VALUES (?1, ?2, ?3, ?4)",
                params![
                    id,
                    label.name,
                    date_param(label.founding_date),
                    label.country_id
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn insert_creator(&self, id: Option<i64>, name: &str) -> CatalogResult<i64> {
        self.in_transaction("insert creator", |conn| {
            conn.execute(
                "INSERT INTO creator (CreatorID, Name) VALUES (?1, ?2)",
                params![id, name],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn insert_genre(&self, genre: &Genre) -> CatalogResult<()> {
        self.in_transaction("insert genre", |conn| {
            conn.execute(
                "INSERT INTO genre (GenreID, Description) VALUES (?1, ?2)",
                params![genre.name, genre.description],
            )?;
            Ok(())
        })
    }

    pub fn insert_album(
        &self,
        id: Option<i64>,
        album: &NewAlbum,
        label_id: Option<i64>,
    ) -> CatalogResult<i64> {
        self.in_transaction("insert album", |conn| {
            conn.execute(
                "INSERT INTO album (AlbumID, AlbumName, MediaType, ReleaseDate, LabelID) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id,
                    album.name,
                    album.media_type,
                    date_param(album.release_date),
                    label_id
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn insert_track(
        &self,
        id: Option<i64>,
        title: &str,
        rating: ExplicitRating,
        duration_secs: i64,
        country_id: Option<i64>,
        album_id: i64,
    ) -> CatalogResult<i64> {
        if duration_secs < 0 {
            return Err(CatalogError::InvalidInput(format!(
                "duration {} must not be negative",
                duration_secs
            )));
        }
        self.in_transaction("insert track", |conn| {
            conn.execute(
                "INSERT INTO audiofile (TrackID, ReleaseName, ExplicitRating, Duration, CountryID, AlbumID) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    title,
                    rating.to_db_int(),
                    duration_secs,
                    country_id,
                    album_id
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn link_creator(&self, track_id: i64, creator_id: i64) -> CatalogResult<()> {
        self.in_transaction("insert createdby", |conn| {
            conn.execute(
                "INSERT INTO createdby (TrackID, CreatorID) VALUES (?1, ?2)",
                params![track_id, creator_id],
            )?;
            Ok(())
        })
    }

    pub fn add_track_genre(&self, track_id: i64, genre: &str) -> CatalogResult<()> {
        self.in_transaction("insert ingenre", |conn| {
            conn.execute(
                "INSERT INTO ingenre (TrackID, GenreID) VALUES (?1, ?2)",
                params![track_id, genre],
            )?;
            Ok(())
        })
    }

    // =========================================================================
    // Updates
    //
    // Each returns the value it replaced, or `None` when the target row does
    // not exist (nothing is written in that case).
    // =========================================================================

    pub fn update_genre_description(
        &self,
        genre: &str,
        description: Option<&str>,
    ) -> CatalogResult<Option<UpdateApplied<Option<String>>>> {
        self.read_modify_write(
            "update genre description",
            "SELECT Description FROM genre WHERE GenreID = ?1",
            genre,
            |r| r.get(0),
            |conn| {
                conn.execute(
                    "UPDATE genre SET Description = ?1 WHERE GenreID = ?2",
                    params![description, genre],
                )
            },
        )
    }

    pub fn update_label_country(
        &self,
        label: &str,
        country_id: Option<i64>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        self.read_modify_write(
            "update label country",
            "SELECT CountryID FROM recordlabel WHERE Name = ?1 LIMIT 1",
            label,
            |r| r.get(0),
            |conn| {
                conn.execute(
                    "UPDATE recordlabel SET CountryID = ?1 WHERE Name = ?2",
                    params![country_id, label],
                )
            },
        )
    }

    pub fn update_label_founding_date(
        &self,
        label: &str,
        date: Option<CatalogDate>,
    ) -> CatalogResult<Option<UpdateApplied<Option<CatalogDate>>>> {
        self.read_modify_write(
            "update label founding date",
            "SELECT FoundingDate FROM recordlabel WHERE Name = ?1 LIMIT 1",
            label,
            |r| date_column(r, "FoundingDate"),
            |conn| {
                conn.execute(
                    "UPDATE recordlabel SET FoundingDate = ?1 WHERE Name = ?2",
                    params![date_param(date), label],
                )
            },
        )
    }

    /// The replaced value carries the album name alongside the old date.
    pub fn update_album_release_date(
        &self,
        album_id: i64,
        date: Option<CatalogDate>,
    ) -> CatalogResult<Option<UpdateApplied<(String, Option<CatalogDate>)>>> {
        self.read_modify_write(
            "update album release date",
            "SELECT AlbumName, ReleaseDate FROM album WHERE AlbumID = ?1",
            album_id,
            |r| Ok((r.get("AlbumName")?, date_column(r, "ReleaseDate")?)),
            |conn| {
                conn.execute(
                    "UPDATE album SET ReleaseDate = ?1 WHERE AlbumID = ?2",
                    params![date_param(date), album_id],
                )
            },
        )
    }

    pub fn update_album_label(
        &self,
        album_name: &str,
        label_id: Option<i64>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        self.read_modify_write(
            "update album label",
            "SELECT LabelID FROM album WHERE AlbumName = ?1 LIMIT 1",
            album_name,
            |r| r.get(0),
            |conn| {
                conn.execute(
                    "UPDATE album SET LabelID = ?1 WHERE AlbumName = ?2",
                    params![label_id, album_name],
                )
            },
        )
    }

    /// Every track carrying `track_title` is updated.
    pub fn update_track_country(
        &self,
        track_title: &str,
        country_id: Option<i64>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        self.read_modify_write(
            "update track country",
            "SELECT CountryID FROM audiofile WHERE ReleaseName = ?1 LIMIT 1",
            track_title,
            |r| r.get(0),
            |conn| {
                conn.execute(
                    "UPDATE audiofile SET CountryID = ?1 WHERE ReleaseName = ?2",
                    params![country_id, track_title],
                )
            },
        )
    }

    // =========================================================================
    // Deletes
    //
    // Association and child rows go first, the owning row last, all inside one
    // transaction.
    // =========================================================================

    pub fn delete_track(&self, track_id: i64) -> CatalogResult<Deleted> {
        self.in_transaction("delete track", |conn| {
            let mut dependents =
                conn.execute("DELETE FROM createdby WHERE TrackID = ?1", params![track_id])?;
            dependents +=
                conn.execute("DELETE FROM ingenre WHERE TrackID = ?1", params![track_id])?;
            let primary =
                conn.execute("DELETE FROM audiofile WHERE TrackID = ?1", params![track_id])?;
            Ok(Deleted {
                primary,
                dependents,
            })
        })
    }

    pub fn delete_album(&self, album_id: i64) -> CatalogResult<Deleted> {
        self.in_transaction("delete album", |conn| {
            let mut dependents = conn.execute(
                "DELETE FROM createdby WHERE TrackID IN (SELECT TrackID FROM audiofile WHERE AlbumID = ?1)",
                params![album_id],
            )?;
            dependents += conn.execute(
                "DELETE FROM ingenre WHERE TrackID IN (SELECT TrackID FROM audiofile WHERE AlbumID = ?1)",
                params![album_id],
            )?;
            dependents +=
                conn.execute("DELETE FROM audiofile WHERE AlbumID = ?1", params![album_id])?;
            let primary = conn.execute("DELETE FROM album WHERE AlbumID = ?1", params![album_id])?;
            Ok(Deleted {
                primary,
                dependents,
            })
        })
    }

    pub fn delete_creator(&self, creator_id: i64) -> CatalogResult<Deleted> {
        self.in_transaction("delete creator", |conn| {
            let dependents = conn.execute(
                "DELETE FROM createdby WHERE CreatorID = ?1",
                params![creator_id],
            )?;
            let primary =
                conn.execute("DELETE FROM creator WHERE CreatorID = ?1", params![creator_id])?;
            Ok(Deleted {
                primary,
                dependents,
            })
        })
    }

    pub fn delete_genre(&self, genre: &str) -> CatalogResult<Deleted> {
        self.in_transaction("delete genre", |conn| {
            let dependents =
                conn.execute("DELETE FROM ingenre WHERE GenreID = ?1", params![genre])?;
            let primary = conn.execute("DELETE FROM genre WHERE GenreID = ?1", params![genre])?;
            Ok(Deleted {
                primary,
                dependents,
            })
        })
    }

    /// Albums published by the label keep existing with a null label.
    pub fn delete_label(&self, label_id: i64) -> CatalogResult<Deleted> {
        self.in_transaction("delete record label", |conn| {
            let dependents = conn.execute(
                "UPDATE album SET LabelID = NULL WHERE LabelID = ?1",
                params![label_id],
            )?;
            let primary =
                conn.execute("DELETE FROM recordlabel WHERE LabelID = ?1", params![label_id])?;
            Ok(Deleted {
                primary,
                dependents,
            })
        })
    }
}
