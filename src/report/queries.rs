//! Read queries behind the reports. Each returns plain rows; rendering lives in
//! the parent module.

use crate::catalog_store::{CatalogResult, ExplicitRating};
use rusqlite::{params, Connection, Params, Row};

/// One album of an album-centric report. `track_count` and `total_secs` come
/// from the same grouped row, so the renderer knows the group size up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRow {
    pub id: i64,
    pub name: String,
    pub media_type: String,
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub total_secs: Option<i64>,
    pub track_count: usize,
}

/// A track with all of its creators joined by `, `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub id: i64,
    pub title: String,
    pub duration_secs: i64,
    pub rating: ExplicitRating,
    pub creators: Option<String>,
    pub album_name: String,
    pub release_date: Option<String>,
}

/// A track credited to one specific creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRow {
    pub track_id: i64,
    pub title: String,
    pub duration_secs: i64,
    pub creator_id: i64,
    pub creator: String,
    pub album_name: String,
    pub release_date: Option<String>,
}

const ALBUM_SELECT: &str = "SELECT a.AlbumID, a.AlbumName, a.MediaType, a.ReleaseDate, \
     l.Name AS Label, SUM(t.Duration) AS Total, COUNT(t.TrackID) AS TrackCount \
     FROM album a \
     LEFT JOIN recordlabel l ON l.LabelID = a.LabelID \
     LEFT JOIN audiofile t ON t.AlbumID = a.AlbumID";

const TRACK_SELECT: &str = "SELECT t.TrackID, t.ReleaseName, t.Duration, t.ExplicitRating, \
     GROUP_CONCAT(c.Name, ', ') AS Creators, a.AlbumName, a.ReleaseDate \
     FROM audiofile t \
     JOIN album a ON a.AlbumID = t.AlbumID \
     LEFT JOIN createdby cb ON cb.TrackID = t.TrackID \
     LEFT JOIN creator c ON c.CreatorID = cb.CreatorID";

const CREDIT_SELECT: &str = "SELECT t.TrackID, t.ReleaseName, t.Duration, \
     c.CreatorID, c.Name, a.AlbumName, a.ReleaseDate \
     FROM audiofile t \
     JOIN album a ON a.AlbumID = t.AlbumID \
     JOIN createdby cb ON cb.TrackID = t.TrackID \
     JOIN creator c ON c.CreatorID = cb.CreatorID";

fn album_row(row: &Row<'_>) -> rusqlite::Result<AlbumRow> {
    Ok(AlbumRow {
        id: row.get(0)?,
        name: row.get(1)?,
        media_type: row.get(2)?,
        release_date: row.get(3)?,
        label: row.get(4)?,
        total_secs: row.get(5)?,
        track_count: row.get::<_, i64>(6)?.max(0) as usize,
    })
}

fn track_row(row: &Row<'_>) -> rusqlite::Result<TrackRow> {
    Ok(TrackRow {
        id: row.get(0)?,
        title: row.get(1)?,
        duration_secs: row.get(2)?,
        rating: ExplicitRating::from_db_int(row.get(3)?),
        creators: row.get(4)?,
        album_name: row.get(5)?,
        release_date: row.get(6)?,
    })
}

fn credit_row(row: &Row<'_>) -> rusqlite::Result<CreditRow> {
    Ok(CreditRow {
        track_id: row.get(0)?,
        title: row.get(1)?,
        duration_secs: row.get(2)?,
        creator_id: row.get(3)?,
        creator: row.get(4)?,
        album_name: row.get(5)?,
        release_date: row.get(6)?,
    })
}

fn collect<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> CatalogResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

// =============================================================================
// Album-centric
// =============================================================================

pub fn albums_by_title(conn: &Connection, title: &str) -> CatalogResult<Vec<AlbumRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE a.AlbumName = ?1 GROUP BY a.AlbumID ORDER BY a.ReleaseDate ASC, a.AlbumID",
            ALBUM_SELECT
        ),
        params![title],
        album_row,
    )
}

pub fn albums_by_media_type(conn: &Connection, media_type: &str) -> CatalogResult<Vec<AlbumRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE a.MediaType = ?1 GROUP BY a.AlbumID ORDER BY a.ReleaseDate ASC, a.AlbumID",
            ALBUM_SELECT
        ),
        params![media_type],
        album_row,
    )
}

pub fn albums_by_label(conn: &Connection, label: &str) -> CatalogResult<Vec<AlbumRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE l.Name = ?1 GROUP BY a.AlbumID ORDER BY a.ReleaseDate ASC, a.AlbumID",
            ALBUM_SELECT
        ),
        params![label],
        album_row,
    )
}

pub fn tracks_of_album(conn: &Connection, album_id: i64) -> CatalogResult<Vec<TrackRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE t.AlbumID = ?1 GROUP BY t.TrackID ORDER BY t.TrackID",
            TRACK_SELECT
        ),
        params![album_id],
        track_row,
    )
}

// =============================================================================
// Track-centric
// =============================================================================

pub fn credits_by_creator(conn: &Connection, creator: &str) -> CatalogResult<Vec<CreditRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE c.Name = ?1 ORDER BY a.ReleaseDate ASC, t.TrackID",
            CREDIT_SELECT
        ),
        params![creator],
        credit_row,
    )
}

pub fn credits_by_rating(
    conn: &Connection,
    rating: ExplicitRating,
) -> CatalogResult<Vec<CreditRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE t.ExplicitRating = ?1 ORDER BY c.Name ASC, t.TrackID",
            CREDIT_SELECT
        ),
        params![rating.to_db_int()],
        credit_row,
    )
}

pub fn random_credits(conn: &Connection, limit: usize) -> CatalogResult<Vec<CreditRow>> {
    collect(
        conn,
        &format!("{} ORDER BY RANDOM() LIMIT ?1", CREDIT_SELECT),
        params![i64::try_from(limit).unwrap_or(i64::MAX)],
        credit_row,
    )
}

pub fn tracks_by_title(conn: &Connection, title: &str) -> CatalogResult<Vec<TrackRow>> {
    collect(
        conn,
        &format!(
            "{} WHERE t.ReleaseName = ?1 GROUP BY t.TrackID ORDER BY a.ReleaseDate ASC, t.TrackID",
            TRACK_SELECT
        ),
        params![title],
        track_row,
    )
}

pub fn tracks_by_country(conn: &Connection, country: &str) -> CatalogResult<Vec<TrackRow>> {
    collect(
        conn,
        &format!(
            "{} JOIN country co ON co.CountryID = t.CountryID \
             WHERE co.Name = ?1 GROUP BY t.TrackID ORDER BY a.ReleaseDate ASC, t.TrackID",
            TRACK_SELECT
        ),
        params![country],
        track_row,
    )
}

/// Tracks tagged with `genre`, plus the genre's description when it exists.
pub fn tracks_by_genre(
    conn: &Connection,
    genre: &str,
) -> CatalogResult<(Option<String>, Vec<TrackRow>)> {
    let rows = collect(
        conn,
        &format!(
            "{} JOIN ingenre ig ON ig.TrackID = t.TrackID \
             WHERE ig.GenreID = ?1 GROUP BY t.TrackID ORDER BY a.ReleaseDate ASC, t.TrackID",
            TRACK_SELECT
        ),
        params![genre],
        track_row,
    )?;
    let description = collect(
        conn,
        "SELECT Description FROM genre WHERE GenreID = ?1",
        params![genre],
        |r| r.get::<_, Option<String>>(0),
    )?
    .into_iter()
    .next()
    .flatten();
    Ok((description, rows))
}

// =============================================================================
// Aggregates
// =============================================================================

pub fn country_codes(conn: &Connection) -> CatalogResult<Vec<(i64, String)>> {
    collect(
        conn,
        "SELECT CountryID, Name FROM country ORDER BY CountryID",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )
}

/// Track statistics over every album named `album_name`. `None` when no such
/// album exists.
pub fn album_track_stats(
    conn: &Connection,
    album_name: &str,
) -> CatalogResult<Option<(usize, Option<f64>)>> {
    let albums: i64 = conn.query_row(
        "SELECT COUNT(*) FROM album WHERE AlbumName = ?1",
        params![album_name],
        |r| r.get(0),
    )?;
    if albums == 0 {
        return Ok(None);
    }
    let (count, average): (i64, Option<f64>) = conn.query_row(
        "SELECT COUNT(t.TrackID), AVG(t.Duration) FROM audiofile t \
         JOIN album a ON a.AlbumID = t.AlbumID WHERE a.AlbumName = ?1",
        params![album_name],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(Some((count.max(0) as usize, average)))
}
