//! Row types for the catalog tables and the inputs accepted by write workflows.

use super::error::{CatalogError, CatalogResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Value types
// =============================================================================

/// Content rating of a track, stored as 0/1.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ExplicitRating {
    #[default]
    Clean,
    Explicit,
}

impl ExplicitRating {
    pub fn from_db_int(value: i64) -> Self {
        if value == 0 {
            ExplicitRating::Clean
        } else {
            ExplicitRating::Explicit
        }
    }

    pub fn to_db_int(self) -> i64 {
        match self {
            ExplicitRating::Clean => 0,
            ExplicitRating::Explicit => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExplicitRating::Clean => "Clean",
            ExplicitRating::Explicit => "Explicit",
        }
    }
}

/// A calendar date exchanged as `yyyymmdd` and stored as ISO `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CatalogDate(NaiveDate);

impl CatalogDate {
    const COMPACT_FORMAT: &'static str = "%Y%m%d";
    const DB_FORMAT: &'static str = "%Y-%m-%d";

    /// Parses the 8-digit `yyyymmdd` form used at the operation surface.
    pub fn parse_compact(s: &str) -> CatalogResult<Self> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::InvalidInput(format!(
                "date '{}' is not an 8-digit yyyymmdd value",
                s
            )));
        }
        NaiveDate::parse_from_str(s, Self::COMPACT_FORMAT)
            .map(CatalogDate)
            .map_err(|e| CatalogError::InvalidInput(format!("date '{}': {}", s, e)))
    }

    /// Parses an optional compact date, treating blank input as absent.
    pub fn parse_optional(s: Option<&str>) -> CatalogResult<Option<Self>> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => Self::parse_compact(s).map(Some),
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, Self::DB_FORMAT)
            .ok()
            .map(CatalogDate)
    }

    pub fn to_db_string(&self) -> String {
        self.0.format(Self::DB_FORMAT).to_string()
    }
}

impl fmt::Display for CatalogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::DB_FORMAT))
    }
}

// =============================================================================
// Stored rows
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub media_type: String,
    pub release_date: Option<CatalogDate>,
    pub label_id: Option<i64>,
}

/// A track row (the `audiofile` table).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub rating: ExplicitRating,
    pub duration_secs: i64,
    pub country_id: Option<i64>,
    pub album_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub name: String,
}

/// Genres are keyed by their name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLabel {
    pub id: i64,
    pub name: String,
    pub founding_date: Option<CatalogDate>,
    pub country_id: Option<i64>,
}

// =============================================================================
// Workflow inputs
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: String,
    pub media_type: String,
    pub release_date: Option<CatalogDate>,
    /// Resolved (and created when missing) by name.
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRecordLabel {
    pub name: String,
    pub founding_date: Option<CatalogDate>,
    pub country_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTrack {
    pub title: String,
    pub rating: Option<ExplicitRating>,
    pub duration_secs: Option<i64>,
    pub country_id: Option<i64>,
    pub album_id: i64,
    pub creator: Option<String>,
}

/// Row counts per table, logged when a catalog is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub albums: i64,
    pub tracks: i64,
    pub creators: i64,
    pub genres: i64,
    pub countries: i64,
    pub labels: i64,
}

/// What a read-modify-write update replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateApplied<T> {
    pub previous: T,
    pub rows: usize,
}

/// Rows removed by a cascading delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deleted {
    /// Rows of the entity that was asked for.
    pub primary: usize,
    /// Child and association rows removed along with it.
    pub dependents: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_date_round_trips_to_iso() {
        let date = CatalogDate::parse_compact("20230101").unwrap();
        assert_eq!(date.to_db_string(), "2023-01-01");
        assert_eq!(CatalogDate::from_db_str("2023-01-01"), Some(date));
    }

    #[test]
    fn compact_date_rejects_bad_input() {
        for bad in ["2023-01-01", "2023011", "20231301", "20230230", "abcdefgh"] {
            assert!(
                matches!(CatalogDate::parse_compact(bad), Err(CatalogError::InvalidInput(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn blank_optional_date_is_absent() {
        assert_eq!(CatalogDate::parse_optional(None).unwrap(), None);
        assert_eq!(CatalogDate::parse_optional(Some("  ")).unwrap(), None);
        assert!(CatalogDate::parse_optional(Some("19991231")).unwrap().is_some());
    }

    #[test]
    fn rating_maps_any_nonzero_to_explicit() {
        assert_eq!(ExplicitRating::from_db_int(0), ExplicitRating::Clean);
        assert_eq!(ExplicitRating::from_db_int(1), ExplicitRating::Explicit);
        assert_eq!(ExplicitRating::from_db_int(7), ExplicitRating::Explicit);
        assert_eq!(ExplicitRating::Explicit.label(), "Explicit");
        assert_eq!(ExplicitRating::default().to_db_int(), 0);
    }
}
