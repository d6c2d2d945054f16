//! SQLite schema for the music catalog.
//!
//! Surrogate keys are plain `INTEGER PRIMARY KEY` columns so that either the
//! application supplies them or SQLite assigns the rowid. Genres are keyed by
//! their name. Foreign keys use `NO ACTION`: dependent rows are removed by
//! explicit child-first deletes in the store.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Foreign keys
// =============================================================================

const COUNTRY_FK: ForeignKey = ForeignKey {
    foreign_table: "country",
    foreign_column: "CountryID",
    on_delete: ForeignKeyOnChange::NoAction,
};

const LABEL_FK: ForeignKey = ForeignKey {
    foreign_table: "recordlabel",
    foreign_column: "LabelID",
    on_delete: ForeignKeyOnChange::NoAction,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "album",
    foreign_column: "AlbumID",
    on_delete: ForeignKeyOnChange::NoAction,
};

const TRACK_FK: ForeignKey = ForeignKey {
    foreign_table: "audiofile",
    foreign_column: "TrackID",
    on_delete: ForeignKeyOnChange::NoAction,
};

const CREATOR_FK: ForeignKey = ForeignKey {
    foreign_table: "creator",
    foreign_column: "CreatorID",
    on_delete: ForeignKeyOnChange::NoAction,
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genre",
    foreign_column: "GenreID",
    on_delete: ForeignKeyOnChange::NoAction,
};

// =============================================================================
// Entities
// =============================================================================

const COUNTRY_TABLE: Table = Table {
    name: "country",
    columns: &[
        sqlite_column!("CountryID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("Name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["Name"]],
};

const RECORD_LABEL_TABLE: Table = Table {
    name: "recordlabel",
    columns: &[
        sqlite_column!("LabelID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("Name", &SqlType::Text, non_null = true),
        sqlite_column!("FoundingDate", &SqlType::Text), // YYYY-MM-DD
        sqlite_column!(
            "CountryID",
            &SqlType::Integer,
            foreign_key = Some(&COUNTRY_FK)
        ),
    ],
    indices: &[("idx_recordlabel_name", "Name")],
    unique_constraints: &[],
};

const ALBUM_TABLE: Table = Table {
    name: "album",
    columns: &[
        sqlite_column!("AlbumID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("AlbumName", &SqlType::Text, non_null = true),
        sqlite_column!("MediaType", &SqlType::Text, non_null = true),
        sqlite_column!("ReleaseDate", &SqlType::Text), // YYYY-MM-DD
        sqlite_column!(
            "LabelID",
            &SqlType::Integer,
            foreign_key = Some(&LABEL_FK)
        ),
    ],
    indices: &[
        ("idx_album_name", "AlbumName"),
        ("idx_album_media_type", "MediaType"),
        ("idx_album_label", "LabelID"),
    ],
    unique_constraints: &[],
};

const AUDIOFILE_TABLE: Table = Table {
    name: "audiofile",
    columns: &[
        sqlite_column!("TrackID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("ReleaseName", &SqlType::Text, non_null = true),
        sqlite_column!(
            "ExplicitRating",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("Duration", &SqlType::Integer, non_null = true), // seconds
        sqlite_column!(
            "CountryID",
            &SqlType::Integer,
            foreign_key = Some(&COUNTRY_FK)
        ),
        sqlite_column!(
            "AlbumID",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_FK)
        ),
    ],
    indices: &[
        ("idx_audiofile_name", "ReleaseName"),
        ("idx_audiofile_album", "AlbumID"),
        ("idx_audiofile_country", "CountryID"),
    ],
    unique_constraints: &[],
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

const GENRE_TABLE: Table = Table {
    name: "genre",
    columns: &[
        sqlite_column!("GenreID", &SqlType::Text, is_primary_key = true),
        sqlite_column!("Description", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

// =============================================================================
// Associations
// =============================================================================

const CREATED_BY_TABLE: Table = Table {
    name: "createdby",
    columns: &[
        sqlite_column!(
            "TrackID",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&TRACK_FK)
        ),
        sqlite_column!(
            "CreatorID",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&CREATOR_FK)
        ),
    ],
    indices: &[("idx_createdby_creator", "CreatorID")],
    unique_constraints: &[&["TrackID", "CreatorID"]],
};

const IN_GENRE_TABLE: Table = Table {
    name: "ingenre",
    columns: &[
        sqlite_column!(
            "TrackID",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&TRACK_FK)
        ),
        sqlite_column!(
            "GenreID",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
    ],
    indices: &[("idx_ingenre_genre", "GenreID")],
    unique_constraints: &[&["TrackID", "GenreID"]],
};

/// Parents come before the tables referencing them.
pub const CATALOG_SCHEMA: VersionedSchema = VersionedSchema {
    version: 0,
    tables: &[
        COUNTRY_TABLE,
        RECORD_LABEL_TABLE,
        ALBUM_TABLE,
        AUDIOFILE_TABLE,
        CREATOR_TABLE,
        GENRE_TABLE,
        CREATED_BY_TABLE,
        IN_GENRE_TABLE,
    ],
};
