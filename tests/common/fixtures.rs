//! Catalog fixtures backed by a temporary database file.

use super::constants::*;
use std::path::PathBuf;
use tempfile::TempDir;
use zene_catalog::catalog_store::{ExplicitRating, NewTrack};
use zene_catalog::ids::IdAllocator;
use zene_catalog::{Catalog, CatalogSettings, IdStrategy, SqliteCatalogStore};

pub struct TestCatalog {
    pub catalog: Catalog,
    pub db_path: PathBuf,
    pub album_id: Option<i64>,
    pub track_id: Option<i64>,
    _dir: TempDir,
}

impl TestCatalog {
    pub fn empty() -> Self {
        Self::with_strategy(IdStrategy::Sequence)
    }

    pub fn with_strategy(strategy: IdStrategy) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("catalog.db");
        let catalog = Catalog::open(&db_path, strategy, CatalogSettings::default())
            .expect("Failed to open catalog");
        TestCatalog {
            catalog,
            db_path,
            album_id: None,
            track_id: None,
            _dir: dir,
        }
    }

    /// Every insert asks for the same key, so the second row of a table collides.
    #[allow(dead_code)]
    pub fn with_fixed_id(id: i64) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("catalog.db");
        let store = SqliteCatalogStore::open(&db_path).expect("Failed to open store");
        let catalog = Catalog::with_store(
            store,
            Box::new(FixedIdAllocator(id)),
            CatalogSettings::default(),
        );
        TestCatalog {
            catalog,
            db_path,
            album_id: None,
            track_id: None,
            _dir: dir,
        }
    }

    /// The Nightfall album on Umbra Records with one clean track by J. Doe.
    pub fn seeded() -> Self {
        let mut fixture = Self::empty();
        let album = fixture.catalog.insert_album(
            ALBUM_TITLE,
            Some(ALBUM_RELEASE_DATE),
            Some(LABEL_NAME),
            MEDIA_TYPE,
        );
        assert!(album.status > 0, "album insert failed: {}", album.text);

        let track = NewTrack {
            title: TRACK_TITLE.to_string(),
            rating: Some(ExplicitRating::Clean),
            duration_secs: Some(TRACK_DURATION_SECS),
            album_id: album.status,
            creator: Some(CREATOR_NAME.to_string()),
            ..Default::default()
        };
        let inserted = fixture
            .catalog
            .insert_audiofile(&track, &mut always_confirm());
        assert!(inserted.status > 0, "track insert failed: {}", inserted.text);

        fixture.album_id = Some(album.status);
        fixture.track_id = Some(inserted.status);
        fixture
    }

    /// Closes the catalog and opens the same file again.
    pub fn reopen(self) -> Self {
        let TestCatalog {
            catalog,
            db_path,
            album_id,
            track_id,
            _dir,
        } = self;
        drop(catalog);
        let catalog = Catalog::open(&db_path, IdStrategy::Sequence, CatalogSettings::default())
            .expect("Failed to reopen catalog");
        TestCatalog {
            catalog,
            db_path,
            album_id,
            track_id,
            _dir,
        }
    }

    pub fn new_track(&self, title: &str, creator: Option<&str>) -> NewTrack {
        NewTrack {
            title: title.to_string(),
            duration_secs: Some(180),
            album_id: self.album_id.expect("fixture has no album"),
            creator: creator.map(str::to_string),
            ..Default::default()
        }
    }
}

struct FixedIdAllocator(i64);

impl IdAllocator for FixedIdAllocator {
    fn allocate(&self) -> Option<i64> {
        Some(self.0)
    }
}

pub fn always_confirm() -> impl FnMut(&str) -> bool {
    |_| true
}

pub fn never_confirm() -> impl FnMut(&str) -> bool {
    |_| false
}

/// Cells of a rendered track line with tree glyphs removed.
pub fn track_line_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(|cell| {
            cell.trim()
                .trim_start_matches(|c| matches!(c, '┌' | '├' | '└' | '─'))
                .trim()
                .to_string()
        })
        .collect()
}
