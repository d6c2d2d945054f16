//! End-to-end tests for the catalog operation surface
//!
//! Every test runs against a fresh database file and only goes through
//! `Catalog`, the way the console does.

mod common;

use common::{
    always_confirm, never_confirm, track_line_cells, TestCatalog, ALBUM_RELEASE_DATE_ISO,
    ALBUM_TITLE, COUNTRY_NAME, CREATOR_NAME, GENRE_DESCRIPTION, GENRE_NAME, LABEL_NAME,
    MEDIA_TYPE, SECOND_ALBUM_RELEASE_DATE, SECOND_ALBUM_TITLE, TRACK_DURATION_TEXT, TRACK_TITLE,
};
use zene_catalog::catalog_store::NewTrack;
use zene_catalog::ids::MAX_RANDOM_ID;
use zene_catalog::IdStrategy;

// =============================================================================
// Album reports
// =============================================================================

#[test]
fn test_album_report_renders_track_tree() {
    let fixture = TestCatalog::seeded();

    let outcome = fixture.catalog.query_by_album_title(ALBUM_TITLE, true);

    assert_eq!(outcome.status, 1);
    let header = outcome
        .text
        .lines()
        .find(|l| l.starts_with("Album:"))
        .expect("missing album header");
    assert!(header.contains(ALBUM_TITLE));
    assert!(header.contains(TRACK_DURATION_TEXT));
    assert!(header.contains(ALBUM_RELEASE_DATE_ISO));
    assert!(header.contains(LABEL_NAME));

    let track_line = outcome
        .text
        .lines()
        .find(|l| l.contains(TRACK_TITLE))
        .expect("missing track line");
    assert!(track_line.contains("└─"));
    assert_eq!(
        track_line_cells(track_line),
        vec![TRACK_TITLE, TRACK_DURATION_TEXT, "Clean", CREATOR_NAME]
    );
}

#[test]
fn test_album_listing_returns_selection() {
    let fixture = TestCatalog::seeded();
    let second = fixture
        .catalog
        .insert_album(ALBUM_TITLE, Some(SECOND_ALBUM_RELEASE_DATE), None, MEDIA_TYPE);
    assert!(second.status > 0);

    let outcome = fixture.catalog.query_by_album_title(ALBUM_TITLE, false);

    assert_eq!(outcome.status, 2);
    assert_eq!(
        outcome.selection,
        vec![fixture.album_id.unwrap(), second.status]
    );
    assert!(outcome.text.lines().next().unwrap().starts_with("  1:"));
    assert!(!outcome.text.contains(TRACK_TITLE));
}

#[test]
fn test_album_without_tracks_says_so() {
    let fixture = TestCatalog::empty();
    let album = fixture
        .catalog
        .insert_album(SECOND_ALBUM_TITLE, None, None, MEDIA_TYPE);

    let outcome = fixture.catalog.query_by_album_title(SECOND_ALBUM_TITLE, true);

    assert_eq!(outcome.status, 1);
    assert!(outcome
        .text
        .contains(&format!("No tracks found for album ID: {}", album.status)));
}

#[test]
fn test_unknown_album_is_not_found() {
    let fixture = TestCatalog::seeded();
    let outcome = fixture.catalog.query_by_album_title("Nope", true);
    assert_eq!(outcome.status, 0);
    assert_eq!(outcome.text, "No results found for Nope");
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_label_resolution_is_idempotent() {
    let fixture = TestCatalog::seeded();
    let label_id = fixture
        .catalog
        .store()
        .get_album(fixture.album_id.unwrap())
        .unwrap()
        .unwrap()
        .label_id
        .expect("album has no label");

    let again = fixture.catalog.insert_record_label(LABEL_NAME, None, None);
    assert_eq!(again.status, label_id);
    assert!(again.text.contains("already present"));

    let second = fixture.catalog.insert_album(
        SECOND_ALBUM_TITLE,
        Some(SECOND_ALBUM_RELEASE_DATE),
        Some(LABEL_NAME),
        MEDIA_TYPE,
    );
    assert!(second.status > 0);
    assert!(!second.text.contains("record label"));
    assert_eq!(fixture.catalog.store().counts().unwrap().labels, 1);
}

#[test]
fn test_existing_creator_is_reused_without_confirmation() {
    let fixture = TestCatalog::seeded();
    let mut asked = 0;
    let mut confirm = |_: &str| {
        asked += 1;
        true
    };

    let outcome = fixture
        .catalog
        .insert_audiofile(&fixture.new_track("Outro", Some(CREATOR_NAME)), &mut confirm);

    assert!(outcome.status > 0, "{}", outcome.text);
    assert_eq!(asked, 0);
    let store = fixture.catalog.store();
    assert_eq!(store.counts().unwrap().creators, 1);
    let creators = store.creators_of_track(outcome.status).unwrap();
    assert_eq!(creators.len(), 1);
    assert_eq!(creators[0].name, CREATOR_NAME);
}

#[test]
fn test_declined_creator_keeps_track() {
    let fixture = TestCatalog::seeded();

    let outcome = fixture.catalog.insert_audiofile(
        &fixture.new_track("Interlude", Some("Somebody New")),
        &mut never_confirm(),
    );

    assert_eq!(outcome.status, -1);
    assert!(outcome.text.contains("Creator was not added"));
    let store = fixture.catalog.store();
    assert_eq!(store.tracks_of_album(fixture.album_id.unwrap()).unwrap().len(), 2);
    assert_eq!(store.counts().unwrap().creators, 1);
}

#[test]
fn test_track_without_duration_gets_fallback() {
    let fixture = TestCatalog::seeded();
    let track = NewTrack {
        duration_secs: None,
        ..fixture.new_track("Hidden", None)
    };

    let outcome = fixture.catalog.insert_audiofile(&track, &mut always_confirm());

    assert!(outcome.status > 0);
    let stored = fixture.catalog.store().get_track(outcome.status).unwrap().unwrap();
    assert_eq!(stored.duration_secs, 999);
}

// =============================================================================
// Bundles and partial success
// =============================================================================

#[test]
fn test_album_with_tracks_reports_partial_success() {
    let fixture = TestCatalog::empty();
    let tracks = vec![
        NewTrack {
            title: "Dawn".to_string(),
            duration_secs: Some(200),
            creator: Some(CREATOR_NAME.to_string()),
            ..Default::default()
        },
        NewTrack {
            title: "Broken".to_string(),
            duration_secs: Some(-5),
            ..Default::default()
        },
    ];

    let outcome = fixture.catalog.insert_album_with_tracks(
        SECOND_ALBUM_TITLE,
        Some(SECOND_ALBUM_RELEASE_DATE),
        Some(LABEL_NAME),
        MEDIA_TYPE,
        &tracks,
        &mut always_confirm(),
    );

    assert_eq!(outcome.status, 1);
    assert!(outcome
        .text
        .contains("Successfully added 1 of 2 tracks to album Daybreak"));
    let count = fixture.catalog.num_tracks_in_album(SECOND_ALBUM_TITLE);
    assert_eq!(count.status, 1);
}

#[test]
fn test_failed_bundle_reports_label_left_behind() {
    let fixture = TestCatalog::with_fixed_id(7);
    let first = fixture
        .catalog
        .insert_album(ALBUM_TITLE, None, None, MEDIA_TYPE);
    assert_eq!(first.status, 7);

    let outcome = fixture.catalog.insert_album_with_tracks(
        SECOND_ALBUM_TITLE,
        None,
        Some("Fresh Label"),
        MEDIA_TYPE,
        &[],
        &mut always_confirm(),
    );

    assert_eq!(outcome.status, -1);
    assert!(outcome
        .text
        .contains("Successfully inserted new record label with ID: 7"));
    assert!(outcome
        .text
        .contains("Record label 7 created for this album remains in the catalog"));
    let counts = fixture.catalog.store().counts().unwrap();
    assert_eq!(counts.labels, 1);
    assert_eq!(counts.albums, 1);
}

#[test]
fn test_bad_date_is_a_failure_sentinel() {
    let fixture = TestCatalog::empty();
    let outcome = fixture
        .catalog
        .insert_album(ALBUM_TITLE, Some("01/01/2023"), None, MEDIA_TYPE);
    assert_eq!(outcome.status, -1);
    assert_eq!(fixture.catalog.store().counts().unwrap().albums, 0);
}

// =============================================================================
// Genres and countries
// =============================================================================

#[test]
fn test_duplicate_genre_keeps_first_description() {
    let fixture = TestCatalog::empty();

    let first = fixture
        .catalog
        .insert_genre(GENRE_NAME, Some(GENRE_DESCRIPTION));
    let second = fixture.catalog.insert_genre(GENRE_NAME, Some("Something else"));

    assert_eq!(first.status, 1);
    assert_eq!(second.status, 0);
    assert_eq!(second.text, "Genre already exists in the database.");
    let genre = fixture.catalog.store().get_genre(GENRE_NAME).unwrap().unwrap();
    assert_eq!(genre.description.as_deref(), Some(GENRE_DESCRIPTION));
}

#[test]
fn test_genre_tagging_and_report() {
    let fixture = TestCatalog::seeded();
    let track_id = fixture.track_id.unwrap();
    fixture
        .catalog
        .insert_genre(GENRE_NAME, Some(GENRE_DESCRIPTION));

    assert_eq!(fixture.catalog.add_genre_to_track(track_id, GENRE_NAME).status, 1);
    assert_eq!(fixture.catalog.add_genre_to_track(track_id, GENRE_NAME).status, 0);
    assert_eq!(fixture.catalog.add_genre_to_track(track_id, "Polka").status, 0);

    let report = fixture.catalog.query_by_genre(GENRE_NAME);
    assert_eq!(report.status, 1);
    assert!(report
        .text
        .contains(&format!("From Genre: {} - {}", GENRE_NAME, GENRE_DESCRIPTION)));
    assert!(report.text.contains(TRACK_TITLE));
}

#[test]
fn test_country_flow() {
    let fixture = TestCatalog::seeded();

    let country = fixture.catalog.insert_country(COUNTRY_NAME);
    assert!(country.status > 0);
    assert_eq!(fixture.catalog.insert_country(COUNTRY_NAME).status, 0);

    let codes = fixture.catalog.print_country_codes();
    assert_eq!(codes.status, 1);
    assert!(codes.text.starts_with("ID# | Country"));
    assert!(codes.text.contains(COUNTRY_NAME));

    let updated = fixture
        .catalog
        .update_track_country(TRACK_TITLE, Some(COUNTRY_NAME));
    assert_eq!(updated.status, 1, "{}", updated.text);

    let report = fixture.catalog.get_tracks_by_country(COUNTRY_NAME);
    assert_eq!(report.status, 1);
    assert!(report.text.contains(TRACK_TITLE));
    assert!(report.text.contains("2023"));

    let missing = fixture.catalog.update_track_country(TRACK_TITLE, Some("Atlantis"));
    assert_eq!(missing.status, 0);
}

// =============================================================================
// Updates and deletes
// =============================================================================

#[test]
fn test_release_date_update_changes_report() {
    let fixture = TestCatalog::seeded();
    let album_id = fixture.album_id.unwrap();

    let outcome = fixture
        .catalog
        .update_album_release_date(album_id, Some("19991231"));
    assert_eq!(outcome.status, 1);
    assert!(outcome.text.contains("1999-12-31"));
    assert!(outcome.text.contains(ALBUM_RELEASE_DATE_ISO));

    let report = fixture.catalog.query_by_creator(CREATOR_NAME);
    assert!(report.text.contains("1999"));

    let missing = fixture.catalog.update_album_release_date(album_id + 1000, Some("19991231"));
    assert_eq!(missing.status, 0);
}

#[test]
fn test_delete_album_cascades() {
    let fixture = TestCatalog::seeded();
    let album_id = fixture.album_id.unwrap();
    let track_id = fixture.track_id.unwrap();

    let deleted = fixture.catalog.delete_album(album_id);
    assert_eq!(deleted.status, 1);

    let report = fixture.catalog.query_by_album_title(ALBUM_TITLE, true);
    assert_eq!(report.status, 0);
    assert_eq!(report.text, format!("No results found for {}", ALBUM_TITLE));

    let store = fixture.catalog.store();
    assert!(store.get_track(track_id).unwrap().is_none());
    assert!(store.creators_of_track(track_id).unwrap().is_empty());
    let counts = store.counts().unwrap();
    assert_eq!(counts.tracks, 0);
    assert_eq!(counts.creators, 1);
    assert_eq!(counts.labels, 1);

    assert_eq!(fixture.catalog.delete_album(album_id).status, 0);
}

#[test]
fn test_delete_label_detaches_albums() {
    let fixture = TestCatalog::seeded();

    let deleted = fixture.catalog.delete_label(LABEL_NAME);
    assert_eq!(deleted.status, 1);

    let album = fixture
        .catalog
        .store()
        .get_album(fixture.album_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(album.label_id, None);
    assert_eq!(fixture.catalog.get_tracks_by_label(LABEL_NAME).status, 0);
}

// =============================================================================
// Identifiers and persistence
// =============================================================================

#[test]
fn test_random_ids_stay_in_range() {
    let fixture = TestCatalog::with_strategy(IdStrategy::Random);
    for name in ["A", "B", "C"] {
        let outcome = fixture.catalog.insert_creator(name);
        assert!(outcome.status >= 1 && outcome.status <= MAX_RANDOM_ID);
    }
}

#[test]
fn test_changes_survive_reopen() {
    let fixture = TestCatalog::seeded().reopen();

    let outcome = fixture.catalog.query_by_album_title(ALBUM_TITLE, true);
    assert_eq!(outcome.status, 1);
    assert!(outcome.text.contains(TRACK_TITLE));

    let average = fixture.catalog.get_avg_track_duration_album(ALBUM_TITLE);
    assert!(average.text.contains(TRACK_DURATION_TEXT));
}
