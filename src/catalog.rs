//! The operation surface used by the interactive client.
//!
//! Every operation returns an [`OpOutcome`]: rendered text plus a signed
//! status (`-1` failure, `0` not found or nothing changed, `>0` a count or a
//! new id). Errors are caught and logged here and never reach the caller.

use crate::catalog_store::{
    CatalogDate, CatalogError, CatalogResult, Deleted, NewAlbum, NewRecordLabel, NewTrack,
    SqliteCatalogStore, UpdateApplied,
};
use crate::ids::{IdAllocator, IdStrategy};
use crate::report::{ReportEngine, ReportKind, ReportOptions, ReportOutcome};
use crate::resolver::Resolution;
use crate::workflow::{AlbumInsertReport, CreatorConfirmation, CreatorStep, WriteWorkflows};
use anyhow::Result;
use std::fmt::Display;
use std::path::Path;
use tracing::{error, info};

pub const FAILURE: i64 = -1;
pub const NOTHING: i64 = 0;

/// Whether an outcome's text is a rendered report or a status message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutcomeKind {
    #[default]
    Message,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutcome {
    pub text: String,
    pub status: i64,
    /// Album ids in listing order, filled by the album-title listing.
    pub selection: Vec<i64>,
    pub kind: OutcomeKind,
}

impl OpOutcome {
    fn new(text: impl Into<String>, status: i64) -> Self {
        OpOutcome {
            text: text.into(),
            status,
            selection: Vec::new(),
            kind: OutcomeKind::Message,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status < 0
    }

    pub fn is_report(&self) -> bool {
        self.kind == OutcomeKind::Report
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Stored for tracks inserted without a duration.
    pub fallback_track_duration_secs: i64,
    pub show_ids: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            fallback_track_duration_secs: 999,
            show_ids: false,
        }
    }
}

fn failed(action: impl Display, err: &CatalogError) -> OpOutcome {
    error!("Error when {}: {}", action, err);
    OpOutcome::new(format!("Error when {}: {}", action, err), FAILURE)
}

/// Not-found errors become a `0` outcome, everything else a failure.
fn not_found_or_failed(action: impl Display, err: &CatalogError) -> OpOutcome {
    match err {
        CatalogError::NotFound(_) => {
            info!("{}: {}", action, err);
            OpOutcome::new(err.to_string(), NOTHING)
        }
        _ => failed(action, err),
    }
}

fn date_text(date: Option<CatalogDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn id_text(id: Option<i64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

pub struct Catalog {
    store: SqliteCatalogStore,
    ids: Box<dyn IdAllocator>,
    settings: CatalogSettings,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(
        db_path: P,
        id_strategy: IdStrategy,
        settings: CatalogSettings,
    ) -> Result<Self> {
        let store = SqliteCatalogStore::open(db_path)?;
        info!("Allocating ids with the {} strategy", id_strategy);
        Ok(Self::with_store(store, id_strategy.allocator(), settings))
    }

    pub fn open_in_memory(id_strategy: IdStrategy, settings: CatalogSettings) -> Result<Self> {
        let store = SqliteCatalogStore::open_in_memory()?;
        Ok(Self::with_store(store, id_strategy.allocator(), settings))
    }

    pub fn with_store(
        store: SqliteCatalogStore,
        ids: Box<dyn IdAllocator>,
        settings: CatalogSettings,
    ) -> Self {
        Catalog {
            store,
            ids,
            settings,
        }
    }

    pub fn store(&self) -> &SqliteCatalogStore {
        &self.store
    }

    pub fn settings(&self) -> CatalogSettings {
        self.settings
    }

    pub fn set_show_ids(&mut self, show_ids: bool) {
        self.settings.show_ids = show_ids;
    }

    fn workflows(&self) -> WriteWorkflows<'_> {
        WriteWorkflows::new(
            &self.store,
            self.ids.as_ref(),
            self.settings.fallback_track_duration_secs,
        )
    }

    fn reports(&self) -> ReportEngine<'_> {
        ReportEngine::new(self.store.conn())
    }

    fn report(
        &self,
        kind: ReportKind,
        parameter: &str,
        options: ReportOptions,
    ) -> OpOutcome {
        let result = self.reports().run_report(kind, parameter, options);
        Self::report_outcome(
            format!("searching for {} \"{}\"", kind.subject(), parameter.trim()),
            result,
        )
    }

    fn report_outcome(action: String, result: CatalogResult<ReportOutcome>) -> OpOutcome {
        match result {
            Ok(ReportOutcome::Rendered(report)) => OpOutcome {
                status: report.rows as i64,
                text: report.text,
                selection: report.album_ids,
                kind: OutcomeKind::Report,
            },
            Ok(ReportOutcome::NotFound(line)) => OpOutcome::new(line, NOTHING),
            Err(e) => failed(action, &e),
        }
    }

    fn id_options(&self) -> ReportOptions {
        ReportOptions {
            show_ids: self.settings.show_ids,
            show_tracks: false,
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn query_by_creator(&self, creator: &str) -> OpOutcome {
        self.report(ReportKind::ByCreator, creator, self.id_options())
    }

    pub fn query_by_audio_title(&self, title: &str) -> OpOutcome {
        self.report(ReportKind::ByTrackTitle, title, self.id_options())
    }

    /// Without tracks the result is a numbered list whose album ids are
    /// returned in [`OpOutcome::selection`].
    pub fn query_by_album_title(&self, title: &str, show_tracks: bool) -> OpOutcome {
        self.report(
            ReportKind::ByAlbumTitle,
            title,
            ReportOptions {
                show_ids: self.settings.show_ids,
                show_tracks,
            },
        )
    }

    pub fn query_by_genre(&self, genre: &str) -> OpOutcome {
        self.report(ReportKind::ByGenre, genre, ReportOptions::default())
    }

    pub fn query_by_media_type(&self, media_type: &str) -> OpOutcome {
        self.report(ReportKind::ByMediaType, media_type, ReportOptions::default())
    }

    /// `rating` is `0`/`clean` or `1`/`explicit`.
    pub fn get_tracks_by_rating(&self, rating: &str) -> OpOutcome {
        self.report(ReportKind::ByRating, rating, ReportOptions::default())
    }

    pub fn get_tracks_by_country(&self, country: &str) -> OpOutcome {
        self.report(ReportKind::ByCountry, country, ReportOptions::default())
    }

    pub fn get_tracks_by_label(&self, label: &str) -> OpOutcome {
        self.report(ReportKind::ByLabel, label, ReportOptions::default())
    }

    pub fn print_country_codes(&self) -> OpOutcome {
        Self::report_outcome(
            "listing country codes".to_string(),
            self.reports().country_codes(),
        )
    }

    pub fn get_avg_track_duration_album(&self, album: &str) -> OpOutcome {
        Self::report_outcome(
            format!("getting average track duration for album \"{}\"", album),
            self.reports().average_track_duration(album),
        )
    }

    pub fn num_tracks_in_album(&self, album: &str) -> OpOutcome {
        Self::report_outcome(
            format!("getting track count for album \"{}\"", album),
            self.reports().track_count(album),
        )
    }

    pub fn get_random_tracks(&self, count: usize) -> OpOutcome {
        Self::report_outcome(
            "getting random tracks".to_string(),
            self.reports().random_tracks(count),
        )
    }

    // =========================================================================
    // Inserts
    // =========================================================================

    /// `release_date` is `yyyymmdd`. A missing label is created.
    pub fn insert_album(
        &self,
        name: &str,
        release_date: Option<&str>,
        label: Option<&str>,
        media_type: &str,
    ) -> OpOutcome {
        let action = format!("inserting album \"{}\"", name);
        let album = match Self::new_album(name, release_date, label, media_type) {
            Ok(album) => album,
            Err(e) => return failed(action, &e),
        };
        let report = self.workflows().insert_album(&album);
        let (lines, status) = Self::album_lines(&action, &album, &report);
        OpOutcome::new(lines.join("\n"), status)
    }

    /// Lines for the label and album steps, and the album id or [`FAILURE`].
    fn album_lines(
        action: &str,
        album: &NewAlbum,
        report: &AlbumInsertReport,
    ) -> (Vec<String>, i64) {
        let mut lines = Vec::new();
        if let Some(Resolution::Created(label_id)) = report.label {
            lines.push(format!(
                "Successfully inserted new record label with ID: {}",
                label_id
            ));
        }
        let status = match &report.album {
            Ok(album_id) => {
                info!("Inserted album '{}' with id {}", album.name, album_id);
                lines.push(format!(
                    "Successfully inserted new album with ID: {}",
                    album_id
                ));
                *album_id
            }
            Err(e) => {
                lines.push(failed(action, e).text);
                if let Some(label_id) = report.orphaned_label() {
                    lines.push(format!(
                        "Record label {} created for this album remains in the catalog",
                        label_id
                    ));
                }
                FAILURE
            }
        };
        (lines, status)
    }

    fn new_album(
        name: &str,
        release_date: Option<&str>,
        label: Option<&str>,
        media_type: &str,
    ) -> CatalogResult<NewAlbum> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("album name is empty".to_string()));
        }
        Ok(NewAlbum {
            name: name.to_string(),
            media_type: media_type.trim().to_string(),
            release_date: CatalogDate::parse_optional(release_date)?,
            label: label.map(str::to_string),
        })
    }

    /// Inserts the album, then every track into it, and reports how many
    /// tracks made it in.
    pub fn insert_album_with_tracks(
        &self,
        name: &str,
        release_date: Option<&str>,
        label: Option<&str>,
        media_type: &str,
        tracks: &[NewTrack],
        confirm: &mut dyn CreatorConfirmation,
    ) -> OpOutcome {
        let action = format!("inserting album \"{}\"", name);
        let album = match Self::new_album(name, release_date, label, media_type) {
            Ok(album) => album,
            Err(e) => return failed(action, &e),
        };
        let report = self
            .workflows()
            .insert_album_with_tracks(&album, tracks, confirm);

        let (mut lines, status) = Self::album_lines(&action, &album, &report.album);
        if status == FAILURE {
            return OpOutcome::new(lines.join("\n"), FAILURE);
        }
        for (title, result) in &report.tracks {
            match result {
                Ok(track) if track.is_complete() => {}
                Ok(track) => lines.push(format!(
                    "Track '{}' was added with ID {} but its creator was not linked",
                    title, track.track_id
                )),
                Err(e) => lines.push(failed(format!("inserting track \"{}\"", title), e).text),
            }
        }
        let added = report.tracks_added();
        let attempted = report.tracks_attempted();
        lines.push(format!(
            "Successfully added {} of {} tracks to album {}",
            added, attempted, album.name
        ));
        if added < attempted {
            lines.push(format!("{} tracks could not be added", attempted - added));
        }
        OpOutcome::new(lines.join("\n"), added as i64)
    }

    /// Returns the id of the matching label, creating it when absent.
    pub fn insert_record_label(
        &self,
        name: &str,
        founding_date: Option<&str>,
        country_id: Option<i64>,
    ) -> OpOutcome {
        let action = format!("inserting label \"{}\"", name);
        let label = match CatalogDate::parse_optional(founding_date) {
            Ok(founding_date) => NewRecordLabel {
                name: name.to_string(),
                founding_date,
                country_id,
            },
            Err(e) => return failed(action, &e),
        };
        match self.workflows().insert_record_label(&label) {
            Ok(Resolution::Created(id)) => OpOutcome::new(
                format!("Successfully inserted new record label with ID: {}", id),
                id,
            ),
            Ok(Resolution::Existing(id)) => OpOutcome::new(
                format!("Record label \"{}\" already present with ID: {}", name, id),
                id,
            ),
            Ok(Resolution::Missing) => OpOutcome::new(
                format!("Record label \"{}\" could not be resolved", name),
                FAILURE,
            ),
            Err(e) => failed(action, &e),
        }
    }

    /// The track row is kept even when linking its creator fails afterwards;
    /// that case still reports a failure.
    pub fn insert_audiofile(
        &self,
        track: &NewTrack,
        confirm: &mut dyn CreatorConfirmation,
    ) -> OpOutcome {
        let report = match self.workflows().insert_track(track, confirm) {
            Ok(report) => report,
            Err(e) => return failed(format!("inserting track \"{}\"", track.title), &e),
        };
        let added = format!(
            "New Track {} added successfully with ID: {}",
            track.title, report.track_id
        );
        match report.creator {
            None => OpOutcome::new(added, report.track_id),
            Some(CreatorStep::Linked {
                creator_id,
                created,
            }) => {
                let mut text = String::new();
                if created {
                    text.push_str(&format!(
                        "Successfully inserted new creator with ID: {}\n",
                        creator_id
                    ));
                }
                text.push_str(&added);
                OpOutcome::new(text, report.track_id)
            }
            Some(CreatorStep::Declined) => OpOutcome::new(
                format!(
                    "{}\nCreator was not added, track {} has no creator",
                    added, report.track_id
                ),
                FAILURE,
            ),
            Some(CreatorStep::Failed(e)) => {
                let failure = failed(
                    format!("linking creator to track {}", report.track_id),
                    &e,
                );
                OpOutcome::new(format!("{}\n{}", added, failure.text), FAILURE)
            }
        }
    }

    pub fn add_genre_to_track(&self, track_id: i64, genre: &str) -> OpOutcome {
        match self.workflows().add_genre_to_track(track_id, genre) {
            Ok(()) => OpOutcome::new(format!("Added genre {} to track {}", genre, track_id), 1),
            Err(CatalogError::AlreadyExists(_)) => OpOutcome::new(
                format!(
                    "Genre {} could not be added to track {}: already tagged, or the genre or track does not exist",
                    genre, track_id
                ),
                NOTHING,
            ),
            Err(e) => failed(
                format!("adding genre {} to track {}", genre, track_id),
                &e,
            ),
        }
    }

    pub fn insert_creator(&self, name: &str) -> OpOutcome {
        match self.workflows().insert_creator(name) {
            Ok(id) => OpOutcome::new(
                format!("Successfully inserted new creator with ID: {}", id),
                id,
            ),
            Err(e) => failed(format!("inserting creator \"{}\"", name), &e),
        }
    }

    pub fn insert_genre(&self, name: &str, description: Option<&str>) -> OpOutcome {
        match self.workflows().insert_genre(name, description) {
            Ok(()) => OpOutcome::new(format!("Successfully inserted new genre: {}", name), 1),
            Err(CatalogError::AlreadyExists(_)) => {
                OpOutcome::new("Genre already exists in the database.", NOTHING)
            }
            Err(e) => failed(format!("inserting genre \"{}\"", name), &e),
        }
    }

    pub fn insert_country(&self, name: &str) -> OpOutcome {
        match self.workflows().insert_country(name) {
            Ok(id) => OpOutcome::new(
                format!("Successfully inserted new country with ID: {}", id),
                id,
            ),
            Err(CatalogError::AlreadyExists(_)) => {
                OpOutcome::new("Country already exists in the database.", NOTHING)
            }
            Err(e) => failed(format!("inserting country \"{}\"", name), &e),
        }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    fn updated<T>(
        action: String,
        missing: &str,
        result: CatalogResult<Option<UpdateApplied<T>>>,
        describe: impl FnOnce(&T) -> String,
    ) -> OpOutcome {
        match result {
            Ok(Some(applied)) => {
                info!("Done {}", action);
                OpOutcome::new(describe(&applied.previous), applied.rows as i64)
            }
            Ok(None) => OpOutcome::new(missing, NOTHING),
            Err(e) => not_found_or_failed(action, &e),
        }
    }

    pub fn update_genre(&self, genre: &str, description: Option<&str>) -> OpOutcome {
        Self::updated(
            format!("updating genre {}", genre),
            "That genre does not exist yet.",
            self.workflows().update_genre(genre, description),
            |old| {
                format!(
                    "Successfully updated genre description: {}\nDescription {} is now: {}",
                    genre,
                    old.as_deref().unwrap_or("-"),
                    description.unwrap_or("-")
                )
            },
        )
    }

    pub fn update_label_country(&self, label: &str, country_id: Option<i64>) -> OpOutcome {
        Self::updated(
            format!("updating label {}", label),
            "That label does not exist yet.",
            self.workflows().update_label_country(label, country_id),
            |old| {
                format!(
                    "Successfully updated country for record label: {}\nCountryID {} of {} is now: {}",
                    label,
                    id_text(*old),
                    label,
                    id_text(country_id)
                )
            },
        )
    }

    /// `date` is `yyyymmdd`; `None` clears the founding date.
    pub fn update_label_date(&self, label: &str, date: Option<&str>) -> OpOutcome {
        let action = format!("updating label {}", label);
        let date = match CatalogDate::parse_optional(date) {
            Ok(date) => date,
            Err(e) => return failed(action, &e),
        };
        Self::updated(
            action,
            "That label does not exist yet.",
            self.workflows().update_label_date(label, date),
            |old| {
                format!(
                    "Success. Founding date of {} is now: {} (was {})",
                    label,
                    date_text(date),
                    date_text(*old)
                )
            },
        )
    }

    pub fn update_album_release_date(&self, album_id: i64, date: Option<&str>) -> OpOutcome {
        let action = format!("updating release date for album ID {}", album_id);
        let date = match CatalogDate::parse_optional(date) {
            Ok(date) => date,
            Err(e) => return failed(action, &e),
        };
        Self::updated(
            action,
            "That album does not exist yet.",
            self.workflows().update_album_release_date(album_id, date),
            |(album, old)| {
                format!(
                    "Success. Release date of {} is now: {} (was {})",
                    album,
                    date_text(date),
                    date_text(*old)
                )
            },
        )
    }

    /// The label must already exist; `None` removes the album's label.
    pub fn update_album_label(&self, album: &str, label: Option<&str>) -> OpOutcome {
        Self::updated(
            format!("updating label of album {}", album),
            "That album does not exist yet.",
            self.workflows().update_album_label(album, label),
            |old| {
                format!(
                    "Success. Record LabelID ({}) of {} is now: {}",
                    id_text(*old),
                    album,
                    label.unwrap_or("-")
                )
            },
        )
    }

    /// Applies to every track with this title. The country must exist.
    pub fn update_track_country(&self, track_title: &str, country: Option<&str>) -> OpOutcome {
        Self::updated(
            format!("updating country of track {}", track_title),
            "That track does not exist yet.",
            self.workflows().update_track_country(track_title, country),
            |_| {
                format!(
                    "Successfully updated country for {} to: {}",
                    track_title,
                    country.unwrap_or("-")
                )
            },
        )
    }

    // =========================================================================
    // Deletes
    // =========================================================================

    fn deleted(
        action: String,
        what: String,
        dependents: &str,
        result: CatalogResult<Deleted>,
    ) -> OpOutcome {
        match result {
            Ok(deleted) if deleted.primary == 0 => {
                OpOutcome::new(format!("{} not found", what), NOTHING)
            }
            Ok(deleted) => {
                info!(
                    "Deleted {} ({} {} affected)",
                    what, deleted.dependents, dependents
                );
                OpOutcome::new(
                    format!(
                        "Deleted {} ({} {} affected)",
                        what, deleted.dependents, dependents
                    ),
                    deleted.primary as i64,
                )
            }
            Err(e) => not_found_or_failed(action, &e),
        }
    }

    pub fn delete_creator(&self, creator_id: i64) -> OpOutcome {
        Self::deleted(
            format!("deleting creator ID {}", creator_id),
            format!("Creator {}", creator_id),
            "credits",
            self.workflows().delete_creator(creator_id),
        )
    }

    /// Removes the album's tracks and their associations too.
    pub fn delete_album(&self, album_id: i64) -> OpOutcome {
        Self::deleted(
            format!("deleting album ID {}", album_id),
            format!("Album {}", album_id),
            "tracks and track associations",
            self.workflows().delete_album(album_id),
        )
    }

    pub fn delete_track(&self, track_id: i64) -> OpOutcome {
        Self::deleted(
            format!("deleting track ID {}", track_id),
            format!("Track {}", track_id),
            "associations",
            self.workflows().delete_track(track_id),
        )
    }

    pub fn delete_genre(&self, genre: &str) -> OpOutcome {
        Self::deleted(
            format!("deleting genre {}", genre),
            format!("Genre {}", genre),
            "track tags",
            self.workflows().delete_genre(genre),
        )
    }

    pub fn delete_label(&self, label: &str) -> OpOutcome {
        Self::deleted(
            format!("deleting label {}", label),
            format!("Label {}", label),
            "albums",
            self.workflows().delete_label(label),
        )
    }
}
