//! Multi-step write workflows over the catalog store.
//!
//! Each step commits on its own. A failure stops the remaining steps of the
//! workflow but never undoes steps that already committed, so the report
//! types below say which steps took effect.

use crate::catalog_store::{
    CatalogDate, CatalogError, CatalogResult, Deleted, ExplicitRating, Genre, NewAlbum,
    NewRecordLabel, NewTrack, SqliteCatalogStore, UpdateApplied,
};
use crate::ids::IdAllocator;
use crate::resolver::{EntityResolver, Resolution};
use tracing::{debug, warn};

/// Asked before a creator that does not exist yet is inserted.
pub trait CreatorConfirmation {
    fn confirm_create(&mut self, creator_name: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> CreatorConfirmation for F {
    fn confirm_create(&mut self, creator_name: &str) -> bool {
        self(creator_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Start,
    LabelResolved,
    EntityPersisted,
    AssociationPersisted,
    Committed,
    Failed,
}

struct WorkflowTrace {
    workflow: &'static str,
    state: WorkflowState,
}

impl WorkflowTrace {
    fn start(workflow: &'static str) -> Self {
        debug!("{}: {:?}", workflow, WorkflowState::Start);
        WorkflowTrace {
            workflow,
            state: WorkflowState::Start,
        }
    }

    fn advance(&mut self, next: WorkflowState) {
        debug!("{}: {:?} -> {:?}", self.workflow, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: &CatalogError) {
        debug!(
            "{}: {:?} -> {:?} ({})",
            self.workflow,
            self.state,
            WorkflowState::Failed,
            err
        );
        self.state = WorkflowState::Failed;
    }
}

#[derive(Debug)]
pub struct AlbumInsertReport {
    /// Outcome of the label step, when a label name was given and it resolved.
    pub label: Option<Resolution>,
    pub album: CatalogResult<i64>,
}

impl AlbumInsertReport {
    /// A label created for an album that then failed stays in the store.
    pub fn orphaned_label(&self) -> Option<i64> {
        match (&self.label, &self.album) {
            (Some(Resolution::Created(id)), Err(_)) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum CreatorStep {
    Linked { creator_id: i64, created: bool },
    Declined,
    Failed(CatalogError),
}

#[derive(Debug)]
pub struct TrackInsertReport {
    pub track_id: i64,
    /// `None` when no creator name was supplied.
    pub creator: Option<CreatorStep>,
}

impl TrackInsertReport {
    /// True when every requested step committed.
    pub fn is_complete(&self) -> bool {
        matches!(self.creator, None | Some(CreatorStep::Linked { .. }))
    }
}

#[derive(Debug)]
pub struct AlbumBundleReport {
    pub album: AlbumInsertReport,
    pub tracks: Vec<(String, CatalogResult<TrackInsertReport>)>,
}

impl AlbumBundleReport {
    pub fn tracks_added(&self) -> usize {
        self.tracks
            .iter()
            .filter(|(_, r)| r.as_ref().is_ok_and(|t| t.is_complete()))
            .count()
    }

    pub fn tracks_attempted(&self) -> usize {
        self.tracks.len()
    }
}

pub struct WriteWorkflows<'a> {
    store: &'a SqliteCatalogStore,
    ids: &'a dyn IdAllocator,
    fallback_duration_secs: i64,
}

impl<'a> WriteWorkflows<'a> {
    pub fn new(
        store: &'a SqliteCatalogStore,
        ids: &'a dyn IdAllocator,
        fallback_duration_secs: i64,
    ) -> Self {
        WriteWorkflows {
            store,
            ids,
            fallback_duration_secs,
        }
    }

    fn resolver(&self) -> EntityResolver<'a> {
        EntityResolver::new(self.store, self.ids)
    }

    // =========================================================================
    // Inserts
    // =========================================================================

    pub fn insert_album(&self, album: &NewAlbum) -> AlbumInsertReport {
        let mut trace = WorkflowTrace::start("insert album");

        let label = match album.label.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                match self.resolver().resolve_or_create_label(name, None, None) {
                    Ok(resolution) => {
                        trace.advance(WorkflowState::LabelResolved);
                        Some(resolution)
                    }
                    Err(e) => {
                        trace.fail(&e);
                        return AlbumInsertReport {
                            label: None,
                            album: Err(e),
                        };
                    }
                }
            }
            _ => None,
        };

        let result = self.store.insert_album(
            self.ids.allocate(),
            album,
            label.as_ref().and_then(Resolution::id),
        );
        match &result {
            Ok(_) => {
                trace.advance(WorkflowState::EntityPersisted);
                trace.advance(WorkflowState::Committed);
            }
            Err(e) => trace.fail(e),
        }
        let report = AlbumInsertReport {
            label,
            album: result,
        };
        if let Some(label_id) = report.orphaned_label() {
            warn!(
                "Record label {} was created but album '{}' could not be inserted",
                label_id, album.name
            );
        }
        report
    }

    pub fn insert_record_label(&self, label: &NewRecordLabel) -> CatalogResult<Resolution> {
        self.resolver()
            .resolve_or_create_label(&label.name, label.founding_date, label.country_id)
    }

    /// The track row commits first; the creator link is a separate step that
    /// may fail or be declined without touching the track.
    pub fn insert_track(
        &self,
        track: &NewTrack,
        confirm: &mut dyn CreatorConfirmation,
    ) -> CatalogResult<TrackInsertReport> {
        let mut trace = WorkflowTrace::start("insert track");

        let title = track.title.trim();
        if title.is_empty() {
            let err = CatalogError::InvalidInput("track title is empty".to_string());
            trace.fail(&err);
            return Err(err);
        }

        let track_id = self
            .store
            .insert_track(
                self.ids.allocate(),
                title,
                track.rating.unwrap_or(ExplicitRating::Clean),
                track.duration_secs.unwrap_or(self.fallback_duration_secs),
                track.country_id,
                track.album_id,
            )
            .inspect_err(|e| trace.fail(e))?;
        trace.advance(WorkflowState::EntityPersisted);

        let creator = match track.creator.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let step = self.link_creator(track_id, name, confirm);
                match &step {
                    CreatorStep::Linked { .. } => {
                        trace.advance(WorkflowState::AssociationPersisted)
                    }
                    CreatorStep::Declined => {
                        trace.fail(&CatalogError::CreationDeclined(name.to_string()))
                    }
                    CreatorStep::Failed(e) => trace.fail(e),
                }
                Some(step)
            }
            _ => None,
        };
        if trace.state != WorkflowState::Failed {
            trace.advance(WorkflowState::Committed);
        }

        Ok(TrackInsertReport { track_id, creator })
    }

    fn link_creator(
        &self,
        track_id: i64,
        name: &str,
        confirm: &mut dyn CreatorConfirmation,
    ) -> CreatorStep {
        let resolver = self.resolver();
        let (creator_id, created) = match resolver.resolve_creator(name) {
            Ok(Resolution::Existing(id)) | Ok(Resolution::Created(id)) => (id, false),
            Ok(Resolution::Missing) => {
                if !confirm.confirm_create(name) {
                    debug!("Creation of creator '{}' declined", name);
                    return CreatorStep::Declined;
                }
                match resolver.create_creator(name) {
                    Ok(id) => (id, true),
                    Err(e) => return CreatorStep::Failed(e),
                }
            }
            Err(e) => return CreatorStep::Failed(e),
        };
        match self.store.link_creator(track_id, creator_id) {
            Ok(()) => CreatorStep::Linked {
                creator_id,
                created,
            },
            Err(e) => CreatorStep::Failed(e),
        }
    }

    /// Inserts an album and then each track into it. Tracks failing do not
    /// stop the remaining ones.
    pub fn insert_album_with_tracks(
        &self,
        album: &NewAlbum,
        tracks: &[NewTrack],
        confirm: &mut dyn CreatorConfirmation,
    ) -> AlbumBundleReport {
        let album_report = self.insert_album(album);
        let Ok(album_id) = album_report.album else {
            return AlbumBundleReport {
                album: album_report,
                tracks: Vec::new(),
            };
        };

        let tracks = tracks
            .iter()
            .map(|t| {
                let track = NewTrack {
                    album_id,
                    ..t.clone()
                };
                (t.title.clone(), self.insert_track(&track, confirm))
            })
            .collect();

        AlbumBundleReport {
            album: album_report,
            tracks,
        }
    }

    /// Any constraint failure (unknown genre or the pair already present) is
    /// reported as [`CatalogError::AlreadyExists`].
    pub fn add_genre_to_track(&self, track_id: i64, genre: &str) -> CatalogResult<()> {
        match self.store.add_track_genre(track_id, genre.trim()) {
            Err(e) if e.is_constraint_violation() => Err(CatalogError::AlreadyExists(format!(
                "genre '{}' on track {} (or the genre or track is unknown)",
                genre.trim(),
                track_id
            ))),
            other => other,
        }
    }

    pub fn insert_creator(&self, name: &str) -> CatalogResult<i64> {
        self.resolver().create_creator(name)
    }

    pub fn insert_genre(&self, name: &str, description: Option<&str>) -> CatalogResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("genre name is empty".to_string()));
        }
        self.store.insert_genre(&Genre {
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Unlike label resolution, a duplicate country name is an error here.
    /// Country names are unique; an existing name is reported as
    /// [`CatalogError::AlreadyExists`].
    pub fn insert_country(&self, name: &str) -> CatalogResult<i64> {
        match self.resolver().resolve_or_create_country(name)? {
            Resolution::Created(id) => Ok(id),
            Resolution::Existing(_) | Resolution::Missing => Err(CatalogError::AlreadyExists(
                format!("country '{}'", name.trim()),
            )),
        }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    pub fn update_genre(
        &self,
        genre: &str,
        description: Option<&str>,
    ) -> CatalogResult<Option<UpdateApplied<Option<String>>>> {
        self.store.update_genre_description(genre.trim(), description)
    }

    pub fn update_label_country(
        &self,
        label: &str,
        country_id: Option<i64>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        self.store.update_label_country(label.trim(), country_id)
    }

    pub fn update_label_date(
        &self,
        label: &str,
        date: Option<CatalogDate>,
    ) -> CatalogResult<Option<UpdateApplied<Option<CatalogDate>>>> {
        self.store.update_label_founding_date(label.trim(), date)
    }

    pub fn update_album_release_date(
        &self,
        album_id: i64,
        date: Option<CatalogDate>,
    ) -> CatalogResult<Option<UpdateApplied<(String, Option<CatalogDate>)>>> {
        self.store.update_album_release_date(album_id, date)
    }

    /// The new label must already exist; it is looked up, never created.
    pub fn update_album_label(
        &self,
        album_name: &str,
        label: Option<&str>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        let label_id = match label.map(str::trim) {
            Some(name) if !name.is_empty() => Some(
                self.store
                    .find_label_id(name)?
                    .ok_or_else(|| CatalogError::NotFound(format!("Record label '{}'", name)))?,
            ),
            _ => None,
        };
        self.store.update_album_label(album_name.trim(), label_id)
    }

    pub fn update_track_country(
        &self,
        track_title: &str,
        country: Option<&str>,
    ) -> CatalogResult<Option<UpdateApplied<Option<i64>>>> {
        let country_id = match country.map(str::trim) {
            Some(name) if !name.is_empty() => Some(
                self.store
                    .find_country_id(name)?
                    .ok_or_else(|| CatalogError::NotFound(format!("Country '{}'", name)))?,
            ),
            _ => None,
        };
        self.store.update_track_country(track_title.trim(), country_id)
    }

    // =========================================================================
    // Deletes
    // =========================================================================

    pub fn delete_track(&self, track_id: i64) -> CatalogResult<Deleted> {
        self.store.delete_track(track_id)
    }

    pub fn delete_album(&self, album_id: i64) -> CatalogResult<Deleted> {
        self.store.delete_album(album_id)
    }

    pub fn delete_creator(&self, creator_id: i64) -> CatalogResult<Deleted> {
        self.store.delete_creator(creator_id)
    }

    pub fn delete_genre(&self, genre: &str) -> CatalogResult<Deleted> {
        self.store.delete_genre(genre.trim())
    }

    /// The label is found by the same pattern match used when resolving labels.
    pub fn delete_label(&self, label: &str) -> CatalogResult<Deleted> {
        let label = label.trim();
        let label_id = self
            .store
            .find_label_id(label)?
            .ok_or_else(|| CatalogError::NotFound(format!("Label '{}'", label)))?;
        self.store.delete_label(label_id)
    }
}
