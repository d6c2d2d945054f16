//! Read-only reports rendered as text.
//!
//! Album-centric reports are two-level: one header line per album followed,
//! when tracks are shown, by the album's tracks drawn as a tree.

pub mod format;
mod queries;

use crate::catalog_store::{CatalogError, CatalogResult, ExplicitRating};
use format::{
    abbreviate, cell, format_duration, format_optional_duration, nullable, pad_left, pad_right,
    year_of, TreeGlyph,
};
use queries::{AlbumRow, CreditRow, TrackRow};
use rusqlite::Connection;
use tracing::debug;

const TRACK_INDENT: &str = "       ";
const RULE: &str = "------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ByCreator,
    ByTrackTitle,
    ByAlbumTitle,
    ByGenre,
    ByMediaType,
    ByRating,
    ByCountry,
    ByLabel,
}

impl ReportKind {
    pub fn subject(&self) -> &'static str {
        match self {
            ReportKind::ByCreator => "creator",
            ReportKind::ByTrackTitle => "track",
            ReportKind::ByAlbumTitle => "album",
            ReportKind::ByGenre => "genre",
            ReportKind::ByMediaType => "media type",
            ReportKind::ByRating => "rating",
            ReportKind::ByCountry => "country",
            ReportKind::ByLabel => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Append creator / track ids to rows of the creator and track-title reports.
    pub show_ids: bool,
    /// Only consulted by the album-title report; media-type and label reports
    /// always list tracks.
    pub show_tracks: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedReport {
    pub text: String,
    pub rows: usize,
    /// Album ids in the order they were listed, numbered from 1 in the text.
    pub album_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Rendered(RenderedReport),
    /// Nothing matched. Carries the line shown to the user.
    NotFound(String),
}

impl ReportOutcome {
    pub fn text(&self) -> &str {
        match self {
            ReportOutcome::Rendered(report) => &report.text,
            ReportOutcome::NotFound(line) => line,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            ReportOutcome::Rendered(report) => report.rows,
            ReportOutcome::NotFound(_) => 0,
        }
    }
}

fn no_results(parameter: &str) -> ReportOutcome {
    ReportOutcome::NotFound(format!("No results found for {}", parameter))
}

fn rendered(lines: Vec<String>, rows: usize) -> ReportOutcome {
    ReportOutcome::Rendered(RenderedReport {
        text: lines.join("\n"),
        rows,
        album_ids: Vec::new(),
    })
}

/// Accepts `0`/`1` as well as `clean`/`explicit`.
pub fn parse_rating(value: &str) -> CatalogResult<ExplicitRating> {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "clean" => Ok(ExplicitRating::Clean),
        "1" | "explicit" => Ok(ExplicitRating::Explicit),
        other => Err(CatalogError::InvalidInput(format!(
            "rating '{}' is neither clean (0) nor explicit (1)",
            other
        ))),
    }
}

pub struct ReportEngine<'a> {
    conn: &'a Connection,
}

impl<'a> ReportEngine<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        ReportEngine { conn }
    }

    pub fn run_report(
        &self,
        kind: ReportKind,
        parameter: &str,
        options: ReportOptions,
    ) -> CatalogResult<ReportOutcome> {
        let parameter = parameter.trim();
        debug!("Running {} report for '{}'", kind.subject(), parameter);
        match kind {
            ReportKind::ByCreator => self.by_creator(parameter, options),
            ReportKind::ByTrackTitle => self.by_track_title(parameter, options),
            ReportKind::ByAlbumTitle => {
                let albums = queries::albums_by_title(self.conn, parameter)?;
                if options.show_tracks {
                    self.album_tree(parameter, albums)
                } else {
                    Ok(Self::album_selection(parameter, albums))
                }
            }
            ReportKind::ByGenre => self.by_genre(parameter),
            ReportKind::ByMediaType => {
                let albums = queries::albums_by_media_type(self.conn, parameter)?;
                self.album_tree(parameter, albums)
            }
            ReportKind::ByRating => {
                let rating = parse_rating(parameter)?;
                let credits = queries::credits_by_rating(self.conn, rating)?;
                Ok(Self::credit_table(rating.label(), &credits))
            }
            ReportKind::ByCountry => self.by_country(parameter),
            ReportKind::ByLabel => {
                let albums = queries::albums_by_label(self.conn, parameter)?;
                self.album_tree(parameter, albums)
            }
        }
    }

    // =========================================================================
    // Album-centric
    // =========================================================================

    fn album_header(prefix: &str, album: &AlbumRow) -> String {
        format!(
            "{}{} | {} | {} | {} | {}",
            pad_right(prefix, 7),
            cell(&album.name, 20),
            pad_left(&format_optional_duration(album.total_secs), 7),
            pad_left(&album.media_type, 8),
            pad_left(nullable(album.release_date.as_deref()), 10),
            nullable(album.label.as_deref())
        )
    }

    fn album_tree(&self, parameter: &str, albums: Vec<AlbumRow>) -> CatalogResult<ReportOutcome> {
        if albums.is_empty() {
            return Ok(no_results(parameter));
        }
        let mut lines = Vec::new();
        for album in &albums {
            lines.push(Self::album_header("Album:", album));
            if album.track_count == 0 {
                lines.push(format!("  No tracks found for album ID: {}", album.id));
            } else {
                let tracks = queries::tracks_of_album(self.conn, album.id)?;
                lines.extend(Self::track_tree(&tracks, album.track_count));
            }
            lines.push(String::new());
        }
        let rows = albums.len();
        Ok(ReportOutcome::Rendered(RenderedReport {
            text: lines.join("\n"),
            rows,
            album_ids: albums.iter().map(|a| a.id).collect(),
        }))
    }

    /// `total` is the album's own track count; the glyph depends only on
    /// the position within it.
    fn track_tree(tracks: &[TrackRow], total: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(tracks.len() + 1);
        lines.push(format!(
            "{}   {} | {} | {} | {}",
            TRACK_INDENT,
            pad_right("-Title-", 20),
            pad_left("-Drtn-", 7),
            pad_right("-Rating-", 8),
            "-Creator-"
        ));
        for (index, track) in tracks.iter().enumerate() {
            lines.push(format!(
                "{}{} {} | {} | {} | {}",
                TRACK_INDENT,
                TreeGlyph::for_position(index, total).as_str(),
                cell(&track.title, 20),
                pad_left(&format_duration(track.duration_secs), 7),
                pad_right(track.rating.label(), 8),
                abbreviate(nullable(track.creators.as_deref()), 20)
            ));
        }
        lines
    }

    /// Numbered album list without tracks; the ids come back in list order.
    fn album_selection(parameter: &str, albums: Vec<AlbumRow>) -> ReportOutcome {
        if albums.is_empty() {
            return no_results(parameter);
        }
        let lines: Vec<String> = albums
            .iter()
            .enumerate()
            .map(|(i, album)| Self::album_header(&format!("  {}:", i + 1), album))
            .collect();
        ReportOutcome::Rendered(RenderedReport {
            text: lines.join("\n"),
            rows: albums.len(),
            album_ids: albums.iter().map(|a| a.id).collect(),
        })
    }

    // =========================================================================
    // Track-centric
    // =========================================================================

    fn by_creator(&self, creator: &str, options: ReportOptions) -> CatalogResult<ReportOutcome> {
        let credits = queries::credits_by_creator(self.conn, creator)?;
        let Some(first) = credits.first() else {
            return Ok(no_results(creator));
        };
        let mut lines = vec![
            format!("From Creator: {} (cid {})", creator, first.creator_id),
            format!(
                "Year | {} | {} | Audio File Name",
                pad_right("Album Name", 20),
                pad_left("Drtn.", 7)
            ),
            RULE.to_string(),
        ];
        for credit in &credits {
            let mut line = format!(
                "{} | {} | {} | {}",
                pad_right(&year_of(credit.release_date.as_deref()), 4),
                cell(&credit.album_name, 20),
                pad_left(&format_duration(credit.duration_secs), 7),
                abbreviate(&credit.title, 20)
            );
            if options.show_ids {
                line.push_str(&format!(" | ID: {}", credit.creator_id));
            }
            lines.push(line);
        }
        Ok(rendered(lines, credits.len()))
    }

    fn by_track_title(&self, title: &str, options: ReportOptions) -> CatalogResult<ReportOutcome> {
        let tracks = queries::tracks_by_title(self.conn, title)?;
        if tracks.is_empty() {
            return Ok(no_results(title));
        }
        let mut lines = vec![
            format!(
                "{} | {} | {} | {} | {} | Released",
                pad_right("Audio File Name", 22),
                pad_right("Creator", 18),
                pad_left("Drtn.", 7),
                pad_right("Album Name", 20),
                pad_right("Explicit", 8)
            ),
            RULE.to_string(),
        ];
        for track in &tracks {
            let mut line = format!(
                "{} | {} | {} | {} | {} | {}",
                cell(&track.title, 22),
                cell(nullable(track.creators.as_deref()), 18),
                pad_left(&format_duration(track.duration_secs), 7),
                cell(&track.album_name, 20),
                pad_right(track.rating.label(), 8),
                nullable(track.release_date.as_deref())
            );
            if options.show_ids {
                line.push_str(&format!(" | ID: {}", track.id));
            }
            lines.push(line);
        }
        Ok(rendered(lines, tracks.len()))
    }

    fn by_genre(&self, genre: &str) -> CatalogResult<ReportOutcome> {
        let (description, tracks) = queries::tracks_by_genre(self.conn, genre)?;
        if tracks.is_empty() {
            return Ok(no_results(genre));
        }
        let mut lines = vec![
            format!(
                "From Genre: {} - {}",
                genre,
                nullable(description.as_deref())
            ),
            format!(
                "{} | {} | {} | {} | Release Date",
                pad_right("Audio File Name", 23),
                pad_right("Creator", 20),
                pad_left("Drtn.", 7),
                pad_right("Album Name", 20)
            ),
            RULE.to_string(),
        ];
        for track in &tracks {
            lines.push(format!(
                "{} | {} | {} | {} | {}",
                cell(&track.title, 23),
                cell(nullable(track.creators.as_deref()), 20),
                pad_left(&format_duration(track.duration_secs), 7),
                cell(&track.album_name, 20),
                nullable(track.release_date.as_deref())
            ));
        }
        Ok(rendered(lines, tracks.len()))
    }

    fn by_country(&self, country: &str) -> CatalogResult<ReportOutcome> {
        let tracks = queries::tracks_by_country(self.conn, country)?;
        if tracks.is_empty() {
            return Ok(no_results(country));
        }
        let mut lines = vec![format!(
            "Year | {} | {} | {} | Album",
            pad_right("Track Name", 20),
            pad_left("Drtn.", 7),
            pad_right("Creator", 20)
        )];
        for track in &tracks {
            lines.push(format!(
                "{} | {} | {} | {} | {}",
                pad_right(&year_of(track.release_date.as_deref()), 4),
                cell(&track.title, 20),
                pad_left(&format_duration(track.duration_secs), 7),
                cell(nullable(track.creators.as_deref()), 20),
                abbreviate(&track.album_name, 20)
            ));
        }
        Ok(rendered(lines, tracks.len()))
    }

    fn credit_table(parameter: &str, credits: &[CreditRow]) -> ReportOutcome {
        if credits.is_empty() {
            return no_results(parameter);
        }
        let mut lines = vec![format!(
            "{} | {} | {} | {} | ArtistID",
            pad_left("TrackID", 10),
            pad_right("Track Name", 40),
            pad_left("Drtn.", 7),
            pad_right("Artist", 19)
        )];
        for credit in credits {
            lines.push(format!(
                "{} | {} | {} | {} | {}",
                pad_left(&credit.track_id.to_string(), 10),
                cell(&credit.title, 40),
                pad_left(&format_duration(credit.duration_secs), 7),
                cell(&credit.creator, 19),
                credit.creator_id
            ));
        }
        rendered(lines, credits.len())
    }

    // =========================================================================
    // Listings and aggregates
    // =========================================================================

    pub fn random_tracks(&self, limit: usize) -> CatalogResult<ReportOutcome> {
        if limit == 0 {
            return Err(CatalogError::InvalidInput(
                "number of random tracks must be positive".to_string(),
            ));
        }
        let credits = queries::random_credits(self.conn, limit)?;
        if credits.is_empty() {
            return Ok(ReportOutcome::NotFound("No tracks in the catalog".to_string()));
        }
        Ok(Self::credit_table("random tracks", &credits))
    }

    pub fn country_codes(&self) -> CatalogResult<ReportOutcome> {
        let countries = queries::country_codes(self.conn)?;
        if countries.is_empty() {
            return Ok(ReportOutcome::NotFound(
                "No countries found in database".to_string(),
            ));
        }
        let mut lines = vec!["ID# | Country".to_string()];
        lines.extend(
            countries
                .iter()
                .map(|(id, name)| format!("{} | {}", pad_left(&id.to_string(), 3), name)),
        );
        Ok(rendered(lines, countries.len()))
    }

    pub fn average_track_duration(&self, album_name: &str) -> CatalogResult<ReportOutcome> {
        let album_name = album_name.trim();
        let Some((count, average)) = queries::album_track_stats(self.conn, album_name)? else {
            return Ok(no_results(album_name));
        };
        let text = match average {
            Some(avg) if count > 0 => format!(
                "The average track duration for album '{}' is: {}",
                album_name,
                format_duration(avg.round() as i64)
            ),
            _ => format!("Album '{}' has no tracks", album_name),
        };
        Ok(rendered(vec![text], count))
    }

    pub fn track_count(&self, album_name: &str) -> CatalogResult<ReportOutcome> {
        let album_name = album_name.trim();
        let Some((count, _)) = queries::album_track_stats(self.conn, album_name)? else {
            return Ok(no_results(album_name));
        };
        Ok(rendered(
            vec![format!(
                "Total track count for '{}' is: {}",
                album_name, count
            )],
            count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn catalog() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::catalog_store::CATALOG_SCHEMA.create(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO country (CountryID, Name) VALUES (1, 'Norway');
             INSERT INTO recordlabel (LabelID, Name) VALUES (10, 'Umbra Records');
             INSERT INTO album VALUES (100, 'Nightfall', 'Music', '2023-01-01', 10);
             INSERT INTO album VALUES (101, 'Dawn', 'Music', '2021-06-01', NULL);
             INSERT INTO album VALUES (102, 'Empty', 'Podcast', NULL, NULL);
             INSERT INTO creator VALUES (1, 'J. Doe');
             INSERT INTO creator VALUES (2, 'A. Smith');
             INSERT INTO audiofile VALUES (1000, 'Intro', 0, 75, 1, 100);
             INSERT INTO audiofile VALUES (1001, 'Storm', 1, 200, NULL, 100);
             INSERT INTO audiofile VALUES (1002, 'Outro', 0, 3661, 1, 100);
             INSERT INTO audiofile VALUES (1003, 'Sunrise', 0, 60, NULL, 101);
             INSERT INTO createdby VALUES (1000, 1);
             INSERT INTO createdby VALUES (1001, 1);
             INSERT INTO createdby VALUES (1001, 2);
             INSERT INTO createdby VALUES (1003, 2);
             INSERT INTO genre VALUES ('Ambient', 'quiet music');
             INSERT INTO ingenre VALUES (1000, 'Ambient');",
        )
        .unwrap();
        conn
    }

    fn rendered_text(outcome: ReportOutcome) -> RenderedReport {
        match outcome {
            ReportOutcome::Rendered(report) => report,
            ReportOutcome::NotFound(line) => panic!("unexpected not found: {}", line),
        }
    }

    fn glyph_lines(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.contains("┌─") || l.contains("├─") || l.contains("└─"))
            .collect()
    }

    #[test]
    fn album_tree_uses_three_glyphs() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(
                    ReportKind::ByAlbumTitle,
                    "Nightfall",
                    ReportOptions {
                        show_tracks: true,
                        ..Default::default()
                    },
                )
                .unwrap(),
        );
        let glyphs = glyph_lines(&report.text);
        assert_eq!(glyphs.len(), 3);
        assert!(glyphs[0].contains("┌─"));
        assert!(glyphs[1].contains("├─"));
        assert!(glyphs[2].contains("└─"));

        // 75 + 200 + 3661 seconds
        assert!(report.text.contains("1:05:36"));
        assert!(report.text.contains("Umbra Records"));
        // Both creators of the middle track share one line
        assert!(glyphs[1].contains("A. Smith, J. Doe") || glyphs[1].contains("J. Doe, A. Smith"));
        assert!(glyphs[1].contains("Explicit"));
        assert_eq!(report.album_ids, vec![100]);
    }

    #[test]
    fn album_without_tracks_says_so() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(ReportKind::ByMediaType, "Podcast", ReportOptions::default())
                .unwrap(),
        );
        assert!(report.text.contains("No tracks found for album ID: 102"));
        assert!(glyph_lines(&report.text).is_empty());
        // Null date, label and duration all render as the placeholder
        let header = report.text.lines().next().unwrap();
        let cells: Vec<&str> = header.split('|').map(str::trim).collect();
        assert_eq!(cells[1], "-");
        assert_eq!(cells[3], "-");
        assert_eq!(cells[4], "-");
    }

    #[test]
    fn album_selection_lists_numbered_ids() {
        let conn = catalog();
        conn.execute(
            "INSERT INTO album VALUES (103, 'Nightfall', 'Music', '1999-01-01', NULL)",
            params![],
        )
        .unwrap();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(ReportKind::ByAlbumTitle, "Nightfall", ReportOptions::default())
                .unwrap(),
        );
        // Ordered by release date ascending
        assert_eq!(report.album_ids, vec![103, 100]);
        assert!(report.text.lines().next().unwrap().starts_with("  1:"));
        assert!(glyph_lines(&report.text).is_empty());
    }

    #[test]
    fn media_type_report_is_ordered_by_release_date() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(ReportKind::ByMediaType, "Music", ReportOptions::default())
                .unwrap(),
        );
        assert_eq!(report.album_ids, vec![101, 100]);
        let single = glyph_lines(&report.text);
        // Dawn has a single track, closed with the bottom corner
        assert!(single[0].contains("└─") && single[0].contains("Sunrise"));
    }

    #[test]
    fn creator_report_with_ids() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(
                    ReportKind::ByCreator,
                    "A. Smith",
                    ReportOptions {
                        show_ids: true,
                        ..Default::default()
                    },
                )
                .unwrap(),
        );
        assert_eq!(report.rows, 2);
        assert!(report.text.starts_with("From Creator: A. Smith (cid 2)"));
        let rows: Vec<&str> = report.text.lines().skip(3).collect();
        // Dawn (2021) before Nightfall (2023)
        assert!(rows[0].starts_with("2021") && rows[0].contains("Sunrise"));
        assert!(rows[1].starts_with("2023") && rows[1].ends_with("ID: 2"));
    }

    #[test]
    fn rating_report_orders_by_creator_name() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(ReportKind::ByRating, "clean", ReportOptions::default())
                .unwrap(),
        );
        let rows: Vec<&str> = report.text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("A. Smith"));
        assert!(rows[1].contains("J. Doe"));
        assert!(matches!(
            engine.run_report(ReportKind::ByRating, "maybe", ReportOptions::default()),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn genre_and_country_reports() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);

        let genre = rendered_text(
            engine
                .run_report(ReportKind::ByGenre, "Ambient", ReportOptions::default())
                .unwrap(),
        );
        assert!(genre.text.starts_with("From Genre: Ambient - quiet music"));
        assert_eq!(genre.rows, 1);

        let country = rendered_text(
            engine
                .run_report(ReportKind::ByCountry, "Norway", ReportOptions::default())
                .unwrap(),
        );
        assert_eq!(country.rows, 2);
        // Outro has no creator
        assert!(country.text.lines().any(|l| l.contains("Outro") && l.contains("| -")));
    }

    #[test]
    fn label_report_lists_label_albums() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let report = rendered_text(
            engine
                .run_report(ReportKind::ByLabel, "Umbra Records", ReportOptions::default())
                .unwrap(),
        );
        assert_eq!(report.album_ids, vec![100]);
    }

    #[test]
    fn no_rows_is_not_found() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let outcome = engine
            .run_report(ReportKind::ByTrackTitle, "Missing", ReportOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            ReportOutcome::NotFound("No results found for Missing".to_string())
        );
        assert_eq!(outcome.rows(), 0);
    }

    #[test]
    fn aggregates() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);

        let count = engine.track_count("Nightfall").unwrap();
        assert_eq!(count.rows(), 3);
        assert!(count.text().ends_with("is: 3"));

        // (75 + 200 + 3661) / 3 = 1312
        let avg = engine.average_track_duration("Nightfall").unwrap();
        assert!(avg.text().ends_with("is: 21:52"));

        let empty = engine.average_track_duration("Empty").unwrap();
        assert_eq!(empty.text(), "Album 'Empty' has no tracks");
        assert!(matches!(
            engine.track_count("Nope").unwrap(),
            ReportOutcome::NotFound(_)
        ));
    }

    #[test]
    fn country_codes_and_random_tracks() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let codes = engine.country_codes().unwrap();
        assert_eq!(codes.text(), "ID# | Country\n  1 | Norway");

        let random = engine.random_tracks(2).unwrap();
        assert_eq!(random.rows(), 2);
        assert!(engine.random_tracks(0).is_err());
    }

    #[test]
    fn oversized_random_limit_returns_every_credit() {
        let conn = catalog();
        let engine = ReportEngine::new(&conn);
        let all = queries::random_credits(&conn, 10_000).unwrap().len();
        assert!(all > 2);
        assert_eq!(engine.random_tracks(usize::MAX).unwrap().rows(), all);
    }
}
