use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{get_styles, CommandGroup, CommandHelp};
use zene_catalog::catalog::{Catalog, OpOutcome};
use zene_catalog::catalog_store::{ExplicitRating, NewTrack};
use zene_catalog::config::{AppConfig, CliConfig, FileConfig, DEFAULT_FALLBACK_TRACK_DURATION_SECS};
use zene_catalog::ids::IdStrategy;
use zene_catalog::report::parse_rating;
use zene_catalog::workflow::CreatorConfirmation;

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_rating_arg(s: &str) -> Result<ExplicitRating, String> {
    parse_rating(s).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version, about = "Interactive music catalog console")]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Optional TOML config file, its values override the arguments below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// How new row ids are picked: "random" or "sequence".
    #[clap(long, default_value_t = IdStrategy::Random)]
    pub id_strategy: IdStrategy,

    /// Duration stored for tracks inserted without one.
    #[clap(long, default_value_t = DEFAULT_FALLBACK_TRACK_DURATION_SECS)]
    pub fallback_track_duration_secs: i64,

    /// Append creator and track ids to report rows.
    #[clap(long)]
    pub show_ids: bool,
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            id_strategy: self.id_strategy,
            fallback_track_duration_secs: self.fallback_track_duration_secs,
            show_ids: self.show_ids,
        }
    }
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

/// Picks an album by id, or by its number in the last `album` listing.
#[derive(Args, Debug)]
struct AlbumRef {
    #[arg(long, conflicts_with = "pick")]
    album_id: Option<i64>,

    /// 1-based entry of the last `album` listing.
    #[arg(long)]
    pick: Option<usize>,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Tracks credited to a creator.
    ByCreator { creator: String },

    /// Tracks with the given title.
    ByTitle { title: String },

    /// Albums with the given title. Without --tracks the albums are numbered
    /// and can be picked by later commands with --pick.
    Album {
        title: String,
        #[arg(long)]
        tracks: bool,
    },

    /// Tracks tagged with a genre.
    ByGenre { genre: String },

    /// Albums of a media type, with their tracks.
    ByMediaType { media_type: String },

    /// Tracks by explicit rating (clean/explicit or 0/1).
    ByRating { rating: String },

    /// Tracks recorded in a country.
    ByCountry { country: String },

    /// Albums released by a record label, with their tracks.
    ByLabel { label: String },

    /// Lists country ids and names.
    Countries,

    /// Average track duration of an album.
    AvgDuration { album: String },

    /// Number of tracks in an album.
    TrackCount { album: String },

    /// Random track/creator rows.
    Random {
        #[arg(default_value_t = 5)]
        count: usize,
    },

    /// Adds an album, creating its record label when missing.
    AddAlbum {
        name: String,
        /// Release date as yyyymmdd.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "Music")]
        media_type: String,
    },

    /// Adds an album and its tracks. Each --track is "title|seconds|creator",
    /// seconds and creator being optional.
    AddAlbumTracks {
        name: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "Music")]
        media_type: String,
        #[arg(long = "track", required = true)]
        tracks: Vec<String>,
    },

    /// Adds a record label, or returns the id of the existing one.
    AddLabel {
        name: String,
        /// Founding date as yyyymmdd.
        #[arg(long)]
        founded: Option<String>,
        #[arg(long)]
        country_id: Option<i64>,
    },

    /// Adds a track to an album.
    AddTrack {
        title: String,
        #[command(flatten)]
        album: AlbumRef,
        #[arg(long)]
        duration: Option<i64>,
        #[arg(long, value_parser = parse_rating_arg)]
        rating: Option<ExplicitRating>,
        #[arg(long)]
        country_id: Option<i64>,
        /// Asked for confirmation when the creator does not exist yet.
        #[arg(long)]
        creator: Option<String>,
    },

    /// Tags a track with a genre.
    TagGenre { track_id: i64, genre: String },

    AddCreator { name: String },

    AddGenre {
        name: String,
        description: Option<String>,
    },

    AddCountry { name: String },

    /// Replaces a genre description; omit it to clear.
    SetGenreDescription {
        genre: String,
        description: Option<String>,
    },

    SetLabelCountry {
        label: String,
        country_id: Option<i64>,
    },

    /// Founding date as yyyymmdd; omit it to clear.
    SetLabelDate { label: String, date: Option<String> },

    /// Release date as yyyymmdd; omit it to clear.
    SetAlbumDate {
        #[command(flatten)]
        album: AlbumRef,
        #[arg(long)]
        date: Option<String>,
    },

    /// Points an album at an existing label; omit the label to clear.
    SetAlbumLabel { album: String, label: Option<String> },

    /// Sets the country of every track with this title.
    SetTrackCountry {
        title: String,
        country: Option<String>,
    },

    DeleteCreator { creator_id: i64 },

    /// Deletes an album with its tracks.
    DeleteAlbum {
        #[command(flatten)]
        album: AlbumRef,
    },

    DeleteTrack { track_id: i64 },

    DeleteGenre { genre: String },

    /// Deletes a label, its albums stay without one.
    DeleteLabel { label: String },

    /// Toggles ids in creator and title reports.
    ToggleIds,

    /// Row counts per table.
    Stats,

    /// Shows the path of the current catalog db.
    Where,

    /// Shows the grouped command list.
    Help,

    /// Close this program.
    Exit,
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp { name: "by-creator", args: "<creator>", description: "Tracks credited to a creator", group: CommandGroup::Reports },
    CommandHelp { name: "by-title", args: "<title>", description: "Tracks with a title", group: CommandGroup::Reports },
    CommandHelp { name: "album", args: "<title> [--tracks]", description: "Albums with a title", group: CommandGroup::Reports },
    CommandHelp { name: "by-genre", args: "<genre>", description: "Tracks tagged with a genre", group: CommandGroup::Reports },
    CommandHelp { name: "by-media-type", args: "<type>", description: "Albums of a media type", group: CommandGroup::Reports },
    CommandHelp { name: "by-rating", args: "<clean|explicit>", description: "Tracks by explicit rating", group: CommandGroup::Reports },
    CommandHelp { name: "by-country", args: "<country>", description: "Tracks recorded in a country", group: CommandGroup::Reports },
    CommandHelp { name: "by-label", args: "<label>", description: "Albums of a record label", group: CommandGroup::Reports },
    CommandHelp { name: "countries", args: "", description: "Country ids", group: CommandGroup::Reports },
    CommandHelp { name: "avg-duration", args: "<album>", description: "Average track duration", group: CommandGroup::Reports },
    CommandHelp { name: "track-count", args: "<album>", description: "Tracks in an album", group: CommandGroup::Reports },
    CommandHelp { name: "random", args: "[count]", description: "Random tracks", group: CommandGroup::Reports },
    CommandHelp { name: "add-album", args: "<name> [--date --label --media-type]", description: "New album", group: CommandGroup::Inserts },
    CommandHelp { name: "add-album-tracks", args: "<name> --track <t|s|c>...", description: "New album with tracks", group: CommandGroup::Inserts },
    CommandHelp { name: "add-label", args: "<name> [--founded --country-id]", description: "New record label", group: CommandGroup::Inserts },
    CommandHelp { name: "add-track", args: "<title> --album-id|--pick [...]", description: "New track", group: CommandGroup::Inserts },
    CommandHelp { name: "tag-genre", args: "<track-id> <genre>", description: "Tag a track", group: CommandGroup::Inserts },
    CommandHelp { name: "add-creator", args: "<name>", description: "New creator", group: CommandGroup::Inserts },
    CommandHelp { name: "add-genre", args: "<name> [description]", description: "New genre", group: CommandGroup::Inserts },
    CommandHelp { name: "add-country", args: "<name>", description: "New country", group: CommandGroup::Inserts },
    CommandHelp { name: "set-genre-description", args: "<genre> [description]", description: "Genre description", group: CommandGroup::Updates },
    CommandHelp { name: "set-label-country", args: "<label> [country-id]", description: "Label country", group: CommandGroup::Updates },
    CommandHelp { name: "set-label-date", args: "<label> [yyyymmdd]", description: "Label founding date", group: CommandGroup::Updates },
    CommandHelp { name: "set-album-date", args: "--album-id|--pick [--date]", description: "Album release date", group: CommandGroup::Updates },
    CommandHelp { name: "set-album-label", args: "<album> [label]", description: "Album label", group: CommandGroup::Updates },
    CommandHelp { name: "set-track-country", args: "<title> [country]", description: "Track country", group: CommandGroup::Updates },
    CommandHelp { name: "delete-creator", args: "<id>", description: "Remove a creator", group: CommandGroup::Deletes },
    CommandHelp { name: "delete-album", args: "--album-id|--pick", description: "Remove an album and its tracks", group: CommandGroup::Deletes },
    CommandHelp { name: "delete-track", args: "<id>", description: "Remove a track", group: CommandGroup::Deletes },
    CommandHelp { name: "delete-genre", args: "<genre>", description: "Remove a genre", group: CommandGroup::Deletes },
    CommandHelp { name: "delete-label", args: "<label>", description: "Remove a record label", group: CommandGroup::Deletes },
    CommandHelp { name: "toggle-ids", args: "", description: "Show or hide ids in reports", group: CommandGroup::System },
    CommandHelp { name: "stats", args: "", description: "Row counts", group: CommandGroup::System },
    CommandHelp { name: "where", args: "", description: "Catalog db path", group: CommandGroup::System },
    CommandHelp { name: "help", args: "", description: "This list", group: CommandGroup::System },
    CommandHelp { name: "exit", args: "", description: "Quit", group: CommandGroup::System },
];

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

struct Session {
    catalog: Catalog,
    db_path: String,
    /// Album ids of the last `album` listing, in display order.
    selection: Vec<i64>,
}

impl Session {
    fn resolve_album(&self, album: &AlbumRef) -> Result<i64, String> {
        match (album.album_id, album.pick) {
            (Some(id), _) => Ok(id),
            (None, Some(pick)) => pick
                .checked_sub(1)
                .and_then(|i| self.selection.get(i))
                .copied()
                .ok_or_else(|| {
                    format!(
                        "No album number {} in the last listing ({} entries)",
                        pick,
                        self.selection.len()
                    )
                }),
            (None, None) if self.selection.len() == 1 => Ok(self.selection[0]),
            (None, None) => {
                cli_style::print_empty_selection();
                Err("Specify --album-id or --pick".to_string())
            }
        }
    }
}

/// Asks on the same editor the commands are read from.
struct EditorConfirmation<'a> {
    rl: &'a mut Editor<MyHelper, FileHistory>,
}

impl CreatorConfirmation for EditorConfirmation<'_> {
    fn confirm_create(&mut self, creator_name: &str) -> bool {
        let question = format!(
            "Creator '{}' does not exist yet. Add it to the catalog?",
            creator_name
        );
        cli_style::flush();
        match self.rl.readline(&cli_style::confirm_prompt(&question)) {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// `title|seconds|creator`, the last two parts optional.
fn parse_track_spec(spec: &str, album_id: i64) -> Result<NewTrack, String> {
    let mut parts = spec.split('|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    if title.is_empty() {
        return Err(format!("Track '{}' has no title", spec));
    }
    let duration_secs = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => Some(
            s.parse::<i64>()
                .map_err(|_| format!("Invalid duration '{}' for track '{}'", s, title))?,
        ),
        None => None,
    };
    let creator = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    Ok(NewTrack {
        title: title.to_string(),
        duration_secs,
        album_id,
        creator,
        ..Default::default()
    })
}

fn show(outcome: OpOutcome) -> CommandExecutionResult {
    cli_style::print_outcome(&outcome);
    CommandExecutionResult::Ok
}

fn execute_command(
    line: String,
    session: &mut Session,
    rl: &mut Editor<MyHelper, FileHistory>,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let cli = match cli {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            return CommandExecutionResult::Ok;
        }
    };

    cli_style::print_command_echo(&line);
    let catalog = &session.catalog;
    match cli.command {
        InnerCommand::ByCreator { creator } => show(catalog.query_by_creator(&creator)),
        InnerCommand::ByTitle { title } => show(catalog.query_by_audio_title(&title)),
        InnerCommand::Album { title, tracks } => {
            let outcome = catalog.query_by_album_title(&title, tracks);
            if !tracks && !outcome.selection.is_empty() {
                session.selection = outcome.selection.clone();
            }
            show(outcome)
        }
        InnerCommand::ByGenre { genre } => show(catalog.query_by_genre(&genre)),
        InnerCommand::ByMediaType { media_type } => show(catalog.query_by_media_type(&media_type)),
        InnerCommand::ByRating { rating } => show(catalog.get_tracks_by_rating(&rating)),
        InnerCommand::ByCountry { country } => show(catalog.get_tracks_by_country(&country)),
        InnerCommand::ByLabel { label } => show(catalog.get_tracks_by_label(&label)),
        InnerCommand::Countries => show(catalog.print_country_codes()),
        InnerCommand::AvgDuration { album } => show(catalog.get_avg_track_duration_album(&album)),
        InnerCommand::TrackCount { album } => show(catalog.num_tracks_in_album(&album)),
        InnerCommand::Random { count } => show(catalog.get_random_tracks(count)),

        InnerCommand::AddAlbum {
            name,
            date,
            label,
            media_type,
        } => show(catalog.insert_album(&name, date.as_deref(), label.as_deref(), &media_type)),
        InnerCommand::AddAlbumTracks {
            name,
            date,
            label,
            media_type,
            tracks,
        } => {
            // album_id is filled in by the workflow once the album exists
            let parsed = match tracks
                .iter()
                .map(|spec| parse_track_spec(spec, 0))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(parsed) => parsed,
                Err(err) => return CommandExecutionResult::Error(err),
            };
            let mut confirm = EditorConfirmation { rl };
            show(catalog.insert_album_with_tracks(
                &name,
                date.as_deref(),
                label.as_deref(),
                &media_type,
                &parsed,
                &mut confirm,
            ))
        }
        InnerCommand::AddLabel {
            name,
            founded,
            country_id,
        } => show(catalog.insert_record_label(&name, founded.as_deref(), country_id)),
        InnerCommand::AddTrack {
            title,
            album,
            duration,
            rating,
            country_id,
            creator,
        } => {
            let album_id = match session.resolve_album(&album) {
                Ok(id) => id,
                Err(err) => return CommandExecutionResult::Error(err),
            };
            let track = NewTrack {
                title,
                rating,
                duration_secs: duration,
                country_id,
                album_id,
                creator,
            };
            let mut confirm = EditorConfirmation { rl };
            show(session.catalog.insert_audiofile(&track, &mut confirm))
        }
        InnerCommand::TagGenre { track_id, genre } => {
            show(catalog.add_genre_to_track(track_id, &genre))
        }
        InnerCommand::AddCreator { name } => show(catalog.insert_creator(&name)),
        InnerCommand::AddGenre { name, description } => {
            show(catalog.insert_genre(&name, description.as_deref()))
        }
        InnerCommand::AddCountry { name } => show(catalog.insert_country(&name)),

        InnerCommand::SetGenreDescription { genre, description } => {
            show(catalog.update_genre(&genre, description.as_deref()))
        }
        InnerCommand::SetLabelCountry { label, country_id } => {
            show(catalog.update_label_country(&label, country_id))
        }
        InnerCommand::SetLabelDate { label, date } => {
            show(catalog.update_label_date(&label, date.as_deref()))
        }
        InnerCommand::SetAlbumDate { album, date } => match session.resolve_album(&album) {
            Ok(album_id) => show(
                session
                    .catalog
                    .update_album_release_date(album_id, date.as_deref()),
            ),
            Err(err) => CommandExecutionResult::Error(err),
        },
        InnerCommand::SetAlbumLabel { album, label } => {
            show(catalog.update_album_label(&album, label.as_deref()))
        }
        InnerCommand::SetTrackCountry { title, country } => {
            show(catalog.update_track_country(&title, country.as_deref()))
        }

        InnerCommand::DeleteCreator { creator_id } => show(catalog.delete_creator(creator_id)),
        InnerCommand::DeleteAlbum { album } => match session.resolve_album(&album) {
            Ok(album_id) => {
                let outcome = session.catalog.delete_album(album_id);
                if outcome.status > 0 {
                    session.selection.retain(|id| *id != album_id);
                }
                show(outcome)
            }
            Err(err) => CommandExecutionResult::Error(err),
        },
        InnerCommand::DeleteTrack { track_id } => show(catalog.delete_track(track_id)),
        InnerCommand::DeleteGenre { genre } => show(catalog.delete_genre(&genre)),
        InnerCommand::DeleteLabel { label } => show(catalog.delete_label(&label)),

        InnerCommand::ToggleIds => {
            let show_ids = !session.catalog.settings().show_ids;
            session.catalog.set_show_ids(show_ids);
            cli_style::print_info(if show_ids {
                "Reports now show ids"
            } else {
                "Reports no longer show ids"
            });
            CommandExecutionResult::Ok
        }
        InnerCommand::Stats => match session.catalog.store().counts() {
            Ok(counts) => {
                cli_style::print_section_header("Catalog");
                cli_style::print_key_value("Albums", &counts.albums.to_string());
                cli_style::print_key_value("Tracks", &counts.tracks.to_string());
                cli_style::print_key_value("Creators", &counts.creators.to_string());
                cli_style::print_key_value("Genres", &counts.genres.to_string());
                cli_style::print_key_value("Countries", &counts.countries.to_string());
                cli_style::print_key_value("Labels", &counts.labels.to_string());
                cli_style::print_section_footer();
                CommandExecutionResult::Ok
            }
            Err(err) => CommandExecutionResult::Error(err.to_string()),
        },
        InnerCommand::Where => {
            cli_style::print_key_value("Database", &session.db_path);
            CommandExecutionResult::Ok
        }
        InnerCommand::Help => {
            cli_style::print_help(COMMANDS);
            CommandExecutionResult::Ok
        }
        InnerCommand::Exit => CommandExecutionResult::Exit,
    }
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn init_logging(log_level: Option<&str>) -> Result<()> {
    let default_directive: Directive = match log_level {
        Some(level) => level
            .parse()
            .with_context(|| format!("Invalid log_level '{}'", level))?,
        None => LevelFilter::INFO.into(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_directive)
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install the log subscriber: {}", e))
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;
    init_logging(config.log_level.as_deref())?;

    info!("Opening SQLite catalog database at {:?}...", config.db_path);
    let catalog = Catalog::open(
        &config.db_path,
        config.id_strategy,
        config.catalog_settings(),
    )
    .with_context(|| format!("Could not open catalog at {:?}", config.db_path))?;

    let mut session = Session {
        catalog,
        db_path: config.db_path.display().to_string(),
        selection: Vec::new(),
    };

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));

    cli_style::print_welcome(&session.db_path, &config.id_strategy.to_string());

    let prompt = cli_style::get_prompt();
    loop {
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut session, &mut rl) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                cli_style::print_warning("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                cli_style::print_warning("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    cli_style::print_goodbye();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subcommand_has_help_entry() {
        let names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();
        for name in &names {
            assert!(
                COMMANDS.iter().any(|c| c.name == name),
                "missing help for {}",
                name
            );
        }
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn parses_full_track_spec() {
        let track = parse_track_spec("Intro | 75 | J. Doe", 7).unwrap();
        assert_eq!(track.title, "Intro");
        assert_eq!(track.duration_secs, Some(75));
        assert_eq!(track.creator.as_deref(), Some("J. Doe"));
        assert_eq!(track.album_id, 7);
    }

    #[test]
    fn parses_title_only_track_spec() {
        let track = parse_track_spec("Outro", 1).unwrap();
        assert_eq!(track.title, "Outro");
        assert_eq!(track.duration_secs, None);
        assert_eq!(track.creator, None);
    }

    #[test]
    fn rejects_bad_track_spec() {
        assert!(parse_track_spec("|75", 1).is_err());
        assert!(parse_track_spec("Intro|long", 1).is_err());
    }

    #[test]
    fn add_track_accepts_pick_and_rating() {
        let cli = InnerCli::try_parse_from([
            " ", "add-track", "Intro", "--pick", "2", "--rating", "explicit", "--creator", "J. Doe",
        ])
        .unwrap();
        match cli.command {
            InnerCommand::AddTrack {
                album, rating, creator, ..
            } => {
                assert_eq!(album.pick, Some(2));
                assert_eq!(album.album_id, None);
                assert_eq!(rating, Some(ExplicitRating::Explicit));
                assert_eq!(creator.as_deref(), Some("J. Doe"));
            }
            _ => panic!("expected add-track"),
        }
    }
}
