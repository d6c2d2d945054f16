mod file_config;

pub use file_config::FileConfig;

use crate::catalog::CatalogSettings;
use crate::ids::IdStrategy;
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const DEFAULT_FALLBACK_TRACK_DURATION_SECS: i64 = 999;

/// Settings taken from the command line, before the config file is applied.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub id_strategy: IdStrategy,
    pub fallback_track_duration_secs: i64,
    pub show_ids: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: None,
            id_strategy: IdStrategy::default(),
            fallback_track_duration_secs: DEFAULT_FALLBACK_TRACK_DURATION_SECS,
            show_ids: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub id_strategy: IdStrategy,
    pub fallback_track_duration_secs: i64,
    pub show_ids: bool,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow!("db_path must be specified as an argument or in the config file")
            })?;

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory, expected a database file: {:?}", db_path);
        }

        let id_strategy = file.id_strategy.unwrap_or(cli.id_strategy);

        let fallback_track_duration_secs = file
            .fallback_track_duration_secs
            .unwrap_or(cli.fallback_track_duration_secs);
        if fallback_track_duration_secs < 0 {
            bail!(
                "fallback_track_duration_secs must not be negative, got {}",
                fallback_track_duration_secs
            );
        }

        Ok(AppConfig {
            db_path,
            id_strategy,
            fallback_track_duration_secs,
            show_ids: file.show_ids.unwrap_or(cli.show_ids),
            log_level: file.log_level,
        })
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            fallback_track_duration_secs: self.fallback_track_duration_secs,
            show_ids: self.show_ids,
        }
    }
}
