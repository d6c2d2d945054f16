use crate::ids::IdStrategy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional TOML configuration. Every key present here wins over the
/// matching command line argument.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    /// "random" or "sequence"
    pub id_strategy: Option<IdStrategy>,
    pub fallback_track_duration_secs: Option<i64>,
    pub show_ids: Option<bool>,
    /// Default tracing directive, e.g. "debug" or "zene_catalog=trace".
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zene.toml");
        std::fs::write(&path, "id_strategy = \"sequence\"\nshow_ids = true\n").unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.id_strategy, Some(IdStrategy::Sequence));
        assert_eq!(config.show_ids, Some(true));
        assert!(config.db_path.is_none());
        assert!(config.fallback_track_duration_secs.is_none());
    }

    #[test]
    fn rejects_wrong_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zene.toml");
        std::fs::write(&path, "fallback_track_duration_secs = \"long\"\n").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn rejects_unknown_id_strategy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zene.toml");
        std::fs::write(&path, "id_strategy = \"uuid\"\n").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown variant"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(FileConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
