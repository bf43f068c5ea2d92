//! Configuration for the vocabulary trainer.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding decks, cards and review data.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub study: StudyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Shuffle the due queue once at session start.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// After a session, list cards scheduled for later days.
    #[serde(default)]
    pub show_upcoming: bool,
}

fn default_database_path() -> PathBuf {
    Config::data_dir()
        .map(|dir| dir.join("vocab.sqlite3"))
        .unwrap_or_else(|| PathBuf::from("vocab.sqlite3"))
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            study: StudyConfig::default(),
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            show_upcoming: false,
        }
    }
}

impl Config {
    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads from `path` if given, else from the default location, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vocab-mastery")
            .map(|d| d.config_dir().join("config.toml"))
    }

    fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vocab-mastery").map(|d| d.data_dir().to_path_buf())
    }
}
