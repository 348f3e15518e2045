//! INI-backed storage for the interval durations.

use crate::models::{DurationError, Durations};
use directories::ProjectDirs;
use ini::Ini;
use log::{error, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SECTION: &str = "main";
const KEY_STUDY: &str = "study time";
const KEY_SHORT_BREAK: &str = "short break";
const KEY_LONG_BREAK: &str = "long break";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),
    #[error("Failed to write config file: {0}")]
    Write(#[from] std::io::Error),
    #[error("Missing section [main]")]
    MissingSection,
    #[error("Missing key '{0}' in section [main]")]
    MissingKey(&'static str),
    #[error("Invalid value for '{key}': {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Durations(#[from] DurationError),
}

/// Returns the directory Tomatick keeps its files in.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "tomatick", "Tomatick")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens `config.ini` in the platform data directory.
    pub fn open_default() -> Self {
        Self::new(data_dir().join("config.ini"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the durations. Never fails: if the file is missing or any value
    /// is unusable, a fresh file with the defaults is written and returned.
    pub fn load(&self) -> Durations {
        match self.try_load() {
            Ok(durations) => durations,
            Err(e) => {
                warn!(
                    "Using default durations, could not load {}: {}",
                    self.path.display(),
                    e
                );
                let defaults = Durations::default();
                if let Err(e) = self.save(&defaults) {
                    error!("Failed to write default config: {}", e);
                }
                defaults
            }
        }
    }

    fn try_load(&self) -> Result<Durations, ConfigError> {
        let ini = Ini::load_from_file(&self.path)?;
        let section = ini
            .section(Some(SECTION))
            .ok_or(ConfigError::MissingSection)?;

        let read = |key: &'static str| -> Result<u32, ConfigError> {
            let raw = section.get(key).ok_or(ConfigError::MissingKey(key))?;
            raw.trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue {
                    key,
                    value: raw.to_string(),
                })
        };

        Ok(Durations::new(
            read(KEY_STUDY)?,
            read(KEY_SHORT_BREAK)?,
            read(KEY_LONG_BREAK)?,
        )?)
    }

    /// Writes the durations to section [main], keeping anything else in the file.
    pub fn save(&self, durations: &Durations) -> Result<(), ConfigError> {
        let mut ini = Ini::load_from_file(&self.path).unwrap_or_default();
        ini.with_section(Some(SECTION))
            .set(KEY_STUDY, durations.study().to_string())
            .set(KEY_SHORT_BREAK, durations.short_break().to_string())
            .set(KEY_LONG_BREAK, durations.long_break().to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        ini.write_to_file(&self.path)?;
        Ok(())
    }
}
