//! The settings form: a draft of the three durations, saved on submit.

use crate::config::{ConfigError, ConfigStore};
use crate::models::{DurationError, Durations};
use log::info;
use thiserror::Error;

/// Longest value a duration field accepts.
const MAX_FIELD_LEN: usize = 10;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid field {0:?}: only digits are allowed")]
    NotDigits(String),
    #[error("Invalid field {0:?}: at most 10 digits are allowed")]
    TooLong(String),
    #[error("Field is empty")]
    Empty,
    #[error(transparent)]
    Durations(#[from] DurationError),
    #[error("Failed to save settings: {0}")]
    Config(#[from] ConfigError),
}

/// Parses a form field holding a number of minutes into seconds.
pub fn parse_minutes_field(text: &str) -> Result<u32, SettingsError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SettingsError::Empty);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(SettingsError::NotDigits(text.to_string()));
    }
    if text.len() > MAX_FIELD_LEN {
        return Err(SettingsError::TooLong(text.to_string()));
    }
    text.parse::<u32>()
        .ok()
        .and_then(|mins| mins.checked_mul(60))
        .ok_or_else(|| SettingsError::TooLong(text.to_string()))
}

/// Draft values behind the settings form.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsShell {
    study: u32,
    short_break: u32,
    long_break: u32,
}

impl SettingsShell {
    /// Opens the form with the values currently in the config file.
    pub fn open(config: &ConfigStore) -> Self {
        let current = config.load();
        Self {
            study: current.study(),
            short_break: current.short_break(),
            long_break: current.long_break(),
        }
    }

    pub fn study(&self) -> u32 {
        self.study
    }

    pub fn short_break(&self) -> u32 {
        self.short_break
    }

    pub fn long_break(&self) -> u32 {
        self.long_break
    }

    pub fn set_study(&mut self, secs: u32) {
        self.study = secs;
    }

    pub fn set_short_break(&mut self, secs: u32) {
        self.short_break = secs;
    }

    pub fn set_long_break(&mut self, secs: u32) {
        self.long_break = secs;
    }

    /// Validates the draft and writes it to the config file.
    pub fn submit(&self, config: &ConfigStore) -> Result<Durations, SettingsError> {
        let durations = Durations::new(self.study, self.short_break, self.long_break)?;
        config.save(&durations)?;
        info!("Settings saved to {}", config.path().display());
        Ok(durations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.ini"))
    }

    #[test]
    fn test_parse_minutes_field() {
        assert_eq!(parse_minutes_field("25").unwrap(), 1500);
        assert_eq!(parse_minutes_field(" 5 ").unwrap(), 300);
        assert!(matches!(parse_minutes_field(""), Err(SettingsError::Empty)));
        assert!(matches!(
            parse_minutes_field("2a"),
            Err(SettingsError::NotDigits(_))
        ));
        assert!(matches!(
            parse_minutes_field("-5"),
            Err(SettingsError::NotDigits(_))
        ));
        assert!(matches!(
            parse_minutes_field("12345678901"),
            Err(SettingsError::TooLong(_))
        ));
        // Fits in ten digits but not in seconds.
        assert!(matches!(
            parse_minutes_field("9999999999"),
            Err(SettingsError::TooLong(_))
        ));
    }

    #[test]
    fn test_open_loads_current_values() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        config.save(&Durations::new(1800, 240, 1200).unwrap()).unwrap();

        let form = SettingsShell::open(&config);
        assert_eq!(form.study(), 1800);
        assert_eq!(form.short_break(), 240);
        assert_eq!(form.long_break(), 1200);
    }

    #[test]
    fn test_open_on_fresh_install_shows_defaults() {
        let dir = TempDir::new().unwrap();
        let form = SettingsShell::open(&config_in(&dir));
        assert_eq!(form.study(), 1500);
        assert_eq!(form.short_break(), 300);
        assert_eq!(form.long_break(), 900);
    }

    #[test]
    fn test_submit_saves_draft() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let mut form = SettingsShell::open(&config);
        form.set_study(parse_minutes_field("50").unwrap());
        form.set_short_break(parse_minutes_field("10").unwrap());
        form.set_long_break(parse_minutes_field("30").unwrap());
        let durations = form.submit(&config).unwrap();

        assert_eq!(durations, Durations::new(3000, 600, 1800).unwrap());
        assert_eq!(config.load(), durations);
    }

    #[test]
    fn test_submit_rejects_zero() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        config.save(&Durations::new(60, 60, 60).unwrap()).unwrap();

        let mut form = SettingsShell::open(&config);
        form.set_study(0);
        assert!(matches!(
            form.submit(&config),
            Err(SettingsError::Durations(DurationError::Zero("study time")))
        ));
        assert_eq!(config.load(), Durations::new(60, 60, 60).unwrap());
    }
}
