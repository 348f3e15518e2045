//! JSON-backed per-day count of completed study phases.

use crate::config::data_dir;
use chrono::{Days, Local, NaiveDate};
use log::{debug, error, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Completed pomodoros keyed by calendar date, serialized as `{"YYYY-MM-DD": n}`.
pub type HistoryRecord = BTreeMap<NaiveDate, u32>;

pub struct HistoryStore {
    path: PathBuf,
    record: HistoryRecord,
}

impl HistoryStore {
    /// Creates a store for the given file. Call [`HistoryStore::load`] before use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            record: HistoryRecord::new(),
        }
    }

    /// Opens `history.json` in the platform data directory.
    pub fn open_default() -> Self {
        Self::new(data_dir().join("history.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn record(&self) -> &HistoryRecord {
        &self.record
    }

    /// Reads the file into memory. A missing file is created empty; a file
    /// that does not hold a date-to-count map is moved aside to
    /// `history.json.bak` and treated as empty.
    pub fn load(&mut self) -> Result<&HistoryRecord, HistoryError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(record) => self.record = record,
                Err(e) => {
                    let backup = self.backup_path();
                    warn!(
                        "Ignoring malformed history in {}: {}; moved it to {}",
                        self.path.display(),
                        e,
                        backup.display()
                    );
                    if let Err(e) = fs::rename(&self.path, &backup) {
                        error!("Failed to back up malformed history: {}", e);
                    }
                    self.record = HistoryRecord::new();
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Creating empty history at {}", self.path.display());
                self.record = HistoryRecord::new();
                self.persist()?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(&self.record)
    }

    /// Count for today's date on the host clock.
    #[cfg(test)]
    pub fn todays_count(&self) -> u32 {
        self.count_on(today())
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.record.get(&date).copied().unwrap_or(0)
    }

    /// The `days` dates ending at `today`, newest first, with their counts.
    pub fn recent(&self, today: NaiveDate, days: u64) -> Vec<(NaiveDate, u32)> {
        (0..days)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| (date, self.count_on(date)))
            .collect()
    }

    /// Credits one completed study phase to today's date and saves.
    /// Returns the new count for today.
    #[cfg(test)]
    pub fn record_completion(&mut self) -> Result<u32, HistoryError> {
        self.record_completion_on(today())
    }

    /// Credits one completed study phase to the given date and saves.
    pub fn record_completion_on(&mut self, date: NaiveDate) -> Result<u32, HistoryError> {
        let count = self.record.entry(date).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        self.persist()?;
        Ok(count)
    }

    /// Where a malformed history file is kept.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    fn persist(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(&self.record)?)?;
        Ok(())
    }
}

/// Today's date on the host clock, read fresh on every call.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("history.json"))
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
        assert_eq!(store.todays_count(), 0);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), r#"{"2024-01-15": 3, "2024-01-16": 1}"#).unwrap();

        store.load().unwrap();
        assert_eq!(store.count_on(date(2024, 1, 15)), 3);
        assert_eq!(store.count_on(date(2024, 1, 16)), 1);
        assert_eq!(store.count_on(date(2024, 1, 17)), 0);
    }

    #[test]
    fn test_malformed_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().unwrap().is_empty());

        fs::write(store.path(), r#"{"yesterday": 2}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_kept_as_backup() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let contents = r#"{"2024-01-15": 3, "someday": 1}"#;
        fs::write(store.path(), contents).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.backup_path(), dir.path().join("history.json.bak"));
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), contents);

        // The next completion writes a fresh file and leaves the backup alone.
        store.record_completion_on(date(2024, 1, 16)).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"{"2024-01-16":1}"#
        );
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), contents);
    }

    #[test]
    fn test_record_saturates_at_max_count() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), r#"{"2024-01-15": 4294967295}"#).unwrap();
        store.load().unwrap();

        assert_eq!(store.record_completion_on(date(2024, 1, 15)).unwrap(), u32::MAX);
        assert_eq!(store.count_on(date(2024, 1, 15)), u32::MAX);
    }

    #[test]
    fn test_record_twice_on_same_date() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.load().unwrap();

        assert_eq!(store.record_completion().unwrap(), 1);
        assert_eq!(store.record_completion().unwrap(), 2);
        assert_eq!(store.todays_count(), 2);
    }

    #[test]
    fn test_record_on_two_dates() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.load().unwrap();

        store.record_completion_on(date(2024, 1, 15)).unwrap();
        store.record_completion_on(date(2024, 1, 15)).unwrap();
        store.record_completion_on(date(2024, 1, 16)).unwrap();

        assert_eq!(store.record().len(), 2);
        assert_eq!(store.count_on(date(2024, 1, 15)), 2);
        assert_eq!(store.count_on(date(2024, 1, 16)), 1);
    }

    #[test]
    fn test_record_rewrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), r#"{"2024-01-15": 3}"#).unwrap();
        store.load().unwrap();

        store.record_completion_on(date(2024, 1, 16)).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"{"2024-01-15":3,"2024-01-16":1}"#
        );

        let mut reopened = store_in(&dir);
        reopened.load().unwrap();
        assert_eq!(reopened.record(), store.record());
    }

    #[test]
    fn test_recent_days() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.load().unwrap();
        store.record_completion_on(date(2024, 3, 1)).unwrap();
        store.record_completion_on(date(2024, 2, 28)).unwrap();
        store.record_completion_on(date(2024, 2, 28)).unwrap();

        let recent = store.recent(date(2024, 3, 1), 3);
        assert_eq!(
            recent,
            vec![
                (date(2024, 3, 1), 1),
                (date(2024, 2, 29), 0),
                (date(2024, 2, 28), 2),
            ]
        );
    }
}
