//! Main application state and logic.

use crate::config::ConfigStore;
use crate::engine::{format_time, Completion, CountdownEngine, TickOutcome};
use crate::history::{self, HistoryError, HistoryStore};
use crate::models::{Durations, RunStatus};
use crate::settings::{SettingsError, SettingsShell};
use crate::timer::TickSource;
use chrono::NaiveDate;
use log::{error, info};
use std::time::Instant;
use thiserror::Error;

/// Days listed in the history view.
pub const HISTORY_DAYS: u64 = 7;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Updates for the UI layer to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// New countdown text ("MM:SS").
    Display(String),
    /// Play the completion chime.
    PlaySound,
    /// New text for the today's-count line.
    TodaysCount(String),
    /// New label for the start/pause button.
    ButtonLabel(&'static str),
}

/// Owns the countdown and both stores, and turns UI input into UI updates.
pub struct App {
    pub engine: CountdownEngine,
    pub config: ConfigStore,
    pub history: HistoryStore,
    pub ticker: TickSource,
    /// Date the engine's completed-studies counter belongs to.
    day: NaiveDate,
}

impl App {
    /// Creates the application from the default file locations.
    pub fn new() -> Result<Self, AppError> {
        Self::with_stores(ConfigStore::open_default(), HistoryStore::open_default())
    }

    /// Creates the application over the given stores.
    pub fn with_stores(config: ConfigStore, mut history: HistoryStore) -> Result<Self, AppError> {
        let durations = config.load();
        history.load()?;
        let day = history::today();
        let today = history.count_on(day);
        info!(
            "Loaded durations {}/{}/{}s, {} pomodoros today in {}",
            durations.study(),
            durations.short_break(),
            durations.long_break(),
            today,
            history.path().display()
        );

        Ok(Self {
            engine: CountdownEngine::new(durations, today),
            config,
            history,
            ticker: TickSource::new(),
            day,
        })
    }

    /// Date the today's-count line refers to.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Moves the counter to `today` once the calendar date has changed,
    /// taking the count already stored for the new date.
    pub fn check_day_rollover(&mut self, today: NaiveDate) -> Vec<UiEvent> {
        if today == self.day {
            return Vec::new();
        }
        let count = self.history.count_on(today);
        info!("Day changed to {}, {} pomodoros so far", today, count);
        self.day = today;
        self.engine.sync_completed_today(count);
        vec![UiEvent::TodaysCount(todays_count_text(count))]
    }

    /// Handles a click on the start/pause button.
    pub fn toggle(&mut self, now: Instant) -> Vec<UiEvent> {
        let status = self.engine.toggle();
        match status {
            RunStatus::Running => self.ticker.arm(now),
            _ => self.ticker.disarm(),
        }
        vec![
            UiEvent::ButtonLabel(status.button_label()),
            UiEvent::Display(self.engine.display()),
        ]
    }

    /// Runs every tick the tick source has due at `now`.
    pub fn run_due_ticks(&mut self, now: Instant) -> Vec<UiEvent> {
        let mut events = Vec::new();
        let today = history::today();
        for _ in 0..self.ticker.take_due(now) {
            events.extend(self.tick_on(today));
            if !self.ticker.is_armed() {
                break;
            }
        }
        events
    }

    /// Advances the countdown by one second.
    #[cfg(test)]
    pub fn tick(&mut self) -> Vec<UiEvent> {
        self.tick_on(history::today())
    }

    /// Advances the countdown by one second, with `today` as the current date.
    pub fn tick_on(&mut self, today: NaiveDate) -> Vec<UiEvent> {
        // The long-break choice must see the new day's count.
        let mut events = self.check_day_rollover(today);
        match self.engine.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Counting(text) => events.push(UiEvent::Display(text)),
            TickOutcome::Finished(completion) => {
                self.ticker.disarm();
                events.push(UiEvent::PlaySound);
                if let Completion::Study {
                    completed_today,
                    long_break,
                } = completion
                {
                    let count = self.credit_completion(completed_today);
                    if long_break {
                        info!("{} pomodoros today, long break earned", count);
                    }
                    events.push(UiEvent::TodaysCount(todays_count_text(count)));
                }
                events.push(UiEvent::Display(format_time(0)));
                events.push(UiEvent::ButtonLabel(RunStatus::Idle.button_label()));
            }
        }
        events
    }

    /// Persists a completed study phase and returns the count to display.
    fn credit_completion(&mut self, completed_today: u32) -> u32 {
        match self.history.record_completion_on(self.day) {
            Ok(count) => {
                self.engine.sync_completed_today(count);
                count
            }
            Err(e) => {
                error!("Failed to save history: {}", e);
                completed_today
            }
        }
    }

    /// Applies durations submitted from the settings form.
    pub fn apply_settings(&mut self, durations: Durations) {
        info!(
            "Durations changed to {}/{}/{}s",
            durations.study(),
            durations.short_break(),
            durations.long_break()
        );
        self.engine.change_durations(durations);
    }

    /// Saves the settings form and applies its durations.
    pub fn submit_settings(&mut self, settings: &SettingsShell) -> Result<Durations, SettingsError> {
        let durations = settings.submit(&self.config)?;
        self.apply_settings(durations);
        Ok(durations)
    }

    /// Text for the today's-count line.
    pub fn today_text(&self) -> String {
        todays_count_text(self.engine.state().studies_completed_today)
    }

    /// One line per recent day for the history view, newest first.
    pub fn history_lines(&self, today: NaiveDate) -> Vec<String> {
        self.history
            .recent(today, HISTORY_DAYS)
            .into_iter()
            .map(|(date, count)| format!("{}  🍅 times: {}", date.format("%a %Y-%m-%d"), count))
            .collect()
    }
}

pub fn todays_count_text(count: u32) -> String {
    format!("🍅 {} times today", count)
}
