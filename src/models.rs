//! Data models for the Tomatick application.

use thiserror::Error;

/// Default study length in seconds (25 minutes).
pub const DEFAULT_STUDY_SECS: u32 = 1500;
/// Default short break length in seconds (5 minutes).
pub const DEFAULT_SHORT_BREAK_SECS: u32 = 300;
/// Default long break length in seconds (15 minutes).
pub const DEFAULT_LONG_BREAK_SECS: u32 = 900;
/// Every n-th completed study phase is followed by a long break.
pub const STUDIES_PER_LONG_BREAK: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// The three interval lengths, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    study: u32,
    short_break: u32,
    long_break: u32,
}

impl Durations {
    /// Creates a validated set of durations. Every value must be positive.
    pub fn new(study: u32, short_break: u32, long_break: u32) -> Result<Self, DurationError> {
        if study == 0 {
            return Err(DurationError::Zero("study time"));
        }
        if short_break == 0 {
            return Err(DurationError::Zero("short break"));
        }
        if long_break == 0 {
            return Err(DurationError::Zero("long break"));
        }
        Ok(Self {
            study,
            short_break,
            long_break,
        })
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

    /// Length of the break that follows the given number of completed studies.
    pub fn break_after(&self, completed_studies: u32) -> u32 {
        if is_long_break_due(completed_studies) {
            self.long_break
        } else {
            self.short_break
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            study: DEFAULT_STUDY_SECS,
            short_break: DEFAULT_SHORT_BREAK_SECS,
            long_break: DEFAULT_LONG_BREAK_SECS,
        }
    }
}

/// Returns true if a long break follows this many completed studies.
pub fn is_long_break_due(completed_studies: u32) -> bool {
    completed_studies > 0 && completed_studies % STUDIES_PER_LONG_BREAK == 0
}

/// What the current countdown represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Study,
    Break,
}

/// Whether the countdown is ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Not started, or the last phase ran out.
    #[default]
    Idle,
    Running,
    /// Stopped by the user, resumable.
    Paused,
}

impl RunStatus {
    /// Label of the single start/pause button for this status.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Idle => "Start",
            Self::Running => "Pause",
            Self::Paused => "Resume",
        }
    }
}

/// Countdown progress for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_secs: u32,
    pub phase: Phase,
    pub studies_completed_today: u32,
}

impl CountdownState {
    /// A fresh study phase of the given length.
    pub fn new(study_secs: u32, studies_completed_today: u32) -> Self {
        Self {
            remaining_secs: study_secs,
            phase: Phase::Study,
            studies_completed_today,
        }
    }
}
