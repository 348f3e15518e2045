//! The countdown state machine.
//!
//! The engine knows nothing about how ticks are scheduled. Whatever owns it
//! calls [`CountdownEngine::tick`] once per elapsed second while it is running.

use crate::models::{is_long_break_due, CountdownState, Durations, Phase, RunStatus};
use log::{debug, info};

/// What finished when a countdown reached zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A study phase ended and a break was queued.
    Study {
        completed_today: u32,
        long_break: bool,
    },
    /// A break ended and the next study phase was queued.
    Break,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine is not running; nothing happened.
    Idle,
    /// One second elapsed. Carries the new "MM:SS" display text.
    Counting(String),
    /// The countdown was already at zero and the phase completed.
    Finished(Completion),
}

pub struct CountdownEngine {
    durations: Durations,
    state: CountdownState,
    status: RunStatus,
}

impl CountdownEngine {
    /// Creates an idle engine at the start of a study phase.
    pub fn new(durations: Durations, studies_completed_today: u32) -> Self {
        Self {
            durations,
            state: CountdownState::new(durations.study(), studies_completed_today),
            status: RunStatus::Idle,
        }
    }

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Display text for the current remaining time.
    pub fn display(&self) -> String {
        format_time(self.state.remaining_secs)
    }

    /// Starts or resumes the countdown. No effect while already running.
    pub fn start(&mut self) {
        if self.status != RunStatus::Running {
            debug!("countdown started ({:?})", self.state.phase);
            self.status = RunStatus::Running;
        }
    }

    /// Pauses a running countdown. No effect otherwise.
    pub fn pause(&mut self) {
        if self.status == RunStatus::Running {
            debug!("countdown paused at {}", self.display());
            self.status = RunStatus::Paused;
        }
    }

    /// Single-button dispatch: pauses when running, starts otherwise.
    pub fn toggle(&mut self) -> RunStatus {
        if self.status == RunStatus::Running {
            self.pause();
        } else {
            self.start();
        }
        self.status
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != RunStatus::Running {
            return TickOutcome::Idle;
        }

        if self.state.remaining_secs > 0 {
            self.state.remaining_secs -= 1;
            TickOutcome::Counting(self.display())
        } else {
            self.status = RunStatus::Idle;
            TickOutcome::Finished(self.complete_phase())
        }
    }

    fn complete_phase(&mut self) -> Completion {
        match self.state.phase {
            Phase::Study => {
                self.state.studies_completed_today =
                    self.state.studies_completed_today.saturating_add(1);
                let completed = self.state.studies_completed_today;
                let long_break = is_long_break_due(completed);

                self.state.remaining_secs = self.durations.break_after(completed);
                self.state.phase = Phase::Break;
                info!(
                    "study phase complete ({} today), {} break queued",
                    completed,
                    if long_break { "long" } else { "short" }
                );

                Completion::Study {
                    completed_today: completed,
                    long_break,
                }
            }
            Phase::Break => {
                self.state.remaining_secs = self.durations.study();
                self.state.phase = Phase::Study;
                info!("break complete, study phase queued");
                Completion::Break
            }
        }
    }

    /// Replaces the configured durations. The countdown in progress keeps its
    /// remaining time; the new values apply from the next phase on.
    pub fn change_durations(&mut self, durations: Durations) {
        self.durations = durations;
    }

    /// Overwrites the completed-studies counter with the persisted count.
    pub fn sync_completed_today(&mut self, count: u32) {
        self.state.studies_completed_today = count;
    }
}

/// Formats seconds as "MM:SS".
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
