//! One-second tick scheduling for the countdown.

use crate::models::{Phase, RunStatus};
use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A repeating one-second deadline, driven by the event loop.
///
/// Armed when the countdown starts and disarmed on pause or completion, so no
/// tick is ever delivered to a countdown that is not running.
#[derive(Debug, Default)]
pub struct TickSource {
    next: Option<Instant>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the first tick one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + TICK_INTERVAL);
    }

    pub fn disarm(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// The next deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns how many ticks are due at `now` and advances the deadline past them.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };

        let mut due = 0;
        while next <= now {
            due += 1;
            next += TICK_INTERVAL;
        }
        self.next = Some(next);
        due
    }
}

/// Formats the tray title from the countdown's display text.
pub fn format_tray_title(status: RunStatus, phase: Phase, display: &str) -> String {
    let icon = match (status, phase) {
        (RunStatus::Paused, _) => "⏸",
        (_, Phase::Study) => "🍅",
        (_, Phase::Break) => "☕",
    };
    format!("{} {}", icon, display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_source_never_fires() {
        let mut source = TickSource::new();
        let now = Instant::now();
        assert!(!source.is_armed());
        assert_eq!(source.take_due(now + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut source = TickSource::new();
        let start = Instant::now();
        source.arm(start);

        assert_eq!(source.take_due(start + Duration::from_millis(500)), 0);
        assert_eq!(source.take_due(start + Duration::from_millis(1000)), 1);
        assert_eq!(source.take_due(start + Duration::from_millis(1500)), 0);
        assert_eq!(source.take_due(start + Duration::from_millis(2100)), 1);
        assert_eq!(source.deadline(), Some(start + Duration::from_secs(3)));
    }

    #[test]
    fn test_catches_up_after_a_stall() {
        let mut source = TickSource::new();
        let start = Instant::now();
        source.arm(start);

        assert_eq!(source.take_due(start + Duration::from_millis(3500)), 3);
        assert_eq!(source.take_due(start + Duration::from_millis(4000)), 1);
    }

    #[test]
    fn test_disarm_cancels_pending_ticks() {
        let mut source = TickSource::new();
        let start = Instant::now();
        source.arm(start);
        source.disarm();

        assert_eq!(source.deadline(), None);
        assert_eq!(source.take_due(start + Duration::from_secs(5)), 0);
    }

    #[test]
    fn test_format_tray_title() {
        assert_eq!(
            format_tray_title(RunStatus::Running, Phase::Study, "23:52"),
            "🍅 23:52"
        );
        assert_eq!(
            format_tray_title(RunStatus::Idle, Phase::Study, "25:00"),
            "🍅 25:00"
        );
        assert_eq!(
            format_tray_title(RunStatus::Paused, Phase::Study, "10:00"),
            "⏸ 10:00"
        );
        assert_eq!(
            format_tray_title(RunStatus::Running, Phase::Break, "04:32"),
            "☕ 04:32"
        );
    }
}
