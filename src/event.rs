//! Menu event handling.

use crate::app::{App, UiEvent};
use crate::menu::{
    check_preset, MenuItems, ID_QUIT, ID_SAVE_SETTINGS, ID_TOGGLE, PREFIX_LONG, PREFIX_SHORT,
    PREFIX_STUDY,
};
use crate::models::Durations;
use crate::settings::{parse_minutes_field, SettingsShell};
use log::{error, warn};
use std::time::Instant;

/// Result of handling a menu event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    /// Event handled, continue running.
    Continue,
    /// User requested quit.
    Quit,
    /// The countdown changed; apply these updates.
    Ui(Vec<UiEvent>),
    /// The settings form was saved.
    SettingsSaved(Durations),
}

/// Which duration a settings preset edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Study,
    ShortBreak,
    LongBreak,
}

/// Handles a menu event and updates the app state accordingly.
pub fn handle_menu_event(
    app: &mut App,
    form: &mut SettingsShell,
    items: &MenuItems,
    id: &str,
    now: Instant,
) -> EventResult {
    match id {
        ID_TOGGLE => EventResult::Ui(app.toggle(now)),
        ID_SAVE_SETTINGS => match app.submit_settings(form) {
            Ok(durations) => EventResult::SettingsSaved(durations),
            Err(e) => {
                error!("Settings not saved: {}", e);
                EventResult::Continue
            }
        },
        ID_QUIT => EventResult::Quit,
        _ => {
            if let Some((field, secs)) = parse_preset(id) {
                apply_preset(form, items, field, secs);
            }
            EventResult::Continue
        }
    }
}

/// Parses a preset item ID such as `study_25` into the field and its seconds.
pub fn parse_preset(id: &str) -> Option<(DurationField, u32)> {
    let (field, mins) = if let Some(mins) = id.strip_prefix(PREFIX_STUDY) {
        (DurationField::Study, mins)
    } else if let Some(mins) = id.strip_prefix(PREFIX_SHORT) {
        (DurationField::ShortBreak, mins)
    } else if let Some(mins) = id.strip_prefix(PREFIX_LONG) {
        (DurationField::LongBreak, mins)
    } else {
        return None;
    };

    match parse_minutes_field(mins) {
        Ok(secs) => Some((field, secs)),
        Err(e) => {
            warn!("Ignoring menu item {:?}: {}", id, e);
            None
        }
    }
}

/// Edits the settings draft and moves the group's checkmark.
fn apply_preset(form: &mut SettingsShell, items: &MenuItems, field: DurationField, secs: u32) {
    match field {
        DurationField::Study => {
            form.set_study(secs);
            check_preset(&items.study_checks, secs);
        }
        DurationField::ShortBreak => {
            form.set_short_break(secs);
            check_preset(&items.short_checks, secs);
        }
        DurationField::LongBreak => {
            form.set_long_break(secs);
            check_preset(&items.long_checks, secs);
        }
    }
}
