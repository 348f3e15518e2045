//! Menu building and updating for the tray dropdown.

use crate::app::App;
use crate::models::{Phase, RunStatus};
use crate::settings::SettingsShell;
use chrono::NaiveDate;
use muda::accelerator::Accelerator;
use muda::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use std::collections::HashMap;
use thiserror::Error;

// Menu item IDs as constants
pub const ID_STATUS: &str = "status";
pub const ID_TODAY: &str = "today";
pub const ID_TOGGLE: &str = "toggle";
pub const ID_SAVE_SETTINGS: &str = "save_settings";
pub const ID_QUIT: &str = "quit";

pub const PREFIX_STUDY: &str = "study_";
pub const PREFIX_SHORT: &str = "short_";
pub const PREFIX_LONG: &str = "long_";

const STUDY_PRESETS: [u32; 7] = [15, 20, 25, 30, 45, 50, 60];
const SHORT_PRESETS: [u32; 4] = [3, 5, 10, 15];
const LONG_PRESETS: [u32; 4] = [10, 15, 20, 30];

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Menu error: {0}")]
    Muda(#[from] muda::Error),
}

/// Holds references to menu items that need dynamic updates.
pub struct MenuItems {
    pub status: MenuItem,
    pub today: MenuItem,
    pub toggle: MenuItem,
    pub study_checks: HashMap<u32, CheckMenuItem>,
    pub short_checks: HashMap<u32, CheckMenuItem>,
    pub long_checks: HashMap<u32, CheckMenuItem>,
    pub history: Vec<MenuItem>,
}

/// Builds the complete menu structure.
pub fn build_menu(
    app: &App,
    form: &SettingsShell,
    today: NaiveDate,
) -> Result<(Menu, MenuItems), MenuError> {
    let menu = Menu::new();
    let engine = &app.engine;

    // Status display (disabled, info only)
    let status = MenuItem::with_id(
        MenuId::new(ID_STATUS),
        format_status(engine.status(), engine.state().phase, &engine.display()),
        false,
        None::<Accelerator>,
    );
    menu.append(&status)?;

    let today_item = MenuItem::with_id(
        MenuId::new(ID_TODAY),
        app.today_text(),
        false,
        None::<Accelerator>,
    );
    menu.append(&today_item)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // The single start/pause button
    let toggle = MenuItem::with_id(
        MenuId::new(ID_TOGGLE),
        engine.status().button_label(),
        true,
        None::<Accelerator>,
    );
    menu.append(&toggle)?;

    menu.append(&PredefinedMenuItem::separator())?;

    let (settings_menu, study_checks, short_checks, long_checks) = build_settings_submenu(form)?;
    menu.append(&settings_menu)?;

    let history_menu = Submenu::new("📅  History", true);
    let mut history = Vec::new();
    for line in app.history_lines(today) {
        let item = MenuItem::new(line, false, None::<Accelerator>);
        history_menu.append(&item)?;
        history.push(item);
    }
    menu.append(&history_menu)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Quit
    let quit = MenuItem::with_id(MenuId::new(ID_QUIT), "Quit Tomatick", true, None::<Accelerator>);
    menu.append(&quit)?;

    let items = MenuItems {
        status,
        today: today_item,
        toggle,
        study_checks,
        short_checks,
        long_checks,
        history,
    };

    Ok((menu, items))
}

/// Type alias for the settings submenu result to avoid clippy complexity warning.
type SettingsSubmenuResult = (
    Submenu,
    HashMap<u32, CheckMenuItem>,
    HashMap<u32, CheckMenuItem>,
    HashMap<u32, CheckMenuItem>,
);

fn build_settings_submenu(form: &SettingsShell) -> Result<SettingsSubmenuResult, MenuError> {
    let submenu = Submenu::new("⚙  Settings", true);

    let (study_sub, study_checks) =
        build_preset_submenu("Pomodoro length", PREFIX_STUDY, &STUDY_PRESETS, form.study())?;
    submenu.append(&study_sub)?;

    let (short_sub, short_checks) = build_preset_submenu(
        "Short break length",
        PREFIX_SHORT,
        &SHORT_PRESETS,
        form.short_break(),
    )?;
    submenu.append(&short_sub)?;

    let (long_sub, long_checks) = build_preset_submenu(
        "Long break length",
        PREFIX_LONG,
        &LONG_PRESETS,
        form.long_break(),
    )?;
    submenu.append(&long_sub)?;

    submenu.append(&PredefinedMenuItem::separator())?;

    let save = MenuItem::with_id(
        MenuId::new(ID_SAVE_SETTINGS),
        "Save settings",
        true,
        None::<Accelerator>,
    );
    submenu.append(&save)?;

    Ok((submenu, study_checks, short_checks, long_checks))
}

fn build_preset_submenu(
    title: &str,
    prefix: &str,
    presets: &[u32],
    current_secs: u32,
) -> Result<(Submenu, HashMap<u32, CheckMenuItem>), MenuError> {
    let submenu = Submenu::new(title, true);
    let mut checks = HashMap::new();
    for &mins in presets {
        let item = CheckMenuItem::with_id(
            MenuId::new(format!("{}{}", prefix, mins)),
            format!("{} min", mins),
            true,
            mins * 60 == current_secs,
            None::<Accelerator>,
        );
        submenu.append(&item)?;
        checks.insert(mins, item);
    }
    Ok((submenu, checks))
}

/// Moves the checkmark of a preset group to the given value.
pub fn check_preset(checks: &HashMap<u32, CheckMenuItem>, secs: u32) {
    for (&mins, check) in checks {
        check.set_checked(mins * 60 == secs);
    }
}

/// Updates the status line after the countdown text changed.
pub fn update_status(items: &MenuItems, status: RunStatus, phase: Phase, display: &str) {
    items.status.set_text(format_status(status, phase, display));
}

/// Rewrites the history lines.
pub fn update_history(items: &MenuItems, app: &App, today: NaiveDate) {
    for (item, line) in items.history.iter().zip(app.history_lines(today)) {
        item.set_text(line);
    }
}

/// Formats the status line for the menu.
pub fn format_status(status: RunStatus, phase: Phase, display: &str) -> String {
    let label = match (status, phase) {
        (RunStatus::Paused, _) => "paused",
        (RunStatus::Running, Phase::Study) => "studying",
        (RunStatus::Running, Phase::Break) => "on a break",
        (RunStatus::Idle, Phase::Study) => "study next",
        (RunStatus::Idle, Phase::Break) => "break next",
    };
    format!("⏱  {} - {}", display, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status() {
        assert_eq!(
            format_status(RunStatus::Idle, Phase::Study, "25:00"),
            "⏱  25:00 - study next"
        );
        assert_eq!(
            format_status(RunStatus::Running, Phase::Study, "23:52"),
            "⏱  23:52 - studying"
        );
        assert_eq!(
            format_status(RunStatus::Paused, Phase::Study, "10:00"),
            "⏱  10:00 - paused"
        );
        assert_eq!(
            format_status(RunStatus::Running, Phase::Break, "04:32"),
            "⏱  04:32 - on a break"
        );
        assert_eq!(
            format_status(RunStatus::Idle, Phase::Break, "00:00"),
            "⏱  00:00 - break next"
        );
    }

    #[test]
    fn test_presets_include_defaults() {
        use crate::models::Durations;

        let defaults = Durations::default();
        assert!(STUDY_PRESETS.contains(&(defaults.study() / 60)));
        assert!(SHORT_PRESETS.contains(&(defaults.short_break() / 60)));
        assert!(LONG_PRESETS.contains(&(defaults.long_break() / 60)));
    }
}
