//! Tomatick - a tray Pomodoro timer.
//!
//! Counts down study and break intervals, keeps a per-day tally of completed
//! pomodoros, and lets the interval lengths be changed from the menu.

use std::time::{Duration, Instant};

use log::{info, warn};
use muda::MenuEvent;
use tray_icon::{TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

mod app;
mod audio;
mod config;
mod engine;
mod event;
mod history;
mod menu;
mod models;
mod settings;
mod timer;
mod tray;

use app::{App, UiEvent};
use audio::AudioPlayer;
use event::EventResult;
use menu::MenuItems;
use models::{Phase, RunStatus};
use settings::SettingsShell;

/// How often menu events are polled while no tick is due sooner.
const MENU_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Application handler for the winit event loop.
struct Tomatick {
    app: App,
    form: SettingsShell,
    tray: TrayIcon,
    menu_items: MenuItems,
    audio: Option<AudioPlayer>,
    icon_state: Option<(RunStatus, Phase)>,
}

impl Tomatick {
    fn new(app: App, form: SettingsShell, tray: TrayIcon, menu_items: MenuItems) -> Self {
        let audio = AudioPlayer::new(config::data_dir().join(audio::SOUND_FILE))
            .map_err(|e| warn!("Sound disabled: {}", e))
            .ok();

        let mut tomatick = Self {
            app,
            form,
            tray,
            menu_items,
            audio,
            icon_state: None,
        };
        let display = tomatick.app.engine.display();
        tomatick.show_countdown(&display);
        tomatick
    }

    fn apply(&mut self, events: Vec<UiEvent>) {
        for event in events {
            match event {
                UiEvent::Display(text) => self.show_countdown(&text),
                UiEvent::PlaySound => {
                    if let Some(ref audio) = self.audio {
                        audio.play_chime();
                    }
                }
                UiEvent::TodaysCount(text) => {
                    self.menu_items.today.set_text(text);
                    menu::update_history(&self.menu_items, &self.app, self.app.day());
                }
                UiEvent::ButtonLabel(label) => self.menu_items.toggle.set_text(label),
            }
        }
    }

    fn show_countdown(&mut self, text: &str) {
        let status = self.app.engine.status();
        let phase = self.app.engine.state().phase;

        menu::update_status(&self.menu_items, status, phase, text);
        self.tray
            .set_title(Some(timer::format_tray_title(status, phase, text)));

        if self.icon_state != Some((status, phase)) {
            match tray::countdown_icon(status, phase) {
                Ok(icon) => {
                    if let Err(e) = self.tray.set_icon(Some(icon)) {
                        warn!("Failed to update tray icon: {}", e);
                    }
                }
                Err(e) => warn!("Failed to draw tray icon: {}", e),
            }
            self.icon_state = Some((status, phase));
        }
    }

    fn process_menu_events(&mut self, event_loop: &ActiveEventLoop, now: Instant) {
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            let result = event::handle_menu_event(
                &mut self.app,
                &mut self.form,
                &self.menu_items,
                event.id().as_ref(),
                now,
            );

            match result {
                EventResult::Quit => {
                    info!("Quit requested");
                    event_loop.exit();
                }
                EventResult::Ui(events) => self.apply(events),
                EventResult::SettingsSaved(durations) => {
                    info!(
                        "Next phases use {}/{}/{}s",
                        durations.study(),
                        durations.short_break(),
                        durations.long_break()
                    );
                }
                EventResult::Continue => {}
            }
        }
    }
}

impl ApplicationHandler for Tomatick {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Nothing to do on resume for a tray-only app
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
        // No window events for a tray-only app
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        let events = self.app.check_day_rollover(history::today());
        self.apply(events);

        let events = self.app.run_due_ticks(now);
        self.apply(events);

        self.process_menu_events(event_loop, now);

        // Wake for the next tick, or soon enough to pick up menu clicks.
        let poll_at = now + MENU_POLL_INTERVAL;
        let wake_at = match self.app.ticker.deadline() {
            Some(deadline) if deadline < poll_at => deadline,
            _ => poll_at,
        };
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = App::new()?;
    let form = SettingsShell::open(&app.config);

    // Create event loop (required for tray on macOS)
    let event_loop = EventLoop::new()?;

    let (built_menu, menu_items) = menu::build_menu(&app, &form, app.day())?;

    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(built_menu))
        .with_icon(tray::countdown_icon(RunStatus::Idle, Phase::Study)?)
        .with_tooltip("Tomatick - Pomodoro Timer")
        .build()?;

    let mut tomatick = Tomatick::new(app, form, tray, menu_items);
    info!("Tomatick started");

    event_loop.run_app(&mut tomatick)?;

    Ok(())
}
