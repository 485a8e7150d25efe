//! App runtime: turns terminal events into keyboard actions, drives the
//! controller and renders the instrument screen.

use std::time::{Duration, Instant};

use keybed_core::action_log::ActionLog;
use keybed_core::KeyController;
use keybed_types::{Key, KeyboardAction, KeyboardLayout, PlayRequest, KEY_COUNT, MAX_VOLUME};

use crate::ui::{
    key_for_char, keyboard_view, translate_key, AppEvent, InputSource, KeyCode, KeyPress,
    PianoKeyboard, Pointer, Rect, TerminalUi, ViewLayout, ViewState,
};

const VOLUME_STEP: u8 = 5;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    controller: KeyController,
    keyboard: PianoKeyboard,
    layout: KeyboardLayout,
    action_log: Option<ActionLog>,
    /// Terminal reports key releases; no timeout-based release.
    real_releases: bool,
    mouse_key: Option<Key>,
    last_note: Option<(Key, PlayRequest)>,
    status: String,
    area: Rect,
    render_needed: bool,
}

impl App {
    pub fn new(
        controller: KeyController,
        layout: KeyboardLayout,
        release_timeout: Duration,
        action_log: Option<ActionLog>,
    ) -> Self {
        Self {
            controller,
            keyboard: PianoKeyboard::new(release_timeout),
            layout,
            action_log,
            real_releases: false,
            mouse_key: None,
            last_note: None,
            status: String::new(),
            area: Rect::new(0, 0, 80, 24),
            render_needed: true,
        }
    }

    pub fn set_key_releases(&mut self, enabled: bool) {
        self.real_releases = enabled;
    }

    /// Log, then route through the controller.
    fn apply(&mut self, action: KeyboardAction) {
        if let Some(log) = self.action_log.as_mut() {
            log.record(&action);
        }
        if let Some(request) = self.controller.dispatch(&action) {
            if let KeyboardAction::Press(key) = action {
                self.last_note = Some((key, request));
            }
        }
        self.status = action.describe();
        self.render_needed = true;
    }

    fn press(&mut self, key: Key) {
        self.apply(KeyboardAction::Press(key));
    }

    fn release(&mut self, key: Key) {
        self.apply(KeyboardAction::Release(key));
    }

    fn step_volume(&mut self, up: bool) {
        let volume = self.controller.state().volume;
        let volume = if up {
            volume.saturating_add(VOLUME_STEP).min(MAX_VOLUME)
        } else {
            volume.saturating_sub(VOLUME_STEP)
        };
        self.apply(KeyboardAction::SetVolume(volume));
    }

    fn step_waveform(&mut self, forward: bool) {
        let current = self.controller.state().waveform;
        let next = if forward { current.next() } else { current.prev() };
        self.apply(KeyboardAction::SetWaveform(next.label().to_string()));
    }

    /// Handle one event. Returns true if the app should quit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Press(press) => self.handle_key(press),
            AppEvent::Release(code) => {
                if let KeyCode::Char(c) = code {
                    let c = translate_key(c.to_ascii_lowercase(), self.layout);
                    if let Some(key) = self.keyboard.key_released(c) {
                        self.release(key);
                    }
                }
                false
            }
            AppEvent::Pointer { action, column, row } => {
                self.handle_pointer(action, column, row);
                false
            }
            AppEvent::Resize => {
                self.render_needed = true;
                false
            }
        }
    }

    fn handle_key(&mut self, press: KeyPress) -> bool {
        match press.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if press.mods.ctrl => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Char('-') | KeyCode::Down => self.step_volume(false),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.step_volume(true),
            KeyCode::Char(']') | KeyCode::Tab | KeyCode::Right => self.step_waveform(true),
            KeyCode::Char('[') | KeyCode::BackTab | KeyCode::Left => self.step_waveform(false),
            KeyCode::Char(c) if !press.mods.ctrl && !press.mods.alt => {
                let c = translate_key(c.to_ascii_lowercase(), self.layout);
                if let Some(key) = key_for_char(c) {
                    // a repeat only sustains a note this app started
                    if press.repeat && !self.keyboard.is_held(key) {
                        return false;
                    }
                    if self.keyboard.key_pressed(c, key, press.at) {
                        self.press(key);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn handle_pointer(&mut self, action: Pointer, column: u16, row: u16) {
        let view = ViewLayout::new(self.area);
        match action {
            Pointer::Down => {
                if let Some(key) = view.hit_key(column, row) {
                    if let Some(previous) = self.mouse_key.take() {
                        self.release(previous);
                    }
                    self.mouse_key = Some(key);
                    self.press(key);
                } else if let Some(waveform) = view.hit_waveform(column, row) {
                    self.apply(KeyboardAction::SetWaveform(waveform.label().to_string()));
                } else if let Some(volume) = view.hit_volume(column, row) {
                    self.apply(KeyboardAction::SetVolume(volume));
                }
            }
            Pointer::Up => {
                if let Some(key) = self.mouse_key.take() {
                    self.release(key);
                }
            }
            Pointer::ScrollUp => self.step_volume(true),
            Pointer::ScrollDown => self.step_volume(false),
        }
    }

    /// Release keys whose repeats stopped. No-op when the terminal reports
    /// releases.
    pub fn tick(&mut self, now: Instant) {
        if self.real_releases || !self.keyboard.has_active_keys() {
            return;
        }
        for key in self.keyboard.check_releases(now) {
            self.release(key);
        }
    }

    /// Release everything still held, keyboard and mouse.
    pub fn release_all(&mut self) {
        for key in self.keyboard.release_all() {
            self.release(key);
        }
        if let Some(key) = self.mouse_key.take() {
            self.release(key);
        }
    }

    fn view_state(&self) -> ViewState<'_> {
        let mut held = [false; KEY_COUNT];
        for (i, key) in self.controller.keys().iter().enumerate() {
            held[i] = self.keyboard.is_held(*key) || self.mouse_key == Some(*key);
        }
        ViewState {
            instrument: self.controller.state(),
            keys: self.controller.keys(),
            held,
            last_note: self.last_note,
            status: &self.status,
        }
    }

    fn render(&mut self, terminal: &mut TerminalUi) -> std::io::Result<()> {
        let view = self.view_state();
        let mut drawn = self.area;
        terminal.draw(|area, buf| {
            keyboard_view::render(area, buf, &view);
            drawn = area;
        })?;
        self.area = drawn;
        self.render_needed = false;
        Ok(())
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut TerminalUi) -> std::io::Result<()> {
        self.set_key_releases(terminal.key_releases());
        let mut last_render: Option<Instant> = None;

        loop {
            let mut quit = false;
            let mut timeout = FRAME_INTERVAL;
            while let Some(event) = terminal.poll_event(timeout) {
                if self.handle_event(event) {
                    quit = true;
                    break;
                }
                timeout = Duration::ZERO;
            }
            if quit {
                break;
            }

            let now = Instant::now();
            self.tick(now);
            let due = last_render.map_or(true, |t| now.duration_since(t) >= FRAME_INTERVAL);
            if self.render_needed && due {
                self.render(terminal)?;
                last_render = Some(now);
            }
        }

        self.release_all();
        log::info!(target: "ui", "quit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use keybed_audio::{PlayerOp, SharedTestPlayer, TestPlayer};
    use keybed_core::{Instrument, InstrumentSettings};
    use keybed_types::Waveform;

    use super::*;

    fn app() -> (App, Arc<TestPlayer>) {
        let player = Arc::new(TestPlayer::new());
        let instrument = Instrument::init(&InstrumentSettings::default()).unwrap();
        let controller = KeyController::new(instrument, Box::new(SharedTestPlayer(player.clone())));
        let app = App::new(controller, KeyboardLayout::Qwerty, Duration::from_millis(150), None);
        (app, player)
    }

    fn key_event(c: char, at: Instant) -> AppEvent {
        AppEvent::Press(KeyPress::new(KeyCode::Char(c)).at(at))
    }

    fn special(code: KeyCode) -> AppEvent {
        AppEvent::Press(KeyPress::new(code))
    }

    fn pointer(action: Pointer, column: u16, row: u16) -> AppEvent {
        AppEvent::Pointer { action, column, row }
    }

    #[test]
    fn key_press_plays_note() {
        let (mut app, player) = app();
        assert!(!app.handle_event(key_event('h', Instant::now())));
        let plays = player.plays();
        assert_eq!(plays.len(), 1);
        assert!((plays[0].frequency - 440.0).abs() < 1e-9);
        assert_eq!(app.controller.state().held_keys(), 1);
        assert_eq!(app.last_note.map(|(k, _)| k.index()), Some(9));
    }

    #[test]
    fn repeat_does_not_retrigger() {
        let (mut app, player) = app();
        let t0 = Instant::now();
        app.handle_event(key_event('a', t0));
        app.handle_event(key_event('a', t0 + Duration::from_millis(40)));
        assert_eq!(player.plays().len(), 1);
    }

    #[test]
    fn timeout_release_stops_all() {
        let (mut app, player) = app();
        let t0 = Instant::now();
        app.handle_event(key_event('a', t0));
        app.tick(t0 + Duration::from_millis(100));
        assert_eq!(player.stop_count(), 0);
        app.tick(t0 + Duration::from_millis(200));
        assert_eq!(player.stop_count(), 1);
        assert_eq!(app.controller.state().held_keys(), 0);
    }

    #[test]
    fn real_release_events() {
        let (mut app, player) = app();
        app.set_key_releases(true);
        let t0 = Instant::now();
        app.handle_event(key_event('h', t0));
        app.tick(t0 + Duration::from_secs(1));
        assert_eq!(player.stop_count(), 0);
        app.handle_event(AppEvent::Release(KeyCode::Char('h')));
        assert_eq!(player.operations().last(), Some(&PlayerOp::StopAll));
        assert_eq!(app.controller.state().held_keys(), 0);
    }

    #[test]
    fn second_key_gets_half_gain() {
        let (mut app, player) = app();
        let t0 = Instant::now();
        app.handle_event(key_event('a', t0));
        app.handle_event(key_event('d', t0));
        let plays = player.plays();
        assert!((plays[0].gain - 1.0).abs() < 1e-9);
        assert!((plays[1].gain - 0.5).abs() < 1e-9);
    }

    #[test]
    fn volume_keys_step_and_clamp() {
        let (mut app, _player) = app();
        app.handle_event(key_event('+', Instant::now()));
        assert_eq!(app.controller.state().volume, 100);
        app.handle_event(key_event('-', Instant::now()));
        assert_eq!(app.controller.state().volume, 95);
        for _ in 0..30 {
            app.handle_event(special(KeyCode::Down));
        }
        assert_eq!(app.controller.state().volume, 0);
    }

    #[test]
    fn tab_cycles_waveform() {
        let (mut app, player) = app();
        app.handle_event(special(KeyCode::Tab));
        assert_eq!(app.controller.state().waveform, Waveform::Triangle);
        app.handle_event(special(KeyCode::BackTab));
        app.handle_event(special(KeyCode::BackTab));
        assert_eq!(app.controller.state().waveform, Waveform::Square);
        app.handle_event(key_event('k', Instant::now()));
        assert_eq!(player.plays()[0].waveform, Waveform::Square);
    }

    #[test]
    fn quit_keys() {
        let (mut app, _player) = app();
        assert!(app.handle_event(key_event('q', Instant::now())));
        assert!(app.handle_event(special(KeyCode::Esc)));
        assert!(app.handle_event(AppEvent::Press(KeyPress::new(KeyCode::Char('c')).with_ctrl())));
        assert!(!app.handle_event(key_event('c', Instant::now())));
    }

    #[test]
    fn mouse_down_up_on_key() {
        let (mut app, player) = app();
        let view = ViewLayout::new(app.area);
        let r = view.keys[4];
        app.handle_event(pointer(Pointer::Down, r.x, r.y));
        assert_eq!(app.last_note.map(|(k, _)| k.index()), Some(4));
        app.handle_event(pointer(Pointer::Up, 0, 0));
        assert_eq!(player.stop_count(), 1);
        assert_eq!(app.controller.state().held_keys(), 0);
    }

    #[test]
    fn mouse_selects_waveform_and_volume() {
        let (mut app, _player) = app();
        let view = ViewLayout::new(app.area);
        let r = view.waveforms[2];
        app.handle_event(pointer(Pointer::Down, r.x, r.y));
        assert_eq!(app.controller.state().waveform, Waveform::Square);

        let bar = view.volume_bar;
        app.handle_event(pointer(Pointer::Down, bar.x, bar.y));
        assert_eq!(app.controller.state().volume, 0);
        app.handle_event(pointer(Pointer::Down, bar.x + bar.width - 1, bar.y));
        assert_eq!(app.controller.state().volume, 100);
    }

    #[test]
    fn wheel_steps_volume() {
        let (mut app, _player) = app();
        app.handle_event(pointer(Pointer::ScrollDown, 10, 10));
        app.handle_event(pointer(Pointer::ScrollDown, 10, 10));
        assert_eq!(app.controller.state().volume, 90);
        app.handle_event(pointer(Pointer::ScrollUp, 10, 10));
        assert_eq!(app.controller.state().volume, 95);
    }

    #[test]
    fn repeat_without_press_is_ignored() {
        let (mut app, player) = app();
        let repeat = KeyPress { repeat: true, ..KeyPress::new(KeyCode::Char('a')) };
        app.handle_event(AppEvent::Press(repeat));
        assert!(player.plays().is_empty());
        assert_eq!(app.controller.state().held_keys(), 0);

        app.handle_event(key_event('a', Instant::now()));
        app.handle_event(AppEvent::Press(repeat));
        assert_eq!(player.plays().len(), 1);
    }

    #[test]
    fn colemak_layout_maps_to_physical_keys() {
        let player = Arc::new(TestPlayer::new());
        let instrument = Instrument::init(&InstrumentSettings::default()).unwrap();
        let controller = KeyController::new(instrument, Box::new(SharedTestPlayer(player.clone())));
        let mut app = App::new(controller, KeyboardLayout::Colemak, Duration::from_millis(150), None);
        // colemak 'n' sits where qwerty 'j' is
        app.handle_event(key_event('n', Instant::now()));
        assert_eq!(app.last_note.map(|(k, _)| k.index()), Some(11));
    }

    #[test]
    fn release_all_on_quit() {
        let (mut app, player) = app();
        let t0 = Instant::now();
        app.handle_event(key_event('a', t0));
        app.handle_event(key_event('s', t0));
        app.release_all();
        assert_eq!(player.stop_count(), 2);
        assert_eq!(app.controller.state().held_keys(), 0);
    }

    #[test]
    fn actions_are_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.jsonl");
        let player = Arc::new(TestPlayer::new());
        let instrument = Instrument::init(&InstrumentSettings::default()).unwrap();
        let controller = KeyController::new(instrument, Box::new(SharedTestPlayer(player.clone())));
        let mut app = App::new(
            controller,
            KeyboardLayout::Qwerty,
            Duration::from_millis(150),
            ActionLog::open(&path),
        );
        app.handle_event(key_event('h', Instant::now()));
        drop(app);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("Press"));
    }
}
