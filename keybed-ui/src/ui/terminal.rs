use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CtKey, KeyEvent,
    KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEventKind,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::{
    AppEvent, Color, InputSource, KeyCode, KeyPress, Modifiers, Pointer, Rect, RenderBuf, Style,
};

/// Crossterm terminal in raw mode on the alternate screen.
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    key_releases: bool,
}

impl TerminalUi {
    /// Enter raw mode, the alternate screen and mouse capture. Asks for the
    /// kitty keyboard protocol so key releases are reported.
    pub fn open() -> io::Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        enable_raw_mode()?;

        // must be queried before switching screens
        let enhance = matches!(supports_keyboard_enhancement(), Ok(true));

        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let key_releases = enhance
            && execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok();
        log::info!(target: "ui", "terminal open, key releases: {}", key_releases);

        terminal.clear()?;
        Ok(Self { terminal, key_releases })
    }

    pub fn close(&mut self) -> io::Result<()> {
        if self.key_releases {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            self.key_releases = false;
        }
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }

    pub fn key_releases(&self) -> bool {
        self.key_releases
    }

    /// Draw one frame on a black background.
    pub fn draw(&mut self, paint: impl FnOnce(Rect, &mut RenderBuf)) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let mut buf = RenderBuf::new(frame.buffer_mut());
            buf.fill(area, Style::new().bg(Color::BLACK));
            paint(area, &mut buf);
        })?;
        Ok(())
    }
}

impl InputSource for TerminalUi {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut wait = timeout;
        loop {
            if !event::poll(wait).ok()? {
                return None;
            }
            let translated = match event::read().ok()? {
                Event::Key(key) => Some(translate_key(key)),
                Event::Mouse(mouse) => {
                    let action = match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => Some(Pointer::Down),
                        MouseEventKind::Up(MouseButton::Left) => Some(Pointer::Up),
                        MouseEventKind::ScrollUp => Some(Pointer::ScrollUp),
                        MouseEventKind::ScrollDown => Some(Pointer::ScrollDown),
                        _ => None,
                    };
                    action.map(|action| AppEvent::Pointer { action, column: mouse.column, row: mouse.row })
                }
                Event::Resize(_, _) => Some(AppEvent::Resize),
                _ => None,
            };
            if translated.is_some() {
                return translated;
            }
            // skip moves and focus changes without blocking again
            wait = Duration::ZERO;
        }
    }
}

fn translate_key(key: KeyEvent) -> AppEvent {
    let code = match key.code {
        CtKey::Char(c) => KeyCode::Char(c),
        CtKey::Esc => KeyCode::Esc,
        CtKey::Tab => KeyCode::Tab,
        CtKey::BackTab => KeyCode::BackTab,
        CtKey::Up => KeyCode::Up,
        CtKey::Down => KeyCode::Down,
        CtKey::Left => KeyCode::Left,
        CtKey::Right => KeyCode::Right,
        _ => KeyCode::Other,
    };
    if key.kind == KeyEventKind::Release {
        return AppEvent::Release(code);
    }
    AppEvent::Press(KeyPress {
        code,
        mods: Modifiers {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        },
        at: Instant::now(),
        repeat: key.kind == KeyEventKind::Repeat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_kind_becomes_release_event() {
        let mut key = KeyEvent::new(CtKey::Char('h'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(matches!(translate_key(key), AppEvent::Release(KeyCode::Char('h'))));
    }

    #[test]
    fn repeat_is_flagged() {
        let mut key = KeyEvent::new(CtKey::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Repeat;
        match translate_key(key) {
            AppEvent::Press(p) => assert!(p.repeat),
            other => panic!("expected press, got {:?}", other),
        }
    }

    #[test]
    fn ctrl_modifier() {
        let key = KeyEvent::new(CtKey::Char('c'), KeyModifiers::CONTROL);
        match translate_key(key) {
            AppEvent::Press(p) => {
                assert_eq!(p.code, KeyCode::Char('c'));
                assert!(p.mods.ctrl && !p.mods.alt);
            }
            other => panic!("expected press, got {:?}", other),
        }
    }
}
