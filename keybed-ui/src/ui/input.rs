use std::time::{Duration, Instant};

/// Keys the instrument screen reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Esc,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
}

/// A key going down, or auto-repeating while held.
#[derive(Debug, Clone, Copy)]
pub struct KeyPress {
    pub code: KeyCode,
    pub mods: Modifiers,
    pub at: Instant,
    pub repeat: bool,
}

impl KeyPress {
    pub fn new(code: KeyCode) -> Self {
        Self { code, mods: Modifiers::default(), at: Instant::now(), repeat: false }
    }

    #[cfg(test)]
    pub fn with_ctrl(mut self) -> Self {
        self.mods.ctrl = true;
        self
    }

    #[cfg(test)]
    pub fn at(mut self, at: Instant) -> Self {
        self.at = at;
        self
    }
}

/// Left-button pointer actions and wheel steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Down,
    Up,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    Press(KeyPress),
    /// Only delivered when the terminal reports key releases (kitty protocol)
    Release(KeyCode),
    Pointer { action: Pointer, column: u16, row: u16 },
    Resize,
}

pub trait InputSource {
    /// Next event, or None once `timeout` passes without one.
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}
