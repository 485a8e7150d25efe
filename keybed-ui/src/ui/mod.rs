pub mod input;
pub mod keyboard_view;
pub mod piano_keyboard;
pub mod render;
pub mod style;
pub mod terminal;

pub use input::{AppEvent, InputSource, KeyCode, KeyPress, Modifiers, Pointer};
pub use keyboard_view::{ViewLayout, ViewState};
pub use piano_keyboard::{key_for_char, translate_key, PianoKeyboard};
pub use render::{Rect, RenderBuf};
pub use style::{Color, Style};
pub use terminal::TerminalUi;
