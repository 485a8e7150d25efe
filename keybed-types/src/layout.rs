use serde::{Deserialize, Serialize};

/// Physical layout of the computer keyboard used to play the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Colemak,
}
