//! User intents delivered by the UI event source.
//!
//! The four variants are the complete handler set: the UI never mutates
//! instrument state directly, it only produces these.

use serde::{Deserialize, Serialize};

use crate::key::Key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardAction {
    /// A key went down
    Press(Key),
    /// A key came up
    Release(Key),
    /// Volume control moved (0..=100)
    SetVolume(u8),
    /// Waveform selector changed; carries the selector label
    SetWaveform(String),
}

impl KeyboardAction {
    /// Short description for status lines and logs.
    pub fn describe(&self) -> String {
        match self {
            KeyboardAction::Press(key) => format!("press {} ({})", key, key.index()),
            KeyboardAction::Release(key) => format!("release {} ({})", key, key.index()),
            KeyboardAction::SetVolume(v) => format!("volume {}", v),
            KeyboardAction::SetWaveform(label) => format!("waveform {}", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_press() {
        let key = Key::new(9).unwrap();
        assert_eq!(KeyboardAction::Press(key).describe(), "press A (9)");
    }

    #[test]
    fn describe_waveform() {
        let action = KeyboardAction::SetWaveform("Square".to_string());
        assert_eq!(action.describe(), "waveform Square");
    }
}
