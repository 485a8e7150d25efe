use serde::{Deserialize, Serialize};

use crate::tuning::polyphony_gain;
use crate::waveform::Waveform;

pub const MAX_VOLUME: u8 = 100;
pub const DEFAULT_VOLUME: u8 = MAX_VOLUME;

/// Mutable performance state: the knob, the selector and how many keys are down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentState {
    /// Volume in percent (0..=100)
    pub volume: u8,
    pub waveform: Waveform,
    held_keys: u32,
}

impl Default for InstrumentState {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME, Waveform::default())
    }
}

impl InstrumentState {
    pub fn new(volume: u8, waveform: Waveform) -> Self {
        Self {
            volume: volume.min(MAX_VOLUME),
            waveform,
            held_keys: 0,
        }
    }

    /// Number of keys currently pressed.
    pub fn held_keys(&self) -> u32 {
        self.held_keys
    }

    /// Gain for a note started right now, before this press is counted.
    pub fn next_note_gain(&self) -> f64 {
        polyphony_gain(self.volume, self.held_keys)
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    pub fn key_down(&mut self) {
        self.held_keys = self.held_keys.saturating_add(1);
    }

    /// Count a release. Returns false if no key was held; the count stays at zero.
    pub fn key_up(&mut self) -> bool {
        match self.held_keys.checked_sub(1) {
            Some(n) => {
                self.held_keys = n;
                true
            }
            None => false,
        }
    }
}
