use serde::{Deserialize, Serialize};

use crate::waveform::Waveform;

/// Length of every note in seconds.
pub const DEFAULT_NOTE_DURATION: f64 = 0.5;

/// A fire-and-forget note for the audio player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub waveform: Waveform,
    /// Hz
    pub frequency: f64,
    /// Seconds
    pub duration: f64,
    /// Linear amplitude factor, 0.0..=1.0
    pub gain: f64,
}
