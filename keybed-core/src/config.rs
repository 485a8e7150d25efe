use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use keybed_types::{KeyboardLayout, Waveform};

use crate::instrument::InstrumentSettings;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    instrument: InstrumentConfig,
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Deserialize, Default)]
struct InstrumentConfig {
    volume: Option<u8>,
    waveform: Option<String>,
    note_duration: Option<f64>,
    reference_pitch: Option<f64>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    player: Option<String>,
    sample_rate: Option<u32>,
}

#[derive(Deserialize, Default)]
struct UiConfig {
    keyboard_layout: Option<String>,
    release_timeout_ms: Option<u64>,
}

pub struct Config {
    instrument: InstrumentConfig,
    audio: AudioConfig,
    ui: UiConfig,
}

impl Config {
    /// Embedded defaults merged with `~/.config/keybed/config.toml` if present.
    pub fn load() -> Self {
        Self::load_with_override(user_config_path().as_deref())
    }

    /// Embedded defaults merged with the file at `path`, if given and present.
    /// A malformed or unreadable file is logged and ignored.
    pub fn load_with_override(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_instrument(&mut base.instrument, user.instrument);
                            merge_audio(&mut base.audio, user.audio);
                            merge_ui(&mut base.ui, user.ui);
                            log::info!(target: "config", "loaded {}", path.display());
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            instrument: base.instrument,
            audio: base.audio,
            ui: base.ui,
        }
    }

    /// Startup values for the instrument. Not validated here; see `Instrument::init`.
    pub fn instrument_settings(&self) -> InstrumentSettings {
        let fallback = InstrumentSettings::default();
        InstrumentSettings {
            volume: self.instrument.volume.unwrap_or(fallback.volume),
            waveform: self
                .instrument
                .waveform
                .as_deref()
                .and_then(parse_waveform)
                .unwrap_or(fallback.waveform),
            note_duration: self.instrument.note_duration.unwrap_or(fallback.note_duration),
            reference_pitch: self
                .instrument
                .reference_pitch
                .unwrap_or(fallback.reference_pitch),
        }
    }

    /// Synthesizer executable for the process player.
    pub fn player_program(&self) -> &str {
        self.audio.player.as_deref().unwrap_or(keybed_audio::sox::DEFAULT_PROGRAM)
    }

    pub fn sample_rate(&self) -> u32 {
        match self.audio.sample_rate {
            Some(0) | None => keybed_audio::sox::DEFAULT_SAMPLE_RATE,
            Some(rate) => rate,
        }
    }

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        self.ui
            .keyboard_layout
            .as_deref()
            .and_then(parse_keyboard_layout)
            .unwrap_or_default()
    }

    /// How long a key stays down without a repeat before it counts as released
    /// (clamped to 20..=2000 ms).
    pub fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.release_timeout_ms.unwrap_or(150).clamp(20, 2000))
    }
}

/// `~/.config/keybed/config.toml` on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keybed").join("config.toml"))
}

fn merge_instrument(base: &mut InstrumentConfig, user: InstrumentConfig) {
    if user.volume.is_some() {
        base.volume = user.volume;
    }
    if user.waveform.is_some() {
        base.waveform = user.waveform;
    }
    if user.note_duration.is_some() {
        base.note_duration = user.note_duration;
    }
    if user.reference_pitch.is_some() {
        base.reference_pitch = user.reference_pitch;
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.player.is_some() {
        base.player = user.player;
    }
    if user.sample_rate.is_some() {
        base.sample_rate = user.sample_rate;
    }
}

fn merge_ui(base: &mut UiConfig, user: UiConfig) {
    if user.keyboard_layout.is_some() {
        base.keyboard_layout = user.keyboard_layout;
    }
    if user.release_timeout_ms.is_some() {
        base.release_timeout_ms = user.release_timeout_ms;
    }
}

fn parse_waveform(s: &str) -> Option<Waveform> {
    match s.to_lowercase().as_str() {
        "sine" | "sin" => Some(Waveform::Sine),
        "triangle" => Some(Waveform::Triangle),
        "square" => Some(Waveform::Square),
        _ => None,
    }
}

fn parse_keyboard_layout(s: &str) -> Option<KeyboardLayout> {
    match s.to_lowercase().as_str() {
        "qwerty" => Some(KeyboardLayout::Qwerty),
        "colemak" => Some(KeyboardLayout::Colemak),
        _ => None,
    }
}
