//! Instrument construction: the key set plus validated startup settings.

use std::fmt;

use keybed_types::{
    InstrumentState, Key, Waveform, DEFAULT_NOTE_DURATION, DEFAULT_REFERENCE_PITCH, DEFAULT_VOLUME,
    KEY_COUNT, MAX_VOLUME,
};

/// Startup values, usually taken from [`crate::config::Config::instrument_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSettings {
    pub volume: u8,
    pub waveform: Waveform,
    /// Seconds per note
    pub note_duration: f64,
    /// Frequency of the A key in Hz
    pub reference_pitch: f64,
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            waveform: Waveform::default(),
            note_duration: DEFAULT_NOTE_DURATION,
            reference_pitch: DEFAULT_REFERENCE_PITCH,
        }
    }
}

/// Instrument setup failed. Startup must abort.
#[derive(Debug, Clone, PartialEq)]
pub enum InitError {
    VolumeOutOfRange(u8),
    InvalidNoteDuration(f64),
    InvalidReferencePitch(f64),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VolumeOutOfRange(v) => write!(f, "volume {} out of range 0..={}", v, MAX_VOLUME),
            Self::InvalidNoteDuration(d) => write!(f, "note duration must be a positive number of seconds, got {}", d),
            Self::InvalidReferencePitch(p) => write!(f, "reference pitch must be a positive frequency, got {}", p),
        }
    }
}

impl std::error::Error for InitError {}

/// The 13 keys and the performance state they drive.
#[derive(Debug, Clone)]
pub struct Instrument {
    keys: [Key; KEY_COUNT],
    pub state: InstrumentState,
    pub note_duration: f64,
    pub reference_pitch: f64,
}

impl Instrument {
    pub fn init(settings: &InstrumentSettings) -> Result<Self, InitError> {
        if settings.volume > MAX_VOLUME {
            return Err(InitError::VolumeOutOfRange(settings.volume));
        }
        if !(settings.note_duration.is_finite() && settings.note_duration > 0.0) {
            return Err(InitError::InvalidNoteDuration(settings.note_duration));
        }
        if !(settings.reference_pitch.is_finite() && settings.reference_pitch > 0.0) {
            return Err(InitError::InvalidReferencePitch(settings.reference_pitch));
        }

        log::info!(
            target: "instrument",
            "initialised {} keys, volume {}, {}, A = {} Hz",
            KEY_COUNT,
            settings.volume,
            settings.waveform.label(),
            settings.reference_pitch
        );

        Ok(Self {
            keys: Key::ALL,
            state: InstrumentState::new(settings.volume, settings.waveform),
            note_duration: settings.note_duration,
            reference_pitch: settings.reference_pitch,
        })
    }

    pub fn keys(&self) -> &[Key; KEY_COUNT] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_with_defaults() {
        let instrument = Instrument::init(&InstrumentSettings::default()).unwrap();
        assert_eq!(instrument.keys().len(), 13);
        assert_eq!(instrument.keys()[0].name(), "C");
        assert_eq!(instrument.keys()[9].name(), "A");
        assert_eq!(instrument.state, InstrumentState::default());
        assert!((instrument.note_duration - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn init_carries_settings() {
        let settings = InstrumentSettings {
            volume: 30,
            waveform: Waveform::Triangle,
            note_duration: 1.25,
            reference_pitch: 432.0,
        };
        let instrument = Instrument::init(&settings).unwrap();
        assert_eq!(instrument.state.volume, 30);
        assert_eq!(instrument.state.waveform, Waveform::Triangle);
        assert_eq!(instrument.state.held_keys(), 0);
        assert!((instrument.reference_pitch - 432.0).abs() < f64::EPSILON);
    }

    #[test]
    fn init_rejects_loud_volume() {
        let settings = InstrumentSettings { volume: 101, ..Default::default() };
        assert_eq!(Instrument::init(&settings).unwrap_err(), InitError::VolumeOutOfRange(101));
    }

    #[test]
    fn init_rejects_bad_duration() {
        for d in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let settings = InstrumentSettings { note_duration: d, ..Default::default() };
            assert!(matches!(Instrument::init(&settings), Err(InitError::InvalidNoteDuration(_))));
        }
    }

    #[test]
    fn init_rejects_bad_reference_pitch() {
        let settings = InstrumentSettings { reference_pitch: 0.0, ..Default::default() };
        let err = Instrument::init(&settings).unwrap_err();
        assert!(err.to_string().contains("reference pitch"));
    }
}
