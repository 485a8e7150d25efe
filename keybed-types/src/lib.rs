//! # keybed-types
//!
//! Shared type definitions for the keybed instrument.
//! Everything here is pure data and math; no I/O, no audio, no terminal.

pub mod action;
pub mod instrument;
pub mod key;
pub mod layout;
pub mod request;
pub mod tuning;
pub mod waveform;

pub use action::KeyboardAction;
pub use instrument::{InstrumentState, DEFAULT_VOLUME, MAX_VOLUME};
pub use key::{Key, KeyIndexError, KEY_COUNT, REFERENCE_INDEX};
pub use layout::KeyboardLayout;
pub use request::{PlayRequest, DEFAULT_NOTE_DURATION};
pub use tuning::{key_freq, polyphony_gain, DEFAULT_REFERENCE_PITCH};
pub use waveform::Waveform;
