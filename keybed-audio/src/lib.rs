//! # keybed-audio
//!
//! Sound output for the keybed instrument.
//!
//! - [`AudioPlayer`]: the two-operation contract the controller depends on
//! - [`SoxPlayer`]: spawns the sox `play` synthesizer per note
//! - [`TestPlayer`] / [`SharedTestPlayer`]: records operations for tests
//! - [`NullPlayer`]: silent

pub mod player;
pub mod sox;

pub use player::{AudioPlayer, NullPlayer, PlayerError, PlayerOp, PlayerResult, SharedTestPlayer, TestPlayer};
pub use sox::SoxPlayer;
