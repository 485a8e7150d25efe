//! # keybed-core
//!
//! Backend library for the keybed instrument: everything between a UI event
//! and a sound request, independent of any UI framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keybed_core::config::Config;
//! use keybed_core::controller::KeyController;
//! use keybed_core::instrument::Instrument;
//! use keybed_audio::SoxPlayer;
//! use keybed_types::{Key, KeyboardAction};
//!
//! let config = Config::load();
//! let instrument = Instrument::init(&config.instrument_settings())?;
//! let player = SoxPlayer::new(config.player_program(), config.sample_rate());
//! let mut controller = KeyController::new(instrument, Box::new(player));
//!
//! controller.dispatch(&KeyboardAction::Press(Key::new(9).unwrap()));
//! controller.dispatch(&KeyboardAction::Release(Key::new(9).unwrap()));
//! ```
//!
//! ## Module Overview
//!
//! - [`controller`]: `KeyController`: press / release / volume / waveform handlers
//! - [`instrument`]: `Instrument::init`, the only fatal startup check
//! - [`config`]: TOML configuration loading (embedded + user override)
//! - [`action_log`]: JSONL action recording and replay

pub mod action_log;
pub mod config;
pub mod controller;
pub mod instrument;

pub use controller::KeyController;
pub use instrument::{InitError, Instrument, InstrumentSettings};
