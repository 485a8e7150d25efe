//! Key-press audio controller.
//!
//! Turns keyboard actions into play / stop requests and keeps the
//! instrument state (volume, waveform, held-key count) up to date. All calls
//! are synchronous and run on the UI thread; the player decides how sound is
//! actually produced.

use keybed_audio::AudioPlayer;
use keybed_types::{key_freq, InstrumentState, Key, KeyboardAction, PlayRequest, Waveform, KEY_COUNT};

use crate::instrument::Instrument;

pub struct KeyController {
    instrument: Instrument,
    player: Box<dyn AudioPlayer>,
}

impl KeyController {
    pub fn new(instrument: Instrument, player: Box<dyn AudioPlayer>) -> Self {
        Self { instrument, player }
    }

    pub fn state(&self) -> &InstrumentState {
        &self.instrument.state
    }

    pub fn keys(&self) -> &[Key; KEY_COUNT] {
        self.instrument.keys()
    }

    /// The request a press of `key` would issue right now.
    pub fn request_for(&self, key: Key) -> PlayRequest {
        let state = &self.instrument.state;
        PlayRequest {
            waveform: state.waveform,
            frequency: key_freq(key.index(), self.instrument.reference_pitch),
            duration: self.instrument.note_duration,
            gain: state.next_note_gain(),
        }
    }

    /// Start a note for `key`, then count it as held.
    ///
    /// Returns the request that was sent. A player failure is logged, not
    /// returned: playback is best-effort.
    pub fn on_press(&mut self, key: Key) -> PlayRequest {
        let request = self.request_for(key);
        log::debug!(
            target: "controller",
            "press {} ({}): {} {:.2} Hz gain {:.3}",
            key,
            key.index(),
            request.waveform.synth_name(),
            request.frequency,
            request.gain
        );
        if let Err(e) = self.player.play(&request) {
            log::warn!(target: "controller", "play failed for key {}: {}", key.index(), e);
        }
        self.instrument.state.key_down();
        request
    }

    /// Stop all playback (not just this key's note) and count the release.
    pub fn on_release(&mut self, key: Key) {
        log::debug!(target: "controller", "release {} ({})", key, key.index());
        if let Err(e) = self.player.stop_all() {
            log::warn!(target: "controller", "stop failed: {}", e);
        }
        if !self.instrument.state.key_up() {
            log::warn!(target: "controller", "release of key {} without a held key", key.index());
        }
    }

    /// Takes effect on the next press; sounding notes keep their gain.
    pub fn on_volume_change(&mut self, volume: u8) {
        self.instrument.state.set_volume(volume);
        log::debug!(target: "controller", "volume {}", self.instrument.state.volume);
    }

    /// Unknown labels select Sine.
    pub fn on_waveform_change(&mut self, label: &str) {
        let waveform = Waveform::from_label(label);
        if waveform.label() != label {
            log::debug!(target: "controller", "unknown waveform {:?}, using {}", label, waveform.label());
        }
        self.instrument.state.waveform = waveform;
    }

    /// Route an action to its handler. Returns the play request for presses.
    pub fn dispatch(&mut self, action: &KeyboardAction) -> Option<PlayRequest> {
        match action {
            KeyboardAction::Press(key) => Some(self.on_press(*key)),
            KeyboardAction::Release(key) => {
                self.on_release(*key);
                None
            }
            KeyboardAction::SetVolume(volume) => {
                self.on_volume_change(*volume);
                None
            }
            KeyboardAction::SetWaveform(label) => {
                self.on_waveform_change(label);
                None
            }
        }
    }
}
