use std::collections::HashMap;
use std::time::{Duration, Instant};

use keybed_types::{Key, KeyboardLayout};

/// Translate a key character from the configured layout to QWERTY physical position.
pub fn translate_key(c: char, layout: KeyboardLayout) -> char {
    match layout {
        KeyboardLayout::Qwerty => c,
        KeyboardLayout::Colemak => colemak_to_qwerty(c),
    }
}

fn colemak_to_qwerty(c: char) -> char {
    match c {
        // top row
        'f' => 'e', 'p' => 'r', 'g' => 't', 'j' => 'y',
        'l' => 'u', 'u' => 'i', 'y' => 'o', ';' => 'p',
        // home row
        'r' => 's', 's' => 'd', 't' => 'f', 'd' => 'g',
        'n' => 'j', 'e' => 'k', 'i' => 'l', 'o' => ';',
        // bottom row
        'k' => 'n',
        // unchanged keys pass through
        other => other,
    }
}

/// Map a QWERTY character to a keyboard key: home row are the naturals,
/// the row above the sharps, like a piano laid on the keyboard.
pub fn key_for_char(c: char) -> Option<Key> {
    let index = match c {
        'a' => 0,   // C
        'w' => 1,   // C#
        's' => 2,   // D
        'e' => 3,   // D#
        'd' => 4,   // E
        'f' => 5,   // F
        't' => 6,   // F#
        'g' => 7,   // G
        'y' => 8,   // G#
        'h' => 9,   // A
        'u' => 10,  // A#
        'j' => 11,  // B
        'k' => 12,  // C (octave up)
        _ => return None,
    };
    Key::new(index)
}

/// Character that plays `key`, for labels.
pub fn char_for_key(key: Key) -> char {
    const CHARS: [char; 13] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k'];
    CHARS[key.index() as usize]
}

/// Held-key tracking for computer-keyboard play.
///
/// Terminals without key-release reporting only send repeats while a key is
/// held, so a key that has not repeated within `release_timeout` counts as
/// released. With release reporting, `key_released` is used instead.
pub struct PianoKeyboard {
    active_keys: HashMap<char, (Key, Instant)>,  // char -> (key, last_event_time)
    release_timeout: Duration,
}

impl PianoKeyboard {
    pub fn new(release_timeout: Duration) -> Self {
        Self {
            active_keys: HashMap::new(),
            release_timeout,
        }
    }

    /// Returns true if this is a NEW press (start a note),
    /// false for key repeat (sustain, ignore).
    pub fn key_pressed(&mut self, c: char, key: Key, now: Instant) -> bool {
        if let Some(entry) = self.active_keys.get_mut(&c) {
            entry.1 = now;
            return false;
        }
        self.active_keys.insert(c, (key, now));
        true
    }

    /// Explicit release. Returns the key if it was held.
    pub fn key_released(&mut self, c: char) -> Option<Key> {
        self.active_keys.remove(&c).map(|(key, _)| key)
    }

    /// Keys that have not repeated within the timeout, in key order.
    pub fn check_releases(&mut self, now: Instant) -> Vec<Key> {
        let mut to_release = Vec::new();
        self.active_keys.retain(|_, (key, last_time)| {
            if now.duration_since(*last_time) > self.release_timeout {
                to_release.push(*key);
                false
            } else {
                true
            }
        });
        to_release.sort();
        to_release
    }

    /// Release all active keys, in key order.
    pub fn release_all(&mut self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.active_keys.drain().map(|(_, (key, _))| key).collect();
        keys.sort();
        keys
    }

    pub fn has_active_keys(&self) -> bool {
        !self.active_keys.is_empty()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.active_keys.values().any(|(k, _)| *k == key)
    }
}
