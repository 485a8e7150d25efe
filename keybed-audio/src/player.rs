//! Audio player trait: the two operations the instrument needs from a sound source.
//!
//! `AudioPlayer` captures what the controller *means* to do (start a note, silence
//! everything) independently of how it's done (spawning a synthesizer process).

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use keybed_types::PlayRequest;

/// Result type for player operations.
pub type PlayerResult<T = ()> = Result<T, PlayerError>;

/// Error from a player operation.
#[derive(Debug, Clone)]
pub struct PlayerError(pub String);

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlayerError {}

impl From<std::io::Error> for PlayerError {
    fn from(e: std::io::Error) -> Self {
        PlayerError(e.to_string())
    }
}

/// Sound source driven by the key controller.
///
/// `play` must not block for the duration of the note and returns no handle;
/// overlapping notes are allowed. `stop_all` silences every note this player
/// started, whichever key triggered it.
pub trait AudioPlayer: Send {
    /// Start one note.
    fn play(&self, request: &PlayRequest) -> PlayerResult;

    /// Stop everything currently sounding.
    fn stop_all(&self) -> PlayerResult;
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Test Player ────────────────────────────────────────────────────

/// An operation recorded by `TestPlayer` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerOp {
    Play(PlayRequest),
    StopAll,
}

/// A test player that records all operations into a vector for assertions.
/// All operations succeed unless `fail_next` was called. Uses `Mutex` for
/// interior mutability so the player is `Send + Sync` (needed for
/// `Arc<TestPlayer>` sharing).
pub struct TestPlayer {
    ops: Mutex<Vec<PlayerOp>>,
    fail_next: Mutex<Option<String>>,
}

impl TestPlayer {
    pub fn new() -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<PlayerOp> {
        lock(&self.ops).clone()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        lock(&self.ops).clear();
    }

    /// Make the next operation fail with `message` (it is still recorded).
    pub fn fail_next(&self, message: &str) {
        *lock(&self.fail_next) = Some(message.to_string());
    }

    /// Return all play requests in order.
    pub fn plays(&self) -> Vec<PlayRequest> {
        lock(&self.ops)
            .iter()
            .filter_map(|op| match op {
                PlayerOp::Play(req) => Some(*req),
                PlayerOp::StopAll => None,
            })
            .collect()
    }

    /// Number of stop-all requests.
    pub fn stop_count(&self) -> usize {
        lock(&self.ops)
            .iter()
            .filter(|op| matches!(op, PlayerOp::StopAll))
            .count()
    }

    fn record(&self, op: PlayerOp) -> PlayerResult {
        lock(&self.ops).push(op);
        match lock(&self.fail_next).take() {
            Some(message) => Err(PlayerError(message)),
            None => Ok(()),
        }
    }
}

impl Default for TestPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for TestPlayer {
    fn play(&self, request: &PlayRequest) -> PlayerResult {
        self.record(PlayerOp::Play(*request))
    }

    fn stop_all(&self) -> PlayerResult {
        self.record(PlayerOp::StopAll)
    }
}

/// Wraps `Arc<TestPlayer>` to implement `AudioPlayer` so the controller can
/// own a `Box<dyn AudioPlayer>` while tests retain an `Arc` for assertions.
pub struct SharedTestPlayer(pub Arc<TestPlayer>);

impl AudioPlayer for SharedTestPlayer {
    fn play(&self, request: &PlayRequest) -> PlayerResult {
        self.0.play(request)
    }
    fn stop_all(&self) -> PlayerResult {
        self.0.stop_all()
    }
}

// ─── NullPlayer ─────────────────────────────────────────────────────

/// A no-op player that silently succeeds. Used for `--mute` and headless replay.
pub struct NullPlayer;

impl AudioPlayer for NullPlayer {
    fn play(&self, _: &PlayRequest) -> PlayerResult { Ok(()) }
    fn stop_all(&self) -> PlayerResult { Ok(()) }
}
