//! Append-only JSONL log of keyboard actions, and replay of such a log.
//!
//! The log lives at `~/.local/share/keybed/actions.jsonl` (platform data dir)
//! and is tailable via `tail -f`. Each session starts with a header line:
//!
//! ```text
//! {"event":"session_start","epoch_ms":1760601600000,"pid":4242}
//! {"t_ms":812,"action":{"Press":9}}
//! {"t_ms":950,"action":{"Release":9}}
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use keybed_types::KeyboardAction;

use crate::controller::KeyController;

/// Default log location.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keybed")
        .join("actions.jsonl")
}

pub struct ActionLog {
    writer: BufWriter<File>,
    session_start: Instant,
}

#[derive(Serialize)]
struct SessionHeader {
    event: &'static str,
    epoch_ms: u128,
    pid: u32,
}

#[derive(Serialize)]
struct LogEntry<'a> {
    t_ms: u128,
    action: &'a KeyboardAction,
}

/// Deserialized log line for replay.
#[derive(Deserialize)]
struct ReplayEntry {
    // session headers have `event` instead of `action`
    action: Option<KeyboardAction>,
}

impl ActionLog {
    /// Open (append) the log at `path`, creating parent directories.
    /// Returns None if the file cannot be opened; logging is optional.
    pub fn open(path: &Path) -> Option<Self> {
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!(target: "action_log", "cannot create {}: {}", dir.display(), e);
                return None;
            }
        }
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!(target: "action_log", "cannot open {}: {}", path.display(), e);
                return None;
            }
        };
        let mut log = Self {
            writer: BufWriter::new(file),
            session_start: Instant::now(),
        };
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        log.write_line(&SessionHeader {
            event: "session_start",
            epoch_ms,
            pid: std::process::id(),
        });
        Some(log)
    }

    pub fn open_default() -> Option<Self> {
        Self::open(&default_log_path())
    }

    pub fn record(&mut self, action: &KeyboardAction) {
        let t_ms = self.session_start.elapsed().as_millis();
        self.write_line(&LogEntry { t_ms, action });
    }

    /// One JSON object per line, flushed immediately.
    fn write_line<T: Serialize>(&mut self, value: &T) {
        let written = serde_json::to_writer(&mut self.writer, value)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            log::warn!(target: "action_log", "write failed: {}", e);
        }
    }
}

/// Error type for action log replay.
#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Json { line: usize, source: serde_json::Error },
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json { line, source } => write!(f, "JSON error on line {}: {}", line, source),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Feed every action in the log at `path` through `controller`, in order.
///
/// Session headers and blank lines are skipped. Returns the number of actions
/// replayed. Stops at the first line that is not valid JSON.
pub fn replay_action_log(path: &Path, controller: &mut KeyController) -> Result<usize, ReplayError> {
    let file = File::open(path)?;
    let mut replayed = 0;
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ReplayEntry = serde_json::from_str(&line)
            .map_err(|source| ReplayError::Json { line: i + 1, source })?;
        if let Some(action) = entry.action {
            controller.dispatch(&action);
            replayed += 1;
        }
    }
    log::info!(target: "action_log", "replayed {} actions from {}", replayed, path.display());
    Ok(replayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybed_audio::NullPlayer;
    use keybed_types::Key;

    use crate::instrument::{Instrument, InstrumentSettings};

    fn controller() -> KeyController {
        let instrument = Instrument::init(&InstrumentSettings::default()).unwrap();
        KeyController::new(instrument, Box::new(NullPlayer))
    }

    #[test]
    fn replay_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        File::create(&path).unwrap();

        let mut ctl = controller();
        assert_eq!(replay_action_log(&path, &mut ctl).unwrap(), 0);
        assert_eq!(ctl.state().held_keys(), 0);
    }

    #[test]
    fn replay_with_session_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"event":"session_start","epoch_ms":1760601600000,"pid":12345}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":10,"action":{{"SetVolume":40}}}}"#).unwrap();
        writeln!(f).unwrap();
        writeln!(f, "   \t").unwrap();
        writeln!(f, r#"{{"t_ms":20,"action":{{"Press":9}}}}"#).unwrap();

        let mut ctl = controller();
        assert_eq!(replay_action_log(&path, &mut ctl).unwrap(), 2);
        assert_eq!(ctl.state().volume, 40);
        assert_eq!(ctl.state().held_keys(), 1);
    }

    #[test]
    fn record_then_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("actions.jsonl");
        {
            let mut log = ActionLog::open(&path).unwrap();
            log.record(&KeyboardAction::SetWaveform("Square".into()));
            log.record(&KeyboardAction::Press(Key::new(0).unwrap()));
            log.record(&KeyboardAction::Press(Key::new(4).unwrap()));
            log.record(&KeyboardAction::Release(Key::new(4).unwrap()));
        }

        let mut ctl = controller();
        assert_eq!(replay_action_log(&path, &mut ctl).unwrap(), 4);
        assert_eq!(ctl.state().held_keys(), 1);
        assert_eq!(ctl.state().waveform.synth_name(), "square");
    }

    #[test]
    fn open_under_a_file_gives_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        File::create(&blocker).unwrap();
        assert!(ActionLog::open(&blocker.join("actions.jsonl")).is_none());
    }

    #[test]
    fn invalid_json_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"t_ms":1,"action":{{"Press":2}}}}"#).unwrap();
        writeln!(f, "not json").unwrap();

        let mut ctl = controller();
        match replay_action_log(&path, &mut ctl) {
            Err(ReplayError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JSON error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"t_ms":1,"action":{{"Press":13}}}}"#).unwrap();

        let mut ctl = controller();
        assert!(matches!(replay_action_log(&path, &mut ctl), Err(ReplayError::Json { line: 1, .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctl = controller();
        let err = replay_action_log(&dir.path().join("missing.jsonl"), &mut ctl).unwrap_err();
        assert!(matches!(err, ReplayError::Io(_)));
    }
}
