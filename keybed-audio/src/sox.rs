//! Player backend that spawns the sox `play` command once per note.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use keybed_types::PlayRequest;

use crate::player::{lock, AudioPlayer, PlayerResult};

pub const DEFAULT_PROGRAM: &str = "play";
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Spawns one synthesizer process per note and keeps the handles so that
/// `stop_all` can terminate them and finished ones get reaped.
pub struct SoxPlayer {
    program: String,
    sample_rate: u32,
    children: Mutex<Vec<Child>>,
}

impl SoxPlayer {
    pub fn new(program: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            program: program.into(),
            sample_rate,
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the synthesizer binary can be launched at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    /// Number of spawned notes that have not exited yet.
    pub fn active_notes(&self) -> usize {
        let mut children = lock(&self.children);
        reap_finished(&mut children);
        children.len()
    }

    /// Arguments for one note, e.g.
    /// `-V1 -r 48000 -n synth sin 440.000000 trim 0 0.5 vol 1.000000`.
    pub fn synth_args(request: &PlayRequest, sample_rate: u32) -> Vec<String> {
        vec![
            "-V1".to_string(),
            "-r".to_string(),
            sample_rate.to_string(),
            "-n".to_string(),
            "synth".to_string(),
            request.waveform.synth_name().to_string(),
            format!("{:.6}", request.frequency),
            "trim".to_string(),
            "0".to_string(),
            request.duration.to_string(),
            "vol".to_string(),
            format!("{:.6}", request.gain),
        ]
    }
}

fn reap_finished(children: &mut Vec<Child>) {
    children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
}

impl AudioPlayer for SoxPlayer {
    fn play(&self, request: &PlayRequest) -> PlayerResult {
        let args = Self::synth_args(request, self.sample_rate);
        log::debug!(target: "player", "{} {}", self.program, args.join(" "));

        let mut children = lock(&self.children);
        reap_finished(&mut children);
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        children.push(child);
        Ok(())
    }

    fn stop_all(&self) -> PlayerResult {
        let mut children = lock(&self.children);
        for mut child in children.drain(..) {
            // Already-exited children may report an error here; the wait still reaps them.
            if let Err(e) = child.kill() {
                log::debug!(target: "player", "kill pid {}: {}", child.id(), e);
            }
            let _ = child.wait();
        }
        Ok(())
    }
}

impl Drop for SoxPlayer {
    fn drop(&mut self) {
        let _ = self.stop_all();
    }
}
