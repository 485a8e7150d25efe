use serde::{Deserialize, Serialize};

/// Oscillator shape used for new notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Triangle, Waveform::Square];

    /// Label shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::Square => "Square",
        }
    }

    /// Name understood by the synthesizer command.
    pub fn synth_name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sin",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
        }
    }

    /// Map a selector label to a waveform. Unknown labels fall back to Sine.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Sine" => Waveform::Sine,
            "Triangle" => Waveform::Triangle,
            "Square" => Waveform::Square,
            _ => Waveform::Sine,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Waveform::Sine => Waveform::Triangle,
            Waveform::Triangle => Waveform::Square,
            Waveform::Square => Waveform::Sine,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Waveform::Sine => Waveform::Square,
            Waveform::Triangle => Waveform::Sine,
            Waveform::Square => Waveform::Triangle,
        }
    }
}
