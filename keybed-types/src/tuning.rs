//! Pitch and loudness math. Pure functions, no audio dependencies.

use crate::key::REFERENCE_INDEX;

/// Concert A.
pub const DEFAULT_REFERENCE_PITCH: f64 = 440.0;

/// Equal-tempered frequency of a key, with `REFERENCE_INDEX` tuned to `reference_pitch`.
pub fn key_freq(index: u8, reference_pitch: f64) -> f64 {
    let semitones = index as f64 - REFERENCE_INDEX as f64;
    reference_pitch * 2.0_f64.powf(semitones / 12.0)
}

/// Per-note gain for a new note while `held` other keys are down.
pub fn polyphony_gain(volume: u8, held: u32) -> f64 {
    volume as f64 / 100.0 / (held as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_key_is_a440() {
        assert!((key_freq(9, DEFAULT_REFERENCE_PITCH) - 440.0).abs() < 1e-9);
    }

    #[test]
    fn first_key_is_middle_c() {
        assert!((key_freq(0, DEFAULT_REFERENCE_PITCH) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn last_key_is_octave_above_first() {
        let low = key_freq(0, DEFAULT_REFERENCE_PITCH);
        let high = key_freq(12, DEFAULT_REFERENCE_PITCH);
        assert!((high / low - 2.0).abs() < 1e-9);
    }

    #[test]
    fn strictly_increasing() {
        for i in 0..12u8 {
            assert!(key_freq(i + 1, 440.0) > key_freq(i, 440.0));
        }
    }

    #[test]
    fn reference_pitch_scales_linearly() {
        let a432 = key_freq(4, 432.0);
        let a440 = key_freq(4, 440.0);
        assert!((a440 / a432 - 440.0 / 432.0).abs() < 1e-9);
    }

    #[test]
    fn gain_full_volume_single_key() {
        assert!((polyphony_gain(100, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gain_divides_by_held_keys() {
        assert!((polyphony_gain(50, 1) - 0.25).abs() < f64::EPSILON);
        assert!((polyphony_gain(100, 3) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn gain_stays_in_unit_range() {
        for volume in 0..=100u8 {
            for held in 0..13u32 {
                let g = polyphony_gain(volume, held);
                assert!((0.0..=1.0).contains(&g), "volume={volume} held={held} gain={g}");
                if volume > 0 {
                    assert!(g > 0.0);
                }
            }
        }
    }
}
