use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Audio Oscillator
================

The tuned generator stage of the voice. A phase accumulator walks through
one cycle of the selected waveform at the requested frequency; the phase
survives both waveform changes and de-selection of the stage, so switching
back to the oscillator never restarts the wave (no click from a phase
reset).

Waveform character, briefly:

  Sine      fundamental only - smooth, hollow
  Square    odd harmonics (1/n) - hollow but punchy
  Sawtooth  all harmonics (1/n) - bright, buzzy
  Triangle  odd harmonics (1/n²) - soft, mellow

Frequency is supplied per sample rather than per block because the voice
ramps pitch and detune continuously; a block-constant frequency would turn
every glide into a staircase.
*/

/// Waveform selection table: `[sine, square, sawtooth, triangle]`.
///
/// The index order matches the generator-mode knob (0..=3; 4 selects the
/// noise stage instead, which is not a waveform).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Look up a waveform by knob index. Returns `None` past the table.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Square),
            2 => Some(Waveform::Sawtooth),
            3 => Some(Waveform::Triangle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Phase-accumulator oscillator with a switchable waveform.
pub struct Oscillator {
    waveform: Waveform,
    /// Normalized phase in [0, 1). Persists across waveform changes.
    phase: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Change the waveform in place. The phase is untouched, so the shape
    /// changes mid-cycle without a restart transient.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency_hz` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency_hz: f32) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
            Waveform::Triangle => 4.0 * (self.phase - 0.5).abs() - 1.0,
        };

        self.phase += frequency_hz / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn sine_matches_closed_form() {
        let mut osc = Oscillator::new(Waveform::Sine, SAMPLE_RATE);
        let freq = 440.0;

        // sample n should be sin(2pi f n / sr)
        for n in 0..64 {
            let expected = (TAU * freq * n as f32 / SAMPLE_RATE).sin();
            let actual = osc.next_sample(freq);
            assert!(
                (actual - expected).abs() < 1e-4,
                "sample {n}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for index in 0..4 {
            let waveform = Waveform::from_index(index).unwrap();
            let mut osc = Oscillator::new(waveform, SAMPLE_RATE);
            for _ in 0..4096 {
                let s = osc.next_sample(997.0);
                assert!(
                    (-1.0..=1.0).contains(&s),
                    "{} out of range: {s}",
                    waveform.name()
                );
            }
        }
    }

    #[test]
    fn waveform_switch_keeps_phase() {
        let mut osc = Oscillator::new(Waveform::Sine, SAMPLE_RATE);
        for _ in 0..100 {
            osc.next_sample(440.0);
        }

        // Switching shapes must not snap the sawtooth back to its start
        osc.set_waveform(Waveform::Sawtooth);
        let expected_phase = (440.0 * 100.0 / SAMPLE_RATE).fract();
        let saw = osc.next_sample(440.0);
        assert!(
            (saw - (2.0 * expected_phase - 1.0)).abs() < 1e-4,
            "phase should persist across waveform change"
        );
    }

    #[test]
    fn index_past_table_is_none() {
        assert_eq!(Waveform::from_index(4), None);
        assert_eq!(Waveform::from_index(usize::MAX), None);
    }
}
