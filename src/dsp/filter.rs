use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State-Variable Filter (SVF)
===========================

The voice's tone-shaping stage: a topology-preserving-transform (TPT)
state-variable filter. One pass through the integrator core yields every
response simultaneously, so the shape selection is just a matter of which
output is taken - changing the shape does not touch the integrator state.

| shape     | passes          | rejects          |
| --------- | --------------- | ---------------- |
| low-pass  | below cutoff    | above cutoff     |
| high-pass | above cutoff    | below cutoff     |
| band-pass | around cutoff   | both sides       |
| notch     | outside cutoff  | at cutoff        |
| all-pass  | everything      | nothing (phase only) |

Resonance is expressed as a Q factor (0..50 from the panel). The TPT core
wants the damping coefficient k = 1/Q, so Q is floored at 0.5 (critically
damped, k = 2) to keep k finite and the passband intact at low resonance;
the floor only affects the filter math, never the displayed value.

Cutoff and Q arrive per sample because the voice ramps both; computing the
warped coefficient g = tan(pi * fc / sr) each sample keeps glides smooth at
the cost of one tan() per sample, which is negligible for a single voice.
*/

/// Filter response selection table:
/// `[lowpass, highpass, bandpass, notch, allpass]`.
///
/// The index order matches the filter-kind knob.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    LowPass,
    HighPass,
    BandPass,
    Notch,
    AllPass,
}

impl FilterShape {
    /// Look up a shape by knob index. Returns `None` past the table.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FilterShape::LowPass),
            1 => Some(FilterShape::HighPass),
            2 => Some(FilterShape::BandPass),
            3 => Some(FilterShape::Notch),
            4 => Some(FilterShape::AllPass),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterShape::LowPass => "lowpass",
            FilterShape::HighPass => "highpass",
            FilterShape::BandPass => "bandpass",
            FilterShape::Notch => "notch",
            FilterShape::AllPass => "allpass",
        }
    }
}

/// Minimum Q the integrator core accepts. k = 1/Q caps at 2, so the
/// response never degrades past critically damped even when the panel maps
/// resonance 0 to Q 0.
const MIN_Q: f32 = 0.5;

pub struct Svf {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory
    shape: FilterShape,
    sample_rate: f32,
}

impl Svf {
    pub fn new(shape: FilterShape, sample_rate: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            shape,
            sample_rate,
        }
    }

    /// Select which response the filter outputs. Integrator state is kept,
    /// so the switch is immediate and continuous.
    pub fn set_shape(&mut self, shape: FilterShape) {
        self.shape = shape;
    }

    pub fn shape(&self) -> FilterShape {
        self.shape
    }

    /// Clear integrator memory.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Filter one sample at the given cutoff and Q.
    #[inline]
    pub fn next_sample(&mut self, input: f32, cutoff_hz: f32, q: f32) -> f32 {
        // Keep the bilinear warp away from the tan() pole at Nyquist
        let cutoff = cutoff_hz.clamp(1.0, 0.45 * self.sample_rate);
        let g = (PI * cutoff / self.sample_rate).tan();
        let k = 1.0 / q.max(MIN_Q);

        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = input - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        match self.shape {
            FilterShape::LowPass => v2,
            FilterShape::HighPass => input - k * v1 - v2,
            FilterShape::BandPass => v1,
            FilterShape::Notch => input - k * v1,
            FilterShape::AllPass => input - 2.0 * k * v1,
        }
    }
}
