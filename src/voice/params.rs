//! Normalized control input → physical units.
//!
//! Every mapping the voice applies lives here as a pure function so the
//! curves can be tested without an audio backend. The constants are part of
//! the instrument's contract with its panel (see the knob table in
//! `panel.rs`).

/// Reference pitch: offset 0 lands on A4.
pub const PITCH_REFERENCE_HZ: f32 = 440.0;

/// Cutoff curve endpoints: norm 0 → 20 Hz, norm 1 → 22 070 Hz.
pub const CUTOFF_FLOOR_HZ: f32 = 20.0;
pub const CUTOFF_SPAN_HZ: f32 = 22_050.0;

/// Resonance curve endpoint: norm 1 → Q 50.
pub const MAX_Q: f32 = 50.0;

/// Noise detune multiplier: one oscillator cent widens the noise read rate
/// twenty cents so the two stages drift comparably.
pub const NOISE_DETUNE_SCALE: f32 = 20.0;

/// Pitch offset in octaves (-2..2) to oscillator frequency in Hz.
///
/// Exponential: each whole unit of offset is an octave around 440 Hz.
#[inline]
pub fn pitch_to_hz(offset: f32) -> f32 {
    PITCH_REFERENCE_HZ * 2.0_f32.powf(offset)
}

/// Pitch offset to the noise stage's playback-rate multiplier.
///
/// `(offset + 2.04) / 5` maps the knob's [-2, 2] span onto roughly
/// [0.008, 0.808]; linear rather than exponential, tuned so the noise
/// stage's brightness tracks the oscillator well enough that switching
/// generators at the same knob position doesn't jump in timbre.
#[inline]
pub fn pitch_to_noise_rate(offset: f32) -> f32 {
    (offset + 2.04) / 5.0
}

/// Oscillator detune cents to the noise stage's cents-equivalent detune.
#[inline]
pub fn detune_to_noise_cents(cents: f32) -> f32 {
    cents * NOISE_DETUNE_SCALE
}

/// Normalized cutoff (0..1) to Hz: `20 + norm³ · 22050`.
///
/// The cubic concentrates knob resolution at low frequencies, matching
/// perceptual pitch sensitivity - half the knob's travel stays below
/// ~2.8 kHz.
#[inline]
pub fn cutoff_to_hz(norm: f32) -> f32 {
    CUTOFF_FLOOR_HZ + norm * norm * norm * CUTOFF_SPAN_HZ
}

/// Normalized resonance (0..1) to a Q factor, linearly up to 50.
#[inline]
pub fn resonance_to_q(norm: f32) -> f32 {
    norm * MAX_Q
}
