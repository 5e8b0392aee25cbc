//! Readout text for knob labels.
//!
//! Pure formatting of derived physical values - frequency, gain in dB,
//! semitones, cents, Q. Kept out of the widgets so the exact strings are
//! unit-testable.

/// Decibels below this render as silence.
const DB_FLOOR: f32 = -1000.0;

/// `"440Hz"` below 1 kHz, `"2.50kHz"` above.
pub fn frequency(hz: f32) -> String {
    if hz > 1000.0 {
        format!("{:.2}kHz", hz / 1000.0)
    } else {
        format!("{}Hz", hz.round())
    }
}

/// Normalized gain as decibels.
///
/// The scale is `20·ln(gain)` - a natural logarithm, not base-10, so half
/// gain reads -14 db rather than -6 db. Unity gain is exactly `"0 db"`;
/// anything below the floor renders as `"-∞ db"`; below -10 dB the value is
/// shown as a whole number, above it with one decimal.
pub fn gain_db(gain: f32) -> String {
    let decibel = 20.0 * gain.ln();
    if decibel == 0.0 {
        return "0 db".to_string();
    }
    if decibel < DB_FLOOR {
        "-∞ db".to_string()
    } else if decibel < -10.0 {
        format!("{} db", decibel.round())
    } else {
        format!("{:.1} db", decibel)
    }
}

/// Pitch offset (octaves) as whole semitones: `"12 st"`.
pub fn semitones(pitch_offset: f32) -> String {
    format!("{} st", (pitch_offset * 12.0).round())
}

/// Detune as whole cents: `"-25 cent"`.
pub fn detune_cents(cents: f32) -> String {
    format!("{} cent", cents.round())
}

/// Filter resonance: `"12.5Q"`.
pub fn resonance_q(q: f32) -> String {
    format!("{:.1}Q", q)
}
