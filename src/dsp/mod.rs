//! Low-level DSP primitives used by the voice's signal graph.
//!
//! These components are allocation-free and realtime-safe after construction,
//! making them safe to embed directly inside the voice and advance from the
//! audio callback. They intentionally stay focused on the signal-processing
//! math; unit mapping and routing live in the `voice` module.

/// Topology-preserving state-variable filter with five responses.
pub mod filter;
/// Shared one-second noise buffer and a looping buffer source.
pub mod noise;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;
/// Scheduled linear parameter glide (the click-free "ramp to value").
pub mod ramp;

pub use filter::FilterShape;
pub use oscillator::Waveform;
pub use ramp::Ramp;
