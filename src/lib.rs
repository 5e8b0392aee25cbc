pub mod control; // Knob controllers, drag routing, readout formatting
pub mod dsp; // Realtime-safe signal primitives
pub mod panel; // Voice-to-controls binding
pub mod voice; // The instrument's signal graph

pub const MAX_BLOCK_SIZE: usize = 2048;
