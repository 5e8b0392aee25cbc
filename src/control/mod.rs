//! Gesture-to-value control layer.
//!
//! A [`knob::Knob`] owns one bounded, optionally quantized scalar and turns
//! relative pointer motion into value changes; [`drag::DragRouter`] decides
//! which knob (if any) a motion event belongs to; [`format`] renders the
//! derived physical values as label text. Nothing in this module knows about
//! audio - the coupling to the voice is a registered change listener.

/// Which-knob-is-dragging context owned by the event loop.
pub mod drag;
/// Label text for the physical values behind each knob.
pub mod format;
/// The bounded-value controller backing one rotary control.
pub mod knob;

pub use drag::DragRouter;
pub use knob::{ControlError, Knob};
