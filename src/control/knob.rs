use thiserror::Error;

/*
Bounded-Value Knob Controller
=============================

A knob owns one scalar parameter in a closed range and maps 2-D pointer
motion onto it. Three details carry all of the feel:

Mixed-axis sensitivity
----------------------

    delta = (dx * 0.005 - dy * 0.0025) * (max - min)

Rightward motion increases the value, upward motion increases it too (dy is
screen-down-positive), with the vertical axis at half the horizontal
sensitivity. A sloppy diagonal drag just works - no axis locking needed.

Anti-wind-up accumulator
------------------------

Raw motion integrates into an `accumulator` that is itself clamped to
[min, max], separately from the emitted value. If only the emitted value
were clamped, dragging 300px past the top and then reversing would require
dragging 300px back through a dead zone before the knob moved again. With
the accumulator pinned at the bound, the very next opposite-direction
delta produces an immediate change.

Quantization
------------

The emitted value is the accumulator rounded to the nearest multiple of
`step` measured from zero (step = 0 means continuous), then clamped. The
semitone knob uses step = 1/12 over [-2, 2], so emitted values land exactly
on equal-tempered semitones. The listener fires only when the emitted value
actually changes - a drag inside one quantization cell is silent.

Initialization is an explicit second phase: construct, register the
listener, then `initialize(v)`, which fires the listener exactly once even
if `v` equals the default. Every bound parameter therefore receives one
concrete push before any user interaction.
*/

/// Errors from knob configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: f64, max: f64 },
}

type ChangeListener = Box<dyn FnMut(f64) + Send>;

/// A clamped, optionally quantized scalar driven by drag deltas.
pub struct Knob {
    min: f64,
    max: f64,
    /// Quantization granularity; <= 0 means continuous.
    step: f64,
    current: f64,
    /// Running total of raw drag input, clamped to [min, max] but never
    /// quantized, so reversal at a bound reacts immediately.
    accumulator: f64,
    on_change: Option<ChangeListener>,
}

impl Default for Knob {
    fn default() -> Self {
        Self::new()
    }
}

impl Knob {
    /// A continuous knob over [0, 1], value 0, no listener.
    pub fn new() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            step: 0.0,
            current: 0.0,
            accumulator: 0.0,
            on_change: None,
        }
    }

    /// Replace the bounds. The current value is deliberately NOT re-clamped;
    /// a range shrink leaves it out of bounds until the next mutation.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), ControlError> {
        if min > max {
            return Err(ControlError::InvalidRange { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Set quantization granularity; `step <= 0` means continuous.
    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    /// Register the change listener (at most one).
    pub fn set_on_change(&mut self, listener: impl FnMut(f64) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Second construction phase: set the starting value and fire the
    /// listener exactly once, unconditionally - even when `value` equals
    /// the pre-existing default. Call after `set_on_change`.
    pub fn initialize(&mut self, value: f64) {
        let value = self.clamp(self.quantize(value));
        self.current = value;
        self.accumulator = value;
        if let Some(listener) = self.on_change.as_mut() {
            listener(value);
        }
    }

    /// Integrate one pointer-motion delta. Fires the listener only if the
    /// emitted value changed. Non-finite deltas are treated as zero motion.
    pub fn apply_delta(&mut self, dx: f64, dy: f64) {
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };

        let range = self.max - self.min;
        self.accumulator += (dx * 0.005 - dy * 0.0025) * range;
        self.accumulator = self.accumulator.clamp(self.min, self.max);

        let value = self.clamp(self.quantize(self.accumulator));
        if value != self.current {
            self.current = value;
            if let Some(listener) = self.on_change.as_mut() {
                listener(value);
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Indicator angle in degrees for the presentation host: 135° at the
    /// low stop, sweeping 270° clockwise to 405° at the high stop.
    pub fn indicator_angle(&self) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 135.0;
        }
        (self.current - self.min) / range * 270.0 + 135.0
    }

    fn quantize(&self, value: f64) -> f64 {
        if self.step > 0.0 {
            (value / self.step).round() * self.step
        } else {
            value
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}
