/*
Linear Parameter Ramp
=====================

Jumping a live parameter (gain, cutoff, frequency) straight to a new value
puts a step discontinuity into the signal path, which the ear hears as a
click. Every continuous parameter in the voice is therefore wrapped in a
`Ramp`: a scheduled linear glide from the current value to a target over a
fixed duration.

The Math: Time to Increment
---------------------------

Scheduling converts a duration in seconds into a per-sample increment:

    increment = (target - current) / (seconds * sample_rate)

Each call to `next()` advances one sample:

    current += increment

and after `seconds * sample_rate` samples the ramp lands exactly on the
target (the final step snaps to avoid floating-point drift).

Supersession
------------

Ramps are fire-and-forget and never cancelled. Scheduling a new ramp while
an old one is in flight simply re-aims from wherever the value currently
is - the newer target wins, which is exactly the behavior a fast knob twist
needs.
*/

/// A scheduled linear glide toward a target value.
///
/// `next()` is called once per rendered sample; `ramp_to` and `set` are
/// called from parameter setters. Both sides run on the audio thread, so no
/// synchronization is needed.
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    current: f32,
    target: f32,
    increment: f32,
    /// Samples left before the ramp lands on `target`. 0 means settled.
    remaining: u32,
}

impl Ramp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Jump immediately to `value`, discarding any ramp in flight.
    pub fn set(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.remaining = 0;
    }

    /// Schedule a linear glide from the current value to `target` over
    /// `seconds`. A non-positive or sub-sample duration applies immediately.
    pub fn ramp_to(&mut self, target: f32, seconds: f32, sample_rate: f32) {
        let samples = (seconds * sample_rate).round();
        if samples < 1.0 {
            self.set(target);
            return;
        }

        self.target = target;
        self.remaining = samples as u32;
        self.increment = (target - self.current) / samples;
    }

    /// Advance one sample and return the updated value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                // Land exactly on the target, not increment-quantized near it
                self.current = self.target;
            } else {
                self.current += self.increment;
            }
        }
        self.current
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_set_has_no_glide() {
        let mut ramp = Ramp::new(0.0);
        ramp.set(0.8);
        assert_eq!(ramp.next(), 0.8);
        assert!(ramp.is_settled());
    }

    #[test]
    fn ramp_is_linear_and_lands_on_target() {
        let sample_rate = 1000.0;
        let mut ramp = Ramp::new(0.0);
        ramp.ramp_to(1.0, 0.1, sample_rate); // 100 samples

        let mut last = 0.0;
        for _ in 0..50 {
            last = ramp.next();
        }
        assert!(
            (last - 0.5).abs() < 1e-4,
            "expected midpoint ~0.5, got {last}"
        );

        for _ in 0..50 {
            last = ramp.next();
        }
        assert_eq!(last, 1.0, "ramp must land exactly on target");
        assert!(ramp.is_settled());
    }

    #[test]
    fn newer_ramp_supersedes_older_target() {
        let sample_rate = 1000.0;
        let mut ramp = Ramp::new(0.0);
        ramp.ramp_to(1.0, 0.1, sample_rate);

        for _ in 0..50 {
            ramp.next();
        }

        // Re-aim mid-flight: glide continues from the current value
        ramp.ramp_to(0.0, 0.1, sample_rate);
        assert_eq!(ramp.target(), 0.0);

        let next = ramp.next();
        assert!(next < 0.5, "re-aimed ramp should head back down, got {next}");

        for _ in 0..100 {
            ramp.next();
        }
        assert_eq!(ramp.value(), 0.0);
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut ramp = Ramp::new(0.2);
        ramp.ramp_to(0.9, 0.0, 48_000.0);
        assert_eq!(ramp.value(), 0.9);
    }

    #[test]
    fn value_stays_put_after_settling() {
        let mut ramp = Ramp::new(0.0);
        ramp.ramp_to(0.5, 0.01, 48_000.0);
        for _ in 0..480 {
            ramp.next();
        }
        for _ in 0..32 {
            assert_eq!(ramp.next(), 0.5);
        }
    }
}
