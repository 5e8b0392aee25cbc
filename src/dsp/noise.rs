use once_cell::sync::OnceCell;
use rand::Rng;

/*
Shared Noise Buffer
===================

The noise stage does not synthesize fresh random samples per voice. One
second of uniform white noise is generated once per process and every
consumer loops the same read-only buffer. Consumers only need statistical
whiteness, not non-repetition, and a one-second loop at audio rate is far
below the threshold where the repeat becomes audible as a pattern.

The source reads the buffer at a fractional position. Playback rate and
detune (cents) combine into a per-sample step:

    step = rate * 2^(cents / 1200)

so slowing the read darkens the noise the same way it lowers a pitched
sample - this is what keeps the noise stage's brightness tracking the
oscillator's pitch knob.
*/

static NOISE_BUFFER: OnceCell<Vec<f32>> = OnceCell::new();

/// One second of uniform samples in [-1, 1), memoized for the process.
///
/// The first caller's sample rate fixes the buffer length; later calls get
/// the same buffer regardless of the rate they pass. There is one audio
/// context per process, so in practice the rate never differs.
pub fn noise_buffer(sample_rate: f32) -> &'static [f32] {
    NOISE_BUFFER.get_or_init(|| {
        let length = sample_rate.max(1.0) as usize;
        let mut rng = rand::thread_rng();
        (0..length).map(|_| rng.gen_range(-1.0..1.0)).collect()
    })
}

/// A looping reader over the shared noise buffer.
///
/// Always "running": the read position advances whenever `next_sample` is
/// called, whether or not the stage is routed to the output.
pub struct NoiseSource {
    buffer: &'static [f32],
    /// Fractional read position into `buffer`.
    position: f64,
}

impl NoiseSource {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            buffer: noise_buffer(sample_rate),
            position: 0.0,
        }
    }

    /// Read one sample at the given playback rate and detune, advancing the
    /// loop position. Nearest-sample read; noise has no structure worth
    /// interpolating.
    #[inline]
    pub fn next_sample(&mut self, rate: f32, detune_cents: f32) -> f32 {
        let len = self.buffer.len() as f64;
        let sample = self.buffer[self.position as usize % self.buffer.len()];

        let step = (rate as f64) * 2.0_f64.powf(detune_cents as f64 / 1200.0);
        self.position += step.max(0.0);
        if self.position >= len {
            self.position -= len * (self.position / len).floor();
        }

        sample
    }
}
