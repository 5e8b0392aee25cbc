// Purpose: the instrument's complete signal path and its parameter surface.
// One Voice per output stream; it lives on the audio thread for the session.

/// Commands crossing the UI → audio thread boundary.
pub mod command;
/// Pure normalized → physical unit mappings.
pub mod params;

pub use command::{CommandReceiver, VoiceCommand};

use thiserror::Error;

use crate::dsp::{
    filter::{FilterShape, Svf},
    noise::NoiseSource,
    oscillator::{Oscillator, Waveform},
    ramp::Ramp,
};

/*
Voice Signal Graph
==================

    oscillator ──┐
                 ├──(one routed)──→ gain ──→ filter ──→ out
    noise ───────┘

Two generator stages feed one gain stage and one filter stage. Exactly one
generator is routed at a time, but BOTH advance every sample: the inactive
stage keeps its phase (oscillator) or read position (noise) moving so that
re-selecting it never restarts from zero. Switching is purely a routing
change - no ramp, no phase reset, no start-up transient, at the cost of
rendering one stage whose output is discarded.

Every continuous parameter is a Ramp (see dsp/ramp.rs); setters convert the
normalized input to physical units and schedule a glide:

    gain        0..1     identity             0.1 s
    pitch       -2..2    440·2^offset Hz      0.01 s   (noise rate in step)
    detune      ±50 ct   cents / ·20 on noise 0.1 s
    cutoff      0..1     20 + n³·22050 Hz     0.1 s
    resonance   0..1     n·50 Q               0.1 s

Discrete parameters (generator mode, filter shape) apply immediately and
are validated against their tables - an out-of-range index is a descriptive
error and leaves prior state intact.
*/

const GAIN_RAMP_SECS: f32 = 0.1;
const PITCH_RAMP_SECS: f32 = 0.01;
const DETUNE_RAMP_SECS: f32 = 0.1;
const FILTER_RAMP_SECS: f32 = 0.1;

/// Setter-boundary validation failures. Nothing here is fatal; the voice
/// keeps playing with its prior state.
#[derive(Debug, Error, PartialEq)]
pub enum VoiceError {
    #[error("generator mode {0} is outside the table (0-3 waveforms, 4 noise)")]
    GeneratorModeOutOfRange(f32),
    #[error("filter kind {0} is outside the table (0 lowpass .. 4 allpass)")]
    FilterKindOutOfRange(f32),
}

/// Which generator stage is routed to the gain stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorStage {
    Oscillator,
    Noise,
}

pub struct Voice {
    sample_rate: f32,

    // Generator stages: both always running, one routed
    oscillator: Oscillator,
    noise: NoiseSource,
    active: GeneratorStage,

    // Ramped parameters
    osc_freq: Ramp,
    osc_detune: Ramp,
    noise_rate: Ramp,
    noise_detune: Ramp,
    gain: Ramp,
    cutoff: Ramp,
    resonance: Ramp,

    filter: Svf,
}

impl Voice {
    /// Build the signal path. Mirrors the startup defaults of a fresh
    /// instrument: sine oscillator at 440 Hz routed, gain 0 (silent until
    /// the gain knob pushes a value), lowpass filter at 440 Hz, Q 1.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            oscillator: Oscillator::new(Waveform::Sine, sample_rate),
            noise: NoiseSource::new(sample_rate),
            active: GeneratorStage::Oscillator,
            osc_freq: Ramp::new(params::PITCH_REFERENCE_HZ),
            osc_detune: Ramp::new(0.0),
            noise_rate: Ramp::new(1.0),
            noise_detune: Ramp::new(0.0),
            gain: Ramp::new(0.0),
            cutoff: Ramp::new(440.0),
            resonance: Ramp::new(1.0),
            filter: Svf::new(FilterShape::LowPass, sample_rate),
        }
    }

    /// Select a generator: 0..=3 pick a waveform (routing the oscillator if
    /// the noise stage was active), 4 routes the noise stage. The input is
    /// rounded first so direct callers with fractional values behave like
    /// the step-1 knob.
    pub fn set_generator_mode(&mut self, value: f32) -> Result<(), VoiceError> {
        if !value.is_finite() {
            return Err(VoiceError::GeneratorModeOutOfRange(value));
        }
        let index = value.round();
        if !(0.0..=4.0).contains(&index) {
            return Err(VoiceError::GeneratorModeOutOfRange(value));
        }

        match Waveform::from_index(index as usize) {
            Some(waveform) => {
                self.oscillator.set_waveform(waveform);
                self.active = GeneratorStage::Oscillator;
            }
            None => {
                self.active = GeneratorStage::Noise;
            }
        }
        Ok(())
    }

    /// Schedule a gain glide; the normalized value maps linearly to
    /// amplitude.
    pub fn set_gain(&mut self, norm: f32) {
        self.gain.ramp_to(norm, GAIN_RAMP_SECS, self.sample_rate);
    }

    /// Schedule a pitch glide on both stages: exponential Hz mapping on the
    /// oscillator, the aligned linear rate mapping on the noise reader.
    pub fn set_pitch(&mut self, offset: f32) {
        self.osc_freq
            .ramp_to(params::pitch_to_hz(offset), PITCH_RAMP_SECS, self.sample_rate);
        self.noise_rate.ramp_to(
            params::pitch_to_noise_rate(offset),
            PITCH_RAMP_SECS,
            self.sample_rate,
        );
    }

    /// Schedule a detune glide; cents on the oscillator, scaled cents on
    /// the noise reader.
    pub fn set_detune(&mut self, cents: f32) {
        self.osc_detune
            .ramp_to(cents, DETUNE_RAMP_SECS, self.sample_rate);
        self.noise_detune.ramp_to(
            params::detune_to_noise_cents(cents),
            DETUNE_RAMP_SECS,
            self.sample_rate,
        );
    }

    /// Select the filter response. Immediate - shape is not a ramped
    /// quantity, and the filter keeps its integrator state.
    pub fn set_filter_kind(&mut self, value: f32) -> Result<(), VoiceError> {
        if !value.is_finite() || value.round() < 0.0 {
            return Err(VoiceError::FilterKindOutOfRange(value));
        }
        let shape = FilterShape::from_index(value.round() as usize)
            .ok_or(VoiceError::FilterKindOutOfRange(value))?;
        self.filter.set_shape(shape);
        Ok(())
    }

    /// Schedule a cutoff glide along the cubic perceptual curve.
    pub fn set_filter_cutoff(&mut self, norm: f32) {
        self.cutoff.ramp_to(
            params::cutoff_to_hz(norm),
            FILTER_RAMP_SECS,
            self.sample_rate,
        );
    }

    /// Schedule a resonance glide, linear to Q 50.
    pub fn set_filter_resonance(&mut self, norm: f32) {
        self.resonance.ramp_to(
            params::resonance_to_q(norm),
            FILTER_RAMP_SECS,
            self.sample_rate,
        );
    }

    /// Apply one queued command from the control side.
    pub fn apply(&mut self, command: VoiceCommand) -> Result<(), VoiceError> {
        match command {
            VoiceCommand::SetGeneratorMode(v) => self.set_generator_mode(v)?,
            VoiceCommand::SetGain(v) => self.set_gain(v),
            VoiceCommand::SetPitch(v) => self.set_pitch(v),
            VoiceCommand::SetDetune(v) => self.set_detune(v),
            VoiceCommand::SetFilterKind(v) => self.set_filter_kind(v)?,
            VoiceCommand::SetFilterCutoff(v) => self.set_filter_cutoff(v),
            VoiceCommand::SetFilterResonance(v) => self.set_filter_resonance(v),
        }
        Ok(())
    }

    /// Drain every queued command from the control side. Rejected commands
    /// (out-of-table indices) leave prior state intact and do not stop the
    /// drain.
    pub fn drain_commands(&mut self, receiver: &mut impl CommandReceiver) {
        while let Some(command) = receiver.pop() {
            let _ = self.apply(command);
        }
    }

    /// Render one block. Both generators advance every sample; only the
    /// routed one reaches the gain and filter stages.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let freq = self.osc_freq.next();
            let detune = self.osc_detune.next();
            let osc = self
                .oscillator
                .next_sample(freq * 2.0_f32.powf(detune / 1200.0));

            let rate = self.noise_rate.next();
            let noise_detune = self.noise_detune.next();
            let noise = self.noise.next_sample(rate, noise_detune);

            let routed = match self.active {
                GeneratorStage::Oscillator => osc,
                GeneratorStage::Noise => noise,
            };

            let shaped = routed * self.gain.next();
            *sample = self
                .filter
                .next_sample(shaped, self.cutoff.next(), self.resonance.next());
        }
    }

    // Derived physical values for the panel readouts.

    pub fn active_stage(&self) -> GeneratorStage {
        self.active
    }

    /// `"sine"` / `"square"` / ... while the oscillator is routed, `"noise"`
    /// while the noise stage is.
    pub fn generator_name(&self) -> &'static str {
        match self.active {
            GeneratorStage::Oscillator => self.oscillator.waveform().name(),
            GeneratorStage::Noise => "noise",
        }
    }

    pub fn filter_kind_name(&self) -> &'static str {
        self.filter.shape().name()
    }

    /// Cutoff target in Hz (where the in-flight ramp is heading).
    pub fn filter_cutoff_hz(&self) -> f32 {
        self.cutoff.target()
    }

    /// Resonance target as a Q factor.
    pub fn filter_resonance_q(&self) -> f32 {
        self.resonance.target()
    }

    pub fn gain_level(&self) -> f32 {
        self.gain.target()
    }

    pub fn oscillator_hz(&self) -> f32 {
        self.osc_freq.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn settled_voice() -> Voice {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_gain(0.8);
        voice.set_filter_cutoff(1.0);
        // run long enough for every 0.1 s ramp to land
        let mut buffer = vec![0.0f32; 8192];
        voice.render_block(&mut buffer);
        voice
    }

    #[test]
    fn generator_switch_round_trip_routes_the_oscillator() {
        let mut voice = Voice::new(SAMPLE_RATE);

        voice.set_generator_mode(4.0).unwrap();
        assert_eq!(voice.active_stage(), GeneratorStage::Noise);
        assert_eq!(voice.generator_name(), "noise");

        voice.set_generator_mode(0.0).unwrap();
        assert_eq!(voice.active_stage(), GeneratorStage::Oscillator);
        assert_eq!(voice.generator_name(), "sine");
    }

    #[test]
    fn waveform_selection_while_noise_is_active_reconnects() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_generator_mode(4.0).unwrap();
        voice.set_generator_mode(2.0).unwrap();
        assert_eq!(voice.active_stage(), GeneratorStage::Oscillator);
        assert_eq!(voice.generator_name(), "sawtooth");
    }

    #[test]
    fn out_of_table_mode_is_rejected_with_state_intact() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_generator_mode(1.0).unwrap();

        let err = voice.set_generator_mode(5.0).unwrap_err();
        assert_eq!(err, VoiceError::GeneratorModeOutOfRange(5.0));
        assert_eq!(voice.generator_name(), "square", "prior state intact");

        assert!(voice.set_generator_mode(-1.0).is_err());
        assert!(voice.set_generator_mode(f32::NAN).is_err());
    }

    #[test]
    fn out_of_table_filter_kind_is_rejected() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_filter_kind(4.0).unwrap();
        assert_eq!(voice.filter_kind_name(), "allpass");

        let err = voice.set_filter_kind(5.0).unwrap_err();
        assert_eq!(err, VoiceError::FilterKindOutOfRange(5.0));
        assert_eq!(voice.filter_kind_name(), "allpass");
    }

    #[test]
    fn pitch_mapping_reaches_the_signal_path() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_pitch(1.0);
        assert_eq!(voice.oscillator_hz(), 880.0);
        voice.set_pitch(-1.0);
        assert_eq!(voice.oscillator_hz(), 220.0);
    }

    #[test]
    fn cutoff_and_resonance_targets_expose_physical_units() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_filter_cutoff(1.0);
        assert_eq!(voice.filter_cutoff_hz(), 22_070.0);
        voice.set_filter_cutoff(0.0);
        assert_eq!(voice.filter_cutoff_hz(), 20.0);

        voice.set_filter_resonance(0.5);
        assert_eq!(voice.filter_resonance_q(), 25.0);
    }

    #[test]
    fn setters_are_idempotent() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_filter_cutoff(0.3);
        let first = voice.filter_cutoff_hz();
        voice.set_filter_cutoff(0.3);
        assert_eq!(voice.filter_cutoff_hz(), first);
    }

    #[test]
    fn rendered_output_is_finite_and_gain_bounded() {
        let mut voice = settled_voice();
        let mut buffer = vec![0.0f32; 1024];
        voice.render_block(&mut buffer);

        assert!(buffer.iter().all(|s| s.is_finite()));
        let peak = buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.0, "voice with gain should produce signal");
        assert!(peak <= 1.0 + 1e-3, "sine at gain 0.8 must not exceed 1.0");
    }

    #[test]
    fn zero_gain_voice_is_silent_after_ramp() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_filter_cutoff(1.0);
        let mut buffer = vec![0.0f32; 8192];
        voice.render_block(&mut buffer);

        let mut tail = vec![0.0f32; 256];
        voice.render_block(&mut tail);
        let peak = tail.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak < 1e-3, "gain never set, output should stay silent");
    }

    #[test]
    fn generator_switch_produces_no_discontinuity_spike() {
        let mut voice = settled_voice();

        let mut before = vec![0.0f32; 512];
        voice.render_block(&mut before);

        voice.set_generator_mode(4.0).unwrap();
        let mut after = vec![0.0f32; 512];
        voice.render_block(&mut after);

        // Noise through a wide-open filter at gain 0.8 stays inside ±1
        assert!(after.iter().all(|s| s.abs() <= 1.5));
    }

    #[test]
    fn commands_drive_the_same_setters() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.apply(VoiceCommand::SetPitch(1.0)).unwrap();
        assert_eq!(voice.oscillator_hz(), 880.0);

        assert!(voice.apply(VoiceCommand::SetGeneratorMode(9.0)).is_err());
    }
}
