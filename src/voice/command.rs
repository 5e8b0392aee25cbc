#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// One parameter change crossing the UI → audio thread boundary.
///
/// Payloads are the knobs' normalized values; the voice performs the
/// physical-unit mapping on the audio thread so both threads agree on what
/// a command means regardless of when it is drained.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceCommand {
    /// 0..=3 select a waveform, 4 selects the noise stage.
    SetGeneratorMode(f32),
    /// Normalized gain 0..1.
    SetGain(f32),
    /// Pitch offset in octaves, -2..2.
    SetPitch(f32),
    /// Detune in cents, -50..50.
    SetDetune(f32),
    /// 0..=4 index into the filter-shape table.
    SetFilterKind(f32),
    /// Normalized cutoff 0..1.
    SetFilterCutoff(f32),
    /// Normalized resonance 0..1.
    SetFilterResonance(f32),
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<VoiceCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        Consumer::pop(self).ok()
    }
}
