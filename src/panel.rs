//! Voice-to-controls binding.
//!
//! Seven knobs drive the voice's seven parameters. This module owns the
//! knob configurations (range, step, initial value), the dispatch from a
//! knob's normalized value to a [`VoiceCommand`], and the readout text shown
//! under each knob. Readouts are computed from the same pure mappings the
//! voice uses, so the labels never need a round trip to the audio thread.
//!
//! Change propagation: each knob's listener records `(id, value)` into a
//! shared queue; [`Panel::drain`] turns the queue into commands for the
//! audio thread and refreshes the affected labels. Knob listeners are wired
//! before [`Panel::initialize`] runs, so the two-phase init protocol
//! delivers exactly one command per parameter before any gesture.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::control::{format, Knob};
use crate::dsp::{FilterShape, Waveform};
use crate::voice::{params, VoiceCommand};

/// The seven logical controls, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobId {
    Gain,
    Generator,
    Pitch,
    Detune,
    FilterKind,
    Cutoff,
    Resonance,
}

impl KnobId {
    pub const ALL: [KnobId; 7] = [
        KnobId::Gain,
        KnobId::Generator,
        KnobId::Pitch,
        KnobId::Detune,
        KnobId::FilterKind,
        KnobId::Cutoff,
        KnobId::Resonance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            KnobId::Gain => "gain",
            KnobId::Generator => "osc",
            KnobId::Pitch => "pitch",
            KnobId::Detune => "detune",
            KnobId::FilterKind => "filter",
            KnobId::Cutoff => "cutoff",
            KnobId::Resonance => "res",
        }
    }
}

/// Static configuration for one knob: `(min, max, step, initial)`.
struct KnobConfig {
    min: f64,
    max: f64,
    step: f64,
    init: f64,
}

/// The instrument's knob table. Step 0 means continuous; the filter-kind
/// knob starts on allpass (index 4), everything else at its zero point.
fn config(id: KnobId) -> KnobConfig {
    match id {
        KnobId::Gain => KnobConfig { min: 0.0, max: 1.0, step: 0.0, init: 0.0 },
        KnobId::Generator => KnobConfig { min: 0.0, max: 4.0, step: 1.0, init: 0.0 },
        KnobId::Pitch => KnobConfig { min: -2.0, max: 2.0, step: 1.0 / 12.0, init: 0.0 },
        KnobId::Detune => KnobConfig { min: -50.0, max: 50.0, step: 0.0, init: 0.0 },
        KnobId::FilterKind => KnobConfig { min: 0.0, max: 4.0, step: 1.0, init: 4.0 },
        KnobId::Cutoff => KnobConfig { min: 0.0, max: 1.0, step: 0.0, init: 0.0 },
        KnobId::Resonance => KnobConfig { min: 0.0, max: 1.0, step: 0.0, init: 0.0 },
    }
}

/// Map a knob's value to the command the voice understands.
pub fn command_for(id: KnobId, value: f64) -> VoiceCommand {
    let v = value as f32;
    match id {
        KnobId::Gain => VoiceCommand::SetGain(v),
        KnobId::Generator => VoiceCommand::SetGeneratorMode(v),
        KnobId::Pitch => VoiceCommand::SetPitch(v),
        KnobId::Detune => VoiceCommand::SetDetune(v),
        KnobId::FilterKind => VoiceCommand::SetFilterKind(v),
        KnobId::Cutoff => VoiceCommand::SetFilterCutoff(v),
        KnobId::Resonance => VoiceCommand::SetFilterResonance(v),
    }
}

/// Human-readable physical value for a knob position.
pub fn readout(id: KnobId, value: f64) -> String {
    let v = value as f32;
    match id {
        KnobId::Gain => format::gain_db(v),
        KnobId::Generator => {
            let index = value.round() as usize;
            Waveform::from_index(index)
                .map(|w| w.name())
                .unwrap_or("noise")
                .to_string()
        }
        KnobId::Pitch => format::semitones(v),
        KnobId::Detune => format::detune_cents(v),
        KnobId::FilterKind => FilterShape::from_index(value.round() as usize)
            .map(|s| s.name())
            .unwrap_or("?")
            .to_string(),
        KnobId::Cutoff => format::frequency(params::cutoff_to_hz(v)),
        KnobId::Resonance => format::resonance_q(params::resonance_to_q(v)),
    }
}

type ChangeQueue = Arc<Mutex<VecDeque<(KnobId, f64)>>>;

/// The seven configured knobs plus their current readout labels.
pub struct Panel {
    knobs: Vec<Knob>,
    labels: Vec<String>,
    changes: ChangeQueue,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    /// Build and wire the knobs. Listeners are registered here;
    /// [`initialize`](Panel::initialize) performs the one-shot value push.
    pub fn new() -> Self {
        let changes: ChangeQueue = Arc::new(Mutex::new(VecDeque::new()));

        let mut knobs = Vec::with_capacity(KnobId::ALL.len());
        let mut labels = Vec::with_capacity(KnobId::ALL.len());
        for id in KnobId::ALL {
            let s = config(id);
            let mut knob = Knob::new();
            // The table is static and ordered, so the range is always valid
            knob.set_range(s.min, s.max)
                .expect("knob table contains a valid range");
            knob.set_step(s.step);

            let queue = changes.clone();
            knob.set_on_change(move |value| {
                queue.lock().unwrap().push_back((id, value));
            });

            knobs.push(knob);
            labels.push(String::from("?"));
        }

        Self {
            knobs,
            labels,
            changes,
        }
    }

    /// Run the initialization protocol: push each knob's table value through
    /// its listener exactly once. Call once, after construction, before any
    /// gesture is routed.
    pub fn initialize(&mut self) {
        for id in KnobId::ALL {
            self.knobs[id.index()].initialize(config(id).init);
        }
    }

    /// Route a drag delta to one knob.
    pub fn apply_delta(&mut self, id: KnobId, dx: f64, dy: f64) {
        self.knobs[id.index()].apply_delta(dx, dy);
    }

    /// Keyboard fallback: move a knob by one quantization step (or 1% of
    /// its range when continuous). `direction` is +1 or -1.
    pub fn nudge(&mut self, id: KnobId, direction: f64) {
        let knob = &self.knobs[id.index()];
        let range = knob.max() - knob.min();
        if range <= 0.0 {
            return;
        }
        let s = config(id);
        let amount = if s.step > 0.0 { s.step } else { range * 0.01 };
        // Convert the desired value change into an equivalent horizontal drag
        let dx = direction * amount / (0.005 * range);
        self.knobs[id.index()].apply_delta(dx, 0.0);
    }

    /// Collect queued knob changes as voice commands, refreshing the
    /// affected readout labels on the way.
    pub fn drain(&mut self) -> Vec<VoiceCommand> {
        let mut queue = self.changes.lock().unwrap();
        let mut commands = Vec::with_capacity(queue.len());
        while let Some((id, value)) = queue.pop_front() {
            self.labels[id.index()] = readout(id, value);
            commands.push(command_for(id, value));
        }
        commands
    }

    pub fn knob(&self, id: KnobId) -> &Knob {
        &self.knobs[id.index()]
    }

    pub fn label(&self, id: KnobId) -> &str {
        &self.labels[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialization_pushes_one_command_per_knob() {
        let mut panel = Panel::new();
        panel.initialize();

        let commands = panel.drain();
        assert_eq!(commands.len(), 7);
        assert_eq!(commands[0], VoiceCommand::SetGain(0.0));
        assert_eq!(commands[1], VoiceCommand::SetGeneratorMode(0.0));
        assert_eq!(commands[2], VoiceCommand::SetPitch(0.0));
        assert_eq!(commands[3], VoiceCommand::SetDetune(0.0));
        assert_eq!(commands[4], VoiceCommand::SetFilterKind(4.0));
        assert_eq!(commands[5], VoiceCommand::SetFilterCutoff(0.0));
        assert_eq!(commands[6], VoiceCommand::SetFilterResonance(0.0));

        // and nothing more until a gesture happens
        assert!(panel.drain().is_empty());
    }

    #[test]
    fn initial_labels_show_the_defaults() {
        let mut panel = Panel::new();
        panel.initialize();
        panel.drain();

        assert_eq!(panel.label(KnobId::Gain), "-∞ db");
        assert_eq!(panel.label(KnobId::Generator), "sine");
        assert_eq!(panel.label(KnobId::Pitch), "0 st");
        assert_eq!(panel.label(KnobId::Detune), "0 cent");
        assert_eq!(panel.label(KnobId::FilterKind), "allpass");
        assert_eq!(panel.label(KnobId::Cutoff), "20Hz");
        assert_eq!(panel.label(KnobId::Resonance), "0.0Q");
    }

    #[test]
    fn drag_produces_a_command_and_updates_the_label() {
        let mut panel = Panel::new();
        panel.initialize();
        panel.drain();

        // drag the gain knob fully open
        panel.apply_delta(KnobId::Gain, 10_000.0, 0.0);
        let commands = panel.drain();
        assert_eq!(commands, vec![VoiceCommand::SetGain(1.0)]);
        assert_eq!(panel.label(KnobId::Gain), "0 db");
    }

    #[test]
    fn generator_readout_names_the_noise_stage_past_the_waveforms() {
        assert_eq!(readout(KnobId::Generator, 0.0), "sine");
        assert_eq!(readout(KnobId::Generator, 3.0), "triangle");
        assert_eq!(readout(KnobId::Generator, 4.0), "noise");
    }

    #[test]
    fn cutoff_readout_reports_the_mapped_frequency() {
        assert_eq!(readout(KnobId::Cutoff, 0.0), "20Hz");
        assert_eq!(readout(KnobId::Cutoff, 1.0), "22.07kHz");
    }

    #[test]
    fn nudge_moves_quantized_knobs_exactly_one_step() {
        let mut panel = Panel::new();
        panel.initialize();
        panel.drain();

        panel.nudge(KnobId::Generator, 1.0);
        let commands = panel.drain();
        assert_eq!(commands, vec![VoiceCommand::SetGeneratorMode(1.0)]);
        assert_eq!(panel.label(KnobId::Generator), "square");

        panel.nudge(KnobId::Generator, -1.0);
        assert_eq!(panel.drain(), vec![VoiceCommand::SetGeneratorMode(0.0)]);
    }

    #[test]
    fn silent_nudge_at_a_bound_emits_nothing() {
        let mut panel = Panel::new();
        panel.initialize();
        panel.drain();

        panel.nudge(KnobId::Gain, -1.0); // already at the bottom stop
        assert!(panel.drain().is_empty());
    }
}
