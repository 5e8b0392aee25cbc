//! knurl - audio stream setup and application runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use knurl::panel::Panel;
use knurl::voice::{Voice, VoiceCommand};
use knurl::MAX_BLOCK_SIZE;

use super::ui::UiApp;

/// Command ring capacity. Drained every audio callback; even a frantic
/// drag produces far fewer commands per callback than this.
const COMMAND_RING_SIZE: usize = 256;

/// Audio-tap ring capacity (samples pushed to the oscilloscope).
const TAP_RING_SIZE: usize = 8192;

/// Main application: builds the signal path, the control panel, and the
/// terminal UI, then hands control to the UI event loop.
pub struct App;

impl App {
    pub fn new() -> Self {
        Self
    }

    /// Run the application (takes over the terminal, plays audio).
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (command_tx, mut command_rx) = RingBuffer::<VoiceCommand>::new(COMMAND_RING_SIZE);
        let (mut tap_tx, tap_rx) = RingBuffer::<f32>::new(TAP_RING_SIZE);

        let mut voice = Voice::new(sample_rate);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    // Parameter changes first, so this callback renders
                    // toward the freshest targets
                    voice.drain_commands(&mut command_rx);

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        voice.render_block(block);

                        // Mono voice fanned out to every channel
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        // Feed the oscilloscope; drop samples when the UI
                        // is behind rather than ever blocking here
                        for &s in block.iter() {
                            let _ = tap_tx.push(s);
                        }

                        frames_written += frames;
                    }
                },
                |err| eprintln!("audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;

        // Some hosts refuse playback until a user gesture, so the stream
        // stays idle here; AudioOutput starts it on the first input event.
        let audio = AudioOutput::new(stream);

        let mut panel = Panel::new();
        panel.initialize();

        let mut terminal = ratatui::init();
        let result = UiApp::new(panel, command_tx, tap_rx, audio, sample_rate)
            .run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// The output stream plus its deferred-start state.
///
/// Activation is requested on every input event until it sticks: a host
/// denying playback until a user gesture is an expected startup condition,
/// not a fatal error, so failures are recorded and retried instead of
/// propagated.
pub struct AudioOutput {
    stream: cpal::Stream,
    started: bool,
    last_error: Option<String>,
}

impl AudioOutput {
    pub fn new(stream: cpal::Stream) -> Self {
        Self {
            stream,
            started: false,
            last_error: None,
        }
    }

    /// Try to start playback. Idempotent: once running, further calls are
    /// no-ops; while refused, each call retries.
    pub fn ensure_started(&mut self) {
        if self.started {
            return;
        }
        match self.stream.play() {
            Ok(()) => {
                self.started = true;
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
