//! Terminal UI for knurl
//!
//! One row of seven rotary knobs over an oscilloscope. Knobs are dragged
//! with the mouse (or nudged with the arrow keys); every change is drained
//! from the panel as voice commands and pushed across the ring buffer to
//! the audio thread.

mod knobs;
mod scope;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use knurl::control::DragRouter;
use knurl::panel::{KnobId, Panel};
use knurl::voice::VoiceCommand;

use super::app::AudioOutput;

use knobs::render_knobs;
use scope::render_scope;

/// Oscilloscope window size in samples.
const VIS_BUFFER_SIZE: usize = 1024;

/// Terminal cells are coarse compared to pointer pixels, and roughly twice
/// as tall as wide. These factors convert cell deltas into the pointer
/// units the knob sensitivity constants were tuned for: a full-range
/// horizontal sweep takes about 25 columns.
const CELL_TO_POINTER_X: f64 = 8.0;
const CELL_TO_POINTER_Y: f64 = 16.0;

pub struct UiApp {
    panel: Panel,
    command_tx: Producer<VoiceCommand>,
    audio_rx: Consumer<f32>,
    audio: AudioOutput,
    sample_rate: f32,

    router: DragRouter<KnobId>,
    /// Screen rects of the knobs as of the last render, for hit testing.
    knob_rects: Vec<(KnobId, Rect)>,
    focused: usize,
    audio_buffer: Vec<f32>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        panel: Panel,
        command_tx: Producer<VoiceCommand>,
        audio_rx: Consumer<f32>,
        audio: AudioOutput,
        sample_rate: f32,
    ) -> Self {
        Self {
            panel,
            command_tx,
            audio_rx,
            audio,
            sample_rate,
            router: DragRouter::new(),
            knob_rects: Vec::with_capacity(KnobId::ALL.len()),
            focused: 0,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    /// Run the UI event loop until quit.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        execute!(std::io::stdout(), EnableMouseCapture)?;
        let result = self.event_loop(terminal);
        execute!(std::io::stdout(), DisableMouseCapture)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| {
                // Render borrows self mutably for the hit rects, so take
                // them out of the closure's way
                let mut rects = std::mem::take(&mut self.knob_rects);
                self.render(frame, &mut rects);
                self.knob_rects = rects;
            })?;

            // Block up to one frame for input, then drain the queue so a
            // burst of mouse-move events lands in a single frame
            if event::poll(Duration::from_millis(16))? {
                loop {
                    self.handle_event(event::read()?);
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.flush_commands();
        }

        Ok(())
    }

    /// Pull tap samples, keeping the most recent window for the scope.
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_event(&mut self, event: Event) {
        // Any gesture is the cue to (re)try starting the stream
        self.audio.ensure_started();

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(key.code);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.focused = (self.focused + KnobId::ALL.len() - 1) % KnobId::ALL.len();
            }
            KeyCode::Right => {
                self.focused = (self.focused + 1) % KnobId::ALL.len();
            }
            KeyCode::Up => {
                self.panel.nudge(KnobId::ALL[self.focused], 1.0);
            }
            KeyCode::Down => {
                self.panel.nudge(KnobId::ALL[self.focused], -1.0);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as f64 * CELL_TO_POINTER_X;
        let y = mouse.row as f64 * CELL_TO_POINTER_Y;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                if let Some(&(id, _)) = self
                    .knob_rects
                    .iter()
                    .find(|(_, rect)| rect.contains(position))
                {
                    self.router.begin(id, x, y);
                    self.focused = id.index();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if let Some((id, dx, dy)) = self.router.motion(x, y) {
                    self.panel.apply_delta(id, dx, dy);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.router.end();
            }
            _ => {}
        }
    }

    /// Move queued knob changes onto the audio thread.
    fn flush_commands(&mut self) {
        for command in self.panel.drain() {
            // The ring is far larger than one frame's worth of changes;
            // if it is somehow full the freshest future change wins anyway
            let _ = self.command_tx.push(command);
        }
    }

    fn render(&self, frame: &mut Frame, knob_rects: &mut Vec<(KnobId, Rect)>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Knob row
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_knobs(
            frame,
            chunks[0],
            &self.panel,
            KnobId::ALL[self.focused],
            knob_rects,
        );
        render_scope(frame, chunks[1], &self.audio_buffer, self.sample_rate);

        let help = if self.audio.is_started() {
            " [q] quit   [←/→] select   [↑/↓] adjust   drag a knob with the mouse".to_string()
        } else if let Some(err) = self.audio.last_error() {
            format!(" audio not running ({err}) - any input retries")
        } else {
            " click a knob or press any key to start audio".to_string()
        };
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );
    }
}
