//! knurl - a single-voice synthesizer played with seven knobs
//!
//! Run with: cargo run
//!
//! Drag a knob with the mouse (horizontal raises, vertical lowers), or use
//! the arrow keys. Audio starts on the first input, q quits.

mod app;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    App::new().run()
}
