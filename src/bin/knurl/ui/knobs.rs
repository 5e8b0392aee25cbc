//! Knob row widget - seven labeled rotary controls

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use knurl::panel::{KnobId, Panel};

/// Pointer glyphs clockwise from north, one per 45°.
const POINTERS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// Nearest pointer glyph for an indicator angle in degrees
/// (0 = up, clockwise). The knob arc runs 135°..405°, so the left stop
/// points down-right and the right stop up-right, like a hardware pot.
fn pointer_glyph(angle: f64) -> char {
    let normalized = angle.rem_euclid(360.0);
    let index = (normalized / 45.0).round() as usize % POINTERS.len();
    POINTERS[index]
}

/// Render the knob row and record each knob's screen rect for hit testing.
pub fn render_knobs(
    frame: &mut Frame,
    area: Rect,
    panel: &Panel,
    focused: KnobId,
    knob_rects: &mut Vec<(KnobId, Rect)>,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area);

    knob_rects.clear();
    for (id, column) in KnobId::ALL.into_iter().zip(columns.iter()) {
        knob_rects.push((id, *column));

        let is_focused = id == focused;
        let border_style = if is_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(format!(" {} ", id.name()))
            .borders(Borders::ALL)
            .border_style(border_style);

        let knob = panel.knob(id);
        let pointer = Line::from(pointer_glyph(knob.indicator_angle()).to_string())
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .centered();
        let readout = Line::from(panel.label(id).to_string())
            .style(Style::default().fg(Color::White))
            .centered();

        let paragraph = Paragraph::new(vec![pointer, readout]).block(block);
        frame.render_widget(paragraph, *column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_point_like_a_hardware_pot() {
        assert_eq!(pointer_glyph(135.0), '↘'); // low stop
        assert_eq!(pointer_glyph(270.0), '←'); // halfway
        assert_eq!(pointer_glyph(405.0), '↗'); // high stop
    }
}
