//! Recorded-note tiles - one tile per recorded chord, deletable with
//! the cursor, with the looping slot highlighted during playback.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordloop::record::RecordingLog;

/// Tiles per row (the loop reads left to right, top to bottom)
const TILES_PER_ROW: usize = 4;

pub fn render_tiles(
    frame: &mut Frame,
    area: Rect,
    log: &RecordingLog,
    selected: usize,
    playing_slot: Option<usize>,
) {
    let block = Block::default()
        .title(" recorded loop (1 bar per tile) ")
        .borders(Borders::ALL);

    if log.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  play some keys to record...",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for (row_idx, row) in log.events().chunks(TILES_PER_ROW).enumerate() {
        let mut spans = vec![Span::raw(" ")];
        for (col_idx, event) in row.iter().enumerate() {
            let index = row_idx * TILES_PER_ROW + col_idx;
            let notes: Vec<String> = event.notes.iter().map(|p| p.to_string()).collect();
            let label = format!(" {:>2}: {} ", index + 1, notes.join(" "));

            let mut style = Style::default().fg(Color::Blue);
            if playing_slot == Some(index) {
                style = Style::default().fg(Color::Black).bg(Color::Green);
            }
            if index == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if event.is_open() {
                // Key still held, duration not patched yet
                style = style.add_modifier(Modifier::ITALIC);
            }

            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
