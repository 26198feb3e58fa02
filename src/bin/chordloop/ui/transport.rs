//! Transport bar widget - chord mode, play state, tempo, and clock.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordloop::engine::ChordEngine;
use chordloop::synth::SynthHandle;
use chordloop::theory::ChordMode;
use chordloop::transport::WallClock;

fn mode_name(mode: ChordMode) -> &'static str {
    match mode {
        ChordMode::Root => "root",
        ChordMode::MajorMinor => "major/minor",
        ChordMode::MajorMinor7 => "major/minor 7",
        ChordMode::Diminished => "diminished",
    }
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    engine: &ChordEngine<SynthHandle, WallClock>,
    sample_rate: f32,
) {
    let block = Block::default().title(" chordloop ").borders(Borders::ALL);

    let (play_symbol, play_str, play_color) = if engine.is_playing() {
        ("▶", "Looping", Color::Green)
    } else {
        ("⏸", "Stopped", Color::Yellow)
    };

    let slot = match engine.playback_position() {
        Some(slot) => format!("bar {}/{}  ", slot + 1, engine.log().len()),
        None => String::new(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" mode: {}  ", mode_name(engine.mode())),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{play_symbol} {play_str}  "),
            Style::default().fg(play_color),
        ),
        Span::styled(slot, Style::default().fg(Color::White)),
        Span::styled(
            format!("BPM: {:.0}  ", engine.tempo_bpm()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} events  ", engine.log().len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}s  ", engine.now()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
