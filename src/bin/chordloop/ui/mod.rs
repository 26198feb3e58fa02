//! TUI module for chordloop
//!
//! Routes terminal key press/release events into the chord engine and
//! renders the recorded-event tiles plus a transport line.

mod tiles;
mod transport;

use std::io::stdout;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};

use chordloop::engine::ChordEngine;
use chordloop::synth::SynthHandle;
use chordloop::transport::WallClock;

use tiles::render_tiles;
use transport::render_transport;

/// Hold length for simulated key-ups in terminals that cannot report
/// key releases (no kitty keyboard protocol).
const FALLBACK_HOLD_SECS: f64 = 0.3;

/// UI application state
pub struct UiApp {
    engine: ChordEngine<SynthHandle, WallClock>,
    sample_rate: f32,
    /// Tile index the deletion cursor is on
    selected: usize,
    /// Whether the terminal delivers real key-release events
    release_events: bool,
    /// Simulated key-ups: (key, due transport time)
    pending_releases: Vec<(char, f64)>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: ChordEngine<SynthHandle, WallClock>, sample_rate: f32) -> Self {
        Self {
            engine,
            sample_rate,
            selected: 0,
            release_events: false,
            pending_releases: Vec::new(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        // Ask for key-release reporting where the terminal supports it;
        // otherwise key-downs get a fixed-length simulated hold
        if matches!(crossterm::terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.release_events = true;
        }

        while !self.should_quit {
            // Cooperative scheduling: playback triggers and key handling
            // interleave on this one thread
            self.engine.tick();
            self.flush_pending_releases();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking input poll, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        // Leave nothing sounding behind
        self.engine.teardown();
        if self.release_events {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }

        Ok(())
    }

    fn flush_pending_releases(&mut self) {
        if self.pending_releases.is_empty() {
            return;
        }
        let now = self.engine.now();
        let due: Vec<char> = self
            .pending_releases
            .iter()
            .filter(|(_, at)| now >= *at)
            .map(|(key, _)| *key)
            .collect();
        self.pending_releases.retain(|(_, at)| now < *at);
        for key in due {
            self.engine.key_up(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => self.handle_press(key),
            KeyEventKind::Release => {
                if let KeyCode::Char(c) = key.code {
                    self.engine.key_up(c.to_ascii_lowercase());
                }
            }
            // The engine suppresses repeats anyway; drop them early
            KeyEventKind::Repeat => {}
        }
    }

    fn handle_press(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.engine.toggle_playback(),
            KeyCode::Left => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right => {
                if self.selected + 1 < self.engine.log().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Delete | KeyCode::Backspace => {
                if self.engine.remove_event(self.selected) {
                    let len = self.engine.log().len();
                    self.selected = self.selected.min(len.saturating_sub(1));
                }
            }
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                self.engine.key_down(c);
                if !self.release_events && self.engine.key_layout().note_for(c).is_some() {
                    let due = self.engine.now() + FALLBACK_HOLD_SECS;
                    self.pending_releases.push((c, due));
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(frame.area());

        render_transport(frame, chunks[0], &self.engine, self.sample_rate);
        render_tiles(
            frame,
            chunks[1],
            self.engine.log(),
            self.selected,
            self.engine.playback_position(),
        );
        self.render_help(frame, chunks[2]);
    }

    fn render_help(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let note_keys: String = self
            .engine
            .key_layout()
            .note_bindings()
            .map(|(key, _)| key)
            .collect();
        let mode_keys: String = self
            .engine
            .key_layout()
            .mode_bindings()
            .map(|(key, _)| key)
            .collect();

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{note_keys} "), Style::default().fg(Color::Cyan)),
                Span::raw("play notes   "),
                Span::styled(format!("{mode_keys} "), Style::default().fg(Color::Cyan)),
                Span::raw("chord mode"),
            ]),
            Line::from(vec![
                Span::styled("space ", Style::default().fg(Color::Cyan)),
                Span::raw("play/stop loop   "),
                Span::styled("←/→ del ", Style::default().fg(Color::Cyan)),
                Span::raw("remove tile   "),
                Span::styled("esc ", Style::default().fg(Color::Cyan)),
                Span::raw("quit"),
            ]),
        ];

        let block = Block::default().title(" keys ").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
