//! chordloop - keyboard chord synthesizer with loop recording
//!
//! Run with: cargo run
//!
//! Optional arguments: a tempo in bpm and/or a path to a JSON keymap
//! file, in any order. Set RUST_LOG to write engine logs to
//! chordloop.log (the TUI owns the terminal).

mod app;
mod ui;

use std::sync::Arc;

use app::ChordLoop;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut app = ChordLoop::new();
    for arg in std::env::args().skip(1) {
        app = match arg.parse::<f64>() {
            Ok(bpm) => app.bpm(bpm),
            Err(_) => app.keymap_file(&arg)?,
        };
    }
    app.run()
}

fn init_logging() -> color_eyre::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("chordloop.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
