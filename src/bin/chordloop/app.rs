//! ChordLoop - application wiring: audio output, synth channel, engine,
//! and the terminal UI.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use chordloop::{
    engine::{ChordEngine, Keymap},
    synth::{ChordSynth, SynthHandle},
    transport::WallClock,
    MAX_BLOCK_SIZE,
};

use super::ui::UiApp;

/// Ring buffer capacity for engine -> audio thread messages
const MESSAGE_CAPACITY: usize = 256;

/// Enough voices for a seventh chord per hand plus release tails
const MAX_VOICES: usize = 16;

/// Main application builder
pub struct ChordLoop {
    bpm: f64,
    keymap: Keymap,
}

impl ChordLoop {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            keymap: Keymap::default(),
        }
    }

    /// Set the playback tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Load key bindings from a JSON file
    pub fn keymap_file(mut self, path: &str) -> EyreResult<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read keymap file {path}"))?;
        self.keymap = Keymap::from_json(&json)
            .wrap_err_with(|| format!("invalid keymap file {path}"))?;
        Ok(self)
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        // Engine side keeps the handle; the renderer moves into the
        // audio callback with the consumer end
        let (handle, rx) = SynthHandle::channel(MESSAGE_CAPACITY);
        let mut synth = ChordSynth::new(sample_rate, MAX_VOICES, rx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    synth.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        let engine = ChordEngine::new(handle, WallClock::new())
            .keymap(self.keymap)
            .bpm(self.bpm);

        let mut terminal = ratatui::init();
        let result = UiApp::new(engine, sample_rate).run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for ChordLoop {
    fn default() -> Self {
        Self::new()
    }
}
