pub mod engine; // Key-event routing and chord-mode state
pub mod playback; // Loop schedule and player
pub mod record; // Recorded chord events
pub mod synth; // Synth trait, messages, reference voices
pub mod theory; // Pitches and chord construction
pub mod transport; // Clock trait and implementations

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
