// Purpose: the Synth seam and a reference implementation.
// The engine only talks to the `Synth` trait; the poly voice renderer
// on the audio thread is one implementation target, reached through a
// message ring buffer.

pub mod message;
pub mod poly;
pub mod voice;

#[cfg(feature = "rtrb")]
pub mod handle;

pub use message::{MessageReceiver, SynthMessage};
pub use poly::ChordSynth;

#[cfg(feature = "rtrb")]
pub use handle::SynthHandle;

use crate::theory::Pitch;

/// Sound-producing collaborator driven by the engine.
///
/// Timestamps are transport seconds; implementations may apply them or
/// play immediately. Calls are side-effecting and infallible from the
/// engine's point of view.
pub trait Synth {
    fn trigger_attack(&mut self, notes: &[Pitch], time: f64);

    fn trigger_release(&mut self, notes: &[Pitch], time: f64);
}

/// Synth that produces nothing. Useful for headless runs and benches.
#[derive(Debug, Default)]
pub struct NullSynth;

impl Synth for NullSynth {
    fn trigger_attack(&mut self, _notes: &[Pitch], _time: f64) {}

    fn trigger_release(&mut self, _notes: &[Pitch], _time: f64) {}
}
