pub mod chord;
pub mod pitch;

pub use chord::{chord_tones, ChordMode};
pub use pitch::{ParsePitchError, Pitch, PitchClass};
