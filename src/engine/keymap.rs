//! Key bindings: which keys play notes and which switch chord modes.
//!
//! The default layout puts a white-key octave-and-a-bit on the home row
//! and the four chord modes on q/w/e/r. Maps are serde-serializable so
//! a custom layout can be loaded from a JSON file.

use serde::{Deserialize, Serialize};

use crate::theory::{ChordMode, Pitch, PitchClass};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keymap {
    /// Musical keys: key -> base pitch
    notes: Vec<(char, Pitch)>,
    /// Mode-switch keys: key -> chord mode
    modes: Vec<(char, ChordMode)>,
}

impl Default for Keymap {
    fn default() -> Self {
        let p = |class, octave| Pitch::new(class, octave);
        Self {
            notes: vec![
                ('a', p(PitchClass::C, 4)),
                ('s', p(PitchClass::D, 4)),
                ('d', p(PitchClass::E, 4)),
                ('f', p(PitchClass::F, 4)),
                ('g', p(PitchClass::G, 4)),
                ('h', p(PitchClass::A, 4)),
                ('j', p(PitchClass::B, 4)),
                ('k', p(PitchClass::C, 5)),
                ('l', p(PitchClass::D, 5)),
            ],
            modes: vec![
                ('q', ChordMode::Root),
                ('w', ChordMode::MajorMinor),
                ('e', ChordMode::MajorMinor7),
                ('r', ChordMode::Diminished),
            ],
        }
    }
}

impl Keymap {
    /// Base pitch for a musical key, or `None` for unmapped keys.
    pub fn note_for(&self, key: char) -> Option<Pitch> {
        self.notes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, pitch)| *pitch)
    }

    /// Target mode for a mode-switch key.
    pub fn mode_for(&self, key: char) -> Option<ChordMode> {
        self.modes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, mode)| *mode)
    }

    /// Musical bindings in layout order, for display.
    pub fn note_bindings(&self) -> impl Iterator<Item = (char, Pitch)> + '_ {
        self.notes.iter().copied()
    }

    /// Mode bindings in layout order, for display.
    pub fn mode_bindings(&self) -> impl Iterator<Item = (char, ChordMode)> + '_ {
        self.modes.iter().copied()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
