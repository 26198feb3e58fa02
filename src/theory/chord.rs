//! Chord construction: a mode plus a base pitch yields an ordered set of
//! chord tones, root first.

use serde::{Deserialize, Serialize};

use super::pitch::{Pitch, PitchClass};

/// Rule selecting which intervals are stacked on a root pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordMode {
    /// Just the root
    Root,
    /// Triad with a major or minor third (see [`is_minor`])
    MajorMinor,
    /// Triad plus a major or minor seventh
    MajorMinor7,
    /// Minor third and flattened fifth, quality-independent
    Diminished,
}

/// Reference scale sets for the quality test.
///
/// A pitch class counts as "minor" iff it is in the A-natural-minor set
/// and NOT in the C-major set. This is a coarse membership heuristic, not
/// key detection: the two sets share all seven naturals, so every natural
/// root takes the major third. Kept as-is; the engine's keymap only maps
/// naturals.
const MINOR_REFERENCE: [PitchClass; 7] = [
    PitchClass::A,
    PitchClass::B,
    PitchClass::C,
    PitchClass::D,
    PitchClass::E,
    PitchClass::F,
    PitchClass::G,
];

const MAJOR_REFERENCE: [PitchClass; 7] = [
    PitchClass::C,
    PitchClass::D,
    PitchClass::E,
    PitchClass::F,
    PitchClass::G,
    PitchClass::A,
    PitchClass::B,
];

fn is_minor(class: PitchClass) -> bool {
    MINOR_REFERENCE.contains(&class) && !MAJOR_REFERENCE.contains(&class)
}

/// Compute the chord tones for a mode rooted at `base`.
///
/// The returned set is ordered and always starts with `base`.
pub fn chord_tones(mode: ChordMode, base: Pitch) -> Vec<Pitch> {
    match mode {
        ChordMode::Root => vec![base],
        ChordMode::MajorMinor => {
            let third = if is_minor(base.class) { 3 } else { 4 };
            vec![base, base.transpose(third), base.transpose(7)]
        }
        ChordMode::MajorMinor7 => {
            let minor = is_minor(base.class);
            let third = if minor { 3 } else { 4 };
            let seventh = if minor { 10 } else { 11 };
            vec![
                base,
                base.transpose(third),
                base.transpose(7),
                base.transpose(seventh),
            ]
        }
        ChordMode::Diminished => vec![base, base.transpose(3), base.transpose(6)],
    }
}
