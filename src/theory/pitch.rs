/*
Pitch Representation
====================

A Pitch is a pitch class (C, C#, D, ...) plus an octave, e.g. "C4" for
middle C. Internally everything reduces to a semitone index using the
MIDI formula:

    index = 12 * (octave + 1) + semitone

Where semitone: C=0, C#=1, D=2, D#=3, E=4, F=5, F#=6, G=7, G#=8, A=9,
A#=10, B=11. Middle C (C4) = 60, A4 = 69 (the 440 Hz tuning reference).

Transposition is plain arithmetic on that index, so it is total: any
pitch can be transposed by any signed semitone count and octaves carry
correctly across the C boundary. Flats parse as aliases of the enharmonic
sharp ("Db4" == "C#4") and display normalizes to sharps.
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the twelve chromatic pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// Semitone offset within the octave (C = 0 .. B = 11)
    pub const fn semitone(self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs => 1,
            PitchClass::D => 2,
            PitchClass::Ds => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs => 6,
            PitchClass::G => 7,
            PitchClass::Gs => 8,
            PitchClass::A => 9,
            PitchClass::As => 10,
            PitchClass::B => 11,
        }
    }

    /// Pitch class for a semitone offset (wraps modulo 12)
    pub const fn from_semitone(semitone: i32) -> Self {
        match semitone.rem_euclid(12) {
            0 => PitchClass::C,
            1 => PitchClass::Cs,
            2 => PitchClass::D,
            3 => PitchClass::Ds,
            4 => PitchClass::E,
            5 => PitchClass::F,
            6 => PitchClass::Fs,
            7 => PitchClass::G,
            8 => PitchClass::Gs,
            9 => PitchClass::A,
            10 => PitchClass::As,
            _ => PitchClass::B,
        }
    }

    /// Display name, sharps only ("C", "C#", ...)
    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

/// A named musical tone with octave, e.g. C4 (middle C).
///
/// Immutable value type; transposition produces a new Pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: i8,
}

impl Pitch {
    pub const fn new(class: PitchClass, octave: i8) -> Self {
        Self { class, octave }
    }

    /// Absolute semitone index (MIDI numbering, C4 = 60)
    pub const fn semitone_index(self) -> i32 {
        12 * (self.octave as i32 + 1) + self.class.semitone()
    }

    /// Rebuild a pitch from an absolute semitone index
    pub const fn from_semitone_index(index: i32) -> Self {
        Self {
            class: PitchClass::from_semitone(index),
            octave: (index.div_euclid(12) - 1) as i8,
        }
    }

    /// Transpose by a signed semitone count.
    ///
    /// Defined for any input; octaves wrap through the C boundary,
    /// so `B4.transpose(1)` is C5 and `C4.transpose(-1)` is B3.
    pub const fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone_index(self.semitone_index() + semitones)
    }

    /// MIDI note number, clamped to the 0-127 wire range
    pub fn midi(self) -> u8 {
        self.semitone_index().clamp(0, 127) as u8
    }

    /// Frequency in Hz under equal temperament, A4 = 440
    pub fn frequency(self) -> f32 {
        440.0 * 2.0f32.powf((self.semitone_index() - 69) as f32 / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.name(), self.octave)
    }
}

/// Error parsing a pitch from text like "C4" or "F#3"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePitchError {
    input: String,
}

impl fmt::Display for ParsePitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pitch: {:?} (expected e.g. \"C4\" or \"F#3\")", self.input)
    }
}

impl std::error::Error for ParsePitchError {}

impl FromStr for Pitch {
    type Err = ParsePitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePitchError { input: s.to_string() };
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(err)?;
        let natural = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(err()),
        };
        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        let octave: i8 = octave_str.parse().map_err(|_| err())?;
        Ok(Pitch::new(
            PitchClass::from_semitone(natural + accidental),
            octave,
        ))
    }
}

// String conversions for serde, so keymap files read "C4" not a struct.

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}

impl TryFrom<String> for Pitch {
    type Error = ParsePitchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_is_60() {
        assert_eq!(Pitch::new(PitchClass::C, 4).semitone_index(), 60);
    }

    #[test]
    fn a440_reference() {
        let a4 = Pitch::new(PitchClass::A, 4);
        assert_eq!(a4.midi(), 69);
        assert!((a4.frequency() - 440.0).abs() < 1e-3);
    }

    #[test]
    fn transpose_within_octave() {
        let c4 = Pitch::new(PitchClass::C, 4);
        assert_eq!(c4.transpose(4), Pitch::new(PitchClass::E, 4));
        assert_eq!(c4.transpose(7), Pitch::new(PitchClass::G, 4));
    }

    #[test]
    fn transpose_wraps_octave() {
        let b4 = Pitch::new(PitchClass::B, 4);
        assert_eq!(b4.transpose(1), Pitch::new(PitchClass::C, 5));

        let c4 = Pitch::new(PitchClass::C, 4);
        assert_eq!(c4.transpose(-1), Pitch::new(PitchClass::B, 3));
        assert_eq!(c4.transpose(-13), Pitch::new(PitchClass::B, 2));
    }

    #[test]
    fn transpose_round_trips() {
        let d5 = Pitch::new(PitchClass::D, 5);
        assert_eq!(d5.transpose(10).transpose(-10), d5);
    }

    #[test]
    fn parse_and_display() {
        let c4: Pitch = "C4".parse().unwrap();
        assert_eq!(c4, Pitch::new(PitchClass::C, 4));
        assert_eq!(c4.to_string(), "C4");

        let fs3: Pitch = "F#3".parse().unwrap();
        assert_eq!(fs3, Pitch::new(PitchClass::Fs, 3));
        assert_eq!(fs3.to_string(), "F#3");
    }

    #[test]
    fn flats_alias_sharps() {
        let db4: Pitch = "Db4".parse().unwrap();
        assert_eq!(db4, Pitch::new(PitchClass::Cs, 4));
        // Display normalizes to the sharp spelling
        assert_eq!(db4.to_string(), "C#4");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("H4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
        assert!("C#x".parse::<Pitch>().is_err());
    }

    #[test]
    fn octaves_are_12_apart() {
        let c4 = Pitch::new(PitchClass::C, 4);
        let c5 = Pitch::new(PitchClass::C, 5);
        assert_eq!(c5.semitone_index() - c4.semitone_index(), 12);
    }
}
