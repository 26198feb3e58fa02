//! Polyphonic renderer for the audio thread.
//!
//! Consumes [`SynthMessage`]s at the start of each block, allocates
//! voices, and mixes them into the output buffer. Allocation-free after
//! construction.

use super::message::{MessageReceiver, SynthMessage};
use super::voice::{Voice, VoiceState};

/// Output headroom so stacked chord tones do not clip.
const MIX_GAIN: f32 = 0.2;

pub struct ChordSynth<R: MessageReceiver> {
    voices: Vec<Voice>,
    rx: R,
    frame_counter: u64,
}

impl<R: MessageReceiver> ChordSynth<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        // Soft pad-like shape suits held chords
        Self::with_adsr(sample_rate, max_voices, rx, 0.01, 0.1, 0.7, 0.3)
    }

    pub fn with_adsr(
        sample_rate: f32,
        max_voices: usize,
        rx: R,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Self {
        let voices = (0..max_voices)
            .map(|_| Voice::new(sample_rate, attack, decay, sustain, release))
            .collect();
        Self {
            voices,
            rx,
            frame_counter: 0,
        }
    }

    /// Render one block of mono samples into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::NoteOn { note, velocity } => {
                    let age = self.frame_counter;
                    if let Some(voice) = self.allocate_voice() {
                        voice.start(note, velocity, age);
                    }
                }
                SynthMessage::NoteOff { note } => {
                    // Release every sounding instance; repeated loop
                    // triggers can stack the same pitch
                    for voice in &mut self.voices {
                        if voice.note() == note && voice.state() == VoiceState::Active {
                            voice.release();
                        }
                    }
                }
                SynthMessage::AllNotesOff => {
                    for voice in &mut self.voices {
                        if voice.is_active() {
                            voice.release();
                        }
                    }
                }
            }
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.render_add(out);
            }
        }
        for sample in out.iter_mut() {
            *sample *= MIX_GAIN;
        }

        self.frame_counter += out.len() as u64;
    }

    /// Number of voices currently sounding, for display.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        if let Some(idx) = self.voices.iter().position(|v| v.is_free()) {
            return Some(&mut self.voices[idx]);
        }

        // Steal the oldest releasing voice rather than cutting a held one
        self.voices
            .iter_mut()
            .filter(|v| v.state() == VoiceState::Releasing)
            .min_by_key(|v| v.age())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    const SR: f32 = 48_000.0;

    fn synth_with(messages: &[SynthMessage]) -> ChordSynth<VecDeque<SynthMessage>> {
        let rx: VecDeque<SynthMessage> = messages.iter().copied().collect();
        ChordSynth::with_adsr(SR, 8, rx, 0.001, 0.01, 0.7, 0.01)
    }

    #[test]
    fn note_on_produces_sound() {
        let mut synth = synth_with(&[SynthMessage::NoteOn { note: 60, velocity: 100 }]);
        let mut buf = vec![0.0f32; 512];
        synth.render_block(&mut buf);
        assert!(buf.iter().any(|s| s.abs() > 0.0));
        assert_eq!(synth.active_voices(), 1);
    }

    #[test]
    fn chord_allocates_one_voice_per_tone() {
        let mut synth = synth_with(&[
            SynthMessage::NoteOn { note: 60, velocity: 100 },
            SynthMessage::NoteOn { note: 64, velocity: 100 },
            SynthMessage::NoteOn { note: 67, velocity: 100 },
        ]);
        let mut buf = vec![0.0f32; 64];
        synth.render_block(&mut buf);
        assert_eq!(synth.active_voices(), 3);
    }

    #[test]
    fn note_off_then_tail_then_silence() {
        let mut synth = synth_with(&[SynthMessage::NoteOn { note: 60, velocity: 100 }]);
        let mut buf = vec![0.0f32; 512];
        synth.render_block(&mut buf);

        synth.rx.push_back(SynthMessage::NoteOff { note: 60 });
        // 10ms release at 48kHz fits well inside a few blocks
        for _ in 0..8 {
            synth.render_block(&mut buf);
        }
        assert_eq!(synth.active_voices(), 0);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn all_notes_off_silences_everything() {
        let mut synth = synth_with(&[
            SynthMessage::NoteOn { note: 60, velocity: 100 },
            SynthMessage::NoteOn { note: 64, velocity: 100 },
        ]);
        let mut buf = vec![0.0f32; 256];
        synth.render_block(&mut buf);

        synth.rx.push_back(SynthMessage::AllNotesOff);
        for _ in 0..8 {
            synth.render_block(&mut buf);
        }
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn voice_exhaustion_does_not_panic() {
        let messages: Vec<SynthMessage> = (0..32)
            .map(|i| SynthMessage::NoteOn { note: 40 + i, velocity: 100 })
            .collect();
        let mut synth = synth_with(&messages);
        let mut buf = vec![0.0f32; 64];
        synth.render_block(&mut buf);
        // Only 8 voices exist; the rest are dropped, not crashed on
        assert_eq!(synth.active_voices(), 8);
    }

    #[test]
    fn mix_stays_in_range_for_a_seventh_chord() {
        let mut synth = synth_with(&[
            SynthMessage::NoteOn { note: 60, velocity: 127 },
            SynthMessage::NoteOn { note: 64, velocity: 127 },
            SynthMessage::NoteOn { note: 67, velocity: 127 },
            SynthMessage::NoteOn { note: 71, velocity: 127 },
        ]);
        let mut buf = vec![0.0f32; 4_096];
        synth.render_block(&mut buf);
        assert!(buf.iter().all(|s| s.abs() <= 1.0));
    }
}
