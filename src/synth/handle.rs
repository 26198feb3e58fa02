//! Engine-side synth handle: converts chord-tone triggers into note
//! messages on a lock-free ring buffer for the audio thread.

use rtrb::{Consumer, Producer, RingBuffer};

use super::message::SynthMessage;
use super::Synth;
use crate::theory::Pitch;

const DEFAULT_VELOCITY: u8 = 100;

/// [`Synth`] implementation that pushes messages to a [`ChordSynth`]
/// running in the audio callback.
///
/// Timestamps are ignored here: the engine always triggers "now" and the
/// renderer applies messages at the start of its next block, which is
/// within one buffer of wall time.
///
/// [`ChordSynth`]: super::ChordSynth
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
}

impl SynthHandle {
    pub fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx }
    }

    /// Create a connected handle/receiver pair.
    pub fn channel(capacity: usize) -> (SynthHandle, Consumer<SynthMessage>) {
        let (tx, rx) = RingBuffer::new(capacity);
        (SynthHandle::new(tx), rx)
    }

    /// Silence everything, e.g. on teardown.
    pub fn release_all(&mut self) {
        self.send(SynthMessage::AllNotesOff);
    }

    fn send(&mut self, msg: SynthMessage) {
        // A full ring means the audio thread has stalled; dropping the
        // message is the only non-blocking option.
        if self.tx.push(msg).is_err() {
            tracing::debug!(?msg, "synth ring buffer full, dropping message");
        }
    }
}

impl Synth for SynthHandle {
    fn trigger_attack(&mut self, notes: &[Pitch], _time: f64) {
        for pitch in notes {
            self.send(SynthMessage::NoteOn {
                note: pitch.midi(),
                velocity: DEFAULT_VELOCITY,
            });
        }
    }

    fn trigger_release(&mut self, notes: &[Pitch], _time: f64) {
        for pitch in notes {
            self.send(SynthMessage::NoteOff { note: pitch.midi() });
        }
    }
}
