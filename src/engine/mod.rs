//! The chord engine: routes raw key press/release events into chord
//! triggers, the recording log, and the playback player.
//!
//! One engine object owns all mutable performance state (held keys,
//! current chord mode, the player's schedule handle) and the Synth and
//! Clock collaborators. All mutation happens through `key_down`,
//! `key_up`, the playback controls, and `tick`, each of which runs to
//! completion on the caller's thread; the engine is single-threaded by
//! construction.

pub mod keymap;

pub use keymap::Keymap;

use crate::playback::Player;
use crate::record::{EventId, RecordingLog};
use crate::synth::Synth;
use crate::theory::{chord_tones, ChordMode, Pitch};
use crate::transport::Clock;

pub struct ChordEngine<S: Synth, C: Clock> {
    keymap: Keymap,
    mode: ChordMode,
    /// Keys currently down, each tied to the open log event it created.
    /// Small and scanned linearly; a performance holds a handful of
    /// keys at most.
    held: Vec<(char, EventId)>,
    log: RecordingLog,
    player: Player,
    synth: S,
    clock: C,
}

impl<S: Synth, C: Clock> ChordEngine<S, C> {
    pub fn new(synth: S, clock: C) -> Self {
        Self {
            keymap: Keymap::default(),
            mode: ChordMode::Root,
            held: Vec::new(),
            log: RecordingLog::new(),
            player: Player::new(120.0),
            synth,
            clock,
        }
    }

    /// Replace the key layout (builder-style).
    pub fn keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Set the playback tempo in beats per minute (builder-style).
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.player.set_bpm(bpm);
        self
    }

    /// Handle a raw key-down.
    ///
    /// Mode keys switch the chord mode and never reach the musical
    /// path. Musical keys trigger an attack and open a recorded event.
    /// Unmapped keys and repeats of a key already held are silently
    /// ignored.
    pub fn key_down(&mut self, key: char) {
        if let Some(mode) = self.keymap.mode_for(key) {
            self.mode = mode;
            return;
        }
        let Some(base) = self.keymap.note_for(key) else {
            return;
        };
        if self.held.iter().any(|(held_key, _)| *held_key == key) {
            // Key-repeat: already held, drop until the matching key-up
            return;
        }

        let tones = chord_tones(self.mode, base);
        let now = self.clock.now();
        self.synth.trigger_attack(&tones, now);
        let id = self.log.append(now, tones);
        self.held.push((key, id));
    }

    /// Handle a raw key-up.
    ///
    /// Releases the chord that was attacked for this key (not a
    /// recompute under the current mode, which may have changed
    /// mid-press) and patches the held duration onto the event opened at
    /// key-down. A key-up with no matching open event is a recoverable
    /// no-op.
    pub fn key_up(&mut self, key: char) {
        if self.keymap.note_for(key).is_none() {
            return;
        }
        let Some(pos) = self.held.iter().position(|(held_key, _)| *held_key == key) else {
            tracing::debug!(key = %key, "key-up without a held key, ignoring");
            return;
        };
        let (_, id) = self.held.remove(pos);
        let now = self.clock.now();

        match self.log.get(id) {
            Some(event) => {
                let notes = event.notes.clone();
                self.synth.trigger_release(&notes, now);
            }
            None => {
                // Event deleted mid-press; release a recompute so no
                // voice is left hanging
                if let Some(base) = self.keymap.note_for(key) {
                    let tones = chord_tones(self.mode, base);
                    self.synth.trigger_release(&tones, now);
                }
            }
        }

        if !self.log.close(id, now) {
            tracing::debug!(key = %key, ?id, "no open event for key-up, skipping duration patch");
        }
    }

    /// Current chord mode.
    pub fn mode(&self) -> ChordMode {
        self.mode
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn log(&self) -> &RecordingLog {
        &self.log
    }

    /// Delete the recorded event at `index`. Valid at any time; a
    /// running loop keeps its snapshot until the next play start.
    pub fn remove_event(&mut self, index: usize) -> bool {
        self.log.remove(index).is_some()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Start looping the current log (restarts if already playing).
    pub fn play(&mut self) {
        self.player.play(&self.log, &mut self.clock, &mut self.synth);
    }

    /// Stop playback. Idempotent.
    pub fn stop(&mut self) {
        self.player.stop(&mut self.clock, &mut self.synth);
    }

    pub fn toggle_playback(&mut self) {
        if self.player.is_playing() {
            self.stop();
        } else {
            self.play();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Slot the loop is currently in, for display.
    pub fn playback_position(&self) -> Option<usize> {
        self.player.position()
    }

    /// Drive playback from the host loop.
    pub fn tick(&mut self) {
        self.player.tick(&self.clock, &mut self.synth);
    }

    /// Transport time, for display.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Playback tempo in beats per minute.
    pub fn tempo_bpm(&self) -> f64 {
        self.player.bpm()
    }

    /// The synth collaborator.
    pub fn synth(&self) -> &S {
        &self.synth
    }

    /// Mutable access to the transport clock collaborator.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn key_layout(&self) -> &Keymap {
        &self.keymap
    }

    /// Synchronously stop playback and silence any held notes. Called
    /// before the engine is discarded so no synth voice or schedule
    /// outlives it.
    pub fn teardown(&mut self) {
        self.stop();
        let now = self.clock.now();
        let held: Vec<(char, EventId)> = self.held.drain(..).collect();
        for (key, id) in held {
            let notes: Option<Vec<Pitch>> = match self.log.get(id) {
                Some(event) => Some(event.notes.clone()),
                None => self
                    .keymap
                    .note_for(key)
                    .map(|base| chord_tones(self.mode, base)),
            };
            if let Some(notes) = notes {
                self.synth.trigger_release(&notes, now);
            }
            self.log.close(id, now);
        }
    }
}
