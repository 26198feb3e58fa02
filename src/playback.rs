//! Loop playback: snapshot the recording log into a bar-quantized
//! schedule and drive the synth from transport time.
//!
//! Re-quantization is deliberate: every recorded event occupies exactly
//! one bar slot in log order, regardless of when it was captured. The
//! recorded duration only sets how long each triggered chord sustains,
//! never the spacing between triggers. The loop length is one bar per
//! event and repeats until stopped.

use crate::record::RecordingLog;
use crate::synth::Synth;
use crate::theory::Pitch;
use crate::transport::Clock;

/// One bar of the loop: the chord to trigger and how long to hold it.
#[derive(Debug, Clone, PartialEq)]
struct Slot {
    notes: Vec<Pitch>,
    sustain: f64,
}

/// Ephemeral, bar-quantized snapshot of the recording log.
///
/// Rebuilt on every play start; edits to the log made while playing only
/// show up on the next start.
#[derive(Debug, Clone)]
pub struct Schedule {
    slots: Vec<Slot>,
    bar_secs: f64,
}

impl Schedule {
    pub fn from_log(log: &RecordingLog, bar_secs: f64) -> Self {
        let slots = log
            .events()
            .iter()
            .map(|event| Slot {
                notes: event.notes.clone(),
                // A still-open event has no duration yet; hold it for
                // one bar
                sustain: event.duration.unwrap_or(bar_secs),
            })
            .collect();
        Self { slots, bar_secs }
    }

    /// Loop length in whole bars (= number of snapshotted events).
    pub fn loop_bars(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
}

/// Drives a looped [`Schedule`] against the transport clock.
///
/// Cooperative: the host calls [`Player::tick`] from its event loop and
/// the player catches up to transport time, triggering every slot
/// boundary crossed since the last call. Attacks and their matching
/// releases are the player's responsibility; the synth only hears
/// trigger calls.
pub struct Player {
    state: PlayerState,
    bpm: f64,
    schedule: Option<Schedule>,
    started_at: f64,
    /// Absolute bar counter since play started (wraps into the loop
    /// modulo its length)
    next_slot: u64,
    /// Sounding scheduled chords awaiting release: (notes, due time)
    sounding: Vec<(Vec<Pitch>, f64)>,
}

impl Player {
    pub fn new(bpm: f64) -> Self {
        Self {
            state: PlayerState::Idle,
            bpm,
            schedule: None,
            started_at: 0.0,
            next_slot: 0,
            sounding: Vec::new(),
        }
    }

    /// Seconds per bar at the current tempo (4/4 assumed).
    pub fn bar_secs(&self) -> f64 {
        240.0 / self.bpm
    }

    /// Set tempo; takes effect on the next play start (the schedule
    /// snapshot carries its own bar length).
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Slot index the loop is currently in, for display. `None` when
    /// idle or the loop is empty.
    pub fn position(&self) -> Option<usize> {
        let schedule = self.schedule.as_ref()?;
        if schedule.is_empty() || self.next_slot == 0 {
            return None;
        }
        Some(((self.next_slot - 1) % schedule.slots.len() as u64) as usize)
    }

    /// Snapshot `log` and start looping. Restarts cleanly if already
    /// playing (stop-before-start, so schedules never overlap). An empty
    /// log yields a zero-length loop: the transport starts and every
    /// tick is a no-op.
    pub fn play(&mut self, log: &RecordingLog, clock: &mut impl Clock, synth: &mut impl Synth) {
        if self.state == PlayerState::Playing {
            self.stop(clock, synth);
        }
        self.schedule = Some(Schedule::from_log(log, self.bar_secs()));
        self.started_at = clock.now();
        self.next_slot = 0;
        clock.start();
        self.state = PlayerState::Playing;
    }

    /// Tear down playback. Idempotent; stopping an idle player is a
    /// no-op.
    pub fn stop(&mut self, clock: &mut impl Clock, synth: &mut impl Synth) {
        if self.state == PlayerState::Idle {
            return;
        }
        let now = clock.now();
        for (notes, _) in self.sounding.drain(..) {
            synth.trigger_release(&notes, now);
        }
        clock.cancel_scheduled();
        clock.stop();
        self.schedule = None;
        self.next_slot = 0;
        self.state = PlayerState::Idle;
    }

    /// Advance to transport time: release due chords, then trigger every
    /// slot boundary crossed. A stalled host loop catches up in one
    /// call.
    pub fn tick(&mut self, clock: &impl Clock, synth: &mut impl Synth) {
        if self.state != PlayerState::Playing {
            return;
        }
        let now = clock.now();

        // Releases first, so a slot retriggering the same pitch releases
        // the old instance before the new attack
        self.sounding.retain_mut(|(notes, due)| {
            if now >= *due {
                synth.trigger_release(notes, now);
                false
            } else {
                true
            }
        });

        let Some(schedule) = self.schedule.as_ref() else {
            return;
        };
        if schedule.is_empty() {
            return;
        }

        let elapsed = now - self.started_at;
        let target = (elapsed / schedule.bar_secs).floor() as u64;
        while self.next_slot <= target {
            let slot = &schedule.slots[(self.next_slot % schedule.slots.len() as u64) as usize];
            synth.trigger_attack(&slot.notes, now);
            self.sounding.push((slot.notes.clone(), now + slot.sustain));
            self.next_slot += 1;
        }
    }
}
