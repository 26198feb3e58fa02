/*
Reference Voice
===============

One voice = one sine oscillator shaped by a linear ADSR envelope.

The envelope is a five-stage state machine:

    Idle -> Attack -> Decay -> Sustain -> Release -> Idle

note_off triggers Release from ANY stage, and Release always ramps from
the CURRENT level rather than the sustain level, so releasing during the
attack does not click. Release pre-computes its sample count at note_off
and interpolates linearly, which guarantees it lands exactly on 0.0.

Linear ramps, not exponential: simple, predictable, and punchy enough
for a chord keyboard.
*/

use crate::MIN_TIME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear ADSR envelope generator.
#[derive(Debug, Clone)]
pub struct Adsr {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeStage,
    level: f32,

    // Release bookkeeping, snapshotted at note_off for precision
    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Adsr {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    pub fn note_off(&mut self, sample_rate: f32) {
        self.release_start_level = self.level;
        self.release_total_samples = ((self.release_time * sample_rate) as u32).max(1);
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new level.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {}
            EnvelopeStage::Attack => {
                self.level += 1.0 / (self.attack_time * sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level -= (1.0 - self.sustain_level) / (self.decay_time * sample_rate);
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {}
            EnvelopeStage::Release => {
                self.release_elapsed_samples += 1;
                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                } else {
                    let t = self.release_elapsed_samples as f32
                        / self.release_total_samples as f32;
                    self.level = self.release_start_level * (1.0 - t);
                }
            }
        }
        self.level
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Idle)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Available for allocation
    Free,
    /// Playing, envelope before release
    Active,
    /// Note released, envelope in release phase
    Releasing,
}

/// A single sine voice.
pub struct Voice {
    note: u8,
    state: VoiceState,
    age: u64,
    sample_rate: f32,
    phase: f32,
    phase_inc: f32,
    gain: f32,
    env: Adsr,
}

impl Voice {
    pub fn new(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            note: 0,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            phase: 0.0,
            phase_inc: 0.0,
            gain: 0.0,
            env: Adsr::new(attack, decay, sustain, release),
        }
    }

    pub fn start(&mut self, note: u8, velocity: u8, age: u64) {
        let frequency = 440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0);
        self.note = note;
        self.state = VoiceState::Active;
        self.age = age;
        self.phase = 0.0;
        self.phase_inc = frequency / self.sample_rate;
        self.gain = velocity as f32 / 127.0;
        self.env.note_on();
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.env.note_off(self.sample_rate);
        }
    }

    /// Mix this voice into `out`. Frees itself once the release tail
    /// finishes.
    pub fn render_add(&mut self, out: &mut [f32]) {
        use std::f32::consts::TAU;

        for sample in out.iter_mut() {
            let level = self.env.next_sample(self.sample_rate);
            if !self.env.is_active() {
                self.free();
                return;
            }
            *sample += (self.phase * TAU).sin() * level * self.gain;
            self.phase += self.phase_inc;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.gain = 0.0;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.env.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Adsr::new(0.01, 0.1, 0.7, 0.1);
        env.note_on();
        // 10ms attack at 48kHz = 480 samples
        let mut peak = 0.0f32;
        for _ in 0..600 {
            peak = peak.max(env.next_sample(SR));
        }
        assert!((peak - 1.0).abs() < 1e-3);
    }

    #[test]
    fn decay_settles_on_sustain() {
        let mut env = Adsr::new(0.001, 0.01, 0.5, 0.1);
        env.note_on();
        for _ in 0..2_000 {
            env.next_sample(SR);
        }
        assert!(matches!(env.stage(), EnvelopeStage::Sustain));
        assert!((env.level() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn release_decays_to_silence() {
        let mut env = Adsr::new(0.001, 0.01, 0.7, 0.005);
        env.note_on();
        for _ in 0..1_000 {
            env.next_sample(SR);
        }
        env.note_off(SR);
        for _ in 0..300 {
            env.next_sample(SR);
        }
        assert!(!env.is_active());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut env = Adsr::new(1.0, 0.1, 0.7, 0.1);
        env.note_on();
        for _ in 0..100 {
            env.next_sample(SR);
        }
        let before = env.level();
        assert!(before < 0.5, "attack should still be ramping");
        env.note_off(SR);
        let after = env.next_sample(SR);
        // No jump up to sustain level on release
        assert!(after <= before);
    }

    #[test]
    fn voice_frees_after_release_tail() {
        let mut voice = Voice::new(SR, 0.001, 0.01, 0.7, 0.002);
        voice.start(60, 100, 0);
        assert!(voice.is_active());

        let mut buf = vec![0.0f32; 512];
        voice.render_add(&mut buf);
        assert!(buf.iter().any(|s| s.abs() > 0.0));

        voice.release();
        assert_eq!(voice.state(), VoiceState::Releasing);
        for _ in 0..10 {
            buf.fill(0.0);
            voice.render_add(&mut buf);
        }
        assert!(voice.is_free());
    }

    #[test]
    fn voice_output_stays_in_range() {
        let mut voice = Voice::new(SR, 0.001, 0.01, 1.0, 0.1);
        voice.start(69, 127, 0);
        let mut buf = vec![0.0f32; 4_096];
        voice.render_add(&mut buf);
        assert!(buf.iter().all(|s| s.abs() <= 1.0));
    }
}
