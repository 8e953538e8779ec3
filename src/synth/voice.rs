//! A single one-shot voice: sine oscillator shaped by a pluck envelope.
//!
//! Voices are spawned by the render engine when a scheduled sound's onset
//! falls inside the current block. `delay` counts down the samples between
//! the block start and the exact onset so triggering stays sample-accurate
//! regardless of block size.

use std::f32::consts::TAU;

use super::envelope::{PluckEnvelope, CLICK_SECONDS, TONE_SECONDS};

const TONE_ATTACK_SECONDS: f32 = 0.01;
const TONE_GAIN: f32 = 0.3;

const CLICK_ATTACK_SECONDS: f32 = 0.002;
const CLICK_GAIN: f32 = 0.4;
/// Downbeat clicks are pitched above the other three beats.
const CLICK_ACCENT_HZ: f32 = 1_000.0;
const CLICK_PLAIN_HZ: f32 = 800.0;

pub struct Voice {
    /// Session epoch this voice belongs to; stale epochs are killed wholesale.
    epoch: u64,
    phase: f32,
    phase_increment: f32,
    gain: f32,
    delay: u32,
    envelope: PluckEnvelope,
}

impl Voice {
    /// A plucked tone for one fretted note.
    pub fn tone(frequency: f64, delay: u32, epoch: u64, sample_rate: f32) -> Self {
        Self::new(
            frequency as f32,
            TONE_GAIN,
            PluckEnvelope::new(TONE_ATTACK_SECONDS, TONE_SECONDS, sample_rate),
            delay,
            epoch,
            sample_rate,
        )
    }

    /// A metronome click; accented (higher-pitched) on beat 0.
    pub fn click(accent: bool, delay: u32, epoch: u64, sample_rate: f32) -> Self {
        let frequency = if accent { CLICK_ACCENT_HZ } else { CLICK_PLAIN_HZ };
        Self::new(
            frequency,
            CLICK_GAIN,
            PluckEnvelope::new(CLICK_ATTACK_SECONDS, CLICK_SECONDS, sample_rate),
            delay,
            epoch,
            sample_rate,
        )
    }

    fn new(
        frequency: f32,
        gain: f32,
        envelope: PluckEnvelope,
        delay: u32,
        epoch: u64,
        sample_rate: f32,
    ) -> Self {
        Self {
            epoch,
            phase: 0.0,
            phase_increment: TAU * frequency / sample_rate,
            gain,
            delay,
            envelope,
        }
    }

    /// Mix this voice additively into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if self.delay > 0 {
                self.delay -= 1;
                continue;
            }
            if self.envelope.is_finished() {
                break;
            }

            let level = self.envelope.next_sample();
            *sample += self.phase.sin() * level * self.gain;

            self.phase += self.phase_increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }

    /// Force-stop: silence the voice regardless of where its envelope is.
    pub fn kill(&mut self) {
        self.envelope.kill();
    }

    pub fn is_finished(&self) -> bool {
        self.delay == 0 && self.envelope.is_finished()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
