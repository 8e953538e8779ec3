//! One-shot amplitude envelope: linear attack, exponential decay.
//!
//! Unlike a gated ADSR there is no sustain and no note-off; the envelope
//! runs to silence on its own. The decay coefficient is chosen so the level
//! falls to -60 dB exactly at the configured total length, after which the
//! voice reports finished and is reclaimed.
//!
//! increment = 1 / (attack_time * sample_rate) per sample during attack;
//! level *= decay_coeff per sample afterwards, with
//! decay_coeff = exp(-ln(1000) / (decay_samples)).

/// Total tone length in seconds. Shorter than one grid step at slow tempos,
/// still audible at fast ones.
pub const TONE_SECONDS: f32 = 0.45;

/// Total metronome click length in seconds.
pub const CLICK_SECONDS: f32 = 0.06;

const SILENCE_LN: f32 = 6.907_755; // ln(1000), -60 dB

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Attack,
    Decay,
    Finished,
}

#[derive(Debug, Clone)]
pub struct PluckEnvelope {
    attack_increment: f32,
    decay_coeff: f32,
    total_samples: u32,
    elapsed: u32,
    level: f32,
    stage: Stage,
}

impl PluckEnvelope {
    /// Build an envelope with the given attack and total length.
    ///
    /// `attack_seconds` is clamped below `total_seconds` so the decay always
    /// has at least one sample to run.
    pub fn new(attack_seconds: f32, total_seconds: f32, sample_rate: f32) -> Self {
        let total_samples = (total_seconds * sample_rate).round().max(2.0) as u32;
        let attack_samples = (attack_seconds * sample_rate)
            .round()
            .max(1.0)
            .min((total_samples - 1) as f32) as u32;
        let decay_samples = (total_samples - attack_samples).max(1);

        Self {
            attack_increment: 1.0 / attack_samples as f32,
            decay_coeff: (-SILENCE_LN / decay_samples as f32).exp(),
            total_samples,
            elapsed: 0,
            level: 0.0,
            stage: Stage::Attack,
        }
    }

    /// Advance one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            Stage::Attack => {
                self.level += self.attack_increment;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level *= self.decay_coeff;
            }
            Stage::Finished => {
                self.level = 0.0;
            }
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.total_samples {
            self.stage = Stage::Finished;
            self.level = 0.0;
        }

        self.level
    }

    /// Force the envelope to silence immediately. Used when a session is
    /// torn down while sounds are still ringing.
    pub fn kill(&mut self) {
        self.stage = Stage::Finished;
        self.level = 0.0;
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
