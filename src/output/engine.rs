//! Realtime render engine.
//!
//! Lives inside the audio callback. Control threads talk to it through an
//! SPSC command ring; it never allocates on the hot path beyond pushing
//! voices into a pre-grown vec, and it never blocks.
//!
//! The audio clock is defined here: frames rendered so far divided by the
//! sample rate. Scheduled onsets are expressed in that clock, so triggering
//! reduces to comparing onset frames against the current block's frame span.
//!
//! Cancellation uses a session epoch token: every command and voice carries
//! the epoch of the session that created it, and anything stale is a no-op.
//! A stop raises the engine epoch, so sounds from a torn-down session can
//! never become audible, even if their commands are still in flight.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::engine::{ScheduledSound, SoundKind};
use crate::synth::Voice;

const MAX_VOICES: usize = 64;

/// Control messages consumed at the top of each render block.
#[derive(Debug)]
pub enum EngineCommand {
    /// Replace the synth schedule with a new session's sounds.
    StartSynth {
        epoch: u64,
        sounds: Vec<ScheduledSound>,
    },
    /// Force-stop all synthesized sounds, started or pending.
    StopSynth { epoch: u64 },
    /// Begin original-recording playback from the start of `samples`
    /// (already at the device sample rate).
    StartOriginal { epoch: u64, samples: Arc<Vec<f32>> },
    /// Stop original-recording playback.
    StopOriginal,
}

struct OriginalPlayback {
    samples: Arc<Vec<f32>>,
    cursor: usize,
}

pub struct RenderEngine {
    sample_rate: f32,
    rx: rtrb::Consumer<EngineCommand>,
    /// Frames rendered since the stream opened; shared with the control side
    /// so `AudioSink::now` reads the same clock that triggers sounds.
    frames_rendered: Arc<AtomicU64>,
    /// Raised while the original recording is sounding; cleared at its end.
    original_active: Arc<AtomicBool>,
    epoch: u64,
    /// Sounds not yet triggered, in non-decreasing onset order.
    pending: Vec<ScheduledSound>,
    next_pending: usize,
    voices: Vec<Voice>,
    original: Option<OriginalPlayback>,
}

impl RenderEngine {
    pub fn new(
        sample_rate: f32,
        rx: rtrb::Consumer<EngineCommand>,
        frames_rendered: Arc<AtomicU64>,
        original_active: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sample_rate,
            rx,
            frames_rendered,
            original_active,
            epoch: 0,
            pending: Vec::new(),
            next_pending: 0,
            voices: Vec::with_capacity(MAX_VOICES),
            original: None,
        }
    }

    /// Render one mono block. Called from the audio callback.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain_commands();

        out.fill(0.0);
        let block_start = self.frames_rendered.load(Ordering::Relaxed);
        let block_end = block_start + out.len() as u64;

        if let Some(original) = &mut self.original {
            let remaining = &original.samples[original.cursor..];
            let n = remaining.len().min(out.len());
            out[..n].copy_from_slice(&remaining[..n]);
            original.cursor += n;

            if original.cursor >= original.samples.len() {
                self.original = None;
                self.original_active.store(false, Ordering::Release);
            }
        } else {
            self.trigger_due_sounds(block_start, block_end);
            self.voices.retain_mut(|voice| {
                voice.render(out);
                !voice.is_finished()
            });
        }

        self.frames_rendered
            .store(block_end, Ordering::Release);
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.rx.pop() {
            match command {
                EngineCommand::StartSynth { epoch, sounds } => {
                    if epoch < self.epoch {
                        continue; // stale session
                    }
                    self.epoch = epoch;
                    self.kill_synth();
                    // Mutual exclusion is enforced upstream; drop the
                    // original here as well so it can never overlap.
                    self.original = None;
                    self.original_active.store(false, Ordering::Release);
                    self.pending = sounds;
                    self.next_pending = 0;
                }
                EngineCommand::StopSynth { epoch } => {
                    self.epoch = self.epoch.max(epoch);
                    self.kill_synth();
                }
                EngineCommand::StartOriginal { epoch, samples } => {
                    if epoch < self.epoch {
                        continue;
                    }
                    self.epoch = epoch;
                    self.kill_synth();
                    self.original = Some(OriginalPlayback { samples, cursor: 0 });
                    self.original_active.store(true, Ordering::Release);
                }
                EngineCommand::StopOriginal => {
                    self.original = None;
                    self.original_active.store(false, Ordering::Release);
                }
            }
        }

        // Safety net: a voice from an older session must never keep ringing.
        let epoch = self.epoch;
        self.voices.retain_mut(|voice| {
            if voice.epoch() < epoch {
                voice.kill();
                false
            } else {
                true
            }
        });
    }

    fn kill_synth(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
        self.voices.clear();
        self.pending.clear();
        self.next_pending = 0;
    }

    /// Spawn voices for every pending sound whose onset falls before
    /// `block_end`, with a per-voice delay so triggering stays
    /// sample-accurate within the block.
    fn trigger_due_sounds(&mut self, block_start: u64, block_end: u64) {
        while self.next_pending < self.pending.len() {
            let sound = self.pending[self.next_pending];
            let onset_frame = (sound.onset * self.sample_rate as f64).round().max(0.0) as u64;
            if onset_frame >= block_end {
                break;
            }
            self.next_pending += 1;

            if self.voices.len() >= MAX_VOICES {
                continue; // keep the newest schedule moving; drop the extra
            }

            let delay = onset_frame.saturating_sub(block_start) as u32;
            let voice = match sound.kind {
                SoundKind::Tone { frequency } => {
                    Voice::tone(frequency, delay, self.epoch, self.sample_rate)
                }
                SoundKind::Click { accent } => {
                    Voice::click(accent, delay, self.epoch, self.sample_rate)
                }
            };
            self.voices.push(voice);
        }
    }
}
