//! The synthesized voice layer: one-shot plucked tones and metronome clicks.
//!
//! Everything here is allocation-free and realtime-safe once constructed, so
//! voices can live inside the audio callback.

mod envelope;
mod voice;

pub use envelope::{PluckEnvelope, CLICK_SECONDS, TONE_SECONDS};
pub use voice::Voice;
