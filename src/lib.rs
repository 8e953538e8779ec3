//! Synchronized playback for fretted-instrument tab transcriptions.
//!
//! The crate turns a quantized transcription (sections → measures → fretted
//! notes on a 16-step grid) into scheduled audio plus a live cursor that
//! stays correlated with the scheduled sound. The pipeline:
//!
//! raw JSON → [`transcription::sanitize`] → [`engine::schedule`] →
//! scheduled sounds + flattened measure index → [`engine::Playhead`] →
//! `{section, measure, position}` for the rendering layer, all mediated by
//! the [`engine::PlaybackController`] state machine, which also owns
//! playback of the original source recording and keeps the two modes
//! mutually exclusive.

pub mod engine; // Scheduling, playhead tracking, playback control
pub mod error;
pub mod output; // Realtime audio output (cpal) and original-recording audio
pub mod synth; // One-shot voices: plucked tones and metronome clicks
pub mod timing; // Tempo-to-time-grid math and the flattened measure index
pub mod transcription; // Data model and sanitizer
pub mod tuning; // Tuning tables and fret-to-frequency mapping

pub use error::PlaybackError;

/// Largest mono block the render engine processes at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
