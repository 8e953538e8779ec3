//! Error taxonomy for the playback engine.
//!
//! Only structural validation is fatal. Everything else is local: a fret that
//! does not resolve skips one sound event, a missing original recording
//! refuses to start, and an audio device failure resets the controller to
//! idle. Per-note anomalies never interrupt playback of the rest of a piece.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The raw transcription has no usable section list. Fatal to
    /// sanitization; nothing downstream runs until the caller supplies a
    /// well-formed transcription.
    #[error("transcription has no usable section list")]
    InvalidStructure,

    /// A note's fret text contains no leading digits, so no frequency can be
    /// derived. Recovered by skipping that one sound event.
    #[error("fret {fret:?} on string {string} does not resolve to a number")]
    UnresolvableFret { string: u8, fret: String },

    /// Original-recording playback was requested with no source loaded.
    /// Recovered by refusing to start; playback state is left unchanged.
    #[error("original recording playback requested but no source is loaded")]
    MissingOriginalSource,

    /// The platform audio output refused to start. Recovered by resetting to
    /// idle and reporting upward.
    #[error("audio output failed to start: {0}")]
    AudioStartFailure(String),
}
