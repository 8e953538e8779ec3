//! Absolute time grid derived from a tempo.
//!
//! The grid assumes 4/4 time: 4 beats per measure, 4 grid positions per beat,
//! 16 positions per measure. All derived durations are exact multiples of
//! `seconds_per_position`, so scheduling and playhead math share one clock
//! base and cannot drift apart.

/// Tempo applied when a transcription carries none, or a non-positive one.
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Beats per measure on the fixed 4/4 grid.
pub const BEATS_PER_MEASURE: u32 = 4;

/// 16th-note grid positions per measure.
pub const POSITIONS_PER_MEASURE: u32 = 16;

/// Durations of one beat, one grid position, and one measure at a given tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub seconds_per_beat: f64,
    pub seconds_per_position: f64,
    pub seconds_per_measure: f64,
}

impl TimeGrid {
    /// Build the grid for a tempo in BPM. Non-positive or non-finite tempos
    /// behave as [`DEFAULT_TEMPO_BPM`].
    pub fn from_tempo(tempo_bpm: f64) -> Self {
        let tempo = if tempo_bpm.is_finite() && tempo_bpm > 0.0 {
            tempo_bpm
        } else {
            DEFAULT_TEMPO_BPM
        };

        let seconds_per_beat = 60.0 / tempo;
        let seconds_per_measure = seconds_per_beat * BEATS_PER_MEASURE as f64;
        let seconds_per_position = seconds_per_measure / POSITIONS_PER_MEASURE as f64;

        Self {
            seconds_per_beat,
            seconds_per_position,
            seconds_per_measure,
        }
    }

    /// Grid for a transcription's effective tempo.
    pub fn for_transcription(result: &crate::transcription::TranscriptionResult) -> Self {
        Self::from_tempo(result.tempo_bpm())
    }
}
