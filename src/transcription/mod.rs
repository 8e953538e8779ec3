//! Transcription data model.
//!
//! A transcription is a hierarchy of sections, measures, and fretted notes on
//! a fixed 16-step grid. Instances are produced by [`sanitize`] from the
//! untrusted JSON an external transcriber hands us; after sanitization every
//! sequence field is present (possibly empty) and every note is in range.

mod sanitize;

pub use sanitize::sanitize;

use serde::{Deserialize, Serialize};

/// Root artifact: one transcribed piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Tempo in BPM. Absent or non-positive tempos resolve to 120 via
    /// [`TranscriptionResult::tempo_bpm`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<String>,
    pub sections: Vec<Section>,
    /// Optional raw-text rendering of the tab, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl TranscriptionResult {
    /// Effective tempo: the stored value when positive, 120 otherwise.
    pub fn tempo_bpm(&self) -> f64 {
        match self.tempo {
            Some(t) if t > 0.0 => t,
            _ => crate::timing::DEFAULT_TEMPO_BPM,
        }
    }

    /// Tuning name, defaulting to E Standard.
    pub fn tuning_name(&self) -> &str {
        self.tuning.as_deref().unwrap_or(crate::tuning::DEFAULT_TUNING)
    }

    /// Total number of measures across all sections.
    pub fn measure_count(&self) -> usize {
        self.sections.iter().map(|s| s.measures.len()).sum()
    }
}

/// A titled run of measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub measures: Vec<Measure>,
}

/// One measure: chord-name annotations plus notes ordered by grid position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub chords: Vec<String>,
    pub notes: Vec<Note>,
}

/// A fretted note on the 16-step grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// String number 1–6, 1 = highest-pitched (thinnest) string.
    pub string: u8,
    /// Fret as text. May carry technique suffixes ("7h9", "x"); frequency
    /// derivation reads the leading digits.
    pub fret: String,
    /// 16th-note step within the measure, 0–15.
    pub position: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
