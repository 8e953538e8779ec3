//! Flattened measure index.
//!
//! A linear, absolute-measure-numbered view over the section/measure
//! hierarchy. The playhead divides elapsed time by the measure duration and
//! indexes straight into this list, so resolving the active section and
//! measure is O(1) per poll. The index is ephemeral: rebuild it whenever the
//! source transcription changes.

use crate::transcription::TranscriptionResult;

/// One `(section, measure)` pair with its running absolute measure number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatMeasure {
    /// Index of the owning section.
    pub section: usize,
    /// Index of the measure within its section.
    pub measure: usize,
    /// Running measure number across the whole piece, starting at 0.
    pub absolute: usize,
}

/// Build the flattened index in document order.
pub fn flatten(result: &TranscriptionResult) -> Vec<FlatMeasure> {
    let mut flattened = Vec::with_capacity(result.measure_count());
    let mut absolute = 0;

    for (section, sec) in result.sections.iter().enumerate() {
        for measure in 0..sec.measures.len() {
            flattened.push(FlatMeasure {
                section,
                measure,
                absolute,
            });
            absolute += 1;
        }
    }

    flattened
}
