//! Sanitizer for raw transcription JSON.
//!
//! The transcriber output is untrusted: fields go missing, numbers arrive as
//! floats, notes land out of range. The policy here is deliberately lenient:
//! the only fatal defect is a missing section list. Everything else is
//! repaired or dropped, because partial, slightly-wrong data beats aborting
//! playback of an otherwise good transcription.

use serde_json::Value;

use super::{Measure, Note, Section, TranscriptionResult};
use crate::error::PlaybackError;

/// Normalize a raw transcription value into a well-formed
/// [`TranscriptionResult`].
///
/// Fails with [`PlaybackError::InvalidStructure`] when `sections` is missing
/// or not an array. Individually malformed measures and notes are never
/// rejected; they are clamped or dropped per the field rules below.
pub fn sanitize(raw: &Value) -> Result<TranscriptionResult, PlaybackError> {
    let sections = raw
        .get("sections")
        .and_then(Value::as_array)
        .ok_or(PlaybackError::InvalidStructure)?;

    Ok(TranscriptionResult {
        title: text_or(raw.get("title"), "Untitled"),
        artist: text(raw.get("artist")),
        key: text(raw.get("key")),
        tempo: raw
            .get("tempo")
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite() && *t > 0.0),
        tuning: text(raw.get("tuning")),
        sections: sections.iter().map(sanitize_section).collect(),
        raw_text: text(raw.get("raw_text")),
    })
}

fn sanitize_section(raw: &Value) -> Section {
    let measures = raw
        .get("measures")
        .and_then(Value::as_array)
        .map(|ms| ms.iter().map(sanitize_measure).collect())
        .unwrap_or_default();

    Section {
        title: text_or(raw.get("title"), "Untitled"),
        measures,
    }
}

fn sanitize_measure(raw: &Value) -> Measure {
    let chords = raw
        .get("chords")
        .and_then(Value::as_array)
        .map(|cs| {
            cs.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let mut notes: Vec<Note> = raw
        .get("notes")
        .and_then(Value::as_array)
        .map(|ns| ns.iter().filter_map(sanitize_note).collect())
        .unwrap_or_default();

    // Stable sort keeps simultaneous notes in document order.
    notes.sort_by_key(|n| n.position);

    Measure { chords, notes }
}

/// Field rules: a note needs a numeric string and a non-negative numeric
/// position or it is dropped. String is rounded and clamped to [1, 6],
/// position to [0, 15]. Fret is coerced to text, "0" when absent.
fn sanitize_note(raw: &Value) -> Option<Note> {
    let string = raw.get("string").and_then(Value::as_f64)?;
    if !string.is_finite() {
        return None;
    }

    let position = raw.get("position").and_then(Value::as_f64)?;
    if !position.is_finite() || position < 0.0 {
        return None;
    }

    let fret = match raw.get("fret") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => fret_from_number(n),
        _ => "0".to_owned(),
    };

    Some(Note {
        string: (string.round() as i64).clamp(1, 6) as u8,
        fret,
        position: (position.round() as i64).clamp(0, 15) as u8,
        confidence: raw
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0)),
    })
}

fn fret_from_number(n: &serde_json::Number) -> String {
    match n.as_i64() {
        Some(i) => i.to_string(),
        // Fractional frets do not exist; round to the nearest.
        None => n
            .as_f64()
            .map(|f| (f.round() as i64).to_string())
            .unwrap_or_else(|| "0".to_owned()),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    text(value).unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_missing_section_list() {
        assert!(matches!(
            sanitize(&json!({ "title": "No Sections" })),
            Err(PlaybackError::InvalidStructure)
        ));
        assert!(matches!(
            sanitize(&json!({ "sections": "not an array" })),
            Err(PlaybackError::InvalidStructure)
        ));
    }

    #[test]
    fn empty_section_list_is_valid() {
        let result = sanitize(&json!({ "sections": [] })).unwrap();
        assert_eq!(result.title, "Untitled");
        assert!(result.sections.is_empty());
    }

    #[test]
    fn clamps_string_and_position() {
        let result = sanitize(&json!({
            "sections": [{ "measures": [{ "notes": [
                { "string": 7.6, "fret": "3", "position": 0 },
                { "string": -3, "fret": "3", "position": 1 },
                { "string": 2, "fret": "3", "position": 17.4 },
            ]}]}]
        }))
        .unwrap();

        let notes = &result.sections[0].measures[0].notes;
        assert_eq!(notes[0].string, 6);
        assert_eq!(notes[1].string, 1);
        assert_eq!(notes[2].position, 15);
    }

    #[test]
    fn drops_unusable_notes() {
        let result = sanitize(&json!({
            "sections": [{ "measures": [{ "notes": [
                { "string": "two", "fret": "3", "position": 0 },
                { "fret": "3", "position": 0 },
                { "string": 2, "fret": "3", "position": -1 },
                { "string": 2, "fret": "3" },
                { "string": 2, "fret": "3", "position": 4 },
            ]}]}]
        }))
        .unwrap();

        let notes = &result.sections[0].measures[0].notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].position, 4);
    }

    #[test]
    fn repairs_missing_sequences() {
        let result = sanitize(&json!({
            "sections": [{ "title": "Verse" }, { "measures": [{}] }]
        }))
        .unwrap();

        assert!(result.sections[0].measures.is_empty());
        let measure = &result.sections[1].measures[0];
        assert!(measure.chords.is_empty());
        assert!(measure.notes.is_empty());
    }

    #[test]
    fn coerces_fret_to_text() {
        let result = sanitize(&json!({
            "sections": [{ "measures": [{ "notes": [
                { "string": 1, "position": 0 },
                { "string": 1, "fret": 12, "position": 1 },
                { "string": 1, "fret": "7h9", "position": 2 },
            ]}]}]
        }))
        .unwrap();

        let notes = &result.sections[0].measures[0].notes;
        assert_eq!(notes[0].fret, "0");
        assert_eq!(notes[1].fret, "12");
        assert_eq!(notes[2].fret, "7h9");
    }

    #[test]
    fn reorders_notes_by_position_stably() {
        let result = sanitize(&json!({
            "sections": [{ "measures": [{ "notes": [
                { "string": 1, "fret": "5", "position": 8 },
                { "string": 2, "fret": "1", "position": 0 },
                { "string": 3, "fret": "2", "position": 8 },
            ]}]}]
        }))
        .unwrap();

        let notes = &result.sections[0].measures[0].notes;
        assert_eq!(notes[0].position, 0);
        // Ties keep document order.
        assert_eq!(notes[1].string, 1);
        assert_eq!(notes[2].string, 3);
    }

    #[test]
    fn non_positive_tempo_is_treated_as_absent() {
        let result = sanitize(&json!({ "sections": [], "tempo": 0 })).unwrap();
        assert_eq!(result.tempo, None);
        assert_eq!(result.tempo_bpm(), 120.0);

        let result = sanitize(&json!({ "sections": [], "tempo": 96 })).unwrap();
        assert_eq!(result.tempo_bpm(), 96.0);
    }

    #[test]
    fn clamps_confidence() {
        let result = sanitize(&json!({
            "sections": [{ "measures": [{ "notes": [
                { "string": 1, "fret": "0", "position": 0, "confidence": 1.7 },
            ]}]}]
        }))
        .unwrap();

        let note = &result.sections[0].measures[0].notes[0];
        assert_eq!(note.confidence, Some(1.0));
    }
}
