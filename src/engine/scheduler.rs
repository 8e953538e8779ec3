//! Event scheduler: walks a sanitized transcription and pins every sound to
//! an absolute audio-clock timestamp.
//!
//! Scheduling is a pure computation over `now`: the caller supplies the
//! current audio-clock reading and receives a [`SchedulePlan`] whose first
//! onset lies one lookahead past it. The same traversal produces the
//! flattened measure index the playhead later uses, so audio and cursor
//! share identical timing by construction.

use log::warn;

use crate::timing::{flatten, FlatMeasure, TimeGrid, BEATS_PER_MEASURE};
use crate::transcription::TranscriptionResult;
use crate::tuning;

/// Delay between the scheduling decision and the first audible onset. Large
/// enough to absorb scheduling jitter, small enough to feel immediate.
pub const LOOKAHEAD_SECONDS: f64 = 0.2;

/// What a scheduled sound should sound like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundKind {
    /// A plucked tone at a fixed frequency in Hz.
    Tone { frequency: f64 },
    /// A metronome click; `accent` marks beat 0 of a measure.
    Click { accent: bool },
}

/// One sound pinned to an absolute audio-clock onset time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSound {
    /// Onset in audio-clock seconds.
    pub onset: f64,
    pub kind: SoundKind,
}

/// Everything one synthesis run needs: the sounds for the audio engine and
/// the grid plus flattened index for the playhead.
#[derive(Debug, Clone)]
pub struct SchedulePlan {
    /// Audio-clock time at which playback logically starts (measure 0,
    /// position 0).
    pub session_start: f64,
    pub grid: TimeGrid,
    pub flattened: Vec<FlatMeasure>,
    /// All sounds in non-decreasing onset order.
    pub sounds: Vec<ScheduledSound>,
}

impl SchedulePlan {
    /// Audio-clock time at which the last measure ends.
    pub fn end_time(&self) -> f64 {
        self.session_start + self.flattened.len() as f64 * self.grid.seconds_per_measure
    }
}

/// Schedule every sound in `result` starting `lookahead` seconds after `now`.
///
/// Per measure: four click events when the metronome is enabled (beat 0
/// accented), then one tone per note at
/// `measure_start + position * seconds_per_position`. A note whose fret does
/// not resolve contributes no sound but never shifts the onset of any other
/// note. Measure start time strictly advances by `seconds_per_measure`, so
/// document order coincides with time order.
pub fn schedule(
    result: &TranscriptionResult,
    tuning_name: &str,
    metronome: bool,
    lookahead: f64,
    now: f64,
) -> SchedulePlan {
    let grid = TimeGrid::for_transcription(result);
    let session_start = now + lookahead;
    let flattened = flatten(result);

    let mut sounds = Vec::new();
    let mut measure_start = session_start;
    // Per-measure staging list, sorted before it is appended so the final
    // plan is in non-decreasing onset order even with clicks interleaved.
    let mut measure_sounds: Vec<ScheduledSound> = Vec::new();

    for section in &result.sections {
        for measure in &section.measures {
            measure_sounds.clear();

            if metronome {
                for beat in 0..BEATS_PER_MEASURE {
                    measure_sounds.push(ScheduledSound {
                        onset: measure_start + beat as f64 * grid.seconds_per_beat,
                        kind: SoundKind::Click { accent: beat == 0 },
                    });
                }
            }

            // Defensive re-sort: the sanitizer orders notes by position, but
            // callers may have mutated the measure since.
            let mut notes: Vec<&crate::transcription::Note> = measure.notes.iter().collect();
            notes.sort_by_key(|n| n.position);

            for note in notes {
                match tuning::frequency(tuning_name, note.string, &note.fret) {
                    Ok(frequency) => measure_sounds.push(ScheduledSound {
                        onset: measure_start
                            + note.position as f64 * grid.seconds_per_position,
                        kind: SoundKind::Tone { frequency },
                    }),
                    Err(err) => warn!("skipping unplayable note: {err}"),
                }
            }

            measure_sounds.sort_by(|a, b| a.onset.total_cmp(&b.onset));
            sounds.extend_from_slice(&measure_sounds);

            measure_start += grid.seconds_per_measure;
        }
    }

    SchedulePlan {
        session_start,
        grid,
        flattened,
        sounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{Measure, Note, Section};

    const TOLERANCE: f64 = 1e-9;

    fn note(string: u8, fret: &str, position: u8) -> Note {
        Note {
            string,
            fret: fret.to_owned(),
            position,
            confidence: None,
        }
    }

    fn piece(tempo: Option<f64>, measures: Vec<Measure>) -> TranscriptionResult {
        TranscriptionResult {
            title: "Test".to_owned(),
            artist: None,
            key: None,
            tempo,
            tuning: None,
            sections: vec![Section {
                title: "A".to_owned(),
                measures,
            }],
            raw_text: None,
        }
    }

    #[test]
    fn onsets_follow_the_position_grid() {
        let result = piece(
            Some(120.0),
            vec![Measure {
                chords: Vec::new(),
                notes: vec![note(1, "0", 0), note(2, "1", 4), note(3, "2", 15)],
            }],
        );

        let plan = schedule(&result, "E Standard", false, 0.2, 10.0);
        assert!((plan.session_start - 10.2).abs() < TOLERANCE);
        assert_eq!(plan.sounds.len(), 3);
        // 120 BPM: 0.125 s per position.
        assert!((plan.sounds[0].onset - 10.2).abs() < TOLERANCE);
        assert!((plan.sounds[1].onset - (10.2 + 0.5)).abs() < TOLERANCE);
        assert!((plan.sounds[2].onset - (10.2 + 1.875)).abs() < TOLERANCE);
    }

    #[test]
    fn metronome_adds_four_clicks_per_measure_with_accented_downbeat() {
        let result = piece(
            Some(120.0),
            vec![Measure {
                chords: Vec::new(),
                notes: Vec::new(),
            }],
        );

        let plan = schedule(&result, "E Standard", true, 0.2, 0.0);
        let clicks: Vec<_> = plan
            .sounds
            .iter()
            .filter_map(|s| match s.kind {
                SoundKind::Click { accent } => Some((s.onset, accent)),
                _ => None,
            })
            .collect();

        assert_eq!(clicks.len(), 4);
        assert!(clicks[0].1);
        assert!(clicks[1..].iter().all(|(_, accent)| !accent));
        for (beat, (onset, _)) in clicks.iter().enumerate() {
            assert!((onset - (0.2 + beat as f64 * 0.5)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn unresolvable_fret_does_not_shift_later_onsets() {
        let good = piece(
            Some(120.0),
            vec![Measure {
                chords: Vec::new(),
                notes: vec![note(1, "0", 0), note(2, "3", 8)],
            }],
        );
        let with_bad = piece(
            Some(120.0),
            vec![Measure {
                chords: Vec::new(),
                notes: vec![note(1, "0", 0), note(3, "xyz", 4), note(2, "3", 8)],
            }],
        );

        let good_plan = schedule(&good, "E Standard", false, 0.2, 0.0);
        let bad_plan = schedule(&with_bad, "E Standard", false, 0.2, 0.0);

        assert_eq!(bad_plan.sounds.len(), 2);
        assert_eq!(good_plan.sounds, bad_plan.sounds);
    }

    #[test]
    fn measures_advance_by_measure_duration() {
        let result = piece(
            None, // defaults to 120 BPM, 2 s measures
            vec![
                Measure {
                    chords: Vec::new(),
                    notes: vec![note(1, "0", 0)],
                },
                Measure {
                    chords: Vec::new(),
                    notes: vec![note(1, "0", 0)],
                },
            ],
        );

        let plan = schedule(&result, "E Standard", false, 0.2, 0.0);
        assert_eq!(plan.sounds.len(), 2);
        assert!((plan.sounds[1].onset - plan.sounds[0].onset - 2.0).abs() < TOLERANCE);
        assert!((plan.end_time() - 4.2).abs() < TOLERANCE);
    }

    #[test]
    fn plan_is_in_non_decreasing_onset_order() {
        let result = piece(
            Some(90.0),
            vec![
                Measure {
                    chords: Vec::new(),
                    notes: vec![note(1, "0", 15), note(2, "2", 1), note(3, "2", 7)],
                },
                Measure {
                    chords: Vec::new(),
                    notes: vec![note(4, "5", 3)],
                },
            ],
        );

        let plan = schedule(&result, "E Standard", true, 0.2, 0.0);
        for pair in plan.sounds.windows(2) {
            assert!(pair[0].onset <= pair[1].onset);
        }
    }

    #[test]
    fn unsorted_measure_notes_are_rescheduled_in_time_order() {
        let mut result = piece(
            Some(120.0),
            vec![Measure {
                chords: Vec::new(),
                notes: vec![note(2, "2", 2), note(1, "1", 12)],
            }],
        );
        // Simulate upstream mutation: notes deliberately out of order.
        result.sections[0].measures[0].notes.reverse();

        let plan = schedule(&result, "E Standard", false, 0.2, 0.0);
        assert!(plan.sounds[0].onset < plan.sounds[1].onset);
    }
}
