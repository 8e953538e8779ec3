//! Tuning reference tables and fret-to-frequency mapping.
//!
//! Open-string frequencies are stored low to high: index 0 is string 6 (the
//! thickest string), index 5 is string 1. Callers address strings the way tab
//! does (1 = highest pitch), so lookups convert with `6 - string`.
//!
//! Frequencies follow 12-tone equal temperament: each fret multiplies the
//! open-string frequency by 2^(1/12).

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::error::PlaybackError;

/// Tuning used when a transcription names none, or names one we don't know.
pub const DEFAULT_TUNING: &str = "E Standard";

/// Read-only reference data for one tuning.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub name: &'static str,
    /// Open-string fundamentals in Hz, string 6 first.
    pub open_frequencies: [f64; 6],
    /// Display labels, string 6 first.
    pub string_names: [&'static str; 6],
}

/// Static tuning table, computed once at first use.
static TUNINGS: Lazy<BTreeMap<&'static str, Tuning>> = Lazy::new(|| {
    const TABLE: [Tuning; 6] = [
        Tuning {
            name: "E Standard",
            open_frequencies: [82.41, 110.00, 146.83, 196.00, 246.94, 329.63],
            string_names: ["E2", "A2", "D3", "G3", "B3", "E4"],
        },
        Tuning {
            name: "Eb Standard",
            open_frequencies: [77.78, 103.83, 138.59, 185.00, 233.08, 311.13],
            string_names: ["Eb2", "Ab2", "Db3", "Gb3", "Bb3", "Eb4"],
        },
        Tuning {
            name: "Drop D",
            open_frequencies: [73.42, 110.00, 146.83, 196.00, 246.94, 329.63],
            string_names: ["D2", "A2", "D3", "G3", "B3", "E4"],
        },
        Tuning {
            name: "D Standard",
            open_frequencies: [73.42, 98.00, 130.81, 174.61, 220.00, 293.66],
            string_names: ["D2", "G2", "C3", "F3", "A3", "D4"],
        },
        Tuning {
            name: "DADGAD",
            open_frequencies: [73.42, 110.00, 146.83, 196.00, 220.00, 293.66],
            string_names: ["D2", "A2", "D3", "G3", "A3", "D4"],
        },
        Tuning {
            name: "Open G",
            open_frequencies: [73.42, 98.00, 146.83, 196.00, 246.94, 293.66],
            string_names: ["D2", "G2", "D3", "G3", "B3", "D4"],
        },
    ];

    TABLE.iter().map(|t| (t.name, *t)).collect()
});

/// Look up a tuning by name, falling back to E Standard for unknown names.
pub fn lookup(name: &str) -> &'static Tuning {
    TUNINGS
        .get(name)
        .unwrap_or_else(|| &TUNINGS[DEFAULT_TUNING])
}

/// Names of all known tunings, in alphabetical order.
pub fn names() -> impl Iterator<Item = &'static str> {
    TUNINGS.keys().copied()
}

/// Map a fretted note to its frequency in Hz.
///
/// `string` is the tab string number (1 = highest pitch) and is expected to
/// be pre-clamped to 1–6 by the sanitizer; out-of-range values are clamped
/// again here rather than panicking. `fret` is parsed as a leading decimal
/// integer, so technique suffixes ("7h9") sound their base fret while
/// digit-free text ("x") fails with [`PlaybackError::UnresolvableFret`].
pub fn frequency(tuning_name: &str, string: u8, fret: &str) -> Result<f64, PlaybackError> {
    let string = string.clamp(1, 6);
    let fret_number = parse_fret(fret).ok_or_else(|| PlaybackError::UnresolvableFret {
        string,
        fret: fret.to_owned(),
    })?;

    let tuning = lookup(tuning_name);
    let open = tuning.open_frequencies[(6 - string) as usize];
    Ok(open * 2f64.powf(fret_number as f64 / 12.0))
}

/// Leading-digit integer parse: "12" -> 12, "7h9" -> 7, "x" -> None.
fn parse_fret(fret: &str) -> Option<u32> {
    let trimmed = fret.trim();
    let digits: &str = {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn open_string_returns_table_frequency() {
        let f = frequency("E Standard", 1, "0").unwrap();
        assert!((f - 329.63).abs() < TOLERANCE);
        let f = frequency("E Standard", 6, "0").unwrap();
        assert!((f - 82.41).abs() < TOLERANCE);
    }

    #[test]
    fn twelfth_fret_doubles_open_frequency() {
        let open = frequency("E Standard", 1, "0").unwrap();
        let octave = frequency("E Standard", 1, "12").unwrap();
        assert!((octave - open * 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn unknown_tuning_falls_back_to_e_standard() {
        let fallback = frequency("Z Mystery", 3, "5").unwrap();
        let standard = frequency("E Standard", 3, "5").unwrap();
        assert_eq!(fallback, standard);
    }

    #[test]
    fn technique_suffix_sounds_the_leading_fret() {
        let plain = frequency("E Standard", 2, "7").unwrap();
        let hammer = frequency("E Standard", 2, "7h9").unwrap();
        assert_eq!(plain, hammer);
    }

    #[test]
    fn digit_free_fret_is_unresolvable() {
        for fret in ["x", "h", "p", "xyz", ""] {
            assert!(matches!(
                frequency("E Standard", 4, fret),
                Err(PlaybackError::UnresolvableFret { string: 4, .. })
            ));
        }
    }

    #[test]
    fn drop_d_lowers_only_the_sixth_string() {
        let low = frequency("Drop D", 6, "0").unwrap();
        assert!((low - 73.42).abs() < TOLERANCE);
        let high = frequency("Drop D", 1, "0").unwrap();
        assert!((high - 329.63).abs() < TOLERANCE);
    }
}
