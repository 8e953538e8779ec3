//! Playhead synchronizer: maps elapsed audio-clock time to the measure and
//! grid position currently sounding.
//!
//! The caller polls [`Playhead::tick`] once per display frame, but the frame
//! cadence never enters the math: only the audio clock does. The same clock
//! scheduled the sounds, so at the instant a note's onset passes, the cursor
//! computed for that instant lands on that note's measure and position.

use crate::timing::{FlatMeasure, TimeGrid, POSITIONS_PER_MEASURE};

use super::scheduler::SchedulePlan;

/// The cursor the rendering layer highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub section: usize,
    pub measure: usize,
    /// Grid position within the measure, 0–15.
    pub position: usize,
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayheadState {
    /// Playback is scheduled but not yet audible (inside the lookahead).
    /// Keep polling; do not move the visible cursor.
    NotStarted,
    /// This section/measure/position is sounding right now.
    Active(CursorPosition),
    /// The last measure has elapsed; the caller should stop and reset.
    Done,
}

/// Time-to-position lookup for one synthesis session.
#[derive(Debug, Clone)]
pub struct Playhead {
    session_start: f64,
    grid: TimeGrid,
    flattened: Vec<FlatMeasure>,
}

impl Playhead {
    pub fn from_plan(plan: &SchedulePlan) -> Self {
        Self {
            session_start: plan.session_start,
            grid: plan.grid,
            flattened: plan.flattened.clone(),
        }
    }

    /// Compute the cursor for the given audio-clock reading.
    pub fn tick(&self, audio_clock_now: f64) -> PlayheadState {
        let elapsed = audio_clock_now - self.session_start;
        if elapsed < 0.0 {
            return PlayheadState::NotStarted;
        }

        let total_positions = (elapsed / self.grid.seconds_per_position) as usize;
        let absolute_measure = total_positions / POSITIONS_PER_MEASURE as usize;
        let position = total_positions % POSITIONS_PER_MEASURE as usize;

        match self.flattened.get(absolute_measure) {
            Some(fm) => PlayheadState::Active(CursorPosition {
                section: fm.section,
                measure: fm.measure,
                position,
            }),
            None => PlayheadState::Done,
        }
    }
}
