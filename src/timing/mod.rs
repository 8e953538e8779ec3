//! Tempo-to-time-grid math and the flattened measure index.

mod flatten;
mod grid;

pub use flatten::{flatten, FlatMeasure};
pub use grid::{TimeGrid, BEATS_PER_MEASURE, DEFAULT_TEMPO_BPM, POSITIONS_PER_MEASURE};
