//! The playback synchronization core: event scheduling, playhead tracking,
//! and the controller state machine that owns both playback modes.

pub mod controller;
pub mod playhead;
pub mod scheduler;

pub use controller::{AudioSink, PlaybackController, PlaybackState};
pub use playhead::{CursorPosition, Playhead, PlayheadState};
pub use scheduler::{schedule, ScheduledSound, SchedulePlan, SoundKind, LOOKAHEAD_SECONDS};
