//! Playback controller: the state machine that owns both playback modes.
//!
//! Exactly one of synthesized playback and original-recording playback may be
//! audible at any instant. The controller enforces that by unconditionally
//! tearing the other mode down before entering a new one, and it owns the
//! [`PlaybackSession`] for the active synthesis run exclusively. `stop` is
//! idempotent: stopping twice, or while idle, is a no-op.

use log::{debug, warn};

use crate::error::PlaybackError;
use crate::transcription::TranscriptionResult;

use super::playhead::{CursorPosition, Playhead, PlayheadState};
use super::scheduler::{schedule, ScheduledSound, LOOKAHEAD_SECONDS};

/// The seam between the controller and the platform audio layer.
///
/// The realtime implementation is `output::CpalSink`; tests drive the state
/// machine with a scripted fake.
pub trait AudioSink {
    /// Current audio-clock reading in seconds. Monotonic; the same clock the
    /// sink uses to trigger scheduled sounds.
    fn now(&self) -> f64;

    /// Begin sounding `sounds`, tagged with the session `epoch`.
    fn start_synth(&mut self, epoch: u64, sounds: Vec<ScheduledSound>);

    /// Force-stop every synthesized sound, started or pending.
    fn stop_synth(&mut self);

    /// Whether an original recording is loaded.
    fn has_original(&self) -> bool;

    /// Start original-recording playback from the beginning.
    fn start_original(&mut self) -> Result<(), PlaybackError>;

    /// Stop original-recording playback.
    fn stop_original(&mut self);

    /// Whether a previously started original recording has played to its end.
    fn original_finished(&self) -> bool;
}

/// Which playback mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    PlayingOriginal,
    PlayingSynth,
}

/// Ephemeral state for one synthesis run. Owned exclusively by the
/// controller; torn down completely on stop, completion, or mode switch.
struct PlaybackSession {
    epoch: u64,
    playhead: Playhead,
}

pub struct PlaybackController<S: AudioSink> {
    sink: S,
    state: PlaybackState,
    session: Option<PlaybackSession>,
    next_epoch: u64,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: PlaybackState::Idle,
            session: None,
            next_epoch: 1,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state != PlaybackState::Idle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Schedule and start synthesized playback of `result`, stopping
    /// whatever was playing first.
    pub fn start_synth(
        &mut self,
        result: &TranscriptionResult,
        tuning_name: &str,
        metronome: bool,
    ) {
        self.stop();

        let plan = schedule(
            result,
            tuning_name,
            metronome,
            LOOKAHEAD_SECONDS,
            self.sink.now(),
        );
        let epoch = self.next_epoch;
        self.next_epoch += 1;

        debug!(
            "synth session {epoch}: {} sounds over {} measures",
            plan.sounds.len(),
            plan.flattened.len()
        );

        let playhead = Playhead::from_plan(&plan);
        self.sink.start_synth(epoch, plan.sounds);
        self.session = Some(PlaybackSession { epoch, playhead });
        self.state = PlaybackState::PlayingSynth;
    }

    /// Start original-recording playback, stopping synthesized playback
    /// first. With no source loaded this refuses to start and leaves the
    /// current state unchanged.
    pub fn start_original(&mut self) -> Result<(), PlaybackError> {
        if !self.sink.has_original() {
            warn!("original playback requested but no source is loaded");
            return Err(PlaybackError::MissingOriginalSource);
        }

        self.stop();
        self.sink.start_original()?;
        self.state = PlaybackState::PlayingOriginal;
        Ok(())
    }

    /// Unconditional, idempotent teardown of whichever mode is active.
    pub fn stop(&mut self) {
        self.sink.stop_synth();
        self.sink.stop_original();
        self.session = None;
        self.state = PlaybackState::Idle;
    }

    /// Per-display-frame poll. Returns the cursor to highlight, or `None`
    /// for "no active position". Folds natural completion of either mode
    /// into the same teardown as an explicit stop.
    pub fn poll(&mut self) -> Option<CursorPosition> {
        match self.state {
            PlaybackState::Idle => None,
            PlaybackState::PlayingOriginal => {
                if self.sink.original_finished() {
                    self.stop();
                }
                None
            }
            PlaybackState::PlayingSynth => {
                let session = self.session.as_ref()?;
                match session.playhead.tick(self.sink.now()) {
                    PlayheadState::NotStarted => None,
                    PlayheadState::Active(cursor) => Some(cursor),
                    PlayheadState::Done => {
                        debug!("synth session {} complete", session.epoch);
                        self.stop();
                        None
                    }
                }
            }
        }
    }
}
