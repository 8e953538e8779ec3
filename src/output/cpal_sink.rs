//! cpal-backed [`AudioSink`].
//!
//! Opens the default output device, runs a [`RenderEngine`] inside the
//! stream callback, and exposes the control side: the command producer, the
//! shared audio clock, and the loaded original recording.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::warn;

use crate::engine::{AudioSink, ScheduledSound};
use crate::error::PlaybackError;
use crate::MAX_BLOCK_SIZE;

use super::engine::{EngineCommand, RenderEngine};
use super::OriginalRecording;

const COMMAND_CAPACITY: usize = 32;

pub struct CpalSink {
    _stream: cpal::Stream,
    tx: rtrb::Producer<EngineCommand>,
    frames_rendered: Arc<AtomicU64>,
    original_active: Arc<AtomicBool>,
    sample_rate: f32,
    original: Option<Arc<Vec<f32>>>,
    /// Highest epoch sent so far; original-playback commands continue the
    /// same monotonic sequence the controller uses for synth sessions.
    epoch: u64,
}

impl CpalSink {
    /// Open the default output device and start the stream.
    pub fn open() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::AudioStartFailure(
                "no default output device available".to_owned(),
            ))?;
        let config = device
            .default_output_config()
            .map_err(|e| PlaybackError::AudioStartFailure(e.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = rtrb::RingBuffer::new(COMMAND_CAPACITY);
        let frames_rendered = Arc::new(AtomicU64::new(0));
        let original_active = Arc::new(AtomicBool::new(false));

        let mut engine = RenderEngine::new(
            sample_rate,
            rx,
            frames_rendered.clone(),
            original_active.clone(),
        );
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        engine.render_block(&mut mono[..frames]);

                        for (frame, &sample) in mono[..frames].iter().enumerate() {
                            let base = (frames_written + frame) * channels;
                            for ch in 0..channels {
                                data[base + ch] = sample;
                            }
                        }
                        frames_written += frames;
                    }
                },
                |err| warn!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| PlaybackError::AudioStartFailure(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlaybackError::AudioStartFailure(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            tx,
            frames_rendered,
            original_active,
            sample_rate,
            original: None,
            epoch: 0,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Load (and resample) the original recording for later playback.
    pub fn load_original(&mut self, recording: &OriginalRecording) {
        self.original = Some(Arc::new(
            recording.resampled(self.sample_rate as u32),
        ));
    }

    fn push(&mut self, command: EngineCommand) {
        // The ring only fills if the audio callback has stalled; dropping the
        // command is the least-bad option in that state.
        if self.tx.push(command).is_err() {
            warn!("audio command ring full; command dropped");
        }
    }
}

impl AudioSink for CpalSink {
    fn now(&self) -> f64 {
        self.frames_rendered.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn start_synth(&mut self, epoch: u64, sounds: Vec<ScheduledSound>) {
        self.epoch = self.epoch.max(epoch);
        self.push(EngineCommand::StartSynth {
            epoch: self.epoch,
            sounds,
        });
    }

    fn stop_synth(&mut self) {
        let epoch = self.epoch;
        self.push(EngineCommand::StopSynth { epoch });
    }

    fn has_original(&self) -> bool {
        self.original.is_some()
    }

    fn start_original(&mut self) -> Result<(), PlaybackError> {
        let samples = self
            .original
            .clone()
            .ok_or(PlaybackError::MissingOriginalSource)?;

        self.epoch += 1;
        let epoch = self.epoch;
        // Raise the flag before the callback sees the command so a poll in
        // between does not read "finished".
        self.original_active.store(true, Ordering::Release);
        self.push(EngineCommand::StartOriginal { epoch, samples });
        Ok(())
    }

    fn stop_original(&mut self) {
        self.original_active.store(false, Ordering::Release);
        self.push(EngineCommand::StopOriginal);
    }

    fn original_finished(&self) -> bool {
        !self.original_active.load(Ordering::Acquire)
    }
}
