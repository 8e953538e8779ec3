//! Platform audio output: the realtime render engine, the cpal-backed sink,
//! and decoded original-recording audio.

mod cpal_sink;
mod engine;

pub use cpal_sink::CpalSink;
pub use engine::{EngineCommand, RenderEngine};

use std::path::Path;

/// Decoded mono PCM of the original source recording.
#[derive(Debug, Clone)]
pub struct OriginalRecording {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl OriginalRecording {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Load a WAV file, mixing multi-channel audio down to mono.
    pub fn from_wav_path(path: &Path) -> Result<Self, hound::Error> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self::new(samples, spec.sample_rate))
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Linearly resample to `target_rate`. Returns the samples unchanged when
    /// the rates already match.
    pub fn resampled(&self, target_rate: u32) -> Vec<f32> {
        if self.sample_rate == target_rate || self.samples.is_empty() {
            return self.samples.clone();
        }

        let ratio = self.sample_rate as f64 / target_rate as f64;
        let out_len = (self.samples.len() as f64 / ratio).round().max(1.0) as usize;
        let last = self.samples.len() - 1;

        (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos as usize).min(last);
                let frac = (pos - idx as f64) as f32;
                let a = self.samples[idx];
                let b = self.samples[(idx + 1).min(last)];
                a + (b - a) * frac
            })
            .collect()
    }
}
