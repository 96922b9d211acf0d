//! WAV decoding into mono PCM at a requested sample rate.

mod decode;
mod resample;

pub use decode::read_wav_mono;
pub(crate) use resample::resample_linear;

/// Decoded mono audio ready for feature extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    /// Mono samples at `sample_rate`.
    pub mono: Vec<f32>,
    /// Rate of `mono` after resampling.
    pub sample_rate: u32,
    /// Rate stored in the file header.
    pub source_sample_rate: u32,
    /// Channel count stored in the file header.
    pub source_channels: u16,
}

impl PcmAudio {
    /// Duration of the decoded buffer in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.mono.len() as f32 / self.sample_rate.max(1) as f32
    }
}
