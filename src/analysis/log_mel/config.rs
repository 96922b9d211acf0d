use serde::{Deserialize, Serialize};

use super::MelError;
use super::{
    WHISPER_CHUNK_SECONDS, WHISPER_HOP_LENGTH, WHISPER_N_FFT, WHISPER_N_MELS, WHISPER_SAMPLE_RATE,
};

/// Framing and filterbank dimensions for one model's log-mel front end.
///
/// These must match the values the filterbank was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelConfig {
    /// Sample rate of the PCM input in Hz.
    pub sample_rate: u32,
    /// Length of one input chunk in seconds.
    pub chunk_seconds: u32,
    /// FFT window size in samples.
    pub n_fft: usize,
    /// Stride between frame starts in samples.
    pub hop_length: usize,
    /// Number of mel bins.
    pub n_mels: usize,
}

impl MelConfig {
    /// Whisper front end: 16 kHz, 30 s chunks, 400-sample FFT, 160 hop, 80 mels.
    pub const WHISPER: Self = Self {
        sample_rate: WHISPER_SAMPLE_RATE,
        chunk_seconds: WHISPER_CHUNK_SECONDS,
        n_fft: WHISPER_N_FFT,
        hop_length: WHISPER_HOP_LENGTH,
        n_mels: WHISPER_N_MELS,
    };

    /// Sample count every input is padded or truncated to.
    pub fn target_len(&self) -> usize {
        self.sample_rate as usize * self.chunk_seconds as usize
    }

    /// FFT bins per frame kept after the transform (`n_fft / 2 + 1`).
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Frames per chunk: `ceil(target_len / hop_length)`.
    ///
    /// The final frame may run past the end of the chunk; the overhang is
    /// zero-padded rather than dropped.
    pub fn n_frames(&self) -> usize {
        self.target_len().div_ceil(self.hop_length.max(1))
    }

    /// Flattened output length (`n_mels * n_frames`).
    pub fn output_len(&self) -> usize {
        self.n_mels * self.n_frames()
    }

    /// Expected filterbank length (`n_mels * n_bins`).
    pub fn filterbank_len(&self) -> usize {
        self.n_mels * self.n_bins()
    }

    /// Reject zero-sized dimensions and sizes that overflow `usize`.
    pub fn validate(&self) -> Result<(), MelError> {
        self.check_positive()?;
        let overflow = |what: &str| MelError::InvalidConfig {
            reason: format!("{what} overflows"),
        };
        let target_len = (self.sample_rate as usize)
            .checked_mul(self.chunk_seconds as usize)
            .ok_or_else(|| overflow("sample_rate * chunk_seconds"))?;
        self.n_mels
            .checked_mul(self.n_bins())
            .ok_or_else(|| overflow("n_mels * (n_fft / 2 + 1)"))?;
        self.n_mels
            .checked_mul(target_len.div_ceil(self.hop_length))
            .ok_or_else(|| overflow("n_mels * n_frames"))?;
        Ok(())
    }

    fn check_positive(&self) -> Result<(), MelError> {
        let zero_field = [
            ("sample_rate", self.sample_rate as usize),
            ("chunk_seconds", self.chunk_seconds as usize),
            ("n_fft", self.n_fft),
            ("hop_length", self.hop_length),
            ("n_mels", self.n_mels),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0);
        match zero_field {
            Some((name, _)) => Err(MelError::InvalidConfig {
                reason: format!("{name} must be positive"),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MelConfig {
    fn default() -> Self {
        Self::WHISPER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whisper_dimensions() {
        let config = MelConfig::WHISPER;
        assert_eq!(config.target_len(), 480_000);
        assert_eq!(config.n_bins(), 201);
        assert_eq!(config.n_frames(), 3_000);
        assert_eq!(config.output_len(), 240_000);
        assert_eq!(config.filterbank_len(), 80 * 201);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_last_hop_adds_a_frame() {
        let config = MelConfig {
            sample_rate: 1_000,
            chunk_seconds: 1,
            n_fft: 64,
            hop_length: 300,
            n_mels: 4,
        };
        assert_eq!(config.n_frames(), 4);
    }

    #[test]
    fn zero_field_is_rejected_by_name() {
        let config = MelConfig {
            hop_length: 0,
            ..MelConfig::WHISPER
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hop_length"));
    }

    #[test]
    fn oversized_mel_count_is_rejected_instead_of_overflowing() {
        let config = MelConfig {
            n_mels: usize::MAX / 100,
            ..MelConfig::WHISPER
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MelError::InvalidConfig { .. }));
        assert!(err.to_string().contains("overflows"));
        assert!(matches!(
            crate::analysis::log_mel::LogMelExtractor::new(config),
            Err(MelError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn missing_toml_fields_fall_back_to_whisper() {
        let config: MelConfig = toml::from_str("n_mels = 128").unwrap();
        assert_eq!(config.n_mels, 128);
        assert_eq!(config.n_fft, WHISPER_N_FFT);
        assert_eq!(config.sample_rate, WHISPER_SAMPLE_RATE);
    }
}
