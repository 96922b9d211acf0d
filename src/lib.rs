//! Library exports for the `melprep` binary, benchmarks and tests.
/// WAV decoding, FFT helpers and log-mel extraction.
pub mod analysis;
/// Application directory helpers.
pub mod app_dirs;
/// TOML settings.
pub mod config;
/// Tracing setup for the command-line front end.
pub mod logging;

pub use analysis::log_mel::{
    LogMelExtractor, MelConfig, MelError, MelFilterbank, MelSpectrogram, compute_mel_spectrogram,
    compute_mel_spectrogram_from_file,
};
