//! Signal analysis: WAV decoding, FFT helpers and log-mel extraction.

pub mod audio;
pub(crate) mod fft;
pub mod log_mel;
