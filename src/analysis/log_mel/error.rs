use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by log-mel extraction.
#[derive(Debug, Error)]
pub enum MelError {
    /// A configuration dimension is unusable.
    #[error("Invalid mel configuration: {reason}")]
    InvalidConfig {
        /// Which field is wrong and why.
        reason: String,
    },
    /// The filterbank does not match the configured mel and FFT dimensions.
    #[error(
        "Filterbank has {len} weights, expected {expected_rows} mel bins x {expected_cols} FFT bins"
    )]
    FilterbankShape {
        /// Configured mel bin count.
        expected_rows: usize,
        /// Configured FFT bin count (`n_fft / 2 + 1`).
        expected_cols: usize,
        /// Weights actually supplied.
        len: usize,
    },
    /// No samples were supplied.
    #[error("Sample buffer is empty")]
    EmptyInput,
    /// The audio file could not be decoded.
    #[error("Audio decode failed for {path}: {message}")]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
    /// FFT planning failed.
    #[error("FFT setup failed: {0}")]
    Fft(String),
}

/// Errors while reading a model's binary filters file.
#[derive(Debug, Error)]
pub enum FilterbankFileError {
    /// The file could not be read.
    #[error("Failed to read filters file {path}: {source}")]
    Read {
        /// Filters file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The leading magic number is wrong.
    #[error("Invalid filters file (bad magic {found:#010x})")]
    BadMagic {
        /// Magic number found in the header.
        found: u32,
    },
    /// The header declares non-positive dimensions.
    #[error("Invalid filters header: n_mel={n_mel}, n_bins={n_bins}")]
    InvalidHeader {
        /// Declared mel bin count.
        n_mel: i32,
        /// Declared FFT bin count.
        n_bins: i32,
    },
    /// The file ended before the declared data.
    #[error("Filters file truncated: need {needed} bytes, got {available}")]
    Truncated {
        /// Bytes required by the header.
        needed: usize,
        /// Bytes present.
        available: usize,
    },
}
