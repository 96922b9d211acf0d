//! Log-mel spectrogram extraction for Whisper-style speech models.
//!
//! Pipeline per chunk: fit to `sample_rate * chunk_seconds` samples, frame
//! with `hop_length` stride, periodic Hann window, real FFT, one-sided power,
//! mel projection, floored `log10`, then a global clamp to an 8-decade range
//! and `(v + 4) / 4` rescale. Output is mel-bin-major.

/// Sample rate the Whisper filterbank was generated for.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;
/// Seconds of audio per model input chunk.
pub const WHISPER_CHUNK_SECONDS: u32 = 30;
pub const WHISPER_N_FFT: usize = 400;
pub const WHISPER_HOP_LENGTH: usize = 160;
pub const WHISPER_N_MELS: usize = 80;

mod config;
mod error;
mod extractor;
mod file;
mod filterbank;
mod filters_file;
mod normalize;
mod observer;
mod spectrogram;

pub use config::MelConfig;
pub use error::{FilterbankFileError, MelError};
pub use extractor::{LogMelExtractor, default_worker_count, fit_to_length};
pub use file::compute_mel_spectrogram_from_file;
pub use filterbank::MelFilterbank;
pub use filters_file::FILTERS_FILE_MAGIC;
pub use normalize::{DYNAMIC_RANGE_DECADES, LOG_ENERGY_FLOOR};
pub use observer::{
    ExtractionObserver, ExtractionReport, LengthAdjustment, NoopObserver, TracingObserver,
};
pub use spectrogram::MelSpectrogram;

/// One-shot entry point: flattened `(n_mels, n_frames)` log-mel values.
///
/// `workers` is a parallelism hint; the result does not depend on it.
pub fn compute_mel_spectrogram(
    samples: &[f32],
    filterbank: &[f32],
    config: &MelConfig,
    workers: usize,
) -> Result<Vec<f32>, MelError> {
    let extractor = LogMelExtractor::new(*config)?.with_workers(workers);
    extractor
        .extract(samples, filterbank)
        .map(MelSpectrogram::into_vec)
}
