use std::path::Path;
use std::time::Instant;

use super::filterbank::FilterbankView;
use super::observer::{ExtractionObserver, NoopObserver};
use super::{LogMelExtractor, MelConfig, MelError, MelSpectrogram};
use crate::analysis::audio;

impl LogMelExtractor {
    /// Decode a WAV file at the configured rate and extract its first chunk.
    ///
    /// The filterbank is checked before the file is opened.
    pub fn extract_file(
        &self,
        path: &Path,
        filters: &[f32],
        observer: &dyn ExtractionObserver,
    ) -> Result<MelSpectrogram, MelError> {
        FilterbankView::new(filters, self.config())?;
        let started = Instant::now();
        let decoded = audio::read_wav_mono(path, self.config().sample_rate).map_err(|message| {
            MelError::Decode {
                path: path.to_path_buf(),
                message,
            }
        })?;
        observer.file_decoded(path, decoded.mono.len(), started.elapsed());
        self.extract_observed(&decoded.mono, filters, observer)
    }
}

/// One-shot file entry point returning the flattened spectrogram.
pub fn compute_mel_spectrogram_from_file(
    path: &Path,
    filterbank: &[f32],
    config: &MelConfig,
    workers: usize,
) -> Result<Vec<f32>, MelError> {
    let extractor = LogMelExtractor::new(*config)?.with_workers(workers);
    extractor
        .extract_file(path, filterbank, &NoopObserver)
        .map(MelSpectrogram::into_vec)
}
