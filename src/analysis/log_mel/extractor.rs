use std::time::Instant;

use rustfft::num_complex::Complex32;

use super::filterbank::FilterbankView;
use super::normalize::{normalize_in_place, silence_value};
use super::observer::{ExtractionObserver, ExtractionReport, LengthAdjustment, NoopObserver};
use super::{MelConfig, MelError, MelSpectrogram};
use crate::analysis::fft::{PowerSpectrumPlan, periodic_hann_window};

/// Log-mel front end for one [`MelConfig`].
///
/// Construction plans the FFT and window once; [`extract`](Self::extract)
/// takes `&self` and can run from several threads at a time.
pub struct LogMelExtractor {
    config: MelConfig,
    plan: PowerSpectrumPlan,
    window: Vec<f32>,
    workers: usize,
}

impl LogMelExtractor {
    /// Build an extractor using every available core.
    pub fn new(config: MelConfig) -> Result<Self, MelError> {
        config.validate()?;
        let plan = PowerSpectrumPlan::new(config.n_fft).map_err(MelError::Fft)?;
        Ok(Self {
            config,
            plan,
            window: periodic_hann_window(config.n_fft),
            workers: default_worker_count(),
        })
    }

    /// Set the worker hint. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn config(&self) -> &MelConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Value every bin takes for an all-zero input.
    pub fn silence_value() -> f32 {
        silence_value()
    }

    pub fn extract(&self, samples: &[f32], filters: &[f32]) -> Result<MelSpectrogram, MelError> {
        self.extract_observed(samples, filters, &NoopObserver)
    }

    /// Compute the normalized log-mel spectrogram of one chunk.
    ///
    /// `filters` is the flattened `(n_mels, n_fft / 2 + 1)` filterbank. Its
    /// shape is checked before any numeric work. `samples` is padded or
    /// truncated to [`MelConfig::target_len`].
    pub fn extract_observed(
        &self,
        samples: &[f32],
        filters: &[f32],
        observer: &dyn ExtractionObserver,
    ) -> Result<MelSpectrogram, MelError> {
        let view = FilterbankView::new(filters, &self.config)?;
        if samples.is_empty() {
            return Err(MelError::EmptyInput);
        }
        let started = Instant::now();
        let target_len = self.config.target_len();
        observer.length_adjusted(
            samples.len(),
            LengthAdjustment::between(samples.len(), target_len),
        );
        let chunk = fit_to_length(samples, target_len);

        let n_mels = self.config.n_mels;
        let n_frames = self.config.n_frames();
        let workers = self.workers.min(n_frames).max(1);
        let frame_major = self.frame_log_mels(&chunk, &view, n_frames, workers);

        let mut data = vec![0.0_f32; n_mels * n_frames];
        for (frame, row) in frame_major.chunks_exact(n_mels).enumerate() {
            for (mel, &value) in row.iter().enumerate() {
                data[mel * n_frames + frame] = value;
            }
        }
        normalize_in_place(&mut data);

        observer.extraction_finished(&ExtractionReport {
            n_mels,
            n_frames,
            workers,
            elapsed: started.elapsed(),
        });
        Ok(MelSpectrogram::from_parts(n_mels, n_frames, data))
    }

    /// Frame-major `(n_frames, n_mels)` log energies.
    ///
    /// Each worker owns a contiguous range of frames and its own FFT buffers.
    fn frame_log_mels(
        &self,
        chunk: &[f32],
        view: &FilterbankView<'_>,
        n_frames: usize,
        workers: usize,
    ) -> Vec<f32> {
        let n_mels = view.n_mels();
        let mut out = vec![0.0_f32; n_frames * n_mels];
        if workers <= 1 {
            self.fill_frames(chunk, view, 0, &mut out);
            return out;
        }
        let frames_per_worker = n_frames.div_ceil(workers);
        std::thread::scope(|scope| {
            for (idx, part) in out.chunks_mut(frames_per_worker * n_mels).enumerate() {
                let first_frame = idx * frames_per_worker;
                scope.spawn(move || self.fill_frames(chunk, view, first_frame, part));
            }
        });
        out
    }

    fn fill_frames(
        &self,
        chunk: &[f32],
        view: &FilterbankView<'_>,
        first_frame: usize,
        out: &mut [f32],
    ) {
        let mut scratch = self.plan.scratch();
        let mut power = vec![0.0_f32; self.plan.bins()];
        for (offset, row) in out.chunks_exact_mut(view.n_mels()).enumerate() {
            let start = (first_frame + offset) * self.config.hop_length;
            fill_windowed(&mut scratch.buffer, chunk, start, &self.window);
            self.plan.power_spectrum_into(&mut scratch, &mut power);
            view.log_mel_into(&power, row);
        }
    }
}

/// Zero-pad or truncate to exactly `target_len` samples.
///
/// Non-finite samples become zero.
pub fn fit_to_length(samples: &[f32], target_len: usize) -> Vec<f32> {
    let mut out: Vec<f32> = samples
        .iter()
        .take(target_len)
        .map(|&sample| if sample.is_finite() { sample } else { 0.0 })
        .collect();
    out.resize(target_len, 0.0);
    out
}

/// Worker count from the hardware, falling back to one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn fill_windowed(target: &mut [Complex32], samples: &[f32], start: usize, window: &[f32]) {
    for (i, cell) in target.iter_mut().enumerate() {
        let src = samples.get(start + i).copied().unwrap_or(0.0);
        let win = window.get(i).copied().unwrap_or(1.0);
        *cell = Complex32::new(src * win, 0.0);
    }
}
