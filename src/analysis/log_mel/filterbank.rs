use super::normalize::log_energy;
use super::{MelConfig, MelError};

/// Row-major `(n_mels, n_bins)` mel filterbank.
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterbank {
    n_mels: usize,
    n_bins: usize,
    weights: Vec<f32>,
}

impl MelFilterbank {
    /// Wrap flattened weights, checking `weights.len() == n_mels * n_bins`.
    pub fn new(n_mels: usize, n_bins: usize, weights: Vec<f32>) -> Result<Self, MelError> {
        if n_mels == 0 || n_bins == 0 || weights.len() != n_mels * n_bins {
            return Err(MelError::FilterbankShape {
                expected_rows: n_mels,
                expected_cols: n_bins,
                len: weights.len(),
            });
        }
        Ok(Self {
            n_mels,
            n_bins,
            weights,
        })
    }

    /// Slaney-scale triangular filters from 0 Hz to Nyquist with Slaney area
    /// normalization, the layout Whisper's filters were generated with.
    pub fn slaney(config: &MelConfig) -> Self {
        let n_mels = config.n_mels.max(1);
        let n_bins = config.n_bins();
        let sample_rate = config.sample_rate.max(1) as f64;
        let nyquist = sample_rate / 2.0;
        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|bin| {
                if n_bins == 1 {
                    0.0
                } else {
                    nyquist * bin as f64 / (n_bins - 1) as f64
                }
            })
            .collect();
        let mel_max = hz_to_mel_slaney(nyquist);
        let mel_points: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz_slaney(mel_max * i as f64 / (n_mels + 1) as f64))
            .collect();

        let mut weights = vec![0.0_f32; n_mels * n_bins];
        for (mel, row) in weights.chunks_exact_mut(n_bins).enumerate() {
            let left = mel_points[mel];
            let center = mel_points[mel + 1];
            let right = mel_points[mel + 2];
            let enorm = 2.0 / (right - left);
            for (slot, &freq) in row.iter_mut().zip(&fft_freqs) {
                let lower = (freq - left) / (center - left);
                let upper = (right - freq) / (right - center);
                *slot = (lower.min(upper).max(0.0) * enorm) as f32;
            }
        }
        Self {
            n_mels,
            n_bins,
            weights,
        }
    }

    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Flattened weights, row-major.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weights for one mel bin.
    pub fn row(&self, mel: usize) -> Option<&[f32]> {
        let start = mel.checked_mul(self.n_bins)?;
        self.weights.get(start..start + self.n_bins)
    }

    /// Confirm the filterbank was built for `config`.
    pub fn check_matches(&self, config: &MelConfig) -> Result<(), MelError> {
        if self.n_mels != config.n_mels || self.n_bins != config.n_bins() {
            return Err(MelError::FilterbankShape {
                expected_rows: config.n_mels,
                expected_cols: config.n_bins(),
                len: self.weights.len(),
            });
        }
        Ok(())
    }
}

/// Borrowed filterbank checked against a configuration, with each row's
/// nonzero span precomputed so projection skips the empty tails.
pub(crate) struct FilterbankView<'a> {
    weights: &'a [f32],
    n_bins: usize,
    spans: Vec<(usize, usize)>,
}

impl<'a> FilterbankView<'a> {
    pub(crate) fn new(weights: &'a [f32], config: &MelConfig) -> Result<Self, MelError> {
        let n_bins = config.n_bins();
        if weights.len() != config.filterbank_len() {
            return Err(MelError::FilterbankShape {
                expected_rows: config.n_mels,
                expected_cols: n_bins,
                len: weights.len(),
            });
        }
        let spans = weights.chunks_exact(n_bins).map(nonzero_span).collect();
        Ok(Self {
            weights,
            n_bins,
            spans,
        })
    }

    pub(crate) fn n_mels(&self) -> usize {
        self.spans.len()
    }

    /// Project one power spectrum onto the mel bins and take the floored log10.
    ///
    /// Products are formed in `f32` and summed in `f64`.
    pub(crate) fn log_mel_into(&self, power: &[f32], out: &mut [f32]) {
        for (mel, (slot, &(start, end))) in out.iter_mut().zip(&self.spans).enumerate() {
            let row = &self.weights[mel * self.n_bins..(mel + 1) * self.n_bins];
            let mut sum = 0.0_f64;
            for bin in start..end {
                sum += (power[bin] * row[bin]) as f64;
            }
            *slot = log_energy(sum);
        }
    }
}

fn nonzero_span(row: &[f32]) -> (usize, usize) {
    let start = row.iter().position(|&w| w != 0.0);
    let end = row.iter().rposition(|&w| w != 0.0);
    match (start, end) {
        (Some(start), Some(end)) => (start, end + 1),
        _ => (0, 0),
    }
}

const SLANEY_F_SP: f64 = 200.0 / 3.0;
const SLANEY_MIN_LOG_HZ: f64 = 1_000.0;
const SLANEY_MIN_LOG_MEL: f64 = SLANEY_MIN_LOG_HZ / SLANEY_F_SP;

fn slaney_log_step() -> f64 {
    6.4_f64.ln() / 27.0
}

fn hz_to_mel_slaney(hz: f64) -> f64 {
    if hz >= SLANEY_MIN_LOG_HZ {
        SLANEY_MIN_LOG_MEL + (hz / SLANEY_MIN_LOG_HZ).ln() / slaney_log_step()
    } else {
        hz / SLANEY_F_SP
    }
}

fn mel_to_hz_slaney(mel: f64) -> f64 {
    if mel >= SLANEY_MIN_LOG_MEL {
        SLANEY_MIN_LOG_HZ * (slaney_log_step() * (mel - SLANEY_MIN_LOG_MEL)).exp()
    } else {
        SLANEY_F_SP * mel
    }
}
