use std::path::Path;
use std::time::Duration;

/// How an input buffer was fitted to the chunk length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthAdjustment {
    /// Input already had the chunk length.
    Exact,
    /// Zeros were appended.
    Padded {
        /// Number of zero samples appended.
        missing: usize,
    },
    /// Trailing samples were dropped.
    Truncated {
        /// Number of samples discarded.
        dropped: usize,
    },
}

impl LengthAdjustment {
    pub fn between(actual: usize, target: usize) -> Self {
        if actual < target {
            Self::Padded {
                missing: target - actual,
            }
        } else if actual > target {
            Self::Truncated {
                dropped: actual - target,
            }
        } else {
            Self::Exact
        }
    }
}

/// Summary of one finished extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionReport {
    pub n_mels: usize,
    pub n_frames: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

/// Hooks for timing and diagnostics around extraction.
///
/// Observers see events but cannot change the returned spectrogram.
pub trait ExtractionObserver: Sync {
    fn file_decoded(&self, _path: &Path, _samples: usize, _elapsed: Duration) {}

    fn length_adjusted(&self, _original_len: usize, _adjustment: LengthAdjustment) {}

    fn extraction_finished(&self, _report: &ExtractionReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

/// Observer that forwards events to `tracing`.
///
/// Truncation is logged at `warn` since audio past the chunk is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn file_decoded(&self, path: &Path, samples: usize, elapsed: Duration) {
        tracing::debug!(
            "Decoded {} samples from {} in {} ms",
            samples,
            path.display(),
            elapsed.as_millis()
        );
    }

    fn length_adjusted(&self, original_len: usize, adjustment: LengthAdjustment) {
        match adjustment {
            LengthAdjustment::Exact => {}
            LengthAdjustment::Padded { missing } => {
                tracing::debug!("Zero-padded {original_len} samples with {missing} more");
            }
            LengthAdjustment::Truncated { dropped } => {
                tracing::warn!(
                    "Input of {original_len} samples exceeds the chunk; dropped {dropped} trailing samples"
                );
            }
        }
    }

    fn extraction_finished(&self, report: &ExtractionReport) {
        tracing::info!(
            "Time taken for spectrogram: {} ms ({} mels x {} frames, {} workers)",
            report.elapsed.as_millis(),
            report.n_mels,
            report.n_frames,
            report.workers
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_classifies_lengths() {
        assert_eq!(LengthAdjustment::between(10, 10), LengthAdjustment::Exact);
        assert_eq!(
            LengthAdjustment::between(4, 10),
            LengthAdjustment::Padded { missing: 6 }
        );
        assert_eq!(
            LengthAdjustment::between(13, 10),
            LengthAdjustment::Truncated { dropped: 3 }
        );
    }
}
