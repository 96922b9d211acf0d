use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// Periodic Hann window (`0.5 * (1 - cos(2*pi*n / length))`).
///
/// The last coefficient is not forced back to zero, which is the variant
/// speech front ends use for overlapping STFT frames.
pub(crate) fn periodic_hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = length as f64;
    (0..length)
        .map(|n| (0.5 * (1.0 - (2.0 * PI * n as f64 / denom).cos())) as f32)
        .collect()
}

/// Forward FFT of a fixed length, shared read-only across worker threads.
pub(crate) struct PowerSpectrumPlan {
    len: usize,
    fft: Arc<dyn Fft<f32>>,
}

/// Per-worker buffers for [`PowerSpectrumPlan`].
pub(crate) struct FftScratch {
    pub(crate) buffer: Vec<Complex32>,
    work: Vec<Complex32>,
}

impl PowerSpectrumPlan {
    pub(crate) fn new(len: usize) -> Result<Self, String> {
        if len == 0 {
            return Err("FFT length must be positive".into());
        }
        let fft = FftPlanner::<f32>::new().plan_fft_forward(len);
        Ok(Self { len, fft })
    }

    /// Number of non-redundant bins (`len / 2 + 1`).
    pub(crate) fn bins(&self) -> usize {
        self.len / 2 + 1
    }

    pub(crate) fn scratch(&self) -> FftScratch {
        FftScratch {
            buffer: vec![Complex32::default(); self.len],
            work: vec![Complex32::default(); self.fft.get_inplace_scratch_len()],
        }
    }

    /// Transform `scratch.buffer` in place and write its one-sided power spectrum.
    pub(crate) fn power_spectrum_into(&self, scratch: &mut FftScratch, out: &mut [f32]) {
        self.fft
            .process_with_scratch(&mut scratch.buffer, &mut scratch.work);
        one_sided_power_into(&scratch.buffer, out);
    }
}

/// Power per bin for `0..=len/2`, folding in the mirrored bin for `1..len/2`.
///
/// DC and the bin at `len/2` are not folded.
pub(crate) fn one_sided_power_into(fft: &[Complex32], out: &mut [f32]) {
    let len = fft.len();
    let half = len / 2;
    for (bin, slot) in out.iter_mut().enumerate().take(half + 1) {
        let mut power = fft[bin].norm_sqr();
        if bin >= 1 && bin < half {
            power += fft[len - bin].norm_sqr();
        }
        *slot = power;
    }
}
