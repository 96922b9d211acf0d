/// Linearly interpolate `mono` from `from_rate` to `to_rate`.
///
/// Output sample `i` reads the source at `i * from_rate / to_rate`; positions
/// past the last sample hold it.
pub(crate) fn resample_linear(mono: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let (from_rate, to_rate) = (from_rate.max(1), to_rate.max(1));
    let Some(&last) = mono.last() else {
        return Vec::new();
    };
    if from_rate == to_rate {
        return mono.to_vec();
    }
    let step = from_rate as f64 / to_rate as f64;
    let out_len = ((mono.len() as f64 / step).round() as usize).max(1);
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let left = pos.floor() as usize;
            match (mono.get(left), mono.get(left + 1)) {
                (Some(&a), Some(&b)) => a + (b - a) * (pos - left as f64) as f32,
                (Some(&a), None) => a,
                _ => last,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsampling_interpolates_between_neighbours() {
        let out = resample_linear(&[0.0, 1.0], 1, 2);
        assert_eq!(out.len(), 4);
        assert_eq!(&out[..3], &[0.0, 0.5, 1.0]);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn downsampling_to_whisper_rate_keeps_duration() {
        let input: Vec<f32> = (0..48_000).map(|i| (i % 7) as f32 * 0.1).collect();
        let out = resample_linear(&input, 48_000, 16_000);
        assert_eq!(out.len(), 16_000);
        assert_eq!(out[1], input[3]);
    }

    #[test]
    fn matching_rates_and_empty_input_pass_through() {
        let input = vec![0.25_f32, -0.5, 0.75];
        assert_eq!(resample_linear(&input, 16_000, 16_000), input);
        assert!(resample_linear(&[], 8_000, 16_000).is_empty());
    }
}
