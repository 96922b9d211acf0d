/// Energies below this are clamped before the log so silence stays finite.
pub const LOG_ENERGY_FLOOR: f64 = 1e-10;
/// Values more than this many decades below the loudest value are clamped.
pub const DYNAMIC_RANGE_DECADES: f64 = 8.0;
const FEATURE_OFFSET: f64 = 4.0;
const FEATURE_SCALE: f64 = 4.0;

pub(crate) fn log_energy(sum: f64) -> f32 {
    sum.max(LOG_ENERGY_FLOOR).log10() as f32
}

/// Clamp to `max - DYNAMIC_RANGE_DECADES`, then rescale by `(v + 4) / 4`.
pub(crate) fn normalize_in_place(values: &mut [f32]) {
    let mut max = -1e20_f64;
    for &value in values.iter() {
        if value as f64 > max {
            max = value as f64;
        }
    }
    let floor = max - DYNAMIC_RANGE_DECADES;
    for value in values.iter_mut() {
        if (*value as f64) < floor {
            *value = floor as f32;
        }
        *value = rescale(*value);
    }
}

/// Output value of a mel bin whose energy sat at [`LOG_ENERGY_FLOOR`] in an
/// all-silent chunk.
pub fn silence_value() -> f32 {
    rescale(log_energy(0.0))
}

fn rescale(value: f32) -> f32 {
    ((value as f64 + FEATURE_OFFSET) / FEATURE_SCALE) as f32
}
