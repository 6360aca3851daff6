//! Stateless numeric helpers: boundary normalization and color interpolation.

use crate::spec::{Boundary, Color};

////////////////////////////////////////////////////////////////////////////////
// #region Normalization

/// Map `value` to its fractional position between `lower` and `upper`.
///
/// `lower.clamp` floors the result at 0 and `upper.clamp` ceils it at 1,
/// independently. Equal edge values are not guarded: the result follows IEEE
/// division (`±inf` or `NaN`), which [`is_within_unit_window`] rejects.
/// Clamping never turns `NaN` into a number.
pub fn normalize_boundary(lower: &Boundary, upper: &Boundary, value: f64) -> f64 {
    let mut n_fraction = normalize(lower.value, upper.value, value);
    if lower.clamp && n_fraction < 0.0 {
        n_fraction = 0.0;
    }
    if upper.clamp && n_fraction > 1.0 {
        n_fraction = 1.0;
    }
    n_fraction
}

/// Unclamped `(value - lower) / (upper - lower)`.
#[inline]
pub fn normalize(lower: f64, upper: f64, value: f64) -> f64 {
    (value - lower) / (upper - lower)
}

/// `0 <= fraction <= 1`; `NaN` is outside.
#[inline]
pub fn is_within_unit_window(fraction: f64) -> bool {
    (0.0..=1.0).contains(&fraction)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Interpolation

/// Blend `color_a` toward `color_b` by `alpha`, channel by channel.
///
/// Neither `alpha` nor the channels are clamped.
pub fn lerp_color(color_a: &Color, color_b: &Color, alpha: f64) -> Color {
    let n_one_minus_alpha = 1.0 - alpha;
    Color {
        red: color_a.red * n_one_minus_alpha + color_b.red * alpha,
        green: color_a.green * n_one_minus_alpha + color_b.green * alpha,
        blue: color_a.blue * n_one_minus_alpha + color_b.blue * alpha,
        alpha: color_a.alpha * n_one_minus_alpha + color_b.alpha * alpha,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Workers

/// Resolve the worker count for cross-column planning.
pub(crate) fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
