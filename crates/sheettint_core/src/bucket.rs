//! Percentile band planning for one numeric column.
//!
//! Values split into strictly negative and strictly positive partitions
//! (zeros belong to neither). Each non-empty partition yields five bands at
//! the marks in [`TUP_PERCENTILE_MARKS`]. Band 0 always sits at the
//! extreme-magnitude end and takes the strong color; higher bands move toward
//! zero and toward the neutral color.

use tracing::debug;

use crate::conf::TUP_PERCENTILE_MARKS;
use crate::spec::{
    Boundary, Color, SpecPercentileBand, SpecPercentileBands, SpecPercentilePalette,
};
use crate::util::lerp_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumRankOrder {
    /// Rank counts from the smallest value (negative partition).
    Ascending,
    /// Rank counts from the largest value (positive partition).
    Descending,
}

/// Plan percentile bands for `values` with the given palette.
///
/// Never fails: an empty partition contributes no bands, and a single-valued
/// partition yields degenerate bands that highlight planning filters out.
pub fn derive_percentile_bands(
    values: &[f64],
    palette: &SpecPercentilePalette,
) -> SpecPercentileBands {
    let mut l_negative: Vec<f64> = values.iter().copied().filter(|v| *v < 0.0).collect();
    let mut l_positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    l_negative.sort_by(f64::total_cmp);
    l_positive.sort_by(f64::total_cmp);

    let bands = SpecPercentileBands {
        negative: derive_partition_bands(
            &l_negative,
            &palette.negative,
            &palette.neutral,
            EnumRankOrder::Ascending,
        ),
        positive: derive_partition_bands(
            &l_positive,
            &palette.positive,
            &palette.neutral,
            EnumRankOrder::Descending,
        ),
    };

    debug!(
        n_values = values.len(),
        n_negative = l_negative.len(),
        n_positive = l_positive.len(),
        n_bands = bands.len(),
        "planned percentile bands"
    );
    bands
}

fn derive_partition_bands(
    sorted_values: &[f64],
    color_strong: &Color,
    color_neutral: &Color,
    rule_rank_order: EnumRankOrder,
) -> Vec<SpecPercentileBand> {
    if sorted_values.is_empty() {
        return vec![];
    }

    TUP_PERCENTILE_MARKS
        .windows(2)
        .enumerate()
        .map(|(n_idx_band, marks)| SpecPercentileBand {
            index: n_idx_band,
            lower: Boundary::open(select_at_mark(sorted_values, marks[0], rule_rank_order)),
            upper: Boundary::open(select_at_mark(sorted_values, marks[1], rule_rank_order)),
            color: lerp_color(color_strong, color_neutral, marks[0]),
        })
        .collect()
}

/// Value at rank `ceil((n - 1) * mark)`, counted from the end given by `order`.
fn select_at_mark(sorted_values: &[f64], mark: f64, rule_rank_order: EnumRankOrder) -> f64 {
    let n_last = sorted_values.len() - 1;
    let n_rank = usize::min(n_last, ((n_last as f64) * mark).ceil() as usize);
    match rule_rank_order {
        EnumRankOrder::Ascending => sorted_values[n_rank],
        EnumRankOrder::Descending => sorted_values[n_last - n_rank],
    }
}
