//! Column-level percentile highlighting.
//!
//! A column's bands are applied one pass at a time, each pass reading the
//! colors left by the previous one. Separate columns never overlap and are
//! planned in parallel.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::bucket::derive_percentile_bands;
use crate::grid::{GridSource, SheetGrid};
use crate::planner::{ColorGrid, plan_highlight};
use crate::spec::{
    CellPosition, Color, EnumCellValue, Result, SheetTintError, SpecPercentileOptions,
    SpecPercentilePalette,
};
use crate::util::calculate_worker_limit;

/// Base grid values seen through the colors of earlier passes.
struct LayeredSource<'a> {
    base: &'a SheetGrid,
    overlay: ColorGrid,
}

impl GridSource for LayeredSource<'_> {
    fn value_at(&self, position: CellPosition) -> Option<f64> {
        self.base.value_at(position)
    }

    fn background_at(&self, position: CellPosition) -> Color {
        self.overlay
            .get(position)
            .unwrap_or_else(|| self.base.background_at(position))
    }
}

/// Plan the percentile highlight of the column whose header is `column_name`.
///
/// The first grid row is the header; the data rows below it form the target
/// range. Returns `None` when the grid has no data rows. Blank cells are
/// skipped; text that is not a number fails the whole column.
pub fn plan_percentile_column(
    grid: &SheetGrid,
    column_name: &str,
    palette: &SpecPercentilePalette,
) -> Result<Option<ColorGrid>> {
    let n_col = grid
        .find_column(column_name)
        .ok_or_else(|| SheetTintError::invalid(format!("Missing column: {column_name:?}.")))?;
    if grid.height() <= 1 {
        return Ok(None);
    }

    let origin = grid.origin();
    let start = origin.offset(1, n_col as i64);
    let end = origin.offset(grid.height() as i64 - 1, n_col as i64);

    let l_values = collect_column_values(grid, start, end, column_name)?;
    if l_values.is_empty() {
        warn!(column = column_name, "column has no numeric values; nothing to highlight");
    }
    let bands = derive_percentile_bands(&l_values, palette);

    let mut layered = LayeredSource {
        base: grid,
        overlay: ColorGrid::capture(grid, start, end)?,
    };
    let mut n_matched = 0usize;
    for band in bands.iter_passes() {
        layered.overlay =
            plan_highlight(&layered, start, end, &band.lower, &band.upper, &band.color)?;
        n_matched += layered.overlay.n_matched();
    }
    layered.overlay = layered.overlay.with_n_matched(n_matched);

    debug!(
        column = column_name,
        n_rows = end.row - start.row + 1,
        n_passes = bands.len(),
        "planned percentile column"
    );
    Ok(Some(layered.overlay))
}

/// Plan several columns; results keep the order of `column_names`.
///
/// Columns without data rows produce no entry. Any failure aborts the call.
pub fn plan_percentile_columns<S>(
    grid: &SheetGrid,
    column_names: &[S],
    palette: &SpecPercentilePalette,
    options: &SpecPercentileOptions,
) -> Result<Vec<ColorGrid>>
where
    S: AsRef<str> + Sync,
{
    let plan_one = |name: &S| plan_percentile_column(grid, name.as_ref(), palette);

    let n_workers_max = calculate_worker_limit(options.num_workers_max);
    let l_results: Vec<Option<ColorGrid>> = if n_workers_max <= 1 || column_names.len() <= 1 {
        column_names.iter().map(plan_one).collect::<Result<_>>()?
    } else {
        match ThreadPoolBuilder::new().num_threads(n_workers_max).build() {
            Ok(thread_pool) => thread_pool
                .install(|| column_names.par_iter().map(plan_one).collect::<Result<_>>())?,
            Err(err) => {
                warn!(
                    workers = n_workers_max,
                    error = %err,
                    "failed to initialize thread pool; fallback to serial planning"
                );
                column_names.iter().map(plan_one).collect::<Result<_>>()?
            }
        }
    };

    Ok(l_results.into_iter().flatten().collect())
}

/// Plan every column, then write all results into `grid`.
///
/// Nothing is written unless every column plans successfully.
pub fn apply_percentile_columns<S>(
    grid: &mut SheetGrid,
    column_names: &[S],
    palette: &SpecPercentilePalette,
    options: &SpecPercentileOptions,
) -> Result<Vec<ColorGrid>>
where
    S: AsRef<str> + Sync,
{
    let l_color_grids = plan_percentile_columns(grid, column_names, palette, options)?;
    for colors in &l_color_grids {
        grid.apply(colors)?;
    }
    Ok(l_color_grids)
}

fn collect_column_values(
    grid: &SheetGrid,
    start: CellPosition,
    end: CellPosition,
    column_name: &str,
) -> Result<Vec<f64>> {
    let mut l_values = Vec::with_capacity((end.row - start.row + 1) as usize);
    for n_row in start.row..=end.row {
        let position = CellPosition::new(n_row, start.column);
        match grid.cell(position).map(|cell| &cell.value) {
            Some(EnumCellValue::Number(n)) => l_values.push(*n),
            Some(EnumCellValue::String(text)) => {
                return Err(SheetTintError::invalid(format!(
                    "Non-numeric value {text:?} at {} in column {column_name:?}.",
                    position.to_a1()?
                )));
            }
            Some(EnumCellValue::None) | None => {}
        }
    }
    Ok(l_values)
}
