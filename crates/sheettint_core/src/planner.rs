//! Per-cell highlight planning over a rectangular range.

use tracing::debug;

use crate::grid::GridSource;
use crate::spec::{Boundary, CellPosition, Color, Result, SheetTintError};
use crate::util::{is_within_unit_window, lerp_color, normalize_boundary};

////////////////////////////////////////////////////////////////////////////////
// #region ColorGrid

/// Planned background colors for an inclusive rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    start: CellPosition,
    end: CellPosition,
    rows: Vec<Vec<Color>>,
    n_matched: usize,
}

impl ColorGrid {
    /// Snapshot the current backgrounds of `start..=end`.
    pub fn capture<S: GridSource + ?Sized>(
        source: &S,
        start: CellPosition,
        end: CellPosition,
    ) -> Result<Self> {
        validate_range(&start, &end)?;
        let rows = (start.row..=end.row)
            .map(|n_row| {
                (start.column..=end.column)
                    .map(|n_col| source.background_at(CellPosition::new(n_row, n_col)))
                    .collect()
            })
            .collect();
        Ok(Self {
            start,
            end,
            rows,
            n_matched: 0,
        })
    }

    /// Top-left position.
    pub fn start(&self) -> CellPosition {
        self.start
    }

    /// Bottom-right position.
    pub fn end(&self) -> CellPosition {
        self.end
    }

    /// Row-major colors.
    pub fn rows(&self) -> &[Vec<Color>] {
        &self.rows
    }

    /// Number of cells that received a mapped color (not passed through).
    ///
    /// For a layered percentile plan this is the total over all band passes,
    /// so a cell repainted by two passes counts twice.
    pub fn n_matched(&self) -> usize {
        self.n_matched
    }

    pub(crate) fn with_n_matched(mut self, n_matched: usize) -> Self {
        self.n_matched = n_matched;
        self
    }

    /// Whether the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Color at an absolute position inside the rectangle.
    pub fn get(&self, position: CellPosition) -> Option<Color> {
        let n_row = usize::try_from(position.row - self.start.row).ok()?;
        let n_col = usize::try_from(position.column - self.start.column).ok()?;
        self.rows.get(n_row).and_then(|row| row.get(n_col)).copied()
    }

    /// Iterate `(position, color)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, Color)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(n_row, row)| {
            row.iter().enumerate().map(move |(n_col, color)| {
                (self.start.offset(n_row as i64, n_col as i64), *color)
            })
        })
    }

    /// Target range, e.g. `"B2:B9"`.
    pub fn range_label(&self) -> Result<String> {
        crate::coord::encode_range(&self.start, &self.end)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Planning

#[derive(Debug, Clone, Copy)]
enum EnumHighlightFill {
    Flat(Color),
    Gradient { from: Color, to: Color },
}

/// Paint `color` on every cell whose value lies in `[lower, upper]`.
///
/// Cells without a number, or whose normalized fraction falls outside
/// `[0, 1]` (including `NaN` from a degenerate interval), keep their
/// existing background.
pub fn plan_highlight<S: GridSource + ?Sized>(
    source: &S,
    start: CellPosition,
    end: CellPosition,
    lower: &Boundary,
    upper: &Boundary,
    color: &Color,
) -> Result<ColorGrid> {
    plan_fill(source, start, end, lower, upper, EnumHighlightFill::Flat(*color))
}

/// Paint `lerp(color_from, color_to, fraction)` on every in-range cell.
///
/// Fails with `InvalidArgument` when `lower.value == upper.value`.
pub fn plan_gradient_highlight<S: GridSource + ?Sized>(
    source: &S,
    start: CellPosition,
    end: CellPosition,
    lower: &Boundary,
    upper: &Boundary,
    color_from: &Color,
    color_to: &Color,
) -> Result<ColorGrid> {
    if lower.value == upper.value {
        return Err(SheetTintError::invalid(format!(
            "Gradient interval is degenerate: lower == upper == {}.",
            lower.value
        )));
    }
    plan_fill(
        source,
        start,
        end,
        lower,
        upper,
        EnumHighlightFill::Gradient {
            from: *color_from,
            to: *color_to,
        },
    )
}

fn plan_fill<S: GridSource + ?Sized>(
    source: &S,
    start: CellPosition,
    end: CellPosition,
    lower: &Boundary,
    upper: &Boundary,
    fill: EnumHighlightFill,
) -> Result<ColorGrid> {
    validate_range(&start, &end)?;

    let mut n_matched = 0usize;
    let mut rows = Vec::with_capacity((end.row - start.row + 1) as usize);
    for n_row in start.row..=end.row {
        let mut row = Vec::with_capacity((end.column - start.column + 1) as usize);
        for n_col in start.column..=end.column {
            let position = CellPosition::new(n_row, n_col);
            let value = source.value_at(position);
            let n_fraction = normalize_boundary(lower, upper, value.unwrap_or(0.0));

            let color = if value.is_some() && is_within_unit_window(n_fraction) {
                n_matched += 1;
                match fill {
                    EnumHighlightFill::Flat(color) => color,
                    EnumHighlightFill::Gradient { from, to } => lerp_color(&from, &to, n_fraction),
                }
            } else {
                source.background_at(position)
            };
            row.push(color);
        }
        rows.push(row);
    }

    debug!(
        start = ?start,
        end = ?end,
        lower = lower.value,
        upper = upper.value,
        n_matched,
        "planned highlight pass"
    );

    Ok(ColorGrid {
        start,
        end,
        rows,
        n_matched,
    })
}

fn validate_range(start: &CellPosition, end: &CellPosition) -> Result<()> {
    start.to_a1()?;
    end.to_a1()?;
    if start.row > end.row || start.column > end.column {
        return Err(SheetTintError::invalid(format!(
            "Range start {} must not be after end {}.",
            start.to_a1()?,
            end.to_a1()?
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SheetGrid;
    use crate::spec::{EnumCellValue, SpecGridCell};

    const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);

    fn column_grid(values: &[Option<f64>], background: Color) -> SheetGrid {
        let rows = values
            .iter()
            .map(|value| {
                let cell_value = value.map_or(EnumCellValue::None, EnumCellValue::Number);
                vec![SpecGridCell::new(cell_value).with_background(background)]
            })
            .collect();
        SheetGrid::new(CellPosition::origin(), rows).expect("grid")
    }

    #[test]
    fn test_gradient_end_to_end_white_to_red() {
        let grid = column_grid(&[Some(1.0), Some(5.0), Some(9.0)], BLUE);
        let colors = plan_gradient_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(3, 1),
            &Boundary::open(1.0),
            &Boundary::open(9.0),
            &Color::WHITE,
            &RED,
        )
        .expect("plan");

        assert_eq!(colors.n_matched(), 3);
        assert_eq!(colors.get(CellPosition::new(1, 1)), Some(Color::WHITE));
        assert_eq!(
            colors.get(CellPosition::new(2, 1)),
            Some(Color::rgba(1.0, 0.5, 0.5, 1.0))
        );
        assert_eq!(colors.get(CellPosition::new(3, 1)), Some(RED));
    }

    #[test]
    fn test_cells_without_value_pass_through() {
        let grid = column_grid(&[None, Some(5.0), None], BLUE);
        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(3, 1),
            &Boundary::open(0.0),
            &Boundary::open(10.0),
            &RED,
        )
        .expect("plan");

        assert_eq!(colors.rows(), &[vec![BLUE], vec![RED], vec![BLUE]]);
        assert_eq!(colors.n_matched(), 1);
    }

    #[test]
    fn test_zero_value_is_a_value_but_absence_is_not() {
        let grid = column_grid(&[Some(0.0), None], BLUE);
        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &Boundary::open(0.0),
            &Boundary::open(10.0),
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.rows(), &[vec![RED], vec![BLUE]]);
    }

    #[test]
    fn test_out_of_window_values_keep_background() {
        let grid = column_grid(&[Some(-1.0), Some(11.0), Some(10.0)], BLUE);
        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(3, 1),
            &Boundary::open(0.0),
            &Boundary::open(10.0),
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.rows(), &[vec![BLUE], vec![BLUE], vec![RED]]);
    }

    #[test]
    fn test_degenerate_flat_interval_filters_every_cell() {
        let grid = column_grid(&[Some(4.0), Some(5.0)], BLUE);
        let edge = Boundary::open(4.0);
        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &edge,
            &edge,
            &RED,
        )
        .expect("degenerate flat interval must not fail");
        assert_eq!(colors.n_matched(), 0);
        assert_eq!(colors.rows(), &[vec![BLUE], vec![BLUE]]);
    }

    #[test]
    fn test_degenerate_interval_with_clamps_filters_edge_value() {
        let grid = column_grid(&[Some(4.0), Some(5.0)], BLUE);
        let edge = Boundary::open(4.0);
        let edge_clamped = Boundary::new(4.0, true);

        for (lower, upper) in [(&edge_clamped, &edge), (&edge, &edge_clamped)] {
            let colors = plan_highlight(
                &grid,
                CellPosition::new(1, 1),
                CellPosition::new(1, 1),
                lower,
                upper,
                &RED,
            )
            .expect("plan");
            assert_eq!(colors.n_matched(), 0);
            assert_eq!(colors.rows(), &[vec![BLUE]]);
        }

        // Above the edge the lower clamp cannot pull `+inf` into the window.
        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &edge_clamped,
            &edge,
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.rows(), &[vec![BLUE], vec![BLUE]]);
    }

    #[test]
    fn test_nan_value_passes_through_clamped_boundaries() {
        let grid = column_grid(&[Some(f64::NAN), Some(5.0)], BLUE);
        let lower = Boundary::new(0.0, true);
        let upper = Boundary::new(10.0, true);

        let colors = plan_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &lower,
            &upper,
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.rows(), &[vec![BLUE], vec![RED]]);
        assert_eq!(colors.n_matched(), 1);

        let colors = plan_gradient_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &lower,
            &upper,
            &Color::WHITE,
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.get(CellPosition::new(1, 1)), Some(BLUE));
        assert_eq!(
            colors.get(CellPosition::new(2, 1)),
            Some(Color::rgba(1.0, 0.5, 0.5, 1.0))
        );
    }

    #[test]
    fn test_degenerate_gradient_is_rejected() {
        let grid = column_grid(&[Some(4.0)], BLUE);
        let err = plan_gradient_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(1, 1),
            &Boundary::open(4.0),
            &Boundary::new(4.0, true),
            &Color::WHITE,
            &RED,
        )
        .unwrap_err();
        assert!(matches!(err, SheetTintError::InvalidArgument(_)));
    }

    #[test]
    fn test_clamped_gradient_saturates_outliers() {
        let grid = column_grid(&[Some(-5.0), Some(50.0)], BLUE);
        let colors = plan_gradient_highlight(
            &grid,
            CellPosition::new(1, 1),
            CellPosition::new(2, 1),
            &Boundary::new(0.0, true),
            &Boundary::new(10.0, true),
            &Color::WHITE,
            &RED,
        )
        .expect("plan");
        assert_eq!(colors.rows(), &[vec![Color::WHITE], vec![RED]]);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let grid = column_grid(&[Some(1.0)], BLUE);
        let lower = Boundary::open(0.0);
        let upper = Boundary::open(1.0);
        assert!(
            plan_highlight(
                &grid,
                CellPosition::new(2, 1),
                CellPosition::new(1, 1),
                &lower,
                &upper,
                &RED
            )
            .is_err()
        );
        assert!(
            plan_highlight(
                &grid,
                CellPosition::new(0, 1),
                CellPosition::new(1, 1),
                &lower,
                &upper,
                &RED
            )
            .is_err()
        );
    }

    #[test]
    fn test_capture_and_iter_follow_row_major_order() {
        let grid = SheetGrid::new(
            CellPosition::new(2, 2),
            vec![
                vec![
                    SpecGridCell::default().with_background(RED),
                    SpecGridCell::default(),
                ],
                vec![
                    SpecGridCell::default(),
                    SpecGridCell::default().with_background(BLUE),
                ],
            ],
        )
        .expect("grid");
        let colors = ColorGrid::capture(&grid, grid.origin(), grid.end()).expect("capture");

        assert_eq!(colors.range_label().unwrap(), "B2:C3");
        let l_cells: Vec<(CellPosition, Color)> = colors.iter().collect();
        assert_eq!(
            l_cells,
            vec![
                (CellPosition::new(2, 2), RED),
                (CellPosition::new(2, 3), Color::WHITE),
                (CellPosition::new(3, 2), Color::WHITE),
                (CellPosition::new(3, 3), BLUE),
            ]
        );
    }
}
