//! Chart source planning: resolve the label and data columns of a chart by
//! header text and derive the value-axis window.

use tracing::debug;

use crate::grid::SheetGrid;
use crate::spec::{CellPosition, Result, SheetTintError, SpecChart, SpecChartPlan};

/// Resolve `chart` against `grid`.
///
/// Both source ranges span the header row through the last grid row. A
/// header that matches no column is an error.
pub fn plan_chart(grid: &SheetGrid, chart: &SpecChart) -> Result<SpecChartPlan> {
    let label_range = derive_column_range(grid, &chart.label_column, "label")?;
    let data_range = derive_column_range(grid, &chart.data_column, "data")?;

    let view_window = (data_range.0.row + 1..=data_range.1.row)
        .filter_map(|n_row| {
            grid.cell(CellPosition::new(n_row, data_range.0.column))
                .and_then(|cell| cell.value.as_number())
        })
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((n_min, n_max)) => Some((n_min.min(v), n_max.max(v))),
            None => Some((v, v)),
        });

    debug!(
        title = chart.title.as_str(),
        label_column = chart.label_column.as_str(),
        data_column = chart.data_column.as_str(),
        has_view_window = view_window.is_some(),
        "planned chart"
    );

    Ok(SpecChartPlan {
        chart: chart.clone(),
        label_range,
        data_range,
        header_count: 1,
        view_window,
    })
}

fn derive_column_range(
    grid: &SheetGrid,
    column_name: &str,
    role: &str,
) -> Result<(CellPosition, CellPosition)> {
    let n_col = grid.find_column(column_name).ok_or_else(|| {
        SheetTintError::invalid(format!("Missing chart {role} column: {column_name:?}."))
    })?;
    let origin = grid.origin();
    Ok((
        origin.offset(0, n_col as i64),
        origin.offset(grid.height() as i64 - 1, n_col as i64),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_for(label: &str, data: &str) -> SpecChart {
        SpecChart {
            label_column: label.to_string(),
            data_column: data.to_string(),
            ..SpecChart::default()
        }
    }

    #[test]
    fn test_plan_chart_resolves_ranges_and_window() {
        let table = vec![
            vec!["Day", "Close", "Volume"],
            vec!["mon", "3.5", "10"],
            vec!["tue", "", "12"],
            vec!["wed", "-1.25", "9"],
            vec!["thu", "8", "11"],
        ];
        let grid = SheetGrid::from_table(&table, CellPosition::new(2, 3)).expect("grid");
        let plan = plan_chart(&grid, &chart_for("Day", "Close")).expect("plan");

        assert_eq!(
            plan.label_range,
            (CellPosition::new(2, 3), CellPosition::new(6, 3))
        );
        assert_eq!(
            plan.data_range,
            (CellPosition::new(2, 4), CellPosition::new(6, 4))
        );
        assert_eq!(plan.header_count, 1);
        assert_eq!(plan.view_window, Some((-1.25, 8.0)));
        assert_eq!(plan.chart.title, "title");
    }

    #[test]
    fn test_plan_chart_header_only_has_no_window() {
        let grid = SheetGrid::from_table(&[vec!["Day", "Close"]], CellPosition::origin())
            .expect("grid");
        let plan = plan_chart(&grid, &chart_for("Day", "Close")).expect("plan");
        assert_eq!(plan.data_range.0, plan.data_range.1);
        assert_eq!(plan.view_window, None);
    }

    #[test]
    fn test_plan_chart_rejects_missing_column() {
        let grid = SheetGrid::from_table(&[vec!["Day", "Close"]], CellPosition::origin())
            .expect("grid");
        let err = plan_chart(&grid, &chart_for("Day", "Open")).unwrap_err();
        assert!(err.to_string().contains("Open"));
        assert!(plan_chart(&grid, &chart_for("", "Close")).is_err());
    }
}
