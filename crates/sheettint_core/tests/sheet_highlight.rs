//! End-to-end highlight flows over an in-memory sheet.

use sheettint_core::{
    Boundary, CellPosition, Color, GridSource, SheetGrid, SheetTintError, SpecChart,
    SpecPercentileOptions, SpecPercentilePalette, apply_percentile_columns, encode_range,
    plan_chart, plan_gradient_highlight, plan_highlight,
};

fn sample_table() -> Vec<Vec<String>> {
    [
        ["Ticker", "Change", "Volume", "Note"],
        ["AAA", "-4.5", "120", "x"],
        ["BBB", "2.25", "80", ""],
        ["CCC", "", "95", "y"],
        ["DDD", "0", "101", ""],
        ["EEE", "7", "60", "z"],
        ["FFF", "-0.5", "130", ""],
    ]
    .iter()
    .map(|row| row.iter().map(|s| s.to_string()).collect())
    .collect()
}

#[test]
fn gradient_from_white_to_red_over_column() {
    let table = vec![vec!["Score"], vec!["1"], vec!["5"], vec!["9"]];
    let mut grid = SheetGrid::from_table(&table, CellPosition::origin()).unwrap();
    let red = Color::rgb(1.0, 0.0, 0.0);

    let colors = plan_gradient_highlight(
        &grid,
        CellPosition::new(2, 1),
        CellPosition::new(4, 1),
        &Boundary::open(1.0),
        &Boundary::open(9.0),
        &Color::WHITE,
        &red,
    )
    .unwrap();
    assert_eq!(colors.n_matched(), 3);
    grid.apply(&colors).unwrap();

    let l_hex: Vec<String> = (2..=4)
        .map(|n_row| grid.background_at(CellPosition::new(n_row, 1)).to_rgb_hex())
        .collect();
    assert_eq!(l_hex, vec!["#FFFFFF", "#FF8080", "#FF0000"]);
    // Header cell is outside the range.
    assert_eq!(grid.background_at(CellPosition::origin()), Color::WHITE);
}

#[test]
fn flat_highlight_skips_text_and_blank_cells() {
    let grid = SheetGrid::from_table(&sample_table(), CellPosition::origin()).unwrap();
    let color = Color::rgb(0.2, 0.4, 0.6);

    let colors = plan_highlight(
        &grid,
        CellPosition::new(1, 1),
        CellPosition::new(7, 4),
        &Boundary::open(0.0),
        &Boundary::open(100.0),
        &color,
    )
    .unwrap();

    // 2.25, 0, 7 from Change and 80, 95, 60 from Volume.
    assert_eq!(colors.n_matched(), 6);
    assert_eq!(colors.get(CellPosition::new(3, 3)), Some(color));
    assert_eq!(colors.get(CellPosition::new(2, 3)), Some(Color::WHITE));
    assert_eq!(colors.get(CellPosition::new(2, 1)), Some(Color::WHITE));
}

#[test]
fn percentile_columns_then_chart_on_offset_sheet() {
    let origin = CellPosition::new(3, 2);
    let mut grid = SheetGrid::from_table(&sample_table(), origin).unwrap();
    assert_eq!(grid.range_label().unwrap(), "B3:E9");

    let palette = SpecPercentilePalette::default();
    let l_colors = apply_percentile_columns(
        &mut grid,
        &["Change", "Volume"],
        &palette,
        &SpecPercentileOptions::default(),
    )
    .unwrap();
    assert_eq!(l_colors.len(), 2);
    assert_eq!(
        encode_range(&l_colors[0].start(), &l_colors[0].end()).unwrap(),
        "C4:C9"
    );

    // Most negative and most positive changes keep the strong colors.
    assert_eq!(grid.background_at(CellPosition::new(4, 3)), palette.negative);
    assert_eq!(grid.background_at(CellPosition::new(8, 3)), palette.positive);
    // Blank and zero cells are untouched.
    assert_eq!(grid.background_at(CellPosition::new(6, 3)), Color::WHITE);
    assert_eq!(grid.background_at(CellPosition::new(7, 3)), Color::WHITE);
    // All volumes are positive; the largest is strong red.
    assert_eq!(grid.background_at(CellPosition::new(9, 4)), palette.positive);

    let chart = SpecChart {
        title: "Volume by ticker".to_string(),
        label_column: "Ticker".to_string(),
        data_column: "Volume".to_string(),
        ..SpecChart::default()
    };
    let plan = plan_chart(&grid, &chart).unwrap();
    assert_eq!(
        encode_range(&plan.label_range.0, &plan.label_range.1).unwrap(),
        "B3:B9"
    );
    assert_eq!(
        encode_range(&plan.data_range.0, &plan.data_range.1).unwrap(),
        "D3:D9"
    );
    assert_eq!(plan.view_window, Some((60.0, 130.0)));
}

#[test]
fn text_in_highlighted_column_fails_without_writes() {
    let mut grid = SheetGrid::from_table(&sample_table(), CellPosition::origin()).unwrap();
    let before = grid.clone();

    let err = apply_percentile_columns(
        &mut grid,
        &["Change", "Note"],
        &SpecPercentilePalette::default(),
        &SpecPercentileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SheetTintError::InvalidArgument(_)));
    assert_eq!(grid, before);
}
