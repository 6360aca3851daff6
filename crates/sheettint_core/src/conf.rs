//! Highlight constants and default preset factories.

use crate::spec::{Color, SpecChart, SpecPercentilePalette};

/// Largest encodable column index (column `ZZZ`).
pub const N_COLUMN_INDEX_MAX: i64 = 18_278;
/// Number of symbols in the column alphabet (`A`..=`Z`).
pub const N_ALPHABET_LEN: i64 = 26;
/// Percentile marks delimiting the five bands of each sign partition.
pub const TUP_PERCENTILE_MARKS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Strong color for positive values (light red).
pub const COLOR_PERCENTILE_POSITIVE: Color = Color::rgba(1.0, 0.5, 0.5, 1.0);
/// Neutral color the bands fade into.
pub const COLOR_PERCENTILE_NEUTRAL: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
/// Strong color for negative values (light green).
pub const COLOR_PERCENTILE_NEGATIVE: Color = Color::rgba(0.5, 1.0, 0.5, 1.0);

/// Default chart font family.
pub const C_CHART_FONT_NAME: &str = "Roboto";

/// Build the default red/white/green percentile palette.
pub fn derive_default_percentile_palette() -> SpecPercentilePalette {
    SpecPercentilePalette {
        positive: COLOR_PERCENTILE_POSITIVE,
        neutral: COLOR_PERCENTILE_NEUTRAL,
        negative: COLOR_PERCENTILE_NEGATIVE,
    }
}

/// Build the default chart preset (line chart, 600x380 px, 900/20 px offset).
pub fn derive_default_chart() -> SpecChart {
    SpecChart {
        title: "title".to_string(),
        offset_x: 900,
        offset_y: 20,
        width: 600,
        height: 380,
        x_axis_title: String::new(),
        y_axis_title: String::new(),
        label_column: String::new(),
        data_column: String::new(),
    }
}
