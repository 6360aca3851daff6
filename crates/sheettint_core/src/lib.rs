//! `sheettint_core` v1:
//! Rust-side value-to-color highlight kernel.
//!
//! Module layout:
//! - `conf`      : constants and default presets
//! - `spec`      : models/options/errors
//! - `util`      : pure numeric helpers (normalize, lerp)
//! - `coord`     : A1 coordinate codec
//! - `grid`      : in-memory sheet grid and table ingestion
//! - `bucket`    : percentile band planning
//! - `planner`   : per-cell highlight planning
//! - `highlight` : column-level percentile highlight pipeline
//! - `chart`     : chart source planning
pub mod bucket;
pub mod chart;
pub mod conf;
pub mod coord;
pub mod grid;
pub mod highlight;
pub mod planner;
pub mod spec;
pub mod util;

pub use bucket::derive_percentile_bands;
pub use chart::plan_chart;
pub use conf::{
    N_ALPHABET_LEN, N_COLUMN_INDEX_MAX, TUP_PERCENTILE_MARKS, derive_default_chart,
    derive_default_percentile_palette,
};
pub use coord::{column_to_letters, decode, encode, encode_range, letters_to_column};
pub use grid::{GridSource, SheetGrid};
pub use highlight::{
    apply_percentile_columns, plan_percentile_column, plan_percentile_columns,
};
pub use planner::{ColorGrid, plan_gradient_highlight, plan_highlight};
pub use spec::{
    Boundary, CellPosition, Color, EnumCellValue, Result, SheetTintError, SpecChart,
    SpecChartPlan, SpecGridCell, SpecPercentileBand, SpecPercentileBands, SpecPercentileOptions,
    SpecPercentilePalette,
};
pub use util::{is_within_unit_window, lerp_color, normalize, normalize_boundary};
