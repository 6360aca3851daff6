//! Shared highlight models, options and errors.

////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Top-level failure for codec, planning and ingestion calls.
///
/// Every failure aborts the enclosing call; no partial grid is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetTintError {
    /// Malformed label, out-of-range index, degenerate gradient interval,
    /// empty table, unknown column or non-numeric highlight value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SheetTintError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SheetTintError>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Coordinates

/// One-indexed `(row, column)` pair; `(1, 1)` is `A1`.
///
/// Indices may become non-positive through [`CellPosition::offset`];
/// validity is checked only when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    /// One-indexed row.
    pub row: i64,
    /// One-indexed column.
    pub column: i64,
}

impl CellPosition {
    /// Create a position from one-indexed row and column.
    #[inline]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Top-left cell `A1`.
    #[inline]
    pub const fn origin() -> Self {
        Self { row: 1, column: 1 }
    }

    /// Translate by `(row_delta, column_delta)`.
    #[inline]
    pub const fn offset(&self, row_delta: i64, column_delta: i64) -> Self {
        Self {
            row: self.row + row_delta,
            column: self.column + column_delta,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColorsAndBoundaries

/// RGBA color with channels nominally in `[0, 1]`.
///
/// Channels are not clamped; out-of-range values pass through interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub red: f64,
    /// Green channel.
    pub green: f64,
    /// Blue channel.
    pub blue: f64,
    /// Alpha channel.
    pub alpha: f64,
}

impl Color {
    /// Opaque white, the background of a fresh sheet.
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a color from all four channels.
    #[inline]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Pack into `0xRRGGBB`, compositing over white by `alpha`.
    ///
    /// Channels are clamped to `[0, 1]` only here, at the output edge.
    pub fn to_rgb_hex_u32(&self) -> u32 {
        let n_alpha = if self.alpha.is_finite() {
            self.alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let to_byte = |channel: f64| -> u32 {
            let composited = channel * n_alpha + (1.0 - n_alpha);
            if !composited.is_finite() {
                return 0;
            }
            (composited.clamp(0.0, 1.0) * 255.0).round() as u32
        };
        (to_byte(self.red) << 16) | (to_byte(self.green) << 8) | to_byte(self.blue)
    }

    /// Format as `#RRGGBB` (see [`Color::to_rgb_hex_u32`]).
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:06X}", self.to_rgb_hex_u32())
    }
}

/// One edge of a normalization interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Edge value.
    pub value: f64,
    /// Lower edge: floor the fraction at 0. Upper edge: ceil it at 1.
    pub clamp: bool,
}

impl Boundary {
    /// Create a boundary.
    #[inline]
    pub const fn new(value: f64, clamp: bool) -> Self {
        Self { value, clamp }
    }

    /// Create an unclamped boundary.
    #[inline]
    pub const fn open(value: f64) -> Self {
        Self::new(value, false)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridCells

/// Normalized cell content.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Numeric payload, if any.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Display text used for header matching.
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// One grid cell: content plus current background color.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecGridCell {
    /// Cell content.
    pub value: EnumCellValue,
    /// Current background color.
    pub background: Color,
}

impl Default for SpecGridCell {
    fn default() -> Self {
        Self {
            value: EnumCellValue::None,
            background: Color::WHITE,
        }
    }
}

impl SpecGridCell {
    /// Create a cell with a white background.
    pub fn new(value: EnumCellValue) -> Self {
        Self {
            value,
            background: Color::WHITE,
        }
    }

    /// Replace the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Percentile

/// Strong/neutral color triple used by percentile highlighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecPercentilePalette {
    /// Strong color for the most positive band.
    pub positive: Color,
    /// Color the bands fade into near zero.
    pub neutral: Color,
    /// Strong color for the most negative band.
    pub negative: Color,
}

impl Default for SpecPercentilePalette {
    fn default() -> Self {
        crate::conf::derive_default_percentile_palette()
    }
}

/// One percentile band: a slice of a sorted sign partition and its color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecPercentileBand {
    /// Band index; 0 is anchored at the extreme-magnitude value.
    pub index: usize,
    /// Boundary at the lower percentile mark.
    pub lower: Boundary,
    /// Boundary at the upper percentile mark.
    pub upper: Boundary,
    /// Band color.
    pub color: Color,
}

impl SpecPercentileBand {
    /// Whether both edges share one value (no valid normalization window).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lower.value == self.upper.value
    }
}

/// Bands for both sign partitions of one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecPercentileBands {
    /// Bands over strictly negative values.
    pub negative: Vec<SpecPercentileBand>,
    /// Bands over strictly positive values.
    pub positive: Vec<SpecPercentileBand>,
}

impl SpecPercentileBands {
    /// Bands in application order: negative first, then positive.
    pub fn iter_passes(&self) -> impl Iterator<Item = &SpecPercentileBand> {
        self.negative.iter().chain(self.positive.iter())
    }

    /// Total number of bands.
    pub fn len(&self) -> usize {
        self.negative.len() + self.positive.len()
    }

    /// Whether both partitions were empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options for multi-column percentile planning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecPercentileOptions {
    /// Maximum worker threads for cross-column planning.
    pub num_workers_max: Option<usize>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Chart

/// Line chart placed over the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecChart {
    /// Chart title.
    pub title: String,
    /// Horizontal offset in pixels from the top-left cell.
    pub offset_x: u32,
    /// Vertical offset in pixels from the top-left cell.
    pub offset_y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Category axis title.
    pub x_axis_title: String,
    /// Value axis title.
    pub y_axis_title: String,
    /// Header text of the category column.
    pub label_column: String,
    /// Header text of the value column.
    pub data_column: String,
}

impl Default for SpecChart {
    fn default() -> Self {
        crate::conf::derive_default_chart()
    }
}

/// Resolved chart sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecChartPlan {
    /// Source chart settings.
    pub chart: SpecChart,
    /// Category source range, header row included.
    pub label_range: (CellPosition, CellPosition),
    /// Value source range, header row included.
    pub data_range: (CellPosition, CellPosition),
    /// Number of header rows at the top of each range.
    pub header_count: usize,
    /// `(min, max)` of the numeric values; `None` when the column has none.
    pub view_window: Option<(f64, f64)>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
