//! XLSX writer options, reports and errors.

use rust_xlsxwriter::XlsxError;
use sheettint_core::{
    CellPosition, SheetTintError, SpecChart, SpecPercentileOptions, SpecPercentilePalette,
};

////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failure of a writer call. No sheet is added when a call fails.
#[derive(Debug, thiserror::Error)]
pub enum XlsxHighlightError {
    /// Planning rejected the input.
    #[error(transparent)]
    Core(#[from] SheetTintError),
    /// Workbook or worksheet operation failed.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// DataFrame could not be read or converted.
    #[error("dataframe error: {0}")]
    Frame(String),
    /// Sheet does not fit into an Excel worksheet.
    #[error("sheet exceeds Excel limits: {0}")]
    Limit(String),
    /// Writer was already closed.
    #[error("Cannot write after close().")]
    Closed,
}

/// Result alias for writer calls.
pub type Result<T> = std::result::Result<T, XlsxHighlightError>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Writer-level options shared by every sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Top-left cell of each written table.
    pub origin: CellPosition,
    /// Render the header row in bold.
    pub if_bold_header: bool,
    /// Cross-column planning options.
    pub percentile: SpecPercentileOptions,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        crate::conf::derive_default_xlsx_write_options()
    }
}

/// Per-sheet call options (aligned with Python `XlsxHighlightWriter.write_table` kwargs).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxSheetHighlightOptions {
    /// Header names of columns to percentile-highlight.
    pub highlight_columns: Vec<String>,
    /// Line charts to add to the sheet.
    pub charts: Vec<SpecChart>,
    /// Band palette.
    pub palette: SpecPercentilePalette,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Per-sheet write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxSheetReport {
    /// Final (sanitized, unique) sheet name.
    pub sheet_name: String,
    /// A1 range covered by the table.
    pub range: String,
    /// Cells whose background differs from white.
    pub n_cells_highlighted: usize,
    /// Charts inserted.
    pub n_charts: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxSheetReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
