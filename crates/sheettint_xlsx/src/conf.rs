//! XLSX constants and default preset factories.

use sheettint_core::CellPosition;

use crate::spec::SpecXlsxWriteOptions;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Fallback name for sheets whose name sanitizes to nothing.
pub const C_SHEET_NAME_FALLBACK: &str = "Sheet";
/// Sheet name Excel reserves for itself (compared case-insensitively).
pub const C_SHEET_NAME_RESERVED: &str = "History";

/// Build default write options: tables anchored at `A1`, bold header row.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions {
        origin: CellPosition::origin(),
        if_bold_header: true,
        percentile: Default::default(),
    }
}
