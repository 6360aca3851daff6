//! `sheettint_xlsx` v1:
//! Rust-side XLSX apply kernel for planned highlights and charts.
//!
//! Module layout:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : options/reports/errors
//! - `util`   : pure helper functions
//! - `frame`  : Polars DataFrame ingestion
//! - `writer` : stateful workbook writer
pub mod conf;
pub mod frame;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_write_options,
};
pub use frame::{derive_dataframe_from_ipc_bytes, derive_sheet_grid_from_dataframe};
pub use spec::{
    SpecXlsxSheetHighlightOptions, SpecXlsxSheetReport, SpecXlsxWriteOptions,
    XlsxHighlightError,
};
pub use util::{derive_unique_sheet_name, sanitize_sheet_name};
pub use writer::XlsxHighlightWriter;
