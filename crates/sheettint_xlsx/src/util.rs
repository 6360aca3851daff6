//! Stateless helpers: sheet naming, Excel index casts and color mapping.

use std::collections::BTreeSet;

use rust_xlsxwriter::{ColNum, Color as XlsxColor, RowNum};
use sheettint_core::{CellPosition, Color, SheetGrid};

use crate::conf::{
    C_SHEET_NAME_FALLBACK, C_SHEET_NAME_RESERVED, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{Result, XlsxHighlightError};

/// Replace illegal characters, trim, and truncate to the Excel limit.
///
/// Edge apostrophes are stripped and the reserved name `History` gets a
/// trailing `_`, since Excel rejects both.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    let c_name: String = trim_sheet_name_edges(&c_name)
        .chars()
        .take(N_LEN_EXCEL_SHEET_NAME_MAX)
        .collect();
    let c_name = trim_sheet_name_edges(&c_name);
    if c_name.is_empty() {
        return C_SHEET_NAME_FALLBACK.to_string();
    }
    if c_name.eq_ignore_ascii_case(C_SHEET_NAME_RESERVED) {
        return format!("{c_name}_");
    }

    c_name.to_string()
}

fn trim_sheet_name_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\'')
}

/// First of `name`, `name__2`, `name__3`, ... not yet in `set_names_existing`.
///
/// Excel compares sheet names case-insensitively, so the set holds lowercase
/// names. The caller reserves the result once the sheet is actually added.
pub fn derive_unique_sheet_name(set_names_existing: &BTreeSet<String>, name: &str) -> String {
    if !set_names_existing.contains(&name.to_lowercase()) {
        return name.to_string();
    }

    let base_name: String = name
        .chars()
        .take(N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(3).max(1))
        .collect();

    let mut n_idx = 2usize;
    loop {
        let candidate: String = format!("{base_name}__{n_idx}")
            .chars()
            .take(N_LEN_EXCEL_SHEET_NAME_MAX)
            .collect();
        if !set_names_existing.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        n_idx += 1;
    }
}

/// Zero-based Excel row of a one-indexed position.
pub(crate) fn cast_row_num(position: CellPosition) -> Result<RowNum> {
    usize::try_from(position.row - 1)
        .ok()
        .filter(|n| *n < N_NROWS_EXCEL_MAX)
        .and_then(|n| RowNum::try_from(n).ok())
        .ok_or_else(|| XlsxHighlightError::Limit(format!("row index overflow: {}", position.row)))
}

/// Zero-based Excel column of a one-indexed position.
pub(crate) fn cast_col_num(position: CellPosition) -> Result<ColNum> {
    usize::try_from(position.column - 1)
        .ok()
        .filter(|n| *n < N_NCOLS_EXCEL_MAX)
        .and_then(|n| ColNum::try_from(n).ok())
        .ok_or_else(|| {
            XlsxHighlightError::Limit(format!("column index overflow: {}", position.column))
        })
}

/// Fail unless every cell of `grid` fits into one worksheet.
pub(crate) fn validate_grid_fits_excel(grid: &SheetGrid) -> Result<()> {
    cast_row_num(grid.origin())?;
    cast_col_num(grid.origin())?;
    cast_row_num(grid.end())?;
    cast_col_num(grid.end())?;
    Ok(())
}

/// Opaque RGB fill color (alpha composited over white).
pub(crate) fn derive_xlsx_color(color: &Color) -> XlsxColor {
    XlsxColor::RGB(color.to_rgb_hex_u32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  [] ", ""), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_sanitize_sheet_name_strips_edge_apostrophes_and_reserved_name() {
        assert_eq!(sanitize_sheet_name("'Data'", "_"), "Data");
        assert_eq!(sanitize_sheet_name(" ' O'Neil ' ", "_"), "O'Neil");
        assert_eq!(sanitize_sheet_name("''", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name("History", "_"), "History_");
        assert_eq!(sanitize_sheet_name("HISTORY", "_"), "HISTORY_");

        let c_long = format!("{}'tail", "y".repeat(30));
        assert_eq!(sanitize_sheet_name(&c_long, "_"), "y".repeat(30));
    }

    #[test]
    fn test_unique_sheet_name_suffixes_case_insensitive_clashes() {
        let mut set_names = BTreeSet::new();
        let mut reserve = |name: &str| {
            let unique = derive_unique_sheet_name(&set_names, name);
            set_names.insert(unique.to_lowercase());
            unique
        };
        assert_eq!(reserve("Data"), "Data");
        assert_eq!(reserve("data"), "data__2");
        assert_eq!(reserve("Data"), "Data__3");

        let long = "y".repeat(31);
        assert_eq!(reserve(&long), long);
        let renamed = reserve(&long);
        assert_eq!(renamed.chars().count(), 31);
        assert!(renamed.ends_with("__2"));
    }

    #[test]
    fn test_unique_sheet_name_does_not_reserve() {
        let set_names = BTreeSet::from(["data".to_string()]);
        assert_eq!(derive_unique_sheet_name(&set_names, "Other"), "Other");
        assert_eq!(derive_unique_sheet_name(&set_names, "Other"), "Other");
        assert_eq!(derive_unique_sheet_name(&set_names, "DATA"), "DATA__2");
    }

    #[test]
    fn test_cast_limits() {
        assert_eq!(cast_row_num(CellPosition::new(1, 1)).unwrap(), 0);
        assert_eq!(cast_col_num(CellPosition::new(1, 16_384)).unwrap(), 16_383);
        assert!(cast_col_num(CellPosition::new(1, 16_385)).is_err());
        assert!(cast_row_num(CellPosition::new(1_048_577, 1)).is_err());
        assert!(cast_row_num(CellPosition::new(0, 1)).is_err());
    }

    #[test]
    fn test_xlsx_color_is_opaque_rgb() {
        assert_eq!(
            derive_xlsx_color(&Color::rgb(1.0, 0.5, 0.5)),
            XlsxColor::RGB(0xFF8080)
        );
    }
}
