//! Polars DataFrame ingestion into a [`SheetGrid`].

use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use sheettint_core::grid::derive_cell_value_from_text;
use sheettint_core::{CellPosition, EnumCellValue, SheetGrid, SpecGridCell};

use crate::spec::{Result, XlsxHighlightError};

/// Read a Polars IPC payload.
pub fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame> {
    IpcReader::new(Cursor::new(v_ipc_df))
        .finish()
        .map_err(|err| {
            XlsxHighlightError::Frame(format!("Failed to read IPC DataFrame bytes: {err}"))
        })
}

/// Build a grid whose first row holds the column names of `df`.
///
/// Numeric values are kept as numbers, strings go through the same parsing
/// as table text, and nulls become blank cells.
pub fn derive_sheet_grid_from_dataframe(
    df: &DataFrame,
    origin: CellPosition,
) -> Result<SheetGrid> {
    let l_header: Vec<SpecGridCell> = df
        .get_column_names_str()
        .into_iter()
        .map(|name| SpecGridCell::new(EnumCellValue::String(name.to_string())))
        .collect();

    let l_cols = df.get_columns();
    let mut l_rows = Vec::with_capacity(df.height() + 1);
    l_rows.push(l_header);
    for n_idx_row in 0..df.height() {
        let mut l_row = Vec::with_capacity(l_cols.len());
        for col in l_cols {
            let value = col.get(n_idx_row).map_err(|err| {
                XlsxHighlightError::Frame(format!("Failed to access cell value: {err}"))
            })?;
            l_row.push(SpecGridCell::new(derive_cell_value_from_any_value(value)));
        }
        l_rows.push(l_row);
    }

    Ok(SheetGrid::new(origin, l_rows)?)
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => derive_cell_value_from_text(val),
        AnyValue::StringOwned(val) => derive_cell_value_from_text(val.as_str()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int128(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) if val.is_finite() => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) if val.is_finite() => EnumCellValue::Number(val),
        AnyValue::Float32(_) | AnyValue::Float64(_) => EnumCellValue::None,
        _ => EnumCellValue::String(value.to_string()),
    }
}
