//! `sheettint_py` v1:
//! Python bridge (`_sheettint_rs`) over `sheettint_core` and `sheettint_xlsx`.
//!
//! Tables arrive as lists of text rows or Polars IPC bytes; core errors map to
//! `ValueError`, workbook I/O failures to `RuntimeError`.
use std::path::PathBuf;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict, PyTuple};
use sheettint_core::{
    Boundary, CellPosition, Color, SheetGrid, SheetTintError, SpecChart, SpecPercentileOptions,
    SpecPercentilePalette, decode, derive_default_chart, derive_default_percentile_palette,
    encode,
};
use sheettint_xlsx::{
    SpecXlsxSheetHighlightOptions, SpecXlsxSheetReport, SpecXlsxWriteOptions, XlsxHighlightError,
    XlsxHighlightWriter as RsXlsxHighlightWriter,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "sheettint.highlight.v1";

type TupColor = (f64, f64, f64, f64);

////////////////////////////////////////////////////////////////////////////////
// #region Functions

/// Encode one-indexed `(row, column)` as an A1 label.
#[pyfunction]
fn encode_position(row: i64, column: i64) -> PyResult<String> {
    encode(row, column).map_err(derive_py_value_error)
}

/// Decode an A1 label into one-indexed `(row, column)`.
#[pyfunction]
fn decode_label(label: &str) -> PyResult<(i64, i64)> {
    let position = decode(label).map_err(derive_py_value_error)?;
    Ok((position.row, position.column))
}

#[pyfunction]
#[pyo3(signature = (lower, upper, value))]
fn normalize_boundary(lower: (f64, bool), upper: (f64, bool), value: f64) -> f64 {
    sheettint_core::normalize_boundary(
        &Boundary::new(lower.0, lower.1),
        &Boundary::new(upper.0, upper.1),
        value,
    )
}

#[pyfunction]
fn lerp_color(color_a: TupColor, color_b: TupColor, alpha: f64) -> TupColor {
    let color = sheettint_core::lerp_color(
        &derive_color_from_tuple(color_a),
        &derive_color_from_tuple(color_b),
        alpha,
    );
    derive_tuple_from_color(&color)
}

/// Percentile bands as `(sign, index, lower, upper, color)` tuples, negative first.
#[pyfunction]
#[pyo3(signature = (values, palette = None))]
fn derive_percentile_bands(
    values: Vec<f64>,
    palette: Option<&Bound<'_, PyAny>>,
) -> PyResult<Vec<(&'static str, usize, f64, f64, TupColor)>> {
    let cfg_palette = parse_spec_percentile_palette(palette)?;
    let bands = sheettint_core::derive_percentile_bands(&values, &cfg_palette);

    let l_negative = bands.negative.iter().map(|band| ("negative", band));
    let l_positive = bands.positive.iter().map(|band| ("positive", band));
    Ok(l_negative
        .chain(l_positive)
        .map(|(sign, band)| {
            (
                sign,
                band.index,
                band.lower.value,
                band.upper.value,
                derive_tuple_from_color(&band.color),
            )
        })
        .collect())
}

/// Planned `(label, "#RRGGBB")` backgrounds of one column, or `None` without data rows.
#[pyfunction]
#[pyo3(signature = (table, column_name, origin = (1, 1), palette = None))]
fn plan_percentile_column(
    table: Vec<Vec<String>>,
    column_name: &str,
    origin: (i64, i64),
    palette: Option<&Bound<'_, PyAny>>,
) -> PyResult<Option<Vec<(String, String)>>> {
    let cfg_palette = parse_spec_percentile_palette(palette)?;
    let grid = SheetGrid::from_table(&table, CellPosition::new(origin.0, origin.1))
        .map_err(derive_py_value_error)?;
    let Some(colors) = sheettint_core::plan_percentile_column(&grid, column_name, &cfg_palette)
        .map_err(derive_py_value_error)?
    else {
        return Ok(None);
    };

    let mut l_cells = Vec::new();
    for (position, color) in colors.iter() {
        l_cells.push((
            position.to_a1().map_err(derive_py_value_error)?,
            color.to_rgb_hex(),
        ));
    }
    Ok(Some(l_cells))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

#[pyclass(name = "XlsxHighlightWriter")]
struct PyXlsxHighlightWriter {
    #[pyo3(get)]
    file_out: String,
    inner: RsXlsxHighlightWriter,
}

#[pymethods]
impl PyXlsxHighlightWriter {
    #[new]
    #[pyo3(signature = (file_out, origin = (1, 1), if_bold_header = true, num_workers_max = None))]
    fn new(
        file_out: String,
        origin: (i64, i64),
        if_bold_header: bool,
        num_workers_max: Option<usize>,
    ) -> Self {
        let cfg_write_options = SpecXlsxWriteOptions {
            origin: CellPosition::new(origin.0, origin.1),
            if_bold_header,
            percentile: SpecPercentileOptions { num_workers_max },
        };
        let inner = RsXlsxHighlightWriter::new(PathBuf::from(&file_out), cfg_write_options);
        Self { file_out, inner }
    }

    fn __enter__(slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf
    }

    #[pyo3(signature = (_exc_type=None, _exc=None, _tb=None))]
    fn __exit__(
        &mut self,
        _exc_type: Option<&Bound<'_, PyAny>>,
        _exc: Option<&Bound<'_, PyAny>>,
        _tb: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        self.close()
    }

    fn close(&mut self) -> PyResult<()> {
        self.inner.close().map_err(derive_py_writer_error)
    }

    fn report(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let mut l_report_obj = Vec::new();
        for report in self.inner.report() {
            l_report_obj.push(create_sheet_report_object(py, &report)?);
        }
        Ok(PyTuple::new(py, l_report_obj)?.into_any().unbind())
    }

    #[pyo3(signature = (table, sheet_name, highlight_columns = None, charts = None, palette = None))]
    fn write_table<'py>(
        mut slf: PyRefMut<'py, Self>,
        table: Vec<Vec<String>>,
        sheet_name: &str,
        highlight_columns: Option<Vec<String>>,
        charts: Option<&Bound<'py, PyAny>>,
        palette: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let cfg_options = parse_sheet_highlight_options(highlight_columns, charts, palette)?;
        slf.inner
            .write_sheet_from_table(&table, sheet_name, &cfg_options)
            .map_err(derive_py_writer_error)?;
        Ok(slf)
    }

    #[pyo3(signature = (v_ipc_df, sheet_name, highlight_columns = None, charts = None, palette = None))]
    fn write_sheet_from_ipc_bytes<'py>(
        mut slf: PyRefMut<'py, Self>,
        v_ipc_df: &[u8],
        sheet_name: &str,
        highlight_columns: Option<Vec<String>>,
        charts: Option<&Bound<'py, PyAny>>,
        palette: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let cfg_options = parse_sheet_highlight_options(highlight_columns, charts, palette)?;
        slf.inner
            .write_sheet_from_ipc_bytes(v_ipc_df, sheet_name, &cfg_options)
            .map_err(derive_py_writer_error)?;
        Ok(slf)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Conversion

fn create_sheet_report_object<'py>(
    py: Python<'py>,
    report: &SpecXlsxSheetReport,
) -> PyResult<Bound<'py, PyAny>> {
    let dict_report = PyDict::new(py);
    dict_report.set_item("sheet_name", report.sheet_name.as_str())?;
    dict_report.set_item("range", report.range.as_str())?;
    dict_report.set_item("n_cells_highlighted", report.n_cells_highlighted)?;
    dict_report.set_item("n_charts", report.n_charts)?;
    dict_report.set_item("warnings", report.warnings.clone())?;
    Ok(dict_report.into_any())
}

fn parse_sheet_highlight_options(
    highlight_columns: Option<Vec<String>>,
    charts: Option<&Bound<'_, PyAny>>,
    palette: Option<&Bound<'_, PyAny>>,
) -> PyResult<SpecXlsxSheetHighlightOptions> {
    let mut l_charts = Vec::new();
    if let Some(charts) = charts
        && !charts.is_none()
    {
        for chart_obj in charts.try_iter()? {
            l_charts.push(parse_spec_chart(&chart_obj?)?);
        }
    }

    Ok(SpecXlsxSheetHighlightOptions {
        highlight_columns: highlight_columns.unwrap_or_default(),
        charts: l_charts,
        palette: parse_spec_percentile_palette(palette)?,
    })
}

fn parse_spec_chart(obj: &Bound<'_, PyAny>) -> PyResult<SpecChart> {
    let mut cfg_chart = derive_default_chart();
    if let Some(v) = extract_optional_field::<String>(obj, "title")? {
        cfg_chart.title = v;
    }
    if let Some(v) = extract_optional_field::<u32>(obj, "offset_x")? {
        cfg_chart.offset_x = v;
    }
    if let Some(v) = extract_optional_field::<u32>(obj, "offset_y")? {
        cfg_chart.offset_y = v;
    }
    if let Some(v) = extract_optional_field::<u32>(obj, "width")? {
        cfg_chart.width = v;
    }
    if let Some(v) = extract_optional_field::<u32>(obj, "height")? {
        cfg_chart.height = v;
    }
    if let Some(v) = extract_optional_field::<String>(obj, "x_axis_title")? {
        cfg_chart.x_axis_title = v;
    }
    if let Some(v) = extract_optional_field::<String>(obj, "y_axis_title")? {
        cfg_chart.y_axis_title = v;
    }
    cfg_chart.label_column = extract_optional_field::<String>(obj, "label_column")?
        .ok_or_else(|| PyValueError::new_err("chart.label_column is required."))?;
    cfg_chart.data_column = extract_optional_field::<String>(obj, "data_column")?
        .ok_or_else(|| PyValueError::new_err("chart.data_column is required."))?;
    Ok(cfg_chart)
}

fn parse_spec_percentile_palette(obj: Option<&Bound<'_, PyAny>>) -> PyResult<SpecPercentilePalette> {
    let mut cfg_palette = derive_default_percentile_palette();
    let Some(obj) = obj else {
        return Ok(cfg_palette);
    };
    if obj.is_none() {
        return Ok(cfg_palette);
    }

    if let Some(v) = extract_optional_field::<TupColor>(obj, "positive")? {
        cfg_palette.positive = derive_color_from_tuple(v);
    }
    if let Some(v) = extract_optional_field::<TupColor>(obj, "neutral")? {
        cfg_palette.neutral = derive_color_from_tuple(v);
    }
    if let Some(v) = extract_optional_field::<TupColor>(obj, "negative")? {
        cfg_palette.negative = derive_color_from_tuple(v);
    }
    Ok(cfg_palette)
}

/// Read `key` from a dict, or attribute `key` from any other object.
fn extract_optional_field<T>(obj: &Bound<'_, PyAny>, key: &str) -> PyResult<Option<T>>
where
    for<'a> T: FromPyObject<'a>,
{
    let val = if let Ok(dict) = obj.downcast::<PyDict>() {
        match dict.get_item(key)? {
            Some(val) => val,
            None => return Ok(None),
        }
    } else {
        if !obj.hasattr(key)? {
            return Ok(None);
        }
        obj.getattr(key)?
    };
    if val.is_none() {
        return Ok(None);
    }
    Ok(Some(val.extract::<T>()?))
}

fn derive_color_from_tuple(value: TupColor) -> Color {
    Color::rgba(value.0, value.1, value.2, value.3)
}

fn derive_tuple_from_color(color: &Color) -> TupColor {
    (color.red, color.green, color.blue, color.alpha)
}

fn derive_py_value_error(err: SheetTintError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn derive_py_writer_error(err: XlsxHighlightError) -> PyErr {
    match err {
        XlsxHighlightError::Core(_) | XlsxHighlightError::Frame(_) | XlsxHighlightError::Limit(_) => {
            PyValueError::new_err(err.to_string())
        }
        XlsxHighlightError::Xlsx(_) | XlsxHighlightError::Closed => {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[pymodule]
fn _sheettint_rs(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(encode_position, module)?)?;
    module.add_function(wrap_pyfunction!(decode_label, module)?)?;
    module.add_function(wrap_pyfunction!(normalize_boundary, module)?)?;
    module.add_function(wrap_pyfunction!(lerp_color, module)?)?;
    module.add_function(wrap_pyfunction!(derive_percentile_bands, module)?)?;
    module.add_function(wrap_pyfunction!(plan_percentile_column, module)?)?;
    module.add_class::<PyXlsxHighlightWriter>()?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    Ok(())
}
