//! Stateful workbook writer: plans highlights and charts for each table,
//! then writes values, backgrounds and charts into one worksheet.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use polars::prelude::DataFrame;
use rust_xlsxwriter::{Chart, ChartFont, ChartType, Format, Workbook, Worksheet};
use sheettint_core::conf::C_CHART_FONT_NAME;
use sheettint_core::{
    Color, EnumCellValue, SheetGrid, SpecChartPlan, plan_chart, plan_percentile_columns,
};
use tracing::{debug, info};

use crate::frame::{derive_dataframe_from_ipc_bytes, derive_sheet_grid_from_dataframe};
use crate::spec::{
    Result, SpecXlsxSheetHighlightOptions, SpecXlsxSheetReport, SpecXlsxWriteOptions,
    XlsxHighlightError,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_unique_sheet_name, derive_xlsx_color,
    sanitize_sheet_name, validate_grid_fits_excel,
};

/// Stateful workbook writer.
pub struct XlsxHighlightWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxSheetReport>,
    if_closed: bool,
}

impl XlsxHighlightWriter {
    /// Create writer bound to output path.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return snapshot of per-sheet reports, in write order.
    pub fn report(&self) -> Vec<SpecXlsxSheetReport> {
        self.l_reports.clone()
    }

    /// Whether [`Self::close`] already succeeded.
    pub fn is_closed(&self) -> bool {
        self.if_closed
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        info!(
            path = %self.path_file_out.display(),
            n_sheets = self.l_reports.len(),
            "workbook saved"
        );
        Ok(())
    }

    /// Write one sheet from IPC-serialized dataframe bytes.
    pub fn write_sheet_from_ipc_bytes(
        &mut self,
        v_ipc_df: &[u8],
        sheet_name: &str,
        options: &SpecXlsxSheetHighlightOptions,
    ) -> Result<SpecXlsxSheetReport> {
        self.validate_open()?;
        let df = derive_dataframe_from_ipc_bytes(v_ipc_df)?;
        self.write_sheet_from_dataframe(&df, sheet_name, options)
    }

    /// Write one sheet from an in-memory dataframe; column names form the header row.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df: &DataFrame,
        sheet_name: &str,
        options: &SpecXlsxSheetHighlightOptions,
    ) -> Result<SpecXlsxSheetReport> {
        self.validate_open()?;
        let grid = derive_sheet_grid_from_dataframe(df, self.write_options.origin)?;
        self.write_sheet(&grid, sheet_name, options)
    }

    /// Write one sheet from text rows; the first row is the header.
    pub fn write_sheet_from_table<S: AsRef<str>>(
        &mut self,
        table: &[Vec<S>],
        sheet_name: &str,
        options: &SpecXlsxSheetHighlightOptions,
    ) -> Result<SpecXlsxSheetReport> {
        self.validate_open()?;
        let grid = SheetGrid::from_table(table, self.write_options.origin)?;
        self.write_sheet(&grid, sheet_name, options)
    }

    /// Plan highlights and charts for `grid`, then add it as a new sheet.
    ///
    /// The worksheet is built detached and joins the workbook only after every
    /// cell and chart is written, so any failure leaves the workbook untouched.
    pub fn write_sheet(
        &mut self,
        grid: &SheetGrid,
        sheet_name: &str,
        options: &SpecXlsxSheetHighlightOptions,
    ) -> Result<SpecXlsxSheetReport> {
        self.validate_open()?;
        validate_grid_fits_excel(grid)?;

        let l_color_grids = plan_percentile_columns(
            grid,
            &options.highlight_columns,
            &options.palette,
            &self.write_options.percentile,
        )?;
        let mut grid_painted = grid.clone();
        for colors in &l_color_grids {
            grid_painted.apply(colors)?;
        }
        let l_chart_plans = options
            .charts
            .iter()
            .map(|chart| plan_chart(grid, chart))
            .collect::<sheettint_core::Result<Vec<_>>>()?;

        let mut report = SpecXlsxSheetReport {
            range: grid.range_label()?,
            ..Default::default()
        };
        let sheet_name_clean = sanitize_sheet_name(sheet_name, "_");
        let sheet_name_unique =
            derive_unique_sheet_name(&self.set_sheet_names_existing, &sheet_name_clean);
        if sheet_name_unique != sheet_name {
            report.warn(format!(
                "Sheet name {sheet_name:?} was written as {sheet_name_unique:?}."
            ));
        }

        let mut worksheet = Worksheet::new();
        worksheet.set_name(&sheet_name_unique)?;
        report.n_cells_highlighted =
            write_cells(&mut worksheet, &grid_painted, self.write_options.if_bold_header)?;

        for plan in &l_chart_plans {
            if plan.data_range.0 == plan.data_range.1 {
                report.warn(format!(
                    "Chart {:?} skipped: column {:?} has no data rows.",
                    plan.chart.title, plan.chart.data_column
                ));
                continue;
            }
            let chart = derive_line_chart(plan, &sheet_name_unique)?;
            worksheet.insert_chart_with_offset(
                0,
                0,
                &chart,
                plan.chart.offset_x,
                plan.chart.offset_y,
            )?;
            report.n_charts += 1;
        }

        self.workbook.push_worksheet(worksheet);
        self.set_sheet_names_existing.insert(sheet_name_unique.to_lowercase());
        report.sheet_name = sheet_name_unique;
        info!(
            sheet = report.sheet_name.as_str(),
            range = report.range.as_str(),
            n_highlight_columns = l_color_grids.len(),
            n_cells_highlighted = report.n_cells_highlighted,
            n_charts = report.n_charts,
            "sheet written"
        );
        self.l_reports.push(report.clone());
        Ok(report)
    }

    fn validate_open(&self) -> Result<()> {
        if self.if_closed {
            return Err(XlsxHighlightError::Closed);
        }
        Ok(())
    }
}

/// Write every grid cell with its background; returns the number of non-white cells.
fn write_cells(worksheet: &mut Worksheet, grid: &SheetGrid, if_bold_header: bool) -> Result<usize> {
    let mut dict_formats: BTreeMap<(Option<u32>, bool), Format> = BTreeMap::new();
    let mut n_cells_highlighted = 0usize;

    for (n_idx_row, row) in grid.rows().iter().enumerate() {
        let if_bold = if_bold_header && n_idx_row == 0;
        for (n_idx_col, cell) in row.iter().enumerate() {
            let position = grid.origin().offset(n_idx_row as i64, n_idx_col as i64);
            let n_row = cast_row_num(position)?;
            let n_col = cast_col_num(position)?;

            let fill = (cell.background != Color::WHITE).then_some(cell.background);
            if fill.is_some() {
                n_cells_highlighted += 1;
            }
            if fill.is_none() && !if_bold {
                match &cell.value {
                    EnumCellValue::Number(n) => {
                        worksheet.write_number(n_row, n_col, *n)?;
                    }
                    EnumCellValue::String(text) => {
                        worksheet.write_string(n_row, n_col, text.as_str())?;
                    }
                    EnumCellValue::None => {}
                }
                continue;
            }

            let key = (fill.map(|color| color.to_rgb_hex_u32()), if_bold);
            let format = dict_formats.entry(key).or_insert_with(|| {
                let mut format = Format::new();
                if let Some(color) = fill {
                    format = format.set_background_color(derive_xlsx_color(&color));
                }
                if if_bold {
                    format = format.set_bold();
                }
                format
            });
            match &cell.value {
                EnumCellValue::Number(n) => {
                    worksheet.write_number_with_format(n_row, n_col, *n, format)?;
                }
                EnumCellValue::String(text) => {
                    worksheet.write_string_with_format(n_row, n_col, text.as_str(), format)?;
                }
                EnumCellValue::None => {
                    worksheet.write_blank(n_row, n_col, format)?;
                }
            }
        }
    }

    debug!(n_cells_highlighted, "cells written");
    Ok(n_cells_highlighted)
}

/// Line chart over the planned label and data columns; the header row names the series.
fn derive_line_chart(plan: &SpecChartPlan, sheet_name: &str) -> Result<Chart> {
    let mut font = ChartFont::new();
    font.set_name(C_CHART_FONT_NAME);
    let (label_start, label_end) = plan.label_range;
    let (data_start, data_end) = plan.data_range;
    let n_rows_header = plan.header_count as i64;

    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_name((sheet_name, cast_row_num(data_start)?, cast_col_num(data_start)?))
        .set_categories((
            sheet_name,
            cast_row_num(label_start.offset(n_rows_header, 0))?,
            cast_col_num(label_start)?,
            cast_row_num(label_end)?,
            cast_col_num(label_end)?,
        ))
        .set_values((
            sheet_name,
            cast_row_num(data_start.offset(n_rows_header, 0))?,
            cast_col_num(data_start)?,
            cast_row_num(data_end)?,
            cast_col_num(data_end)?,
        ));

    if !plan.chart.title.is_empty() {
        chart.title().set_name(plan.chart.title.as_str()).set_font(&font);
    }
    chart.x_axis().set_font(&font);
    if !plan.chart.x_axis_title.is_empty() {
        chart
            .x_axis()
            .set_name(plan.chart.x_axis_title.as_str())
            .set_name_font(&font);
    }
    chart.y_axis().set_font(&font);
    if !plan.chart.y_axis_title.is_empty() {
        chart
            .y_axis()
            .set_name(plan.chart.y_axis_title.as_str())
            .set_name_font(&font);
    }
    if let Some((n_min, n_max)) = plan.view_window {
        chart.y_axis().set_min(n_min).set_max(n_max);
    }
    chart.set_width(plan.chart.width).set_height(plan.chart.height);

    Ok(chart)
}
