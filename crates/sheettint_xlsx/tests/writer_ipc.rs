//! Workbook output from IPC-serialized dataframes.

use std::path::PathBuf;

use polars::prelude::{DataFrame, IpcWriter, NamedFrom, SerWriter, Series};
use sheettint_core::{CellPosition, SpecChart};
use sheettint_xlsx::{
    SpecXlsxSheetHighlightOptions, SpecXlsxWriteOptions, XlsxHighlightError, XlsxHighlightWriter,
};

struct TestFile {
    path: PathBuf,
}

impl TestFile {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "sheettint_xlsx_it_{tag}_{}.xlsx",
            std::process::id()
        ));
        Self { path }
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn ipc_bytes(mut df: DataFrame) -> Vec<u8> {
    let mut v_bytes = Vec::new();
    IpcWriter::new(&mut v_bytes).finish(&mut df).expect("ipc write");
    v_bytes
}

fn sample_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("ticker".into(), &["AAA", "BBB", "CCC", "DDD"]).into(),
        Series::new("change".into(), &[-1.5, 0.25, 3.0, -0.75]).into(),
        Series::new("close".into(), &[101.0, 99.5, 103.25, 100.0]).into(),
    ])
    .expect("frame")
}

#[test]
fn ipc_sheet_with_highlights_and_chart_is_saved() {
    let file = TestFile::new("saved");
    let write_options = SpecXlsxWriteOptions {
        origin: CellPosition::new(2, 2),
        ..SpecXlsxWriteOptions::default()
    };
    let mut writer = XlsxHighlightWriter::new(file.path.clone(), write_options);

    let options = SpecXlsxSheetHighlightOptions {
        highlight_columns: vec!["change".to_string()],
        charts: vec![SpecChart {
            title: "Close".to_string(),
            label_column: "ticker".to_string(),
            data_column: "close".to_string(),
            ..SpecChart::default()
        }],
        ..Default::default()
    };
    let report = writer
        .write_sheet_from_ipc_bytes(&ipc_bytes(sample_frame()), "Market/Daily", &options)
        .expect("write");

    assert_eq!(report.sheet_name, "Market_Daily");
    assert_eq!(report.range, "B2:D6");
    // Both signs have two values, so all four changes are painted.
    assert_eq!(report.n_cells_highlighted, 4);
    assert_eq!(report.n_charts, 1);
    assert_eq!(report.warnings.len(), 1);

    writer.close().expect("close");
    let v_head = std::fs::read(&file.path).expect("read xlsx");
    assert!(v_head.starts_with(b"PK"));
}

#[test]
fn invalid_ipc_payload_is_a_frame_error() {
    let file = TestFile::new("invalid");
    let mut writer = XlsxHighlightWriter::new(file.path.clone(), SpecXlsxWriteOptions::default());
    let err = writer
        .write_sheet_from_ipc_bytes(b"garbage", "Data", &SpecXlsxSheetHighlightOptions::default())
        .unwrap_err();
    assert!(matches!(err, XlsxHighlightError::Frame(_)));
    assert!(writer.report().is_empty());
}
