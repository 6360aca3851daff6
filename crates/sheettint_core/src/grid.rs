//! In-memory sheet grid, the read side of highlight planning.

use crate::planner::ColorGrid;
use crate::spec::{CellPosition, Color, EnumCellValue, Result, SheetTintError, SpecGridCell};

/// Read access to existing cell values and backgrounds.
///
/// Positions outside the source report no value and a white background.
pub trait GridSource {
    /// Numeric value at `position`, if the cell holds a number.
    fn value_at(&self, position: CellPosition) -> Option<f64>;
    /// Current background color at `position`.
    fn background_at(&self, position: CellPosition) -> Color;
}

/// Rectangular block of cells anchored at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    origin: CellPosition,
    width: usize,
    rows: Vec<Vec<SpecGridCell>>,
}

impl SheetGrid {
    /// Build from cell rows; ragged rows are padded with blank cells.
    pub fn new(origin: CellPosition, mut rows: Vec<Vec<SpecGridCell>>) -> Result<Self> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(SheetTintError::invalid("Attempting to use an empty table."));
        }
        origin.to_a1()?;

        for row in &mut rows {
            row.resize_with(width, SpecGridCell::default);
        }
        let grid = Self {
            origin,
            width,
            rows,
        };
        grid.end().to_a1()?;
        Ok(grid)
    }

    /// Build from text rows (first row is the header).
    ///
    /// Trimmed finite decimals become numbers, blank text becomes an empty
    /// cell, everything else stays text. Every background starts white.
    pub fn from_table<S: AsRef<str>>(table: &[Vec<S>], origin: CellPosition) -> Result<Self> {
        if table.first().is_none_or(|row| row.is_empty()) {
            return Err(SheetTintError::invalid(
                "Attempting to insert empty table.",
            ));
        }

        let rows = table
            .iter()
            .map(|row| {
                row.iter()
                    .map(|text| SpecGridCell::new(derive_cell_value_from_text(text.as_ref())))
                    .collect()
            })
            .collect();
        Self::new(origin, rows)
    }

    /// Top-left position.
    pub fn origin(&self) -> CellPosition {
        self.origin
    }

    /// Bottom-right position.
    pub fn end(&self) -> CellPosition {
        self.origin
            .offset(self.height() as i64 - 1, self.width as i64 - 1)
    }

    /// Number of rows, header included.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row-major cells.
    pub fn rows(&self) -> &[Vec<SpecGridCell>] {
        &self.rows
    }

    /// Occupied range, e.g. `"A1:C4"`.
    pub fn range_label(&self) -> Result<String> {
        crate::coord::encode_range(&self.origin, &self.end())
    }

    /// Cell at an absolute position.
    pub fn cell(&self, position: CellPosition) -> Option<&SpecGridCell> {
        let (n_row, n_col) = self.derive_local_index(position)?;
        self.rows.get(n_row).and_then(|row| row.get(n_col))
    }

    /// Header texts (first row).
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|cell| cell.value.to_text()).collect())
            .unwrap_or_default()
    }

    /// Zero-based offset of the first header cell equal to `name`.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.rows
            .first()?
            .iter()
            .position(|cell| cell.value.to_text() == name)
    }

    /// Write planned colors back as the new backgrounds.
    ///
    /// Fails without writing anything when `colors` reaches outside the grid.
    pub fn apply(&mut self, colors: &ColorGrid) -> Result<()> {
        if colors.is_empty() {
            return Ok(());
        }
        if self.derive_local_index(colors.start()).is_none()
            || self.derive_local_index(colors.end()).is_none()
        {
            return Err(SheetTintError::invalid(format!(
                "Color range {} is outside grid {}.",
                colors.range_label()?,
                self.range_label()?
            )));
        }

        for (position, color) in colors.iter() {
            if let Some((n_row, n_col)) = self.derive_local_index(position) {
                self.rows[n_row][n_col].background = color;
            }
        }
        Ok(())
    }

    fn derive_local_index(&self, position: CellPosition) -> Option<(usize, usize)> {
        let n_row = usize::try_from(position.row - self.origin.row).ok()?;
        let n_col = usize::try_from(position.column - self.origin.column).ok()?;
        if n_row < self.height() && n_col < self.width {
            Some((n_row, n_col))
        } else {
            None
        }
    }
}

impl GridSource for SheetGrid {
    fn value_at(&self, position: CellPosition) -> Option<f64> {
        self.cell(position).and_then(|cell| cell.value.as_number())
    }

    fn background_at(&self, position: CellPosition) -> Color {
        self.cell(position)
            .map_or(Color::WHITE, |cell| cell.background)
    }
}

/// Parse uploaded text into a cell value.
pub fn derive_cell_value_from_text(text: &str) -> EnumCellValue {
    let c_trimmed = text.trim();
    if c_trimmed.is_empty() {
        return EnumCellValue::None;
    }
    match c_trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => EnumCellValue::Number(n),
        _ => EnumCellValue::String(text.to_string()),
    }
}
