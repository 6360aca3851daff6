//! A1 coordinate codec: `(row, column)` <-> `"C7"`.
//!
//! Columns use bijective base-26 (`A`..=`Z`, no zero digit): 26 is `Z`,
//! 27 is `AA`, 52 is `AZ`, 53 is `BA`.

use std::str::FromStr;

use crate::conf::{N_ALPHABET_LEN, N_COLUMN_INDEX_MAX};
use crate::spec::{CellPosition, Result, SheetTintError};

const TUP_COLUMN_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

////////////////////////////////////////////////////////////////////////////////
// #region ColumnLetters

/// Convert a one-indexed column to letters (`3` -> `C`, `731` -> `ABC`).
pub fn column_to_letters(column: i64) -> Result<String> {
    if column <= 0 {
        return Err(SheetTintError::invalid(format!(
            "Column index must be >= 1, got {column}."
        )));
    }
    if column > N_COLUMN_INDEX_MAX {
        return Err(SheetTintError::invalid(format!(
            "Column index cannot be greater than {N_COLUMN_INDEX_MAX} (column ZZZ), got {column}."
        )));
    }

    let mut c_letters = String::with_capacity(3);
    push_column_letters(column, &mut c_letters);
    Ok(c_letters)
}

fn push_column_letters(column: i64, buf: &mut String) {
    if column > N_ALPHABET_LEN {
        push_column_letters((column - 1) / N_ALPHABET_LEN, buf);
        push_column_letters(column % N_ALPHABET_LEN, buf);
        return;
    }
    // A trailing remainder of 0 stands for `Z`.
    let n_symbol = if column == 0 { N_ALPHABET_LEN } else { column };
    buf.push(TUP_COLUMN_ALPHABET[(n_symbol - 1) as usize] as char);
}

/// Convert column letters back to a one-indexed column (`AC` -> `29`).
pub fn letters_to_column(letters: &str) -> Result<i64> {
    if letters.is_empty() {
        return Err(SheetTintError::invalid("Column letters must not be empty."));
    }

    let mut n_column: i64 = 0;
    let mut n_weight: i64 = 1;
    for byte in letters.bytes().rev() {
        if !byte.is_ascii_uppercase() {
            return Err(SheetTintError::invalid(format!(
                "Invalid character in column, expected A-Z but got [{}].",
                char::from(byte)
            )));
        }
        let n_symbol = i64::from(byte - b'A') + 1;
        n_column = n_symbol
            .checked_mul(n_weight)
            .and_then(|n| n.checked_add(n_column))
            .ok_or_else(|| SheetTintError::invalid(format!("Column {letters:?} is too wide.")))?;
        n_weight = n_weight.saturating_mul(N_ALPHABET_LEN);
    }

    Ok(n_column)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Labels

/// Encode `(row, column)` as an A1 label, e.g. `encode(1, 29) == "AC1"`.
pub fn encode(row: i64, column: i64) -> Result<String> {
    if row <= 0 {
        return Err(SheetTintError::invalid(format!(
            "Row index must be >= 1, got {row}."
        )));
    }
    let c_letters = column_to_letters(column)?;
    Ok(format!("{c_letters}{row}"))
}

/// Decode an A1 label into a position.
///
/// The label is split at its first digit; letters before the split are the
/// column and the remainder must be a positive decimal row.
pub fn decode(label: &str) -> Result<CellPosition> {
    let n_split = label
        .bytes()
        .position(|byte| byte.is_ascii_digit())
        .unwrap_or(label.len());
    let (c_letters, c_digits) = label.split_at(n_split);

    let n_column = letters_to_column(c_letters)
        .map_err(|err| SheetTintError::invalid(format!("Label {label:?}: {}", detail(&err))))?;

    if c_digits.is_empty() || !c_digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(SheetTintError::invalid(format!(
            "Label {label:?}: row segment {c_digits:?} is not a positive integer."
        )));
    }
    let n_row = c_digits
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            SheetTintError::invalid(format!(
                "Label {label:?}: row segment {c_digits:?} is not a positive integer."
            ))
        })?;

    Ok(CellPosition::new(n_row, n_column))
}

/// Encode an inclusive rectangle as `"A1:B3"`.
pub fn encode_range(start: &CellPosition, end: &CellPosition) -> Result<String> {
    Ok(format!("{}:{}", start.to_a1()?, end.to_a1()?))
}

fn detail(err: &SheetTintError) -> &str {
    match err {
        SheetTintError::InvalidArgument(msg) => msg,
    }
}

impl CellPosition {
    /// Encode as an A1 label.
    pub fn to_a1(&self) -> Result<String> {
        encode(self.row, self.column)
    }

    /// Decode from an A1 label.
    pub fn from_a1(label: &str) -> Result<Self> {
        decode(label)
    }
}

impl FromStr for CellPosition {
    type Err = SheetTintError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
