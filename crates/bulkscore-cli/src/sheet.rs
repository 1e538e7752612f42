//! Spreadsheet row source.
//!
//! Loads the first worksheet of an `.xlsx` or legacy `.xls` workbook and
//! exposes cells by 1-based `(column, row)` coordinates, the way the sheet
//! is addressed on screen (`B2`, `BQ17`).

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

/// Last row inspected when looking for leading blank rows.
const LEADING_SCAN_LAST_ROW: u32 = 256;

/// First data row; row 1 is the header.
pub(crate) const FIRST_DATA_ROW: u32 = 2;

#[derive(Debug, Error)]
pub(crate) enum SheetError {
    #[error("unsupported file format for {path}: expected .xlsx or .xls")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {path} has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("invalid column '{0}': expected letters such as B or BQ")]
    InvalidColumn(String),

    #[error("cell {column}{row} holds a spreadsheet error: {detail}")]
    ErrorCell {
        column: String,
        row: u32,
        detail: String,
    },
}

/// Converts column letters (`A`, `bq`) to a 1-based column index.
pub(crate) fn column_index(letters: &str) -> Result<u32, SheetError> {
    let invalid = || SheetError::InvalidColumn(letters.to_string());
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    trimmed.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        acc.checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(invalid)
    })
}

/// Renders a 1-based column index back to letters, for messages.
fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// The first worksheet of a workbook.
pub(crate) struct Sheet {
    range: Range<Data>,
}

impl Sheet {
    /// Opens `path` and loads its first worksheet.
    ///
    /// The extension is checked before anything is read, so an unsupported
    /// file fails without side effects.
    pub(crate) fn open(path: &Path) -> Result<Self, SheetError> {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"));
        if !supported {
            return Err(SheetError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SheetError::NoWorksheet {
                path: path.to_path_buf(),
            })?
            .map_err(|source| SheetError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_range(range))
    }

    pub(crate) fn from_range(range: Range<Data>) -> Self {
        Self { range }
    }

    /// Index of the last populated row (1-based), or 0 for an empty sheet.
    pub(crate) fn row_count(&self) -> u32 {
        self.range.end().map_or(0, |(row, _)| row + 1)
    }

    fn raw(&self, column: u32, row: u32) -> Option<&Data> {
        if column == 0 || row == 0 {
            return None;
        }
        self.range.get_value((row - 1, column - 1))
    }

    /// Text of the cell at `(column, row)`.
    ///
    /// Missing cells and empty strings are `None`; numbers, booleans, and
    /// dates are rendered as text.
    pub(crate) fn cell(&self, column: u32, row: u32) -> Result<Option<String>, SheetError> {
        match self.raw(column, row) {
            None | Some(Data::Empty) => Ok(None),
            Some(Data::String(s)) if s.is_empty() => Ok(None),
            Some(Data::Error(e)) => Err(SheetError::ErrorCell {
                column: column_letters(column),
                row,
                detail: e.to_string(),
            }),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn is_blank(&self, column: u32, row: u32) -> bool {
        match self.raw(column, row) {
            None | Some(Data::Empty) => true,
            Some(Data::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// First row worth reading: [`FIRST_DATA_ROW`] plus the number of blank
    /// cells in `reference_column` directly below the header.
    pub(crate) fn leading_skip_offset(&self, reference_column: u32) -> u32 {
        let last = self.row_count().min(LEADING_SCAN_LAST_ROW);
        let blank = (FIRST_DATA_ROW..=last)
            .take_while(|&row| self.is_blank(reference_column, row))
            .count();
        FIRST_DATA_ROW + u32::try_from(blank).unwrap_or(u32::MAX - FIRST_DATA_ROW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a sheet with a header row followed by `rows`, each `(A, B)`.
    fn sheet(rows: &[(&str, &str)]) -> Sheet {
        let height = u32::try_from(rows.len()).unwrap();
        let mut range = Range::new((0, 0), (height, 1));
        range.set_value((0, 0), Data::String("name".to_string()));
        range.set_value((0, 1), Data::String("email".to_string()));
        for (i, (a, b)) in rows.iter().enumerate() {
            let r = u32::try_from(i).unwrap() + 1;
            range.set_value((r, 0), Data::String((*a).to_string()));
            range.set_value((r, 1), Data::String((*b).to_string()));
        }
        Sheet::from_range(range)
    }

    #[test]
    fn column_index_converts_letters() {
        assert_eq!(column_index("A").unwrap(), 1);
        assert_eq!(column_index("b").unwrap(), 2);
        assert_eq!(column_index("Z").unwrap(), 26);
        assert_eq!(column_index("AA").unwrap(), 27);
        assert_eq!(column_index("BQ").unwrap(), 69);
    }

    #[test]
    fn column_index_rejects_non_letters() {
        assert!(matches!(column_index(""), Err(SheetError::InvalidColumn(_))));
        assert!(matches!(column_index("B2"), Err(SheetError::InvalidColumn(_))));
        assert!(matches!(column_index("ÄB"), Err(SheetError::InvalidColumn(_))));
    }

    #[test]
    fn column_letters_round_trips_index() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(28), "AB");
        assert_eq!(column_letters(69), "BQ");
    }

    #[test]
    fn row_count_includes_header() {
        let s = sheet(&[("Ann", "a@foo.com"), ("Bob", "b@bar.com")]);
        assert_eq!(s.row_count(), 3);
    }

    #[test]
    fn cell_returns_none_for_empty_and_out_of_range() {
        let s = sheet(&[("Ann", "")]);
        assert_eq!(s.cell(2, 2).unwrap(), None);
        assert_eq!(s.cell(2, 40).unwrap(), None);
        assert_eq!(s.cell(9, 2).unwrap(), None);
    }

    #[test]
    fn cell_renders_numbers_as_text() {
        let mut range = Range::new((0, 0), (1, 0));
        range.set_value((1, 0), Data::Int(42));
        let s = Sheet::from_range(range);
        assert_eq!(s.cell(1, 2).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn error_cells_are_reported() {
        let mut range = Range::new((0, 0), (1, 0));
        range.set_value((1, 0), Data::Error(calamine::CellErrorType::NA));
        let s = Sheet::from_range(range);
        assert!(matches!(
            s.cell(1, 2),
            Err(SheetError::ErrorCell { ref column, row: 2, .. }) if column == "A"
        ));
    }

    #[test]
    fn leading_skip_offset_starts_at_first_data_row() {
        let s = sheet(&[("Ann", "a@foo.com")]);
        assert_eq!(s.leading_skip_offset(1), 2);
    }

    #[test]
    fn leading_skip_offset_counts_blank_reference_cells() {
        let s = sheet(&[("", ""), ("", ""), ("Cy", "c@baz.com"), ("", "d@qux.com")]);
        assert_eq!(s.leading_skip_offset(1), 4);
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        let err = Sheet::open(Path::new("contacts.csv"))
            .err()
            .expect("csv input should be rejected");
        assert!(matches!(err, SheetError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_workbook_is_an_open_error() {
        let err = Sheet::open(Path::new("does-not-exist.xlsx"))
            .err()
            .expect("missing file should fail");
        assert!(matches!(err, SheetError::Open { .. }));
    }
}
