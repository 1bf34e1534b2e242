//! # Beam Data Loading
//!
//! Reads the beam results (position, shear force, bending moment) from a
//! spreadsheet into an ordered, read-only row sequence.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! calamine, `.csv` files with the csv crate. In both cases the first row
//! holds the headers and the three data columns are found by header text.
//!
//! Rows are kept in file order. Ordering by position is assumed, not checked.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamnote_core::config::ColumnNames;
//! use beamnote_core::data::load_rows;
//! use std::path::Path;
//!
//! let data = load_rows(Path::new("beam_data.xlsx"), &ColumnNames::default(), None)?;
//! println!("{} rows", data.len());
//! # Ok::<(), beamnote_core::errors::NoteError>(())
//! ```

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ColumnNames;
use crate::errors::{NoteError, NoteResult};

/// One sampled point along the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Distance along the span (m)
    pub position: f64,
    /// Shear force (kN)
    pub shear: f64,
    /// Bending moment (kNm)
    pub moment: f64,
}

impl Row {
    pub fn new(position: f64, shear: f64, moment: f64) -> Self {
        Row { position, shear, moment }
    }

    /// Value of the given field at this point
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Shear => self.shear,
            Field::Moment => self.moment,
        }
    }
}

/// Numeric field plotted against position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Shear,
    Moment,
}

/// Ordered beam results, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeamData {
    rows: Vec<Row>,
}

impl BeamData {
    pub fn new(rows: Vec<Row>) -> Self {
        BeamData { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A raw spreadsheet cell, common to the workbook and CSV readers.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => text.parse().ok(),
            Cell::Empty => None,
        }
    }

    fn raw(&self) -> String {
        match self {
            Cell::Number(value) => value.to_string(),
            Cell::Text(text) => text.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Float(value) => Cell::Number(*value),
            Data::Int(value) => Cell::Number(*value as f64),
            other => Cell::from_text(&other.to_string()),
        }
    }
}

/// Positions of the three data columns within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    position: usize,
    shear: usize,
    moment: usize,
}

impl ColumnIndex {
    fn resolve(header: &[String], columns: &ColumnNames, path: &str) -> NoteResult<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name.trim())
                .ok_or_else(|| NoteError::missing_column(name, path))
        };
        Ok(ColumnIndex {
            position: find(&columns.position)?,
            shear: find(&columns.shear)?,
            moment: find(&columns.moment)?,
        })
    }
}

/// Load the beam rows from a spreadsheet.
///
/// # Arguments
///
/// * `path` - Spreadsheet file; the format is picked from the extension
/// * `columns` - Header text of the position, shear and moment columns
/// * `sheet` - Worksheet name for workbooks (first sheet when `None`)
///
/// # Returns
///
/// * `Ok(BeamData)` - Rows in file order, fully empty rows skipped
/// * `Err(NoteError::MissingColumn)` - A header was not found
/// * `Err(NoteError::InvalidCell)` - A data cell is not a number
/// * `Err(NoteError::UnsupportedFormat)` - Unknown file extension
/// * `Err(NoteError::FileError)` - The file could not be opened or read
pub fn load_rows(path: &Path, columns: &ColumnNames, sheet: Option<&str>) -> NoteResult<BeamData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (header, records) = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet)?,
        "csv" => read_csv(path)?,
        _ => {
            return Err(NoteError::UnsupportedFormat {
                extension,
                path: path.display().to_string(),
            })
        }
    };

    let data = rows_from_records(&header, records, columns, &path.display().to_string())?;
    debug!(path = %path.display(), rows = data.len(), "loaded beam data");
    Ok(data)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> NoteResult<(Vec<String>, Vec<Vec<Cell>>)> {
    let display = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| NoteError::file_error("open workbook", display.clone(), e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| NoteError::file_error("read", display.clone(), "workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| NoteError::file_error(format!("read sheet '{}'", sheet_name), display, e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let records: Vec<Vec<Cell>> = rows.map(|cells| cells.iter().map(Cell::from).collect()).collect();

    Ok((header, records))
}

fn read_csv(path: &Path) -> NoteResult<(Vec<String>, Vec<Vec<Cell>>)> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| NoteError::file_error("open", display.clone(), e.to_string()))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| NoteError::file_error("read header", display.clone(), e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| NoteError::file_error("read record", display.clone(), e.to_string()))?;
        records.push(record.iter().map(Cell::from_text).collect());
    }

    Ok((header, records))
}

fn rows_from_records(
    header: &[String],
    records: Vec<Vec<Cell>>,
    columns: &ColumnNames,
    path: &str,
) -> NoteResult<BeamData> {
    let index = ColumnIndex::resolve(header, columns, path)?;
    let mut rows = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        if record.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        // Spreadsheet row number: 1-based, header on row 1
        let sheet_row = i + 2;
        let number = |col: usize, name: &str| {
            let cell = record.get(col).cloned().unwrap_or(Cell::Empty);
            cell.as_f64().ok_or_else(|| NoteError::InvalidCell {
                path: path.to_string(),
                row: sheet_row,
                column: name.to_string(),
                value: cell.raw(),
            })
        };
        rows.push(Row {
            position: number(index.position, &columns.position)?,
            shear: number(index.shear, &columns.shear)?,
            moment: number(index.moment, &columns.moment)?,
        });
    }

    Ok(BeamData::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from_text(c)).collect()
    }

    #[test]
    fn test_rows_keep_file_order() {
        let records = vec![
            text_row(&["0", "0", "0"]),
            text_row(&["2", "-10", "15"]),
            text_row(&["4", "-10", "35"]),
        ];
        let data = rows_from_records(
            &header(&["X", "Shear force", "Bending Moment"]),
            records,
            &ColumnNames::default(),
            "test.csv",
        )
        .unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.rows()[1], Row::new(2.0, -10.0, 15.0));
        assert_eq!(data.rows()[2].position, 4.0);
    }

    #[test]
    fn test_columns_found_by_header_in_any_order() {
        let records = vec![vec![Cell::Number(35.0), Cell::Text("note".into()), Cell::Number(4.0), Cell::Number(-10.0)]];
        let data = rows_from_records(
            &header(&["Bending Moment", "Comment", " X ", "Shear force"]),
            records,
            &ColumnNames::default(),
            "test.xlsx",
        )
        .unwrap();

        assert_eq!(data.rows(), &[Row::new(4.0, -10.0, 35.0)]);
    }

    #[test]
    fn test_missing_column() {
        let err = rows_from_records(
            &header(&["X", "Shear force"]),
            vec![],
            &ColumnNames::default(),
            "test.csv",
        )
        .unwrap_err();

        assert_eq!(err, NoteError::missing_column("Bending Moment", "test.csv"));
    }

    #[test]
    fn test_non_numeric_cell_reports_sheet_row() {
        let records = vec![text_row(&["0", "0", "0"]), text_row(&["2", "n/a", "15"])];
        let err = rows_from_records(
            &header(&["X", "Shear force", "Bending Moment"]),
            records,
            &ColumnNames::default(),
            "test.csv",
        )
        .unwrap_err();

        assert_eq!(
            err,
            NoteError::InvalidCell {
                path: "test.csv".to_string(),
                row: 3,
                column: "Shear force".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_rows_skipped() {
        let records = vec![
            text_row(&["0", "0", "0"]),
            text_row(&["", " ", ""]),
            text_row(&["6", "0", "50"]),
        ];
        let data = rows_from_records(
            &header(&["X", "Shear force", "Bending Moment"]),
            records,
            &ColumnNames::default(),
            "test.csv",
        )
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.rows()[1].moment, 50.0);
    }

    #[test]
    fn test_short_record_is_invalid_cell() {
        let records = vec![text_row(&["0", "0"])];
        let err = rows_from_records(
            &header(&["X", "Shear force", "Bending Moment"]),
            records,
            &ColumnNames::default(),
            "test.csv",
        )
        .unwrap_err();

        assert_eq!(err.error_code(), "INVALID_CELL");
    }

    #[test]
    fn test_workbook_cells() {
        assert_eq!(Cell::from(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(Cell::from(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(Cell::from(&Data::String(" 1.25 ".to_string())).as_f64(), Some(1.25));
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_rows(Path::new("beam_data.json"), &ColumnNames::default(), None).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_row_field_selection() {
        let row = Row::new(1.0, -5.0, 7.5);
        assert_eq!(row.value(Field::Shear), -5.0);
        assert_eq!(row.value(Field::Moment), 7.5);
    }
}
