//! Tabular input/output.
//!
//! Every pipeline consumes and produces flat tables of strings. CSV files go
//! through the `csv` crate; XLSX/XLS files are read with `calamine` and
//! written with `rust_xlsxwriter`. Cell values are kept as trimmed-nothing
//! raw strings; interpretation (scores, identifiers) happens downstream.

mod error;


pub use error::TableError;

use std::collections::HashMap;
use std::io;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use tracing::debug;

/// Supported tabular file formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    /// Excel workbooks (`.xlsx` for read/write, `.xls` for read only).
    Xlsx,
}

impl FileFormat {
    /// Derives the format from a path's extension.
    ///
    /// Unknown extensions are a configuration error, reported before any row
    /// is processed.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Xlsx),
            _ => Err(TableError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// An in-memory table: a header row plus string-valued data rows.
///
/// Rows are padded or truncated on insertion so every row has exactly one
/// cell per header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a data row, padding with empty cells or truncating to the
    /// header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell by row and column index. Out-of-range access yields an empty
    /// string rather than panicking; absent cells and absent columns are
    /// equivalent for every consumer in this crate.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        Some(self.cell(row, index))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Renames headers according to `map` (old name to new name). Headers
    /// absent from the map are left untouched.
    pub fn rename_columns(&mut self, map: &HashMap<String, String>) {
        for header in &mut self.headers {
            if let Some(new_name) = map.get(header) {
                *header = new_name.clone();
            }
        }
    }

    /// Appends extra columns to the right of the table.
    ///
    /// `columns` must carry exactly one row of new cells per existing row.
    pub fn append_columns(
        &mut self,
        headers: Vec<String>,
        columns: Vec<Vec<String>>,
    ) -> Result<(), TableError> {
        if columns.len() != self.rows.len() {
            return Err(TableError::RowCountMismatch {
                expected: self.rows.len(),
                actual: columns.len(),
            });
        }

        let width = headers.len();
        self.headers.extend(headers);
        for (row, mut extra) in self.rows.iter_mut().zip(columns) {
            extra.resize(width, String::new());
            row.extend(extra);
        }
        Ok(())
    }

    /// Writes the table as CSV to an arbitrary writer (used for the
    /// evaluation summary printed to stdout).
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(&self.headers)
            .map_err(|source| TableError::CsvWrite { source })?;
        for row in &self.rows {
            csv_writer
                .write_record(row)
                .map_err(|source| TableError::CsvWrite { source })?;
        }
        csv_writer
            .flush()
            .map_err(|source| TableError::CsvWrite {
                source: csv::Error::from(source),
            })?;
        Ok(())
    }
}

/// Loads a table from a CSV or Excel file, dispatching on the extension.
pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let format = FileFormat::from_path(path)?;
    let table = match format {
        FileFormat::Csv => read_csv(path)?,
        FileFormat::Xlsx => read_workbook(path)?,
    };
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.headers().len(),
        "Loaded table"
    );
    Ok(table)
}

/// Writes a table to a CSV or Excel file, dispatching on the extension.
pub fn write_table(path: &Path, table: &Table) -> Result<(), TableError> {
    let format = FileFormat::from_path(path)?;
    match format {
        FileFormat::Csv => write_csv_file(path, table),
        FileFormat::Xlsx => write_workbook(path, table),
    }
}

fn read_csv(path: &Path) -> Result<Table, TableError> {
    let map_err = |source| TableError::CsvRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(map_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(map_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(map_err)?;
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn write_csv_file(path: &Path, table: &Table) -> Result<(), TableError> {
    let file = std::fs::File::create(path).map_err(|source| TableError::CsvWrite {
        source: csv::Error::from(source),
    })?;
    table.write_csv(file)
}

fn read_workbook(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::WorkbookRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(|e| TableError::WorkbookRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_string).collect());
    }
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        other => other.to_string(),
    }
}

fn write_workbook(path: &Path, table: &Table) -> Result<(), TableError> {
    let map_err = |e: rust_xlsxwriter::XlsxError| TableError::WorkbookWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (column, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string(0, column as u16, header)
            .map_err(map_err)?;
    }
    for (index, row) in table.rows().enumerate() {
        for (column, cell) in row.iter().enumerate() {
            worksheet
                .write_string(index as u32 + 1, column as u16, cell)
                .map_err(map_err)?;
        }
    }

    workbook.save(path).map_err(map_err)?;
    Ok(())
}
