use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use super::{Column, ColumnData, NumericColumn, Table, TableError};

/// Cell values read as missing, in addition to the empty string
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "NULL", "null", "#N/A"];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Infer the type of one column from its raw cells
///
/// Numeric when every present cell parses as `f64`, integer-typed when
/// additionally every cell is present and parses as `i64`.
fn infer_column(name: String, cells: Vec<String>) -> Column {
    let mut numbers = Vec::with_capacity(cells.len());
    let mut integer = true;
    for cell in cells.iter().map(|c| c.trim()) {
        if is_missing(cell) {
            integer = false;
            numbers.push(None);
        } else if let Ok(v) = cell.parse::<f64>() {
            integer &= cell.parse::<i64>().is_ok();
            numbers.push(Some(v));
        } else {
            break;
        }
    }

    if numbers.len() < cells.len() {
        let text = cells
            .into_iter()
            .map(|c| if is_missing(c.trim()) { None } else { Some(c) })
            .collect();
        return Column::text(name, text);
    }
    Column::numeric(name, NumericColumn::new(numbers, integer))
}

impl Table {
    /// Read a delimited table with a header row
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (column, value) in cells.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        let table = Table::new(columns)?;
        debug!("Read table with {} rows and {} columns", table.n_rows(), table.n_cols());
        Ok(table)
    }

    /// Read a delimited table from a file
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Write the table as comma-delimited text with a header row and no index
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        self.write_delimited(writer, b',')
    }

    /// Write the table with the given delimiter
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), TableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        csv_writer.write_record(self.column_names())?;
        let data: Vec<&ColumnData> = self.columns().iter().map(|c| &c.data).collect();
        for row in 0..self.n_rows() {
            csv_writer.write_record(data.iter().map(|d| d.format_cell(row)))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table as a CSV file
    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

/// Re-encode a delimited file with another delimiter
///
/// The file goes through the table model, so cells are normalized the same
/// way they are for the pipeline. Returns the parsed table.
pub fn convert_delimited(
    input: &Path,
    output: &Path,
    from: u8,
    to: u8,
) -> Result<Table, TableError> {
    let table = Table::from_path(input, from)?;
    let file = File::create(output)?;
    table.write_delimited(BufWriter::new(file), to)?;
    Ok(table)
}
