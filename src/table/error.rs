/// Errors that can occur while loading, reshaping, or writing a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing or serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A column required by an operation is not present
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two columns share the same header
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column was expected to hold numbers but holds text
    #[error("Column is not numeric: {0}")]
    NotNumeric(String),

    /// A column does not have the same number of rows as the table
    #[error("Column '{name}' has {found} rows, expected {expected}")]
    LengthMismatch {
        /// Column name
        name: String,
        /// Row count of the table
        expected: usize,
        /// Row count of the offending column
        found: usize,
    },
}
