//! Writing result tables and the run summary to an output directory.
//!
//! ```text
//! results/
//! ├── aggregated_data.csv
//! ├── differential_expression.csv
//! ├── <condition>_exclusive_expression.csv
//! └── run_summary.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::pipeline::Analyses;
use crate::report::RunReport;
use crate::table::{Table, TableError};

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error creating the directory or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error serializing a table
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// Error serializing the run summary
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Default output directory
pub const DEFAULT_RESULTS_DIR: &str = "results";
/// File name of the aggregated table
pub const AGGREGATED_FILE: &str = "aggregated_data.csv";
/// File name of the differential expression table
pub const DIFFERENTIAL_FILE: &str = "differential_expression.csv";
/// File name of the run summary
pub const SUMMARY_FILE: &str = "run_summary.json";

/// File name of the exclusivity report of a condition
pub fn exclusive_file_name(condition: &str) -> String {
    format!("{}_exclusive_expression.csv", condition)
}

/// Writes result files into one directory, recording each file in the report
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
}

impl ResultWriter {
    /// Create the output directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, OutputError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_table(
        &self,
        file_name: &str,
        table: &Table,
        report: &mut RunReport,
    ) -> Result<PathBuf, OutputError> {
        let path = self.dir.join(file_name);
        table.to_csv_path(&path)?;
        info!("Wrote {} rows to {}", table.n_rows(), path.display());
        report.add_file(path.display().to_string());
        Ok(path)
    }

    /// Write `aggregated_data.csv`
    pub fn write_aggregated(
        &self,
        aggregated: &Table,
        report: &mut RunReport,
    ) -> Result<PathBuf, OutputError> {
        self.write_table(AGGREGATED_FILE, aggregated, report)
    }

    /// Write the differential expression table, if any, and every
    /// exclusivity report
    pub fn write_analyses(
        &self,
        analyses: &Analyses,
        report: &mut RunReport,
    ) -> Result<Vec<PathBuf>, OutputError> {
        let mut written = Vec::with_capacity(analyses.exclusive.len() + 1);
        if let Some(differential) = &analyses.differential {
            written.push(self.write_table(DIFFERENTIAL_FILE, differential, report)?);
        }
        for (condition, table) in &analyses.exclusive {
            written.push(self.write_table(&exclusive_file_name(condition), table, report)?);
        }
        Ok(written)
    }

    /// Write `run_summary.json`
    pub fn write_summary(&self, report: &mut RunReport) -> Result<PathBuf, OutputError> {
        let path = self.dir.join(SUMMARY_FILE);
        report.add_file(path.display().to_string());
        fs::write(&path, report.to_json()?)?;
        Ok(path)
    }
}
