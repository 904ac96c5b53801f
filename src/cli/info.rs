use anyhow::{Context, Result};
use std::path::PathBuf;

use mqprep::columns::{self, DEFAULT_DROP_COLUMNS};
use mqprep::condition::Conditions;
use mqprep::table::{ColumnData, Table};

use super::delimiter_for;

/// Display information about a peptides table
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let table = Table::from_path(&file, delimiter_for(&file))
        .with_context(|| format!("Failed to read table: {}", file.display()))?;

    println!("Peptide Table Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!();

    println!("Table Statistics:");
    println!("  Rows: {}", table.n_rows());
    println!("  Columns: {}", table.n_cols());
    let droppable = DEFAULT_DROP_COLUMNS
        .iter()
        .filter(|name| table.has_column(name))
        .count();
    println!("  Default drop-list columns present: {}", droppable);
    println!();

    println!("Required Columns:");
    for name in [
        columns::PROTEIN_NAMES,
        columns::PEP,
        columns::MSMS_COUNT,
        columns::POTENTIAL_CONTAMINANT,
    ] {
        let status = if table.has_column(name) { "present" } else { "MISSING" };
        println!("  {}: {}", name, status);
    }
    println!();

    let detected = Conditions::detect(&table);
    println!("Detected Conditions ({}):", detected.len());
    for name in &detected {
        println!("  {}", name);
    }
    println!();

    println!("Schema:");
    for (i, column) in table.columns().iter().enumerate() {
        let kind = match &column.data {
            ColumnData::Numeric(values) if values.is_integer() => "integer",
            ColumnData::Numeric(_) => "float",
            ColumnData::Text(_) => "text",
        };
        println!("  {:3}. {} ({})", i + 1, column.name, kind);
    }

    Ok(())
}
