use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mqprep::table::convert_delimited;

/// Convert a tab-delimited table to comma-delimited
pub fn run(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| input.with_extension("csv"));
    if output == input {
        anyhow::bail!("Output would overwrite the input: {}", input.display());
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());

    let table = convert_delimited(&input, &output, b'\t', b',').context("Conversion failed")?;

    println!(
        "Converted {} rows x {} columns to {}",
        table.n_rows(),
        table.n_cols(),
        output.display()
    );
    Ok(())
}
