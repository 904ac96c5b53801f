use log::info;

use crate::condition::{ConditionError, Conditions};
use crate::table::Table;

use super::{signal_columns, PipelineError};

/// Proteins detected only in the condition at `target`
///
/// The target needs `Count > 0` and `Intensity Experiment > 0`; every other
/// condition needs `Count <= 0` and `Intensity Experiment <= 0`.
pub fn exclusive_expression(
    table: &Table,
    conditions: &Conditions,
    target: usize,
) -> Result<Table, PipelineError> {
    if target >= conditions.len() {
        return Err(ConditionError::InvalidSelection((target + 1).to_string()).into());
    }

    let signal = signal_columns(table, conditions)?;
    let mask: Vec<bool> = (0..table.n_rows())
        .map(|row| {
            signal.iter().enumerate().all(|(idx, s)| {
                if idx == target {
                    s.count(row) > 0.0 && s.intensity(row) > 0.0
                } else {
                    s.count(row) <= 0.0 && s.intensity(row) <= 0.0
                }
            })
        })
        .collect();

    let exclusive = table.filter_rows(&mask)?;
    info!(
        "{} proteins are expressed exclusively in {}",
        exclusive.n_rows(),
        conditions.columns()[target].name
    );
    Ok(exclusive)
}

/// One exclusivity report per condition, in condition order
pub fn exclusivity_reports(
    table: &Table,
    conditions: &Conditions,
) -> Result<Vec<(String, Table)>, PipelineError> {
    conditions
        .names()
        .enumerate()
        .map(|(idx, name)| Ok((name.to_string(), exclusive_expression(table, conditions, idx)?)))
        .collect()
}
