use log::info;

use crate::columns::{MSMS_COUNT, PEP, POTENTIAL_CONTAMINANT};
use crate::condition::Conditions;
use crate::table::Table;

use super::{signal_columns, PipelineError, Signal, Thresholds};

/// Keep the peptides that pass every quality rule
///
/// A row survives when its MS/MS count reaches `msms_min`, its PEP is at most
/// `pep_max`, it is not flagged as a contaminant, and at least one condition
/// shows either a positive intensity or a nonzero count. Surviving rows keep
/// their input order.
pub fn filter_rows(
    table: &Table,
    conditions: &Conditions,
    thresholds: &Thresholds,
) -> Result<Table, PipelineError> {
    let msms = table.numeric(MSMS_COUNT)?;
    let pep = table.numeric(PEP)?;
    let contaminant = &table.column(POTENTIAL_CONTAMINANT)?.data;
    let signal = signal_columns(table, conditions)?;

    let mask: Vec<bool> = (0..table.n_rows())
        .map(|row| {
            thresholds.accepts_msms(msms.get_or_nan(row))
                && thresholds.accepts_pep(pep.get_or_nan(row))
                && contaminant.is_missing(row)
                && has_signal(&signal, row)
        })
        .collect();

    let filtered = table.filter_rows(&mask)?;
    info!(
        "Filtering kept {} of {} rows (PEP <= {}, MS/MS Count >= {})",
        filtered.n_rows(),
        table.n_rows(),
        thresholds.pep_max(),
        thresholds.msms_min()
    );
    Ok(filtered)
}

/// False only when every condition has intensity <= 0 and every condition has
/// a zero count
fn has_signal(signal: &[Signal<'_>], row: usize) -> bool {
    let no_intensity = signal.iter().all(|s| s.intensity(row) <= 0.0);
    let no_count = signal.iter().all(|s| s.count(row) == 0.0);
    !(no_intensity && no_count)
}
