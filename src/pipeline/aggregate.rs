use log::{info, warn};

use crate::columns::PROTEIN_NAMES;
use crate::table::{MissingKeyPolicy, Table};

use super::PipelineError;

/// Merge peptides into one row per `Protein names` value
///
/// Numeric columns are summed and text columns keep the first peptide's
/// value. Peptides without a protein name are dropped or grouped under a
/// label, depending on `missing`.
pub fn aggregate(table: &Table, missing: &MissingKeyPolicy) -> Result<Table, PipelineError> {
    let key = &table.column(PROTEIN_NAMES)?.data;
    let unnamed = (0..table.n_rows()).filter(|&row| key.is_missing(row)).count();
    if unnamed > 0 {
        match missing {
            MissingKeyPolicy::Drop => {
                warn!("Dropping {} peptides without a protein name", unnamed)
            }
            MissingKeyPolicy::Sentinel(label) => {
                info!("Grouping {} peptides without a protein name as '{}'", unnamed, label);
                if label_in_use(table, label)? {
                    warn!(
                        "Label '{}' is also a protein name; unnamed peptides are merged into it",
                        label
                    );
                }
            }
        }
    }

    let grouped = table.group_by(PROTEIN_NAMES, missing)?;
    info!(
        "Aggregated {} peptides into {} proteins",
        table.n_rows(),
        grouped.n_rows()
    );
    Ok(grouped)
}

/// Whether some peptide already carries `label` as its protein name
fn label_in_use(table: &Table, label: &str) -> Result<bool, PipelineError> {
    Ok(table
        .text(PROTEIN_NAMES)?
        .iter()
        .any(|name| name.as_deref() == Some(label)))
}
