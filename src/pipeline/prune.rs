use log::info;

use crate::columns::{is_protected, ColumnPolicy};
use crate::condition::Conditions;
use crate::table::Table;

/// Remove the policy's columns and the raw per-condition columns
///
/// Names that are not in the table are ignored, so pruning an already pruned
/// table returns it unchanged. The grouping key and derived columns are never
/// removed.
pub fn prune_columns(table: &Table, conditions: &Conditions, policy: &ColumnPolicy) -> Table {
    let raw = conditions
        .columns()
        .iter()
        .flat_map(|c| c.raw())
        .filter(|name| !is_protected(name));

    let pruned = table.drop_columns(policy.names().chain(raw));
    info!(
        "Removed {} columns, {} remain",
        table.n_cols() - pruned.n_cols(),
        pruned.n_cols()
    );
    pruned
}
