//! # Pipeline Module
//!
//! Turns a MaxQuant peptide table into protein-level result tables.
//!
//! ## Stages
//!
//! 1. [`normalize`]: derive `Count <c>` and `Intensity Experiment <c>` per
//!    condition, subtracting the control in paired mode.
//! 2. [`filter_rows`]: PEP, MS/MS count, contaminant and signal rules.
//! 3. [`aggregate`]: one row per `Protein names`, numbers summed, text from
//!    the first peptide.
//! 4. [`prune_columns`]: drop per-peptide metadata and raw condition columns.
//!    The result is the canonical aggregated table.
//! 5. [`differential_expression`] and [`exclusive_expression`]: read-only
//!    views of the aggregated table.
//!
//! Each stage takes a table and returns a new one. [`prepare`] runs stages
//! 1-4, [`analyze`] runs stage 5, [`run`] runs both.

mod aggregate;
mod differential;
mod error;
mod exclusive;
mod filter;
mod normalize;
mod params;
mod prune;
mod runner;


pub use aggregate::aggregate;
pub use differential::differential_expression;
pub use error::PipelineError;
pub use exclusive::{exclusive_expression, exclusivity_reports};
pub use filter::filter_rows;
pub use normalize::normalize;
pub use params::{PipelineParams, Thresholds};
pub use prune::prune_columns;
pub use runner::{analyze, prepare, run, Analyses, PipelineOutput};

use crate::condition::Conditions;
use crate::table::{NumericColumn, Table};

/// Derived count and intensity columns of one condition
pub(crate) struct Signal<'a> {
    count: &'a NumericColumn,
    intensity: &'a NumericColumn,
}

impl Signal<'_> {
    /// `Count <c>` at `row`, `NaN` when missing
    fn count(&self, row: usize) -> f64 {
        self.count.get_or_nan(row)
    }

    /// `Intensity Experiment <c>` at `row`, `NaN` when missing
    fn intensity(&self, row: usize) -> f64 {
        self.intensity.get_or_nan(row)
    }
}

/// Look up the derived columns of every condition, in condition order
pub(crate) fn signal_columns<'a>(
    table: &'a Table,
    conditions: &Conditions,
) -> Result<Vec<Signal<'a>>, PipelineError> {
    conditions
        .columns()
        .iter()
        .map(|c| {
            Ok(Signal {
                count: table.numeric(&c.count)?,
                intensity: table.numeric(&c.intensity_experiment)?,
            })
        })
        .collect()
}
