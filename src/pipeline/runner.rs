use log::{info, warn};

use crate::report::{RunReport, Stage};
use crate::table::Table;

use super::{
    aggregate, differential_expression, exclusivity_reports, filter_rows, normalize,
    prune_columns, PipelineError, PipelineParams,
};

/// Result tables of the analyses run on the aggregated table
#[derive(Debug, Clone)]
pub struct Analyses {
    /// Differential expression table, when a ratio was selected and there
    /// are at least two conditions
    pub differential: Option<Table>,
    /// Exclusivity report per condition, in condition order
    pub exclusive: Vec<(String, Table)>,
}

/// All tables produced by a run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Canonical protein-level table
    pub aggregated: Table,
    /// Differential expression and exclusivity tables
    pub analyses: Analyses,
    /// Per-stage statistics
    pub report: RunReport,
}

/// Normalize, filter, aggregate and prune a raw peptide table
///
/// Returns the canonical aggregated table and a report holding the stages
/// that ran so far.
pub fn prepare(raw: Table, params: &PipelineParams) -> Result<(Table, RunReport), PipelineError> {
    let mut report = RunReport::new(params);
    let conditions = &params.conditions;

    let rows = raw.n_rows();
    let normalized = normalize(raw, conditions)?;
    report.record(Stage::Normalize, None, rows, &normalized);

    let filtered = filter_rows(&normalized, conditions, &params.thresholds)?;
    report.record(Stage::Filter, None, normalized.n_rows(), &filtered);
    drop(normalized);

    let aggregated = aggregate(&filtered, &params.missing_protein_names)?;
    report.record(Stage::Aggregate, None, filtered.n_rows(), &aggregated);

    let pruned = prune_columns(&aggregated, conditions, &params.column_policy);
    report.record(Stage::Prune, None, aggregated.n_rows(), &pruned);

    Ok((pruned, report))
}

/// Run differential expression and every exclusivity report on an
/// aggregated table
///
/// Fewer than two conditions, or no selected ratio, skip differential
/// expression without failing the run.
pub fn analyze(
    aggregated: &Table,
    params: &PipelineParams,
    report: &mut RunReport,
) -> Result<Analyses, PipelineError> {
    let conditions = &params.conditions;

    let differential = match params.ratio {
        Some(ratio) => match differential_expression(aggregated, conditions, ratio) {
            Ok(table) => {
                report.record(Stage::DifferentialExpression, None, aggregated.n_rows(), &table);
                Some(table)
            }
            Err(PipelineError::InsufficientConditions(n)) => {
                warn!("Need at least two conditions to calculate fold change, got {}", n);
                report.skip(format!(
                    "differential expression needs at least two conditions, got {}",
                    n
                ));
                None
            }
            Err(err) => return Err(err),
        },
        None => {
            info!("No fold change selected, skipping differential expression");
            report.skip("differential expression: no fold change selected");
            None
        }
    };

    let exclusive = exclusivity_reports(aggregated, conditions)?;
    for (name, table) in &exclusive {
        report.record(Stage::Exclusive, Some(name), aggregated.n_rows(), table);
    }

    Ok(Analyses {
        differential,
        exclusive,
    })
}

/// Run every stage on a raw peptide table
pub fn run(raw: Table, params: &PipelineParams) -> Result<PipelineOutput, PipelineError> {
    let (aggregated, mut report) = prepare(raw, params)?;
    let analyses = analyze(&aggregated, params, &mut report)?;
    Ok(PipelineOutput {
        aggregated,
        analyses,
        report,
    })
}
