//! Audit trail of a pipeline run.
//!
//! A [`RunReport`] records the parameters of a run and the row and column
//! counts after every stage. It is printed at the end of a run and saved as
//! `run_summary.json` next to the result tables.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::condition::ConditionMode;
use crate::pipeline::PipelineParams;
use crate::table::{MissingKeyPolicy, Table};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Derived count and intensity columns
    Normalize,
    /// Quality thresholds
    Filter,
    /// One row per protein
    Aggregate,
    /// Column removal
    Prune,
    /// Proteins detected in all conditions, with log2 fold change
    DifferentialExpression,
    /// Proteins detected in a single condition
    Exclusive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalize => "Normalization",
            Stage::Filter => "Filtering",
            Stage::Aggregate => "Aggregation",
            Stage::Prune => "Column pruning",
            Stage::DifferentialExpression => "Differential expression",
            Stage::Exclusive => "Exclusive expression",
        };
        write!(f, "{}", name)
    }
}

/// Row and column counts after one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    /// Stage that ran
    pub stage: Stage,
    /// Condition the stage ran for, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Rows going in
    pub rows_in: usize,
    /// Rows coming out
    pub rows_out: usize,
    /// Columns coming out
    pub columns: usize,
}

/// Parameters and per-stage statistics of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Software name
    pub software: String,
    /// Software version
    pub version: String,
    /// Start of the run (RFC 3339)
    pub timestamp: String,
    /// Paired or unpaired conditions
    pub mode: ConditionMode,
    /// Conditions in order
    pub conditions: Vec<String>,
    /// Upper PEP bound (inclusive)
    pub pep_max: f64,
    /// Lower MS/MS count bound (inclusive)
    pub msms_min: f64,
    /// Fold change, as `numerator/denominator` condition names
    pub ratio: Option<String>,
    /// Handling of peptides without a protein name
    pub missing_protein_names: String,
    /// Completed stages
    pub stages: Vec<StageSummary>,
    /// Analyses that were skipped, with the reason
    pub skipped: Vec<String>,
    /// Files written
    pub files: Vec<String>,
}

impl RunReport {
    /// Empty report for a run with these parameters
    pub fn new(params: &PipelineParams) -> Self {
        let names: Vec<&str> = params.conditions.names().collect();
        let ratio = params.ratio.and_then(|r| {
            Some(format!(
                "{}/{}",
                names.get(r.numerator)?,
                names.get(r.denominator)?
            ))
        });
        let missing_protein_names = match &params.missing_protein_names {
            MissingKeyPolicy::Drop => "drop".to_string(),
            MissingKeyPolicy::Sentinel(label) => format!("group as '{}'", label),
        };

        Self {
            software: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            mode: params.conditions.mode(),
            conditions: params.conditions.specs().iter().map(|s| s.to_string()).collect(),
            pep_max: params.thresholds.pep_max(),
            msms_min: params.thresholds.msms_min(),
            ratio,
            missing_protein_names,
            stages: Vec::new(),
            skipped: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Record the output of a stage
    pub fn record(&mut self, stage: Stage, condition: Option<&str>, rows_in: usize, output: &Table) {
        self.stages.push(StageSummary {
            stage,
            condition: condition.map(str::to_string),
            rows_in,
            rows_out: output.n_rows(),
            columns: output.n_cols(),
        });
    }

    /// Record an analysis that did not run
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped.push(reason.into());
    }

    /// Record a written file
    pub fn add_file(&mut self, path: impl Into<String>) {
        self.files.push(path.into());
    }

    /// Summary of a given stage, the first one recorded
    pub fn stage(&self, stage: Stage) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn stage_line(summary: &StageSummary) -> String {
        let name = match &summary.condition {
            Some(condition) => format!("{} ({})", summary.stage, condition),
            None => summary.stage.to_string(),
        };
        format!(
            "{:<36} {:>7} -> {:>7} rows, {} columns",
            name, summary.rows_in, summary.rows_out, summary.columns
        )
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("mqprep Run Summary").bold().cyan()));
            output.push_str(&format!("{}\n", style("==================").cyan()));
            output.push_str(&format!(
                "{}: {} ({})\n",
                style("Conditions").bold(),
                self.conditions.join(", "),
                self.mode
            ));
            output.push_str(&format!(
                "{}: PEP <= {}, MS/MS Count >= {}\n\n",
                style("Thresholds").bold(),
                self.pep_max,
                self.msms_min
            ));

            for summary in &self.stages {
                output.push_str(&format!("  {}\n", Self::stage_line(summary)));
            }
            for reason in &self.skipped {
                output.push_str(&format!("  {}: {}\n", style("SKIPPED").yellow().bold(), reason));
            }

            if !self.files.is_empty() {
                output.push('\n');
                output.push_str(&format!("{}\n", style("Files").bold()));
                for file in &self.files {
                    output.push_str(&format!("  {}\n", style(file).green()));
                }
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mqprep Run Summary")?;
        writeln!(f, "==================")?;
        writeln!(f, "Conditions: {} ({})", self.conditions.join(", "), self.mode)?;
        writeln!(
            f,
            "Thresholds: PEP <= {}, MS/MS Count >= {}",
            self.pep_max, self.msms_min
        )?;
        writeln!(f)?;

        for summary in &self.stages {
            writeln!(f, "  {}", Self::stage_line(summary))?;
        }
        for reason in &self.skipped {
            writeln!(f, "  SKIPPED: {}", reason)?;
        }

        if !self.files.is_empty() {
            writeln!(f)?;
            writeln!(f, "Files")?;
            for file in &self.files {
                writeln!(f, "  {}", file)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Conditions, RatioSelection};
    use crate::pipeline::Thresholds;
    use crate::table::{Column, NumericColumn};

    fn params() -> PipelineParams {
        let conditions = Conditions::paired([("Drug", "DMSO"), ("KO", "WT")]).unwrap();
        PipelineParams::new(conditions, Thresholds::new(0.05, 2.0).unwrap())
            .ratio(RatioSelection::new(1, 0))
            .missing_protein_names(MissingKeyPolicy::Sentinel("Unknown".to_string()))
    }

    fn table(rows: usize) -> Table {
        Table::new(vec![Column::numeric(
            "Count Drug",
            NumericColumn::from_i64(vec![1; rows]),
        )])
        .unwrap()
    }

    #[test]
    fn test_report_parameters() {
        let report = RunReport::new(&params());
        assert_eq!(report.software, "mqprep");
        assert_eq!(report.mode, ConditionMode::Paired);
        assert_eq!(report.conditions, vec!["Drug - DMSO", "KO - WT"]);
        assert_eq!(report.ratio.as_deref(), Some("KO/Drug"));
        assert_eq!(report.missing_protein_names, "group as 'Unknown'");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn test_record_and_render() {
        let mut report = RunReport::new(&params());
        report.record(Stage::Filter, None, 10, &table(4));
        report.record(Stage::Exclusive, Some("KO"), 4, &table(1));
        report.skip("nothing to compare");

        assert_eq!(report.stage(Stage::Filter).unwrap().rows_out, 4);
        assert!(report.stage(Stage::Aggregate).is_none());

        let text = report.to_string();
        assert!(text.contains("Filtering"));
        assert!(text.contains("Exclusive expression (KO)"));
        assert!(text.contains("SKIPPED: nothing to compare"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["stages"][0]["stage"], "filter");
        assert!(json["stages"][0].get("condition").is_none());
        assert_eq!(json["stages"][1]["condition"], "KO");
        assert_eq!(json["mode"], "paired");
    }
}
