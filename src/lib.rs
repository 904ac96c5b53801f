//! # mqprep - MaxQuant peptide table preparation
//!
//! `mqprep` cleans a MaxQuant `peptides.txt` export and condenses it into
//! protein-level tables ready for downstream analysis.
//!
//! ## Pipeline
//!
//! ```text
//! peptides.txt ─► normalize ─► filter ─► aggregate ─► prune ─► aggregated_data.csv
//!                                                        ├─► differential_expression.csv
//!                                                        └─► <condition>_exclusive_expression.csv
//! ```
//!
//! - **Normalization** derives `Count <c>` and `Intensity Experiment <c>` for
//!   every condition, subtracting the control when conditions are paired.
//! - **Filtering** keeps peptides with `PEP <= pep_max`,
//!   `MS/MS Count >= msms_min`, no contaminant flag, and some signal in at
//!   least one condition.
//! - **Aggregation** merges peptides into one row per `Protein names`,
//!   summing numeric columns and keeping the first text value.
//! - **Pruning** drops per-peptide metadata and the raw condition columns.
//! - **Differential expression** keeps proteins detected in every condition
//!   and adds a `Log2FC <num>/<den>` column.
//! - **Exclusivity** keeps, per condition, proteins detected only there.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mqprep::condition::{Conditions, RatioSelection};
//! use mqprep::output::ResultWriter;
//! use mqprep::pipeline::{self, PipelineParams, Thresholds};
//! use mqprep::table::Table;
//!
//! let raw = Table::from_path("peptides.txt", b'\t')?;
//! let conditions = Conditions::paired([("Drug", "DMSO"), ("Knockout", "WT")])?;
//! let params = PipelineParams::new(conditions, Thresholds::new(0.05, 2.0)?)
//!     .ratio("1/2".parse::<RatioSelection>()?);
//!
//! let mut output = pipeline::run(raw, &params)?;
//!
//! let writer = ResultWriter::new("results")?;
//! writer.write_aggregated(&output.aggregated, &mut output.report)?;
//! writer.write_analyses(&output.analyses, &mut output.report)?;
//! writer.write_summary(&mut output.report)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`table`]: in-memory table, type inference, CSV/TSV I/O
//! - [`columns`]: column names and the default drop-list
//! - [`condition`]: conditions, resolved column names, ratio selection
//! - [`pipeline`]: the processing stages
//! - [`report`]: per-run audit trail
//! - [`output`]: result file layout

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod columns;
pub mod condition;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::columns::{ColumnPolicy, DEFAULT_DROP_COLUMNS, PROTEIN_NAMES};
    pub use crate::condition::{
        ConditionColumns, ConditionError, ConditionMode, ConditionSpec, Conditions,
        RatioSelection,
    };
    pub use crate::output::{OutputError, ResultWriter};
    pub use crate::pipeline::{
        aggregate, analyze, differential_expression, exclusive_expression, exclusivity_reports,
        filter_rows, normalize, prepare, prune_columns, run, Analyses, PipelineError,
        PipelineOutput, PipelineParams, Thresholds,
    };
    pub use crate::report::{RunReport, Stage, StageSummary};
    pub use crate::table::{Column, ColumnData, MissingKeyPolicy, NumericColumn, Table, TableError};
}
