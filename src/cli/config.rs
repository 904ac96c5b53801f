//! TOML configuration file support.
//!
//! Instead of answering prompts or passing many CLI flags, a run can be
//! described in a config file:
//!
//! ```toml
//! # mqprep.toml
//! [conditions]
//! mode = "paired"
//! pairs = [{ experiment = "Drug", control = "DMSO" }]
//!
//! [filter]
//! pep_max = 0.05
//! msms_min = 2
//!
//! [aggregation]
//! missing_protein_label = "Unknown"
//!
//! [pruning]
//! extra_drop_columns = ["Proteins"]
//!
//! [differential]
//! ratio = "1/2"
//!
//! [output]
//! directory = "results"
//! converted_csv = "experimental_data/peptides.csv"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use mqprep::condition::{ConditionMode, Conditions};

/// Root configuration structure for mqprep.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Experimental conditions.
    #[serde(default)]
    pub conditions: ConditionsConfig,

    /// Filtering thresholds.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Column pruning settings.
    #[serde(default)]
    pub pruning: PruningConfig,

    /// Differential expression settings.
    #[serde(default)]
    pub differential: DifferentialConfig,

    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// One experiment/control pair.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    /// Experiment name.
    pub experiment: String,
    /// Control name.
    pub control: String,
}

/// Conditions of the run.
#[derive(Debug, Default, Deserialize)]
pub struct ConditionsConfig {
    /// Paired or unpaired; inferred from which list is filled when omitted.
    pub mode: Option<ConditionMode>,

    /// Experiment/control pairs (paired mode).
    #[serde(default)]
    pub pairs: Vec<PairConfig>,

    /// Experiment names (unpaired mode).
    #[serde(default)]
    pub experiments: Vec<String>,
}

/// Thresholds for the filtering stage.
#[derive(Debug, Default, Deserialize)]
pub struct FilterConfig {
    /// Upper PEP bound (inclusive).
    pub pep_max: Option<f64>,

    /// Lower MS/MS count bound (inclusive).
    pub msms_min: Option<f64>,
}

/// Settings for the aggregation stage.
#[derive(Debug, Default, Deserialize)]
pub struct AggregationConfig {
    /// Group peptides without a protein name under this label instead of
    /// dropping them.
    pub missing_protein_label: Option<String>,
}

/// Settings for the pruning stage.
#[derive(Debug, Default, Deserialize)]
pub struct PruningConfig {
    /// Columns removed in addition to the default drop-list.
    #[serde(default)]
    pub extra_drop_columns: Vec<String>,
}

/// Settings for differential expression.
#[derive(Debug, Default, Deserialize)]
pub struct DifferentialConfig {
    /// Fold change as one-based `i/j` indices into the condition list.
    pub ratio: Option<String>,
}

/// Output locations.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the result tables.
    pub directory: Option<PathBuf>,

    /// Where the comma-delimited copy of the input is written.
    pub converted_csv: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ConditionsConfig {
    /// Conditions described by the file, `None` when the section is empty.
    pub fn resolve(&self) -> Result<Option<Conditions>> {
        let mode = match (self.mode, self.pairs.is_empty(), self.experiments.is_empty()) {
            (_, false, false) => bail!("Config lists both pairs and experiments; use one mode"),
            (None, true, true) => return Ok(None),
            (Some(mode), _, _) => mode,
            (None, false, true) => ConditionMode::Paired,
            (None, true, false) => ConditionMode::Unpaired,
        };

        let conditions = match mode {
            ConditionMode::Paired if self.pairs.is_empty() => {
                bail!("Config mode is 'paired' but no pairs are listed")
            }
            ConditionMode::Unpaired if self.experiments.is_empty() => {
                bail!("Config mode is 'unpaired' but no experiments are listed")
            }
            ConditionMode::Paired => Conditions::paired(
                self.pairs
                    .iter()
                    .map(|p| (p.experiment.clone(), p.control.clone())),
            )?,
            ConditionMode::Unpaired => Conditions::unpaired(self.experiments.iter().cloned())?,
        };
        Ok(Some(conditions))
    }
}
