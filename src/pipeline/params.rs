use crate::columns::ColumnPolicy;
use crate::condition::{Conditions, RatioSelection};
use crate::table::MissingKeyPolicy;

use super::PipelineError;

/// Significance and evidence thresholds applied by the filtering stage
///
/// The PEP bound is inclusive: a peptide passes when `PEP <= pep_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pep_max: f64,
    msms_min: f64,
}

impl Thresholds {
    /// Validate and create thresholds
    ///
    /// `pep_max` is a probability and must lie in `[0, 1]`; `msms_min` is a
    /// spectrum count and must be finite and non-negative.
    pub fn new(pep_max: f64, msms_min: f64) -> Result<Self, PipelineError> {
        if !pep_max.is_finite() || !(0.0..=1.0).contains(&pep_max) {
            return Err(PipelineError::InvalidThreshold(format!(
                "PEP upper threshold must be between 0 and 1, got {}",
                pep_max
            )));
        }
        if !msms_min.is_finite() || msms_min < 0.0 {
            return Err(PipelineError::InvalidThreshold(format!(
                "MS/MS count lower threshold must be a non-negative number, got {}",
                msms_min
            )));
        }
        Ok(Self { pep_max, msms_min })
    }

    /// Parse thresholds typed by a user
    pub fn parse(pep_max: &str, msms_min: &str) -> Result<Self, PipelineError> {
        let pep = pep_max.trim().parse::<f64>().map_err(|_| {
            PipelineError::InvalidThreshold(format!("'{}' is not a number", pep_max.trim()))
        })?;
        let msms = msms_min.trim().parse::<f64>().map_err(|_| {
            PipelineError::InvalidThreshold(format!("'{}' is not a number", msms_min.trim()))
        })?;
        Self::new(pep, msms)
    }

    /// Upper PEP bound (inclusive)
    pub fn pep_max(&self) -> f64 {
        self.pep_max
    }

    /// Lower MS/MS count bound (inclusive)
    pub fn msms_min(&self) -> f64 {
        self.msms_min
    }

    /// Whether a PEP value passes; `NaN` never does
    pub fn accepts_pep(&self, pep: f64) -> bool {
        pep <= self.pep_max
    }

    /// Whether an MS/MS count passes; `NaN` never does
    pub fn accepts_msms(&self, count: f64) -> bool {
        count >= self.msms_min
    }
}

/// Everything a pipeline run needs besides the raw table
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Conditions, in order
    pub conditions: Conditions,
    /// Filtering thresholds
    pub thresholds: Thresholds,
    /// Fold change to compute; `None` skips differential expression
    pub ratio: Option<RatioSelection>,
    /// Handling of peptides without a protein name
    pub missing_protein_names: MissingKeyPolicy,
    /// Columns removed from the aggregated table
    pub column_policy: ColumnPolicy,
}

impl PipelineParams {
    /// Parameters with default aggregation and pruning settings and no ratio
    pub fn new(conditions: Conditions, thresholds: Thresholds) -> Self {
        Self {
            conditions,
            thresholds,
            ratio: None,
            missing_protein_names: MissingKeyPolicy::default(),
            column_policy: ColumnPolicy::default(),
        }
    }

    /// Set the fold change to compute
    pub fn ratio(mut self, ratio: RatioSelection) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Set the policy for peptides without a protein name
    pub fn missing_protein_names(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_protein_names = policy;
        self
    }

    /// Set the columns removed from the aggregated table
    pub fn column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.column_policy = policy;
        self
    }
}
