//! Experimental conditions and the columns derived from them.
//!
//! A run works on an ordered list of conditions that are either all paired
//! with a control or all unpaired. Each condition resolves once to a
//! [`ConditionColumns`] holding every header the pipeline reads or writes for
//! it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::table::Table;

/// Errors raised while building conditions or ratio selections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// The condition list is empty
    #[error("No conditions were given")]
    NoConditions,

    /// Paired and unpaired conditions were mixed in one run
    #[error("Conditions must be either all paired with a control or all unpaired")]
    MixedConditionModes,

    /// The same experiment name was given twice
    #[error("Duplicate condition: {0}")]
    DuplicateCondition(String),

    /// A condition name is empty
    #[error("Condition names must not be empty")]
    EmptyName,

    /// A ratio selection is malformed or does not fit the condition list
    #[error("Invalid ratio selection '{0}'")]
    InvalidSelection(String),

    /// Condition name cannot be used in a result file name
    #[error("Condition name '{0}' must not contain a path separator")]
    PathSeparator(String),
}

/// Whether conditions are normalized against a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionMode {
    /// Each experiment has a control that is subtracted
    Paired,
    /// Experiments are used as measured
    Unpaired,
}

impl fmt::Display for ConditionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionMode::Paired => write!(f, "paired"),
            ConditionMode::Unpaired => write!(f, "unpaired"),
        }
    }
}

/// One experimental condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionSpec {
    /// Experiment normalized against a control
    Paired {
        /// Experiment name
        experiment: String,
        /// Control name
        control: String,
    },
    /// Experiment without a control
    Unpaired {
        /// Experiment name
        experiment: String,
    },
}

impl ConditionSpec {
    /// Experiment name, which also names the derived columns
    pub fn name(&self) -> &str {
        match self {
            ConditionSpec::Paired { experiment, .. } | ConditionSpec::Unpaired { experiment } => {
                experiment
            }
        }
    }

    /// Control name, for paired conditions
    pub fn control(&self) -> Option<&str> {
        match self {
            ConditionSpec::Paired { control, .. } => Some(control),
            ConditionSpec::Unpaired { .. } => None,
        }
    }

    /// Mode of this condition
    pub fn mode(&self) -> ConditionMode {
        match self {
            ConditionSpec::Paired { .. } => ConditionMode::Paired,
            ConditionSpec::Unpaired { .. } => ConditionMode::Unpaired,
        }
    }

    /// Resolve every column name used for this condition
    pub fn columns(&self) -> ConditionColumns {
        let name = self.name();
        ConditionColumns {
            name: name.to_string(),
            intensity: columns::intensity(name),
            experiment: columns::experiment(name),
            control_intensity: self.control().map(columns::intensity),
            control_experiment: self.control().map(columns::experiment),
            count: columns::count(name),
            intensity_experiment: columns::intensity_experiment(name),
        }
    }
}

impl fmt::Display for ConditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionSpec::Paired { experiment, control } => write!(f, "{} - {}", experiment, control),
            ConditionSpec::Unpaired { experiment } => write!(f, "{}", experiment),
        }
    }
}

/// Column names resolved for one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionColumns {
    /// Condition name
    pub name: String,
    /// Raw intensity of the experiment
    pub intensity: String,
    /// Raw evidence count of the experiment
    pub experiment: String,
    /// Raw intensity of the control (paired only)
    pub control_intensity: Option<String>,
    /// Raw evidence count of the control (paired only)
    pub control_experiment: Option<String>,
    /// Derived `Count <name>`
    pub count: String,
    /// Derived `Intensity Experiment <name>`
    pub intensity_experiment: String,
}

impl ConditionColumns {
    /// Raw input columns this condition needs, experiment first
    pub fn raw(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.intensity.as_str()),
            Some(self.experiment.as_str()),
            self.control_intensity.as_deref(),
            self.control_experiment.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Ordered, non-empty list of conditions sharing one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    specs: Vec<ConditionSpec>,
    columns: Vec<ConditionColumns>,
}

impl Conditions {
    /// Validate and resolve a list of conditions
    pub fn new(specs: Vec<ConditionSpec>) -> Result<Self, ConditionError> {
        let first = specs.first().ok_or(ConditionError::NoConditions)?;
        let mode = first.mode();

        let mut seen = HashSet::new();
        for spec in &specs {
            if spec.mode() != mode {
                return Err(ConditionError::MixedConditionModes);
            }
            if spec.name().trim().is_empty() || spec.control().is_some_and(|c| c.trim().is_empty()) {
                return Err(ConditionError::EmptyName);
            }
            if spec.name().contains(['/', '\\']) {
                return Err(ConditionError::PathSeparator(spec.name().to_string()));
            }
            if !seen.insert(spec.name()) {
                return Err(ConditionError::DuplicateCondition(spec.name().to_string()));
            }
        }

        let columns = specs.iter().map(ConditionSpec::columns).collect();
        Ok(Self { specs, columns })
    }

    /// Experiment/control pairs
    pub fn paired<I, E, C>(pairs: I) -> Result<Self, ConditionError>
    where
        I: IntoIterator<Item = (E, C)>,
        E: Into<String>,
        C: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(e, c)| ConditionSpec::Paired {
                    experiment: e.into(),
                    control: c.into(),
                })
                .collect(),
        )
    }

    /// Experiments without controls
    pub fn unpaired<I, S>(names: I) -> Result<Self, ConditionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|e| ConditionSpec::Unpaired { experiment: e.into() })
                .collect(),
        )
    }

    /// Candidate condition names found in a raw table: every `<x>` with both
    /// an `Intensity <x>` and an `Experiment <x>` column, in header order
    pub fn detect(table: &Table) -> Vec<String> {
        table
            .column_names()
            .filter_map(|name| name.strip_prefix("Intensity "))
            .filter(|candidate| !candidate.starts_with("Experiment "))
            .filter(|candidate| table.has_column(&columns::experiment(candidate)))
            .map(str::to_string)
            .collect()
    }

    /// Mode shared by every condition
    pub fn mode(&self) -> ConditionMode {
        self.specs[0].mode()
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Always false: a condition list is never empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Conditions in order
    pub fn specs(&self) -> &[ConditionSpec] {
        &self.specs
    }

    /// Resolved columns, in condition order
    pub fn columns(&self) -> &[ConditionColumns] {
        &self.columns
    }

    /// Condition names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(ConditionSpec::name)
    }

    /// Resolved columns of the condition at `index`
    pub fn get(&self, index: usize) -> Option<&ConditionColumns> {
        self.columns.get(index)
    }
}

/// Numerator/denominator pair for a log2 fold change, as zero-based indices
/// into a [`Conditions`] list
///
/// Parsed from the one-based `i/j` form shown in the selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioSelection {
    /// Index of the numerator condition
    pub numerator: usize,
    /// Index of the denominator condition
    pub denominator: usize,
}

impl RatioSelection {
    /// Selection from zero-based indices
    pub fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Check the selection against the number of conditions
    pub fn validate(&self, n_conditions: usize) -> Result<(), ConditionError> {
        if self.numerator == self.denominator
            || self.numerator >= n_conditions
            || self.denominator >= n_conditions
        {
            return Err(ConditionError::InvalidSelection(self.to_string()));
        }
        Ok(())
    }

    /// Every valid selection for `n` conditions in menu order: for each
    /// `i < j`, first `i/j` then `j/i`
    pub fn options(n: usize) -> Vec<Self> {
        let mut options = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in (i + 1)..n {
                options.push(Self::new(i, j));
                options.push(Self::new(j, i));
            }
        }
        options
    }
}

impl fmt::Display for RatioSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator + 1, self.denominator + 1)
    }
}

impl FromStr for RatioSelection {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConditionError::InvalidSelection(s.to_string());
        let (num, den) = s.trim().split_once('/').ok_or_else(invalid)?;
        let num: usize = num.trim().parse().map_err(|_| invalid())?;
        let den: usize = den.trim().parse().map_err(|_| invalid())?;
        if num == 0 || den == 0 {
            return Err(invalid());
        }
        Ok(Self::new(num - 1, den - 1))
    }
}
