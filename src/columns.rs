//! Column names of the MaxQuant peptide export and of the derived tables.
//!
//! Every per-condition header is built by the helpers in this module; no other
//! module concatenates column names.

use std::collections::BTreeSet;

/// Protein identity, the grouping key of the aggregated table
pub const PROTEIN_NAMES: &str = "Protein names";
/// Posterior error probability (lower is more significant)
pub const PEP: &str = "PEP";
/// Number of MS/MS spectra supporting the peptide
pub const MSMS_COUNT: &str = "MS/MS Count";
/// Contaminant flag, `+` when set and empty otherwise
pub const POTENTIAL_CONTAMINANT: &str = "Potential contaminant";

/// Raw intensity of a condition: `Intensity <name>`
pub fn intensity(name: &str) -> String {
    format!("Intensity {}", name)
}

/// Raw evidence count of a condition: `Experiment <name>`
pub fn experiment(name: &str) -> String {
    format!("Experiment {}", name)
}

/// Derived count of a condition: `Count <name>`
pub fn count(name: &str) -> String {
    format!("Count {}", name)
}

/// Derived intensity difference of a condition: `Intensity Experiment <name>`
pub fn intensity_experiment(name: &str) -> String {
    format!("Intensity Experiment {}", name)
}

/// Log2 fold change between two conditions: `Log2FC <numerator>/<denominator>`
pub fn log2fc(numerator: &str, denominator: &str) -> String {
    format!("Log2FC {}/{}", numerator, denominator)
}

/// Per-peptide metadata that carries no meaning once peptides are merged
/// into proteins
pub const DEFAULT_DROP_COLUMNS: &[&str] = &[
    "Sequence",
    "N-term cleavage window",
    "C-term cleavage window",
    "Amino acid before",
    "First amino acid",
    "Second amino acid",
    "Second last amino acid",
    "Last amino acid",
    "Amino acid after",
    "Length",
    "Missed cleavages",
    "Mass",
    "Leading razor protein",
    "Start position",
    "End position",
    "Charges",
    "PEP",
    "Score",
    "Reverse",
    "Potential contaminant",
    "id",
    "Protein group IDs",
    "Mod. peptide IDs",
    "Evidence IDs",
    "MS/MS IDs",
    "Best MS/MS",
    "Oxidation (M) site IDs",
    "Taxonomy IDs",
    "Taxonomy names",
    "Mass deficit",
    "Unique (Groups)",
    "Unique (Proteins)",
    "Deamidation (N) site IDs",
    "A Count",
    "R Count",
    "N Count",
    "D Count",
    "C Count",
    "Q Count",
    "E Count",
    "G Count",
    "H Count",
    "I Count",
    "L Count",
    "K Count",
    "M Count",
    "F Count",
    "P Count",
    "S Count",
    "T Count",
    "W Count",
    "Y Count",
    "V Count",
    "U Count",
    "O Count",
];

/// The fixed set of columns removed before the aggregated table is written
///
/// Built once from [`DEFAULT_DROP_COLUMNS`] plus any configured extras. The
/// grouping key and derived `Count` / `Intensity Experiment` / `Log2FC`
/// headers are never part of the policy, whatever the configuration says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPolicy {
    drop: BTreeSet<String>,
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl ColumnPolicy {
    /// Default drop-list extended with `extra` names
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let drop = DEFAULT_DROP_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(extra.into_iter().map(Into::into))
            .filter(|name| !is_protected(name))
            .collect();
        Self { drop }
    }

    /// Whether `name` is on the drop-list
    pub fn contains(&self, name: &str) -> bool {
        self.drop.contains(name)
    }

    /// Names on the drop-list, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drop.iter().map(String::as_str)
    }

    /// Number of names on the drop-list
    pub fn len(&self) -> usize {
        self.drop.len()
    }

    /// Whether the drop-list is empty
    pub fn is_empty(&self) -> bool {
        self.drop.is_empty()
    }
}

/// Columns that pruning must never remove
pub fn is_protected(name: &str) -> bool {
    name == PROTEIN_NAMES
        || name.starts_with("Count ")
        || name.starts_with("Intensity Experiment ")
        || name.starts_with("Log2FC ")
}
