use crate::condition::ConditionError;
use crate::table::TableError;

/// Errors that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A raw or derived column needed for a condition is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A ratio needs at least two conditions
    #[error("At least two conditions are needed for a fold change, got {0}")]
    InsufficientConditions(usize),

    /// A threshold is non-numeric or out of range
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid condition list or selection
    #[error("Condition error: {0}")]
    ConditionError(#[from] ConditionError),

    /// Error from the table model
    #[error("Table error: {0}")]
    TableError(TableError),
}

impl From<TableError> for PipelineError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingColumn(name) => PipelineError::MissingColumn(name),
            other => PipelineError::TableError(other),
        }
    }
}
