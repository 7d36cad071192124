//! Error taxonomy for graph construction, sequencing and aggregation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("missing required field: {field}")]
    Schema { field: String },

    #[error("duplicate task id {0}")]
    DuplicateTask(String),

    #[error("{0}")]
    InvalidTask(String),

    #[error(
        "cycle detected in predecessors; ensure DAG schedule (unresolved tasks: {})",
        .unresolved.join(", ")
    )]
    Cycle { unresolved: Vec<String> },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScheduleError {
    pub fn schema(field: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AggregationError {
    #[error("cannot compute a percentile over an empty sample set")]
    EmptySampleSet,

    #[error("percentile {0} is outside 0..=100")]
    PercentileOutOfRange(f64),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
