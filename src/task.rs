use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::error::{ScheduleError, ScheduleResult};

/// Optimistic / most likely / pessimistic durations for a task, in days.
///
/// The ordering `optimistic <= likely <= pessimistic` is assumed by the
/// sampler but not enforced here; see `task_validation` for the opt-in check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePointEstimate {
    pub optimistic: f64,
    pub likely: f64,
    pub pessimistic: f64,
}

impl ThreePointEstimate {
    pub fn new(optimistic: f64, likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            likely,
            pessimistic,
        }
    }

    /// Builds an estimate only when all three values are present.
    pub fn from_parts(
        optimistic: Option<f64>,
        likely: Option<f64>,
        pessimistic: Option<f64>,
    ) -> Option<Self> {
        match (optimistic, likely, pessimistic) {
            (Some(o), Some(l), Some(p)) => Some(Self::new(o, l, p)),
            _ => None,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.optimistic <= self.likely && self.likely <= self.pessimistic
    }
}

/// A unit of work in the precedence network. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: String,
    name: String,
    duration_days: f64,
    predecessors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimate: Option<ThreePointEstimate>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_days: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_days,
            predecessors: Vec::new(),
            estimate: None,
        }
    }

    /// Sets the predecessor list. Repeated identifiers collapse to their first
    /// occurrence.
    pub fn with_predecessors<I, S>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        self.predecessors = predecessors
            .into_iter()
            .map(Into::into)
            .filter(|pred: &String| seen.insert(pred.clone()))
            .collect();
        self
    }

    pub fn with_estimate(mut self, optimistic: f64, likely: f64, pessimistic: f64) -> Self {
        self.estimate = Some(ThreePointEstimate::new(optimistic, likely, pessimistic));
        self
    }

    pub fn with_three_point(mut self, estimate: Option<ThreePointEstimate>) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_days(&self) -> f64 {
        self.duration_days
    }

    pub fn predecessors(&self) -> &[String] {
        &self.predecessors
    }

    pub fn estimate(&self) -> Option<&ThreePointEstimate> {
        self.estimate.as_ref()
    }

    pub fn has_estimate(&self) -> bool {
        self.estimate.is_some()
    }
}

/// A task record as supplied by an ingestion layer, before validation.
///
/// Every field is optional at this level so that a missing required field can
/// be reported by name instead of failing deserialization opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: Option<String>,
    pub name: Option<String>,
    pub duration_days: Option<f64>,
    pub predecessors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimistic_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likely_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pessimistic_days: Option<f64>,
}

impl TaskRecord {
    pub const REQUIRED_FIELDS: [&'static str; 4] =
        ["task_id", "name", "duration_days", "predecessors"];

    pub fn new(
        task_id: impl Into<String>,
        name: impl Into<String>,
        duration_days: f64,
        predecessors: &[&str],
    ) -> Self {
        Self {
            task_id: Some(task_id.into()),
            name: Some(name.into()),
            duration_days: Some(duration_days),
            predecessors: Some(predecessors.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_estimate(mut self, optimistic: f64, likely: f64, pessimistic: f64) -> Self {
        self.optimistic_days = Some(optimistic);
        self.likely_days = Some(likely);
        self.pessimistic_days = Some(pessimistic);
        self
    }

    /// Converts the record into a `Task`, naming the first absent required
    /// field on failure.
    pub fn to_task(&self) -> ScheduleResult<Task> {
        let id = self
            .task_id
            .clone()
            .ok_or_else(|| ScheduleError::schema("task_id"))?;
        let name = self
            .name
            .clone()
            .ok_or_else(|| ScheduleError::schema("name"))?;
        let duration_days = self
            .duration_days
            .ok_or_else(|| ScheduleError::schema("duration_days"))?;
        let predecessors = self
            .predecessors
            .as_ref()
            .ok_or_else(|| ScheduleError::schema("predecessors"))?;

        let estimate = ThreePointEstimate::from_parts(
            self.optimistic_days,
            self.likely_days,
            self.pessimistic_days,
        );
        let partial = [self.optimistic_days, self.likely_days, self.pessimistic_days]
            .iter()
            .any(Option::is_some);
        if estimate.is_none() && partial {
            warn!(
                task_id = %id,
                "incomplete three-point estimate; falling back to fixed duration"
            );
        }

        let predecessors = predecessors
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();

        Ok(Task::new(id, name, duration_days)
            .with_predecessors(predecessors)
            .with_three_point(estimate))
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let estimate = task.estimate();
        Self {
            task_id: Some(task.id().to_string()),
            name: Some(task.name().to_string()),
            duration_days: Some(task.duration_days()),
            predecessors: Some(task.predecessors().to_vec()),
            optimistic_days: estimate.map(|e| e.optimistic),
            likely_days: estimate.map(|e| e.likely),
            pessimistic_days: estimate.map(|e| e.pessimistic),
        }
    }
}

/// Splits a comma-delimited predecessor field, trimming entries and dropping
/// empty ones.
pub fn parse_predecessors(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predecessors_are_trimmed_and_deduplicated() {
        assert_eq!(parse_predecessors(" A, B ,,C,"), vec!["A", "B", "C"]);
        assert!(parse_predecessors("").is_empty());

        let task = Task::new("D", "D", 1.0).with_predecessors(["B", "C", "B"]);
        assert_eq!(task.predecessors(), ["B", "C"]);
    }

    #[test]
    fn record_reports_first_missing_field() {
        let mut record = TaskRecord::new("A", "A", 5.0, &[]);
        record.duration_days = None;
        record.predecessors = None;
        let err = record.to_task().unwrap_err();
        assert_eq!(err, ScheduleError::schema("duration_days"));
    }

    #[test]
    fn partial_estimate_is_dropped() {
        let mut record = TaskRecord::new("A", "A", 5.0, &[]);
        record.optimistic_days = Some(4.0);
        record.likely_days = Some(5.0);
        let task = record.to_task().unwrap();
        assert!(!task.has_estimate());

        let full = TaskRecord::new("B", "B", 3.0, &["A"])
            .with_estimate(2.0, 3.0, 6.0)
            .to_task()
            .unwrap();
        assert_eq!(full.estimate(), Some(&ThreePointEstimate::new(2.0, 3.0, 6.0)));
    }
}
