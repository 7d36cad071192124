use crate::error::{ScheduleError, ScheduleResult};
use crate::task::Task;
use std::collections::HashSet;

/// Switches for checks that the scheduling engine does not need in order to
/// run, but that callers may want enforced at ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject three-point estimates that are non-finite or not ordered
    /// `optimistic <= likely <= pessimistic`.
    pub strict_estimates: bool,
}

pub fn validate_task(task: &Task, config: &ValidationConfig) -> ScheduleResult<()> {
    let duration = task.duration_days();
    if !duration.is_finite() {
        return Err(ScheduleError::InvalidTask(format!(
            "task {} has non-finite duration {}",
            task.id(),
            duration
        )));
    }
    if duration < 0.0 {
        return Err(ScheduleError::InvalidTask(format!(
            "task {} has negative duration {}",
            task.id(),
            duration
        )));
    }

    if config.strict_estimates {
        if let Some(estimate) = task.estimate() {
            let values = [estimate.optimistic, estimate.likely, estimate.pessimistic];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ScheduleError::InvalidTask(format!(
                    "task {} has a non-finite three-point estimate",
                    task.id()
                )));
            }
            if !estimate.is_ordered() {
                return Err(ScheduleError::InvalidTask(format!(
                    "task {} three-point estimate must satisfy optimistic <= likely <= pessimistic (got {}, {}, {})",
                    task.id(),
                    estimate.optimistic,
                    estimate.likely,
                    estimate.pessimistic
                )));
            }
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task], config: &ValidationConfig) -> ScheduleResult<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id()) {
            return Err(ScheduleError::DuplicateTask(task.id().to_string()));
        }
        validate_task(task, config)?;
    }
    Ok(())
}
