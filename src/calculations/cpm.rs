use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use super::backward_pass::BackwardPass;
use super::forward_pass::ForwardPass;
use crate::error::ScheduleResult;
use crate::graph::{TaskGraph, TopologicalOrder, topological_order};

/// Total float below this magnitude marks a task as critical.
pub const CRITICAL_FLOAT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTiming {
    pub task_id: String,
    pub early_start: f64,
    pub early_finish: f64,
    pub late_start: f64,
    pub late_finish: f64,
    pub total_float: f64,
    pub is_critical: bool,
}

/// Deterministic critical path result.
///
/// Timings are listed in topological order. The critical tasks are every task
/// with zero total float; they need not form a single chain.
#[derive(Debug, Clone, Serialize)]
pub struct CpmResult {
    project_duration_days: f64,
    timings: Vec<TaskTiming>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CpmResult {
    pub fn project_duration_days(&self) -> f64 {
        self.project_duration_days
    }

    pub fn timings(&self) -> &[TaskTiming] {
        &self.timings
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskTiming> {
        self.index.get(task_id).map(|&pos| &self.timings[pos])
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Critical task ids in topological order.
    pub fn critical_tasks(&self) -> Vec<&str> {
        self.timings
            .iter()
            .filter(|timing| timing.is_critical)
            .map(|timing| timing.task_id.as_str())
            .collect()
    }

    /// Timings sorted by earliest start; ties keep topological order.
    pub fn by_early_start(&self) -> Vec<&TaskTiming> {
        let mut rows: Vec<&TaskTiming> = self.timings.iter().collect();
        rows.sort_by(|a, b| a.early_start.total_cmp(&b.early_start));
        rows
    }
}

/// Forward and backward passes over an already sequenced graph.
pub fn critical_path_analysis(graph: &TaskGraph, order: &TopologicalOrder) -> CpmResult {
    let durations = graph.durations();
    let early = ForwardPass::new(graph, order).execute(&durations);
    let late = BackwardPass::new(graph, order).execute(&durations, early.project_duration);

    let mut timings = Vec::with_capacity(order.len());
    let mut index = HashMap::with_capacity(order.len());
    for idx in order.iter() {
        let task_id = graph.task(idx).id().to_string();
        let total_float = late.late_start[idx] - early.early_start[idx];
        index.insert(task_id.clone(), timings.len());
        timings.push(TaskTiming {
            task_id,
            early_start: early.early_start[idx],
            early_finish: early.early_finish[idx],
            late_start: late.late_start[idx],
            late_finish: late.late_finish[idx],
            total_float,
            is_critical: total_float.abs() < CRITICAL_FLOAT_TOLERANCE,
        });
    }

    let result = CpmResult {
        project_duration_days: early.project_duration,
        timings,
        index,
    };
    info!(
        tasks = result.len(),
        project_duration_days = result.project_duration_days,
        critical = result.critical_tasks().len(),
        "critical path computed"
    );
    result
}

/// Sequences the graph and runs the critical path passes. A cycle or a
/// dangling predecessor fails the whole computation.
pub fn critical_path(graph: &TaskGraph) -> ScheduleResult<CpmResult> {
    let order = topological_order(graph)?;
    Ok(critical_path_analysis(graph, &order))
}
