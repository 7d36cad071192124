use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculations::{CpmResult, critical_path_analysis};
use crate::config::EngineConfig;
use crate::error::ScheduleResult;
use crate::graph::{TaskGraph, TopologicalOrder, topological_order};
use crate::metadata::ScheduleMetadata;
use crate::simulation::{SimulationConfig, SimulationReport, simulate_ordered};
use crate::task::{Task, TaskRecord};
use crate::task_validation::ValidationConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_tasks: Vec<String>,
    pub project_duration_days: f64,
    pub finish_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={:.2}d", self.project_duration_days));
        if let Some(date) = self.finish_date {
            parts.push(format!("finish={}", date));
        }
        if !self.critical_tasks.is_empty() {
            parts.push(format!("crit_tasks={}", self.critical_tasks.join(",")));
        }
        parts.join(", ")
    }
}

/// A sequenced task graph ready for deterministic and stochastic analysis.
///
/// The topological order is computed once at construction and shared by the
/// critical path passes and every simulation run, so a cycle fails
/// construction rather than any later computation.
pub struct Schedule {
    graph: TaskGraph,
    order: TopologicalOrder,
    metadata: ScheduleMetadata,
}

impl Schedule {
    pub fn new(graph: TaskGraph) -> ScheduleResult<Self> {
        let order = topological_order(&graph)?;
        Ok(Self {
            graph,
            order,
            metadata: ScheduleMetadata::default(),
        })
    }

    pub fn empty() -> Self {
        Self {
            graph: TaskGraph::empty(),
            order: TopologicalOrder::default(),
            metadata: ScheduleMetadata::default(),
        }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> ScheduleResult<Self> {
        Self::new(TaskGraph::from_tasks(tasks)?)
    }

    pub fn from_records(records: &[TaskRecord]) -> ScheduleResult<Self> {
        Self::from_records_with(records, &ValidationConfig::default())
    }

    pub fn from_records_with(
        records: &[TaskRecord],
        validation: &ValidationConfig,
    ) -> ScheduleResult<Self> {
        Self::new(TaskGraph::from_records_with(records, validation)?)
    }

    /// Builds from records using the validation switches and metadata of an
    /// engine config.
    pub fn from_config(records: &[TaskRecord], config: &EngineConfig) -> ScheduleResult<Self> {
        Ok(Self::from_records_with(records, &config.validation)?
            .with_metadata(config.metadata.clone()))
    }

    pub fn with_metadata(mut self, metadata: ScheduleMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn set_metadata(&mut self, metadata: ScheduleMetadata) {
        self.metadata = metadata;
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn order(&self) -> &TopologicalOrder {
        &self.order
    }

    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    pub fn tasks(&self) -> &[Task] {
        self.graph.tasks()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn critical_path(&self) -> CpmResult {
        critical_path_analysis(&self.graph, &self.order)
    }

    pub fn simulate(&self, config: &SimulationConfig) -> ScheduleResult<SimulationReport> {
        simulate_ordered(&self.graph, &self.order, config)
    }

    pub fn summary(&self, result: &CpmResult) -> ScheduleSummary {
        let critical_tasks: Vec<String> = result
            .by_early_start()
            .into_iter()
            .filter(|timing| timing.is_critical)
            .map(|timing| timing.task_id.clone())
            .collect();
        ScheduleSummary {
            task_count: result.len(),
            critical_count: critical_tasks.len(),
            critical_tasks,
            project_duration_days: result.project_duration_days(),
            finish_date: self.metadata.date_at(result.project_duration_days()),
        }
    }

    /// Result table sorted by earliest start, with calendar dates when the
    /// metadata carries a project start date.
    pub fn cpm_table(&self, result: &CpmResult) -> PolarsResult<DataFrame> {
        let rows = result.by_early_start();
        let mut columns: Vec<Column> = Vec::with_capacity(10);

        let ids: Vec<&str> = rows.iter().map(|r| r.task_id.as_str()).collect();
        columns.push(Series::new(PlSmallStr::from_static("task_id"), ids).into_column());

        let names: Vec<&str> = rows
            .iter()
            .map(|r| self.graph.get(&r.task_id).map(Task::name).unwrap_or(""))
            .collect();
        columns.push(Series::new(PlSmallStr::from_static("name"), names).into_column());

        let float_columns: [(&'static str, fn(&crate::calculations::TaskTiming) -> f64); 5] = [
            ("ES", |r| r.early_start),
            ("EF", |r| r.early_finish),
            ("LS", |r| r.late_start),
            ("LF", |r| r.late_finish),
            ("total_float", |r| r.total_float),
        ];
        for (name, value) in float_columns {
            let values: Vec<f64> = rows.iter().map(|r| value(r)).collect();
            columns.push(Series::new(PlSmallStr::from_static(name), values).into_column());
        }

        let critical: Vec<bool> = rows.iter().map(|r| r.is_critical).collect();
        columns.push(Series::new(PlSmallStr::from_static("critical"), critical).into_column());

        if self.metadata.project_start_date.is_some() {
            let starts: Vec<Option<i32>> = rows
                .iter()
                .map(|r| self.metadata.date_at(r.early_start).map(date_to_i32))
                .collect();
            let finishes: Vec<Option<i32>> = rows
                .iter()
                .map(|r| self.metadata.date_at(r.early_finish).map(date_to_i32))
                .collect();
            columns.push(
                Series::new(PlSmallStr::from_static("start_date"), starts)
                    .cast(&DataType::Date)?
                    .into_column(),
            );
            columns.push(
                Series::new(PlSmallStr::from_static("finish_date"), finishes)
                    .cast(&DataType::Date)?
                    .into_column(),
            );
        }

        DataFrame::new(columns)
    }
}

/// Polars stores dates as days since the Unix epoch.
fn date_to_i32(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}
