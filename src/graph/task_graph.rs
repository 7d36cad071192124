use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::ScheduleResult;
use crate::task::{Task, TaskRecord};
use crate::task_validation::{self, ValidationConfig};

/// Immutable precedence network built once per scheduling computation.
///
/// Tasks keep their input order; node `i` of the underlying petgraph DAG is
/// the task at position `i`. Edges run predecessor -> successor and only
/// exist for predecessor ids that resolve to a task in the graph.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    dag: DiGraph<usize, ()>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    declared_predecessors: Vec<usize>,
}

impl TaskGraph {
    pub fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
            dag: DiGraph::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
            declared_predecessors: Vec::new(),
        }
    }

    pub fn from_records(records: &[TaskRecord]) -> ScheduleResult<Self> {
        Self::from_records_with(records, &ValidationConfig::default())
    }

    pub fn from_records_with(
        records: &[TaskRecord],
        config: &ValidationConfig,
    ) -> ScheduleResult<Self> {
        let tasks = records
            .iter()
            .map(TaskRecord::to_task)
            .collect::<ScheduleResult<Vec<_>>>()?;
        Self::from_tasks_with(tasks, config)
    }

    pub fn from_tasks(tasks: Vec<Task>) -> ScheduleResult<Self> {
        Self::from_tasks_with(tasks, &ValidationConfig::default())
    }

    pub fn from_tasks_with(tasks: Vec<Task>, config: &ValidationConfig) -> ScheduleResult<Self> {
        task_validation::validate_task_collection(&tasks, config)?;

        let mut dag: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut index = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            dag.add_node(idx);
            index.insert(task.id().to_string(), idx);
        }

        let mut predecessors = vec![Vec::new(); tasks.len()];
        let mut successors = vec![Vec::new(); tasks.len()];
        let mut declared_predecessors = Vec::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            declared_predecessors.push(task.predecessors().len());
            for pred_id in task.predecessors() {
                match index.get(pred_id) {
                    Some(&pred_idx) => {
                        dag.add_edge(NodeIndex::new(pred_idx), NodeIndex::new(idx), ());
                        predecessors[idx].push(pred_idx);
                        successors[pred_idx].push(idx);
                    }
                    None => warn!(
                        task_id = task.id(),
                        predecessor = pred_id.as_str(),
                        "predecessor does not match any task"
                    ),
                }
            }
        }

        debug!(
            tasks = tasks.len(),
            edges = dag.edge_count(),
            "built task graph"
        );

        Ok(Self {
            tasks,
            index,
            dag,
            predecessors,
            successors,
            declared_predecessors,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, idx: usize) -> &Task {
        &self.tasks[idx]
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.index_of(task_id).map(|idx| &self.tasks[idx])
    }

    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.index.get(task_id).copied()
    }

    pub fn dag(&self) -> &DiGraph<usize, ()> {
        &self.dag
    }

    /// Resolved predecessors of the task at `idx`.
    pub fn predecessors_of(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }

    /// Successors of the task at `idx`, in input order.
    pub fn successors_of(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    /// Number of distinct predecessor ids the task declared, resolved or not.
    pub fn declared_predecessor_count(&self, idx: usize) -> usize {
        self.declared_predecessors[idx]
    }

    pub fn durations(&self) -> Vec<f64> {
        self.tasks.iter().map(Task::duration_days).collect()
    }

    /// `(task, predecessor)` pairs whose predecessor id matches no task.
    pub fn dangling_predecessors(&self) -> Vec<(&str, &str)> {
        self.tasks
            .iter()
            .flat_map(|task| {
                task.predecessors()
                    .iter()
                    .filter(|pred| !self.index.contains_key(pred.as_str()))
                    .map(move |pred| (task.id(), pred.as_str()))
            })
            .collect()
    }

    /// Groups of task ids that lie on a precedence cycle, including
    /// self-dependencies.
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        tarjan_scc(&self.dag)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component.iter().any(|&node| {
                        self.dag
                            .neighbors_directed(node, Direction::Outgoing)
                            .any(|succ| succ == node)
                    })
            })
            .map(|component| {
                let mut members: Vec<usize> = component.iter().map(|&node| self.dag[node]).collect();
                members.sort_unstable();
                members.into_iter().map(|idx| self.tasks[idx].id()).collect()
            })
            .collect()
    }
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::empty()
    }
}
