use std::collections::VecDeque;
use tracing::{debug, warn};

use super::TaskGraph;
use crate::error::{ScheduleError, ScheduleResult};

/// Task indices ordered so that every task follows all of its predecessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    indices: Vec<usize>,
}

impl TopologicalOrder {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn ids<'g>(&self, graph: &'g TaskGraph) -> Vec<&'g str> {
        self.indices.iter().map(|&idx| graph.task(idx).id()).collect()
    }
}

/// Orders the graph with Kahn's algorithm.
///
/// Ready tasks are served FIFO: the initial queue holds dependency-free tasks
/// in input order, and tasks released by a completed predecessor join the back
/// of the queue in input order. A predecessor id that matches no task keeps its
/// dependent pending forever, so it surfaces as a cycle.
pub fn topological_order(graph: &TaskGraph) -> ScheduleResult<TopologicalOrder> {
    let mut pending: Vec<usize> = (0..graph.len())
        .map(|idx| graph.declared_predecessor_count(idx))
        .collect();

    let mut ready: VecDeque<usize> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(idx, _)| idx)
        .collect();

    let mut indices = Vec::with_capacity(graph.len());
    while let Some(idx) = ready.pop_front() {
        indices.push(idx);
        for &succ in graph.successors_of(idx) {
            pending[succ] -= 1;
            if pending[succ] == 0 {
                ready.push_back(succ);
            }
        }
    }

    if indices.len() < graph.len() {
        let unresolved: Vec<String> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(idx, _)| graph.task(idx).id().to_string())
            .collect();
        for (task_id, pred) in graph.dangling_predecessors() {
            warn!(task_id, predecessor = pred, "dangling predecessor blocks ordering");
        }
        for cycle in graph.cycles() {
            warn!(members = %cycle.join(" -> "), "precedence cycle");
        }
        return Err(ScheduleError::Cycle { unresolved });
    }

    debug!(tasks = indices.len(), "topological order complete");
    Ok(TopologicalOrder { indices })
}
