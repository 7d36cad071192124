use crate::graph::{TaskGraph, TopologicalOrder};

/// Latest start/finish per task, indexed by task position in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LateTimes {
    pub late_start: Vec<f64>,
    pub late_finish: Vec<f64>,
}

pub struct BackwardPass<'a> {
    graph: &'a TaskGraph,
    order: &'a TopologicalOrder,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a TaskGraph, order: &'a TopologicalOrder) -> Self {
        Self { graph, order }
    }

    pub fn execute(&self, durations: &[f64], project_duration: f64) -> LateTimes {
        let mut late_start = vec![0.0; self.graph.len()];
        let mut late_finish = vec![0.0; self.graph.len()];

        // Reverse topological order: every successor is settled first
        for idx in self.order.iter().rev() {
            let lf = self
                .graph
                .successors_of(idx)
                .iter()
                .map(|&succ| late_start[succ])
                .reduce(f64::min)
                .unwrap_or(project_duration);
            late_finish[idx] = lf;
            late_start[idx] = lf - durations[idx];
        }

        LateTimes {
            late_start,
            late_finish,
        }
    }
}
