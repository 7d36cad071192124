use crate::graph::{TaskGraph, TopologicalOrder};

/// Earliest start/finish per task, indexed by task position in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyTimes {
    pub early_start: Vec<f64>,
    pub early_finish: Vec<f64>,
    pub project_duration: f64,
}

/// Forward pass over a sequenced graph.
///
/// Durations are supplied per call, indexed like the graph's tasks, so the same
/// pass serves the deterministic schedule and every simulation trial.
pub struct ForwardPass<'a> {
    graph: &'a TaskGraph,
    order: &'a TopologicalOrder,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a TaskGraph, order: &'a TopologicalOrder) -> Self {
        Self { graph, order }
    }

    pub fn execute(&self, durations: &[f64]) -> EarlyTimes {
        let mut early_start = vec![0.0; self.graph.len()];
        let mut early_finish = vec![0.0; self.graph.len()];
        let project_duration =
            self.run(durations, Some(early_start.as_mut_slice()), &mut early_finish);
        EarlyTimes {
            early_start,
            early_finish,
            project_duration,
        }
    }

    /// Project duration only, reusing `early_finish` as scratch space.
    pub fn project_duration(&self, durations: &[f64], early_finish: &mut [f64]) -> f64 {
        self.run(durations, None, early_finish)
    }

    fn run(
        &self,
        durations: &[f64],
        mut early_start: Option<&mut [f64]>,
        early_finish: &mut [f64],
    ) -> f64 {
        let mut latest: Option<f64> = None;
        for idx in self.order.iter() {
            let es = self.max_predecessor_finish(idx, early_finish);
            let ef = es + durations[idx];
            if let Some(starts) = early_start.as_deref_mut() {
                starts[idx] = es;
            }
            early_finish[idx] = ef;
            latest = Some(latest.map_or(ef, |current| current.max(ef)));
        }
        latest.unwrap_or(0.0)
    }

    fn max_predecessor_finish(&self, idx: usize, early_finish: &[f64]) -> f64 {
        self.graph
            .predecessors_of(idx)
            .iter()
            .map(|&pred| early_finish[pred])
            .reduce(f64::max)
            .unwrap_or(0.0)
    }
}
