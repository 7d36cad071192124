use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::percentile::SampleSet;
use super::sampler::sample_duration;
use crate::calculations::ForwardPass;
use crate::error::{ScheduleError, ScheduleResult};
use crate::graph::{TaskGraph, TopologicalOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// One generator seeded once, its stream consumed trial by trial in
    /// topological task order.
    #[default]
    Sequential,
    /// Trials fan out over rayon; trial `i` owns a generator seeded from
    /// `(seed, i)`. Reproducible per seed, but a different sample set than
    /// `Sequential`.
    Parallel,
}

pub struct MonteCarloSimulator<'a> {
    graph: &'a TaskGraph,
    order: &'a TopologicalOrder,
    trials: usize,
    seed: u64,
    mode: SimulationMode,
}

impl<'a> MonteCarloSimulator<'a> {
    pub fn new(
        graph: &'a TaskGraph,
        order: &'a TopologicalOrder,
        trials: usize,
        seed: u64,
    ) -> ScheduleResult<Self> {
        if trials == 0 {
            return Err(ScheduleError::InvalidConfig(
                "trial count must be positive".into(),
            ));
        }
        Ok(Self {
            graph,
            order,
            trials,
            seed,
            mode: SimulationMode::Sequential,
        })
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn run(&self) -> SampleSet {
        debug!(
            trials = self.trials,
            seed = self.seed,
            mode = ?self.mode,
            uncertain_tasks = self.graph.tasks().iter().filter(|t| t.has_estimate()).count(),
            "starting monte carlo simulation"
        );
        let samples = match self.mode {
            SimulationMode::Sequential => self.run_sequential(),
            SimulationMode::Parallel => self.run_parallel(),
        };
        SampleSet::new(samples)
    }

    fn run_sequential(&self) -> Vec<f64> {
        let forward = ForwardPass::new(self.graph, self.order);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut durations = self.graph.durations();
        let mut scratch = vec![0.0; self.graph.len()];

        (0..self.trials)
            .map(|_| self.trial(&forward, &mut rng, &mut durations, &mut scratch))
            .collect()
    }

    fn run_parallel(&self) -> Vec<f64> {
        let forward = ForwardPass::new(self.graph, self.order);
        (0..self.trials)
            .into_par_iter()
            .map_init(
                || (self.graph.durations(), vec![0.0; self.graph.len()]),
                |(durations, scratch), trial| {
                    let mut rng = StdRng::seed_from_u64(trial_seed(self.seed, trial as u64));
                    self.trial(&forward, &mut rng, durations, scratch)
                },
            )
            .collect()
    }

    fn trial(
        &self,
        forward: &ForwardPass<'_>,
        rng: &mut StdRng,
        durations: &mut [f64],
        scratch: &mut [f64],
    ) -> f64 {
        for idx in self.order.iter() {
            let task = self.graph.task(idx);
            if task.has_estimate() {
                durations[idx] = sample_duration(task, rng);
            }
        }
        forward.project_duration(durations, scratch)
    }
}

/// Seed for trial `trial` of a parallel run: splitmix64 over the master seed
/// advanced by the trial index.
pub fn trial_seed(seed: u64, trial: u64) -> u64 {
    let mut z = seed.wrapping_add(trial.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
