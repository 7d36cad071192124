pub mod monte_carlo;
pub mod percentile;
pub mod sampler;

pub use monte_carlo::{MonteCarloSimulator, SimulationMode, trial_seed};
pub use percentile::{PercentileEstimate, SampleSet, SortedSamples, percentile_of_sorted};
pub use sampler::{Triangular, sample_duration};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AggregationError, ScheduleError, ScheduleResult};
use crate::graph::{TaskGraph, TopologicalOrder, topological_order};

pub const DEFAULT_TRIALS: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PERCENTILES: [f64; 3] = [50.0, 80.0, 90.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: usize,
    pub seed: u64,
    pub percentiles: Vec<f64>,
    pub mode: SimulationMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            mode: SimulationMode::Sequential,
        }
    }
}

impl SimulationConfig {
    pub fn new(trials: usize, seed: u64) -> Self {
        Self {
            trials,
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.trials == 0 {
            return Err(ScheduleError::InvalidConfig(
                "trial count must be positive".into(),
            ));
        }
        if self.percentiles.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "at least one percentile is required".into(),
            ));
        }
        if let Some(&p) = self
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(AggregationError::PercentileOutOfRange(p).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub trials: usize,
    pub seed: u64,
    pub mode: SimulationMode,
    pub percentiles: Vec<PercentileEstimate>,
    pub mean_days: f64,
    pub min_days: f64,
    pub max_days: f64,
    #[serde(skip)]
    samples: SampleSet,
}

impl SimulationReport {
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Duration at percentile `p`, if it was requested.
    pub fn get(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|estimate| estimate.percentile == p)
            .map(|estimate| estimate.duration_days)
    }

    pub fn to_cli_summary(&self) -> String {
        self.percentiles
            .iter()
            .map(|estimate| format!("P{}={:.1} d", estimate.percentile, estimate.duration_days))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Runs the simulator over an already sequenced graph and reduces the samples
/// to the configured percentiles.
pub fn simulate_ordered(
    graph: &TaskGraph,
    order: &TopologicalOrder,
    config: &SimulationConfig,
) -> ScheduleResult<SimulationReport> {
    config.validate()?;
    let samples = MonteCarloSimulator::new(graph, order, config.trials, config.seed)?
        .with_mode(config.mode)
        .run();

    let sorted = samples.sorted();
    let percentiles = sorted.percentiles(&config.percentiles)?;
    let report = SimulationReport {
        trials: config.trials,
        seed: config.seed,
        mode: config.mode,
        percentiles,
        mean_days: samples.mean().unwrap_or(0.0),
        min_days: samples.min().unwrap_or(0.0),
        max_days: samples.max().unwrap_or(0.0),
        samples,
    };
    info!(
        trials = report.trials,
        seed = report.seed,
        summary = %report.to_cli_summary(),
        "simulation complete"
    );
    Ok(report)
}

pub fn simulate(graph: &TaskGraph, config: &SimulationConfig) -> ScheduleResult<SimulationReport> {
    let order = topological_order(graph)?;
    simulate_ordered(graph, &order, config)
}
