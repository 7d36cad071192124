pub mod calculations;
pub mod config;
pub mod error;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod metadata;
pub mod persistence;
pub mod schedule;
pub mod simulation;
pub mod task;
pub mod task_validation;

pub use calculations::{CpmResult, TaskTiming, critical_path};
pub use config::{ConfigError, EngineConfig};
pub use error::{AggregationError, ScheduleError, ScheduleResult};
pub use graph::{TaskGraph, TopologicalOrder, topological_order};
pub use logging::{LogLevel, init_logging};
pub use metadata::ScheduleMetadata;
pub use schedule::{Schedule, ScheduleSummary};
pub use simulation::{
    MonteCarloSimulator, PercentileEstimate, SampleSet, SimulationConfig, SimulationMode,
    SimulationReport, simulate,
};
pub use task::{Task, TaskRecord, ThreePointEstimate};
pub use task_validation::ValidationConfig;
