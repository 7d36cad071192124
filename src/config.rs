//! Engine configuration, loaded from JSON.
//!
//! Every section is optional in the file; absent fields take their defaults.
//!
//! ```json
//! {
//!   "metadata": { "project_name": "Bridge deck", "project_start_date": "2025-03-03" },
//!   "simulation": { "trials": 5000, "seed": 7, "percentiles": [50, 80, 95], "mode": "parallel" },
//!   "validation": { "strict_estimates": true }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::metadata::ScheduleMetadata;
use crate::simulation::SimulationConfig;
use crate::task_validation::ValidationConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub metadata: ScheduleMetadata,
    pub simulation: SimulationConfig,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
