use std::io;
use thiserror::Error;

use crate::error::ScheduleError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;

pub use file::{
    load_schedule_from_json, load_tasks_from_json, read_tasks_csv, read_tasks_csv_from_reader,
    save_schedule_to_json, save_tasks_to_json, write_cpm_csv, write_cpm_csv_to_writer,
    write_tasks_csv,
};
