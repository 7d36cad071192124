use super::{PersistenceError, PersistenceResult};
use crate::calculations::CpmResult;
use crate::error::ScheduleError;
use crate::task::{Task, TaskRecord, parse_predecessors};
use crate::{Schedule, ScheduleMetadata};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    #[serde(default)]
    metadata: ScheduleMetadata,
    tasks: Vec<TaskRecord>,
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot {
        metadata: schedule.metadata().clone(),
        tasks: schedule.tasks().iter().map(TaskRecord::from).collect(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    let schedule = Schedule::from_records(&snapshot.tasks)?.with_metadata(snapshot.metadata);
    Ok(schedule)
}

/// Reads a JSON array of task records. Absent required fields are reported
/// when the records are turned into tasks.
pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRecord>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

pub fn save_tasks_to_json<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &records)?;
    Ok(())
}

/// One row of a task sheet. The estimate columns may be absent altogether.
#[derive(Serialize, Deserialize)]
struct TaskCsvRecord {
    task_id: String,
    name: String,
    duration_days: String,
    predecessors: String,
    #[serde(default)]
    optimistic_days: Option<String>,
    #[serde(default)]
    likely_days: Option<String>,
    #[serde(default)]
    pessimistic_days: Option<String>,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let estimate = task.estimate();
        Self {
            task_id: task.id().to_string(),
            name: task.name().to_string(),
            duration_days: task.duration_days().to_string(),
            predecessors: task.predecessors().join(","),
            optimistic_days: estimate.map(|e| e.optimistic.to_string()),
            likely_days: estimate.map(|e| e.likely.to_string()),
            pessimistic_days: estimate.map(|e| e.pessimistic.to_string()),
        }
    }
}

impl TaskCsvRecord {
    fn into_record(self) -> PersistenceResult<TaskRecord> {
        Ok(TaskRecord {
            duration_days: parse_f64(&self.duration_days)?,
            predecessors: Some(parse_predecessors(&self.predecessors)),
            optimistic_days: parse_optional_f64(self.optimistic_days.as_deref())?,
            likely_days: parse_optional_f64(self.likely_days.as_deref())?,
            pessimistic_days: parse_optional_f64(self.pessimistic_days.as_deref())?,
            task_id: Some(self.task_id),
            name: Some(self.name),
        })
    }
}

/// Reads task records from a CSV sheet with a header row.
///
/// The header must name `task_id`, `name`, `duration_days` and
/// `predecessors`; the first one missing is reported as a schema error.
/// Predecessors are comma-delimited inside their (quoted) field.
pub fn read_tasks_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRecord>> {
    let file = File::open(path)?;
    read_tasks_csv_from_reader(file)
}

pub fn read_tasks_csv_from_reader<R: Read>(reader: R) -> PersistenceResult<Vec<TaskRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(missing) = TaskRecord::REQUIRED_FIELDS
        .iter()
        .find(|field| !headers.iter().any(|h| h == **field))
    {
        return Err(ScheduleError::schema(*missing).into());
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<TaskCsvRecord>() {
        records.push(row?.into_record()?);
    }
    debug!(tasks = records.len(), "read task sheet");
    Ok(records)
}

pub fn write_tasks_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct CpmCsvRow<'a> {
    task_id: &'a str,
    #[serde(rename = "ES")]
    early_start: f64,
    #[serde(rename = "EF")]
    early_finish: f64,
    #[serde(rename = "LS")]
    late_start: f64,
    #[serde(rename = "LF")]
    late_finish: f64,
    total_float: f64,
    critical: bool,
}

/// Writes the critical path table, one row per task sorted by earliest start.
pub fn write_cpm_csv<P: AsRef<Path>>(result: &CpmResult, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_cpm_csv_to_writer(result, file)
}

pub fn write_cpm_csv_to_writer<W: Write>(result: &CpmResult, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for timing in result.by_early_start() {
        writer.serialize(CpmCsvRow {
            task_id: &timing.task_id,
            early_start: timing.early_start,
            early_finish: timing.early_finish,
            late_start: timing.late_start,
            late_finish: timing.late_finish,
            total_float: timing.total_float,
            critical: timing.is_critical,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid number '{input}': {e}")))
}

fn parse_optional_f64(input: Option<&str>) -> PersistenceResult<Option<f64>> {
    match input {
        Some(value) => parse_f64(value),
        None => Ok(None),
    }
}
