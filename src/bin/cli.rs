use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use construction_schedule::persistence::{read_tasks_csv, write_cpm_csv};
use construction_schedule::{EngineConfig, LogLevel, Schedule, SimulationConfig, SimulationMode};
use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

/// Trial count used when neither a flag nor a config file sets one.
const CLI_DEFAULT_ITERATIONS: usize = 2000;

#[derive(Debug, Parser)]
#[command(
    name = "construction-schedule",
    version,
    about = "Critical path and Monte Carlo analysis for construction schedules"
)]
struct Cli {
    /// JSON engine config (simulation defaults, validation, metadata).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (overrides CONSTRUCTION_SCHEDULE_LOG).
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deterministic critical path analysis.
    Cpm(CpmArgs),
    /// Monte Carlo duration percentiles.
    Montecarlo(MonteCarloArgs),
    /// Build and sequence the task graph without computing anything.
    Validate {
        infile: PathBuf,
    },
}

#[derive(Debug, Args)]
struct CpmArgs {
    infile: PathBuf,

    /// Write the result table as CSV.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Print the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct MonteCarloArgs {
    infile: PathBuf,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Percentile to report; repeat for several.
    #[arg(long = "percentile", value_name = "P")]
    percentiles: Vec<f64>,

    /// Run trials on all cores with per-trial generators.
    #[arg(long)]
    parallel: bool,

    #[arg(long)]
    json: bool,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| match col.get(row_idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::Float64(v)) => format!("{v:.2}"),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(av) => av.to_string(),
            })
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(s.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn load_config(path: Option<&Path>) -> CliResult<Option<EngineConfig>> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)?;
            debug!(path = %path.display(), "loaded engine config");
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

fn load_schedule(infile: &Path, config: Option<&EngineConfig>) -> CliResult<Schedule> {
    let records = read_tasks_csv(infile)?;
    let schedule = match config {
        Some(config) => Schedule::from_config(&records, config)?,
        None => Schedule::from_records(&records)?,
    };
    Ok(schedule)
}

fn run_cpm(args: &CpmArgs, config: Option<&EngineConfig>) -> CliResult<()> {
    let schedule = load_schedule(&args.infile, config)?;
    let result = schedule.critical_path();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let table = schedule.cpm_table(&result)?;
        print!("{}", render_df_as_text_table(&table));
        println!("{}", schedule.summary(&result).to_cli_summary());
    }
    if let Some(out) = &args.out {
        write_cpm_csv(&result, out)?;
        println!("Wrote {}", out.display());
    }
    println!("Project duration: {:.2} days", result.project_duration_days());
    Ok(())
}

fn run_montecarlo(args: &MonteCarloArgs, config: Option<&EngineConfig>) -> CliResult<()> {
    let schedule = load_schedule(&args.infile, config)?;

    let mut sim = match config {
        Some(config) => config.simulation.clone(),
        None => SimulationConfig {
            trials: CLI_DEFAULT_ITERATIONS,
            ..SimulationConfig::default()
        },
    };
    if let Some(iterations) = args.iterations {
        sim.trials = iterations;
    }
    if let Some(seed) = args.seed {
        sim.seed = seed;
    }
    if !args.percentiles.is_empty() {
        sim.percentiles = args.percentiles.clone();
    }
    if args.parallel {
        sim.mode = SimulationMode::Parallel;
    }

    let report = schedule.simulate(&sim)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_cli_summary());
    }
    Ok(())
}

fn run_validate(infile: &Path, config: Option<&EngineConfig>) -> CliResult<()> {
    let schedule = load_schedule(infile, config)?;
    let estimated = schedule.tasks().iter().filter(|t| t.has_estimate()).count();
    println!(
        "OK: {} tasks, {} with three-point estimates",
        schedule.len(),
        estimated
    );
    Ok(())
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Cpm(args) => run_cpm(args, config.as_ref()),
        Command::Montecarlo(args) => run_montecarlo(args, config.as_ref()),
        Command::Validate { infile } => run_validate(infile, config.as_ref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    construction_schedule::init_logging(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
