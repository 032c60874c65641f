//! roster-availability - builds the supervisor availability matrix handed to
//! the defense scheduler.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use roster_availability_lib::export::{
    save_matrix_workbook, save_preferences_csv, write_report_json, write_solver_config,
    SolverConfig,
};
use roster_availability_lib::{reconcile_files, ReconcileConfig};

#[derive(Parser, Debug)]
#[command(name = "roster-availability")]
#[command(about = "Builds a supervisor availability matrix from a roster and availability file")]
#[command(version)]
struct Args {
    /// Student roster (.xlsx, .xls, .csv or .tsv) with a supervisor column
    #[arg(long, env = "ROSTER_PATH")]
    roster: PathBuf,

    /// Availability file: supervisor name followed by 0/1 slot columns
    #[arg(long, env = "AVAILABILITY_PATH")]
    availability: Option<PathBuf>,

    /// Number of days to schedule
    #[arg(long, default_value_t = 9, env = "SCHEDULE_DAYS")]
    days: usize,

    /// Time slots per day (at most 10)
    #[arg(long, default_value_t = 7, env = "SCHEDULE_SLOTS_PER_DAY")]
    slots_per_day: usize,

    /// First day of the schedule (YYYY-MM-DD, dd/mm/yyyy or a millisecond timestamp)
    #[arg(long, env = "SCHEDULE_START_DATE")]
    start_date: Option<String>,

    /// Rooms available per slot, passed through to the solver
    #[arg(long, default_value_t = 3, env = "SCHEDULE_ROOMS")]
    rooms: usize,

    /// Students per room, passed through to the solver
    #[arg(long, default_value_t = 5, env = "SCHEDULE_ROOM_CAPACITY")]
    room_capacity: usize,

    /// Roster column holding supervisor names (detected from headers when omitted)
    #[arg(long)]
    supervisor_column: Option<String>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the solver preference CSV
    #[arg(long)]
    preferences_csv: Option<PathBuf>,

    /// Write the solver config JSON
    #[arg(long)]
    solver_config: Option<PathBuf>,

    /// Write an Excel workbook of the matrix and diagnostics
    #[arg(long)]
    workbook: Option<PathBuf>,
}

fn main() -> Result<()> {
    // stdout carries the JSON report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_availability_lib=info,roster_availability=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = ReconcileConfig {
        days: args.days,
        slots_per_day: args.slots_per_day,
        start_date: args.start_date.clone(),
        rooms: args.rooms,
        room_capacity: args.room_capacity,
    };

    let report = reconcile_files(
        &args.roster,
        args.availability.as_deref(),
        args.supervisor_column.as_deref(),
        config,
    )
    .with_context(|| format!("Failed to reconcile roster {}", args.roster.display()))?;

    info!(
        "Built a {}x{} matrix for {} supervisors with {} diagnostics",
        report.matrix.day_count,
        report.matrix.slots_per_day,
        report.matrix.supervisors.len(),
        report.diagnostics.len()
    );

    if let Some(path) = &args.preferences_csv {
        save_preferences_csv(&report.matrix, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Preferences written to {}", path.display());
    }

    if let Some(path) = &args.solver_config {
        write_solver_config(&SolverConfig::from_matrix(&report.matrix), path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Solver config written to {}", path.display());
    }

    if let Some(path) = &args.workbook {
        save_matrix_workbook(&report.matrix, &report.diagnostics, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Workbook written to {}", path.display());
    }

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_report_json(&report, io::BufWriter::new(file))?;
            info!("Report written to {}", path.display());
        }
        None => {
            write_report_json(&report, io::stdout().lock())?;
            println!();
        }
    }

    Ok(())
}
