use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ride_planner::error::PlannerError;
use ride_planner::index::IndexKey;
use ride_planner::output::validate_output;
use ride_planner::queue::TieBreak;
use ride_planner::runner::{Job, load_options, score_file, solve_files};
use ride_planner::solver::SolveOptions;

#[derive(Parser)]
#[command(
    name = "ride-planner",
    about = "Greedy nearest-ride planner for time-windowed grid rides"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan one or more problem files, in parallel
    Solve {
        /// Problem files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for assignment files (default: next to each input)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// JSON file with solver options
        #[arg(long)]
        config: Option<PathBuf>,
        /// Index candidates examined per vehicle turn
        #[arg(long)]
        probe_budget: Option<usize>,
        /// Ride attributes the spatial index is keyed on
        #[arg(long, value_enum)]
        index_key: Option<IndexKeyArg>,
        /// Break clock ties with seeded random jitter instead of vehicle id
        #[arg(long)]
        seed: Option<u64>,
        /// Re-read and validate every written assignment
        #[arg(long)]
        validate: bool,
        /// Print a JSON report per file to stdout
        #[arg(long)]
        json: bool,
    },
    /// Check an assignment file for format errors and repeated rides
    Validate {
        /// Assignment file
        file: PathBuf,
    },
    /// Score an assignment file against its problem
    Score {
        /// Problem file
        problem: PathBuf,
        /// Assignment file
        assignment: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexKeyArg {
    Plane,
    SpaceTime,
}

impl From<IndexKeyArg> for IndexKey {
    fn from(arg: IndexKeyArg) -> Self {
        match arg {
            IndexKeyArg::Plane => IndexKey::Plane,
            IndexKeyArg::SpaceTime => IndexKey::SpaceTime,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    enable_tracing();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when some input failed but others were processed.
fn run(cli: Cli) -> Result<bool, PlannerError> {
    match cli.command {
        Commands::Solve {
            inputs,
            output_dir,
            config,
            probe_budget,
            index_key,
            seed,
            validate,
            json,
        } => {
            let mut options = match config {
                Some(path) => load_options(&path)?,
                None => SolveOptions::default(),
            };
            if let Some(budget) = probe_budget {
                options.probe_budget = budget;
            }
            if let Some(key) = index_key {
                options.index_key = key.into();
            }
            if let Some(seed) = seed {
                options.tie_break = TieBreak::Jitter { seed };
            }
            options.validate()?;

            if let Some(dir) = &output_dir {
                std::fs::create_dir_all(dir)?;
            }
            let jobs: Vec<Job> = inputs
                .into_iter()
                .map(|input| Job::new(input, output_dir.as_deref()))
                .collect();

            let mut all_ok = true;
            let mut total = 0;
            for report in solve_files(&jobs, &options, validate) {
                match report {
                    Ok(report) => {
                        total += report.score.total();
                        if json {
                            println!("{}", report.to_json()?);
                        }
                    }
                    Err(_) => all_ok = false,
                }
            }
            tracing::info!(files = jobs.len(), total_score = total, "done");
            Ok(all_ok)
        }
        Commands::Validate { file } => {
            let text = std::fs::read_to_string(&file)?;
            let summary = validate_output(&text)?;
            tracing::info!(
                file = %file.display(),
                vehicles = summary.vehicles,
                rides = summary.rides,
                "assignment valid"
            );
            Ok(true)
        }
        Commands::Score {
            problem,
            assignment,
        } => {
            let score = score_file(&problem, &assignment)?;
            println!("{}", score.total());
            tracing::info!(
                on_time = score.on_time,
                late = score.late,
                bonus_rides = score.bonus_rides,
                distance_points = score.distance_points,
                bonus_points = score.bonus_points,
                "scored"
            );
            Ok(true)
        }
    }
}
