//! File-level driver: read a problem, plan it, write and check the result.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::error::PlannerError;
use crate::output::{parse_assignment, validate_output, write_assignment};
use crate::problem::Problem;
use crate::score::{Score, score};
use crate::solver::{SolveOptions, SolveStats, solve};

/// One problem file and where its assignment goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Job {
    /// Writes next to the input, or into `output_dir`, with an `.out`
    /// extension.
    pub fn new(input: impl Into<PathBuf>, output_dir: Option<&Path>) -> Self {
        let input = input.into();
        let output = output_path_for(&input, output_dir);
        Self { input, output }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rides: usize,
    pub assigned: usize,
    pub score: Score,
    pub stats: SolveStats,
}

impl FileReport {
    /// One-line JSON for `--json` output.
    pub fn to_json(&self) -> Result<String, PlannerError> {
        serde_json::to_string(self).map_err(PlannerError::Report)
    }
}

pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input.with_extension("out");
    match (output_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

/// Reads solver options from a JSON file. Missing fields take defaults.
pub fn load_options(path: &Path) -> Result<SolveOptions, PlannerError> {
    let text = std::fs::read_to_string(path)?;
    let options: SolveOptions = serde_json::from_str(&text)?;
    options.validate()?;
    Ok(options)
}

/// Plans a single problem file and writes its assignment. With `validate`
/// the written file is re-read and checked before reporting.
pub fn solve_file(
    job: &Job,
    options: &SolveOptions,
    validate: bool,
) -> Result<FileReport, PlannerError> {
    let problem = Problem::from_path(&job.input)?;
    info!(
        input = %job.input.display(),
        vehicles = problem.vehicles,
        rides = problem.rides.len(),
        steps = problem.steps,
        "solving"
    );

    let result = solve(&problem, options);
    write_assignment(&job.output, &result)?;

    if validate {
        let written = std::fs::read_to_string(&job.output)?;
        let summary = validate_output(&written)?;
        info!(
            output = %job.output.display(),
            vehicles = summary.vehicles,
            rides = summary.rides,
            "assignment valid"
        );
    }

    let score = score(&problem, result.routes.iter().map(|route| route.ride_ids.as_slice()))?;
    info!(
        output = %job.output.display(),
        assigned = result.assigned_count(),
        score = score.total(),
        bonus_rides = score.bonus_rides,
        "wrote assignment"
    );

    Ok(FileReport {
        input: job.input.clone(),
        output: job.output.clone(),
        rides: problem.rides.len(),
        assigned: result.assigned_count(),
        score,
        stats: result.stats,
    })
}

/// Plans every job in parallel. Each run owns its own state; results come
/// back in job order.
pub fn solve_files(
    jobs: &[Job],
    options: &SolveOptions,
    validate: bool,
) -> Vec<Result<FileReport, PlannerError>> {
    jobs.par_iter()
        .map(|job| {
            let report = solve_file(job, options, validate);
            if let Err(err) = &report {
                error!(input = %job.input.display(), %err, "failed");
            }
            report
        })
        .collect()
}

/// Scores an existing assignment file against its problem.
pub fn score_file(problem_path: &Path, assignment_path: &Path) -> Result<Score, PlannerError> {
    let problem = Problem::from_path(problem_path)?;
    let text = std::fs::read_to_string(assignment_path)?;
    validate_output(&text)?;
    let routes = parse_assignment(&text)?;
    Ok(score(&problem, routes.iter().map(Vec::as_slice))?)
}
