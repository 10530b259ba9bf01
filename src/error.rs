//! Errors surfaced at the file and command-line boundary.

use std::fmt;
use std::io;

use crate::output::ValidationError;
use crate::problem::ParseError;
use crate::score::ScoreError;

#[derive(Debug)]
pub enum PlannerError {
    Io(io::Error),
    Parse(ParseError),
    Config(String),
    Validation(ValidationError),
    Score(ScoreError),
    /// A run report could not be serialized.
    Report(serde_json::Error),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Io(err) => write!(f, "I/O error: {err}"),
            PlannerError::Parse(err) => write!(f, "malformed problem: {err}"),
            PlannerError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            PlannerError::Validation(err) => write!(f, "invalid assignment: {err}"),
            PlannerError::Score(err) => write!(f, "cannot score assignment: {err}"),
            PlannerError::Report(err) => write!(f, "cannot serialize report: {err}"),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::Io(err) => Some(err),
            PlannerError::Parse(err) => Some(err),
            PlannerError::Config(_) => None,
            PlannerError::Validation(err) => Some(err),
            PlannerError::Score(err) => Some(err),
            PlannerError::Report(err) => Some(err),
        }
    }
}

impl From<io::Error> for PlannerError {
    fn from(err: io::Error) -> Self {
        PlannerError::Io(err)
    }
}

impl From<ParseError> for PlannerError {
    fn from(err: ParseError) -> Self {
        PlannerError::Parse(err)
    }
}

impl From<ValidationError> for PlannerError {
    fn from(err: ValidationError) -> Self {
        PlannerError::Validation(err)
    }
}

impl From<ScoreError> for PlannerError {
    fn from(err: ScoreError) -> Self {
        PlannerError::Score(err)
    }
}

/// Option files are the only JSON the planner reads, so decode failures are
/// configuration errors. Report serialization maps to `Report` explicitly.
impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Config(err.to_string())
    }
}
