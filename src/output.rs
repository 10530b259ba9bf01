//! Assignment files: one line per vehicle, `<count> <ride_id>...`.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ride::RideId;
use crate::solver::PlannerResult;

/// Renders one line per route, in route order.
pub fn render_assignment(result: &PlannerResult) -> String {
    let mut out = String::new();
    for route in &result.routes {
        out.push_str(&route.ride_ids.len().to_string());
        for ride in &route.ride_ids {
            out.push(' ');
            out.push_str(&ride.to_string());
        }
        out.push('\n');
    }
    out
}

pub fn write_assignment(path: &Path, result: &PlannerResult) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(render_assignment(result).as_bytes())?;
    writer.flush()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub vehicles: usize,
    pub rides: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyLine {
        line: usize,
    },
    InvalidNumber {
        line: usize,
        value: String,
    },
    CountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },
    /// The same ride appears twice on one vehicle.
    RepeatedOnVehicle {
        line: usize,
        ride: RideId,
    },
    /// A ride appears on two vehicles.
    SharedBetweenVehicles {
        line: usize,
        first_line: usize,
        ride: RideId,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyLine { line } => write!(f, "line {line}: empty line"),
            ValidationError::InvalidNumber { line, value } => {
                write!(f, "line {line}: `{value}` is not a valid ride count or id")
            }
            ValidationError::CountMismatch {
                line,
                declared,
                found,
            } => write!(f, "line {line}: declares {declared} rides but lists {found}"),
            ValidationError::RepeatedOnVehicle { line, ride } => {
                write!(f, "line {line}: ride {ride} ridden twice by the same vehicle")
            }
            ValidationError::SharedBetweenVehicles {
                line,
                first_line,
                ride,
            } => write!(
                f,
                "line {line}: ride {ride} already ridden by the vehicle on line {first_line}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parses an assignment file into per-vehicle routes, checking only the
/// line format and declared counts.
pub fn parse_assignment(text: &str) -> Result<Vec<Vec<RideId>>, ValidationError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Vec<RideId>, ValidationError> {
    let mut numbers = text.split_whitespace().map(|value| {
        value
            .parse::<usize>()
            .map_err(|_| ValidationError::InvalidNumber {
                line,
                value: value.to_string(),
            })
    });

    let declared = numbers.next().ok_or(ValidationError::EmptyLine { line })??;
    let rides = numbers
        .map(|number| number.map(RideId))
        .collect::<Result<Vec<_>, _>>()?;

    if rides.len() != declared {
        return Err(ValidationError::CountMismatch {
            line,
            declared,
            found: rides.len(),
        });
    }
    Ok(rides)
}

/// Checks an assignment file: every count matches its ride list and no
/// ride is ridden twice, on the same vehicle or across vehicles.
pub fn validate_output(text: &str) -> Result<ValidationSummary, ValidationError> {
    let routes = parse_assignment(text)?;
    let mut owner: HashMap<RideId, usize> = HashMap::new();

    for (i, route) in routes.iter().enumerate() {
        let line = i + 1;
        for &ride in route {
            if let Some(&first_line) = owner.get(&ride) {
                return Err(if first_line == line {
                    ValidationError::RepeatedOnVehicle { line, ride }
                } else {
                    ValidationError::SharedBetweenVehicles {
                        line,
                        first_line,
                        ride,
                    }
                });
            }
            owner.insert(ride, line);
        }
    }

    Ok(ValidationSummary {
        vehicles: routes.len(),
        rides: owner.len(),
    })
}
