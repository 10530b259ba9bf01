//! Problem files.
//!
//! A header line `rows columns vehicles rides bonus steps` followed by one
//! line per ride: `row_start column_start row_end column_end earliest_start
//! latest_finish`. Ride ids are the zero-based order of the ride lines.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::geometry::Point;
use crate::ride::RideRequest;

const HEADER_FIELDS: usize = 6;
const RIDE_FIELDS: usize = 6;

/// Largest grid extent, step count, time or bonus accepted from a file.
/// Keeps every clock and score sum well inside `i64`.
pub const MAX_VALUE: i64 = 1 << 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rows: i64,
    pub columns: i64,
    /// Fleet size.
    pub vehicles: usize,
    /// Points awarded for starting a ride exactly at its earliest start.
    pub bonus: i64,
    /// Simulation horizon.
    pub steps: i64,
    pub rides: Vec<RideRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingHeader,
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    InvalidInteger {
        line: usize,
        value: String,
    },
    RideCount {
        declared: usize,
        found: usize,
    },
    /// A header value, ride coordinate or ride time outside its valid range.
    OutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingHeader => write!(f, "missing header line"),
            ParseError::FieldCount {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} fields, found {found}"),
            ParseError::InvalidInteger { line, value } => {
                write!(f, "line {line}: `{value}` is not a valid integer")
            }
            ParseError::RideCount { declared, found } => {
                write!(f, "header declares {declared} rides but {found} were listed")
            }
            ParseError::OutOfRange { line, field, value } => {
                write!(f, "line {line}: {field} {value} is out of range")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Problem {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
        let header = fields::<HEADER_FIELDS>(header_line, header)?;
        let rows = bounded(header_line, "rows", &header[0], 1, MAX_VALUE)?;
        let columns = bounded(header_line, "columns", &header[1], 1, MAX_VALUE)?;
        let vehicles = count(header_line, &header[2])?;
        let declared = count(header_line, &header[3])?;
        let bonus = bounded(header_line, "bonus", &header[4], 0, MAX_VALUE)?;
        let steps = bounded(header_line, "steps", &header[5], 0, MAX_VALUE)?;

        let mut rides = Vec::new();
        for (line_no, line) in lines {
            let [rs, cs, re, ce, es, lf] = fields::<RIDE_FIELDS>(line_no, line)?;
            let start = Point::new(
                bounded(line_no, "row_start", &rs, 0, rows - 1)?,
                bounded(line_no, "column_start", &cs, 0, columns - 1)?,
            );
            let end = Point::new(
                bounded(line_no, "row_end", &re, 0, rows - 1)?,
                bounded(line_no, "column_end", &ce, 0, columns - 1)?,
            );
            rides.push(RideRequest::new(
                start,
                end,
                bounded(line_no, "earliest_start", &es, 0, MAX_VALUE)?,
                bounded(line_no, "latest_finish", &lf, 0, MAX_VALUE)?,
            ));
        }

        if rides.len() != declared {
            return Err(ParseError::RideCount {
                declared,
                found: rides.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            vehicles,
            bonus,
            steps,
            rides,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlannerError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }
}

impl FromStr for Problem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn fields<const N: usize>(line_no: usize, line: &str) -> Result<[String; N], ParseError> {
    let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    let found = parts.len();
    parts.try_into().map_err(|_| ParseError::FieldCount {
        line: line_no,
        expected: N,
        found,
    })
}

fn integer(line: usize, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        line,
        value: value.to_string(),
    })
}

/// Parses an integer and checks `min <= value <= max`.
fn bounded(
    line: usize,
    field: &'static str,
    value: &str,
    min: i64,
    max: i64,
) -> Result<i64, ParseError> {
    let value = integer(line, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange { line, field, value })
    }
}

fn count(line: usize, value: &str) -> Result<usize, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        line,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "3 4 2 3 2 10
0 0 1 3 2 9
1 2 1 0 0 9
2 0 2 2 0 9
";

    #[test]
    fn test_parse_example() {
        let problem = Problem::parse(EXAMPLE).unwrap();
        assert_eq!(problem.rows, 3);
        assert_eq!(problem.columns, 4);
        assert_eq!(problem.vehicles, 2);
        assert_eq!(problem.bonus, 2);
        assert_eq!(problem.steps, 10);
        assert_eq!(problem.rides.len(), 3);
        assert_eq!(
            problem.rides[0],
            RideRequest::new(Point::new(0, 0), Point::new(1, 3), 2, 9)
        );
    }

    #[test]
    fn test_from_str() {
        let problem: Problem = EXAMPLE.parse().unwrap();
        assert_eq!(problem.rides[2].start, Point::new(2, 0));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = "1 2 1 1 0 5\n\n0 0 0 1 0 5\n\n";
        let problem = Problem::parse(text).unwrap();
        assert_eq!(problem.rides.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Problem::parse(""), Err(ParseError::MissingHeader));
        assert_eq!(Problem::parse("  \n"), Err(ParseError::MissingHeader));
    }

    #[test]
    fn test_short_ride_line() {
        let text = "3 4 1 1 0 10\n0 0 1 3 2\n";
        assert_eq!(
            Problem::parse(text),
            Err(ParseError::FieldCount {
                line: 2,
                expected: 6,
                found: 5
            })
        );
    }

    #[test]
    fn test_non_integer_field() {
        let text = "3 4 1 1 0 10\n0 0 x 3 2 9\n";
        assert_eq!(
            Problem::parse(text),
            Err(ParseError::InvalidInteger {
                line: 2,
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_negative_vehicle_count() {
        let err = Problem::parse("3 4 -1 0 0 10\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidInteger { line: 1, .. }));
    }

    #[test]
    fn test_ride_count_mismatch() {
        let text = "3 4 1 2 0 10\n0 0 1 3 2 9\n";
        assert_eq!(
            Problem::parse(text),
            Err(ParseError::RideCount {
                declared: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_ride_outside_grid() {
        let text = "3 4 1 1 0 10\n9223372036854775807 0 0 0 0 10\n";
        assert_eq!(
            Problem::parse(text),
            Err(ParseError::OutOfRange {
                line: 2,
                field: "row_start",
                value: i64::MAX
            })
        );

        let text = "3 4 1 1 0 10\n0 0 2 4 0 10\n";
        assert_eq!(
            Problem::parse(text),
            Err(ParseError::OutOfRange {
                line: 2,
                field: "column_end",
                value: 4
            })
        );
    }

    #[test]
    fn test_negative_coordinate() {
        let text = "3 4 1 1 0 10\n0 -1 1 1 0 10\n";
        assert!(matches!(
            Problem::parse(text),
            Err(ParseError::OutOfRange {
                line: 2,
                field: "column_start",
                value: -1
            })
        ));
    }

    #[test]
    fn test_negative_ride_times() {
        let text = "3 4 1 1 0 10\n0 0 1 1 -5 10\n";
        assert!(matches!(
            Problem::parse(text),
            Err(ParseError::OutOfRange {
                field: "earliest_start",
                ..
            })
        ));

        let text = "3 4 1 1 0 10\n0 0 1 1 0 -1\n";
        assert!(matches!(
            Problem::parse(text),
            Err(ParseError::OutOfRange {
                field: "latest_finish",
                ..
            })
        ));
    }

    #[test]
    fn test_huge_ride_time() {
        let text = format!("3 4 1 1 0 10\n0 0 1 1 {} {}\n", i64::MAX - 1, i64::MAX);
        assert!(matches!(
            Problem::parse(&text),
            Err(ParseError::OutOfRange {
                field: "earliest_start",
                ..
            })
        ));
    }

    #[test]
    fn test_header_ranges() {
        assert!(matches!(
            Problem::parse("0 4 1 0 0 10\n"),
            Err(ParseError::OutOfRange { line: 1, field: "rows", .. })
        ));
        assert!(matches!(
            Problem::parse("3 0 1 0 0 10\n"),
            Err(ParseError::OutOfRange { line: 1, field: "columns", .. })
        ));
        assert!(matches!(
            Problem::parse("3 4 1 0 -2 10\n"),
            Err(ParseError::OutOfRange { line: 1, field: "bonus", .. })
        ));
        assert!(matches!(
            Problem::parse("3 4 1 0 0 -10\n"),
            Err(ParseError::OutOfRange { line: 1, field: "steps", .. })
        ));
    }

    #[test]
    fn test_error_display_names_line() {
        let err = ParseError::FieldCount {
            line: 7,
            expected: 6,
            found: 2,
        };
        assert_eq!(err.to_string(), "line 7: expected 6 fields, found 2");

        let err = ParseError::OutOfRange {
            line: 3,
            field: "row_start",
            value: 9,
        };
        assert_eq!(err.to_string(), "line 3: row_start 9 is out of range");
    }
}
