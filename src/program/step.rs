//! Program steps and their compact textual encoding
//!
//! ```text
//! start: 01/01/2018, AEP
//! move: WHP4, 30
//! drill: NNM-7, oil, 70
//! standby: 100
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::defaults::DATE_FORMAT;
use crate::config::{parse_date, StepRecord};
use crate::error::{ForecastError, Result};
use crate::types::WellType;

/// One operation of a rig program.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Establish the program clock and the rig's first location
    Start { date: NaiveDate, platform: String },
    /// Relocate the rig
    Move { destination: String, duration: i64 },
    /// Drill a new well at the current location
    Drill {
        well: String,
        well_type: WellType,
        duration: i64,
    },
    /// Idle time
    Standby { duration: i64 },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Start { .. } => "start",
            Step::Move { .. } => "move",
            Step::Drill { .. } => "drill",
            Step::Standby { .. } => "standby",
        }
    }

    /// Days this step adds to the program clock.
    pub fn duration(&self) -> i64 {
        match self {
            Step::Start { .. } => 0,
            Step::Move { duration, .. } | Step::Drill { duration, .. } | Step::Standby { duration } => {
                *duration
            }
        }
    }

    /// Parse a single-key `{ action = "arguments" }` record.
    pub fn from_record(record: &StepRecord) -> Result<Self> {
        let mut entries = record.iter();
        match (entries.next(), entries.next()) {
            (Some((action, argument)), None) => Self::parse(action, &argument.to_string()),
            (None, _) => Err(invalid("{}", "empty step record")),
            (Some(_), Some(_)) => {
                let keys: Vec<&str> = record.keys().map(String::as_str).collect();
                Err(invalid(
                    &keys.join(", "),
                    "a step record must have exactly one action",
                ))
            }
        }
    }

    fn parse(action: &str, arguments: &str) -> Result<Self> {
        let raw = format!("{action}: {arguments}");
        let args: Vec<&str> = arguments.split(',').map(str::trim).collect();

        let expect_args = |n: usize| -> Result<()> {
            if args.len() == n && args.iter().all(|a| !a.is_empty()) {
                Ok(())
            } else {
                Err(invalid(
                    &raw,
                    &format!("'{action}' takes {n} argument(s), got {}", args.len()),
                ))
            }
        };
        let days = |value: &str| -> Result<i64> {
            match value.parse::<i64>() {
                Ok(d) if d >= 0 => Ok(d),
                _ => Err(invalid(&raw, &format!("'{value}' is not a non-negative day count"))),
            }
        };

        match action.trim().to_ascii_lowercase().as_str() {
            "start" => {
                expect_args(2)?;
                let date = parse_date(args[0])
                    .ok_or_else(|| invalid(&raw, &format!("'{}' is not a dd/mm/YYYY date", args[0])))?;
                Ok(Step::Start {
                    date,
                    platform: args[1].to_string(),
                })
            }
            "move" => {
                expect_args(2)?;
                Ok(Step::Move {
                    destination: args[0].to_string(),
                    duration: days(args[1])?,
                })
            }
            "drill" => {
                expect_args(3)?;
                let well_type = args[1]
                    .parse::<WellType>()
                    .map_err(|reason| invalid(&raw, &reason))?;
                Ok(Step::Drill {
                    well: args[0].to_string(),
                    well_type,
                    duration: days(args[2])?,
                })
            }
            "standby" => {
                expect_args(1)?;
                Ok(Step::Standby {
                    duration: days(args[0])?,
                })
            }
            other => Err(invalid(&raw, &format!("unknown action '{other}'"))),
        }
    }
}

fn invalid(step: &str, reason: &str) -> ForecastError {
    ForecastError::InvalidStep {
        step: step.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for Step {
    type Err = ForecastError;

    /// Parse the `action: arguments` form.
    fn from_str(s: &str) -> Result<Self> {
        let (action, arguments) = s
            .split_once(':')
            .ok_or_else(|| invalid(s, "expected 'action: arguments'"))?;
        Self::parse(action, arguments.trim())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Start { date, platform } => {
                write!(f, "start: {}, {platform}", date.format(DATE_FORMAT))
            }
            Step::Move { destination, duration } => write!(f, "move: {destination}, {duration}"),
            Step::Drill {
                well,
                well_type,
                duration,
            } => write!(f, "drill: {well}, {well_type}, {duration}"),
            Step::Standby { duration } => write!(f, "standby: {duration}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepArgument;

    #[test]
    fn test_parse_each_action() {
        let start: Step = "start: 01/01/2018, AEP".parse().expect("start parses");
        assert_eq!(
            start,
            Step::Start {
                date: NaiveDate::from_ymd_opt(2018, 1, 1).expect("date"),
                platform: "AEP".into()
            }
        );
        assert_eq!(
            "move: WHP4, 30".parse::<Step>().expect("move parses"),
            Step::Move { destination: "WHP4".into(), duration: 30 }
        );
        assert_eq!(
            "drill: NNM-402, GAS, 70".parse::<Step>().expect("drill parses"),
            Step::Drill { well: "NNM-402".into(), well_type: WellType::Gas, duration: 70 }
        );
        assert_eq!(
            "standby:100".parse::<Step>().expect("standby parses"),
            Step::Standby { duration: 100 }
        );
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["start: 01/01/2018, AEP", "move: WHP4, 30", "drill: NNM-7, oil, 70", "standby: 100"] {
            let step: Step = raw.parse().expect("step parses");
            assert_eq!(step.to_string(), raw);
        }
    }

    #[test]
    fn test_from_record() {
        let mut record = StepRecord::new();
        record.insert("standby".into(), StepArgument::Days(100));
        assert_eq!(Step::from_record(&record).expect("record parses"), Step::Standby { duration: 100 });

        record.insert("move".into(), StepArgument::Text("WHP4, 30".into()));
        assert!(matches!(Step::from_record(&record), Err(ForecastError::InvalidStep { .. })));

        assert!(Step::from_record(&StepRecord::new()).is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        for raw in [
            "teleport: WHP9",
            "drill: NNM-7, water, 70",
            "drill: NNM-7, oil",
            "move: WHP4, -5",
            "standby: soon",
            "start: 2018/31/01, AEP",
            "start: 01/01/2018, ",
            "no separator",
        ] {
            let result = raw.parse::<Step>();
            assert!(
                matches!(result, Err(ForecastError::InvalidStep { .. })),
                "{raw} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_durations() {
        let drill: Step = "drill: NNM-7, oil, 70".parse().expect("drill parses");
        assert_eq!(drill.duration(), 70);
        assert_eq!(drill.action(), "drill");
        let start: Step = "start: 01/01/2018, AEP".parse().expect("start parses");
        assert_eq!(start.duration(), 0);
    }
}
