//! Rig Program - sequential drilling state machine
//!
//! A program replays one rig's steps in order against the facility tree:
//!
//! ```text
//! (unstarted) ──Start──► (elapsed = 0, location, start_date)
//!                          │  Move     → location = dest, elapsed += d
//!                          │  Drill    → new well at start_date + elapsed, elapsed += d
//!                          │  Standby  → elapsed += d
//! ```
//!
//! Any step other than Start before the first Start is a sequencing error.
//! Type defaults for every Drill step are checked before the first step runs.
//! Past that there is no rollback: a failed step leaves earlier mutations in
//! place.

mod step;

pub use step::*;

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ProgramConfig, WellDefaults};
use crate::error::{ForecastError, Result};
use crate::facilities::{FacilityTree, NodeId, Well};
use crate::types::WellType;

/// Program clock and rig location, defined once Start has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramState {
    pub start_date: NaiveDate,
    /// Days since `start_date`
    pub elapsed_days: i64,
    pub location: NodeId,
}

impl ProgramState {
    /// Calendar date at the current elapsed time; `None` past the calendar range.
    pub fn current_date(&self) -> Option<NaiveDate> {
        TimeDelta::try_days(self.elapsed_days)
            .and_then(|delta| self.start_date.checked_add_signed(delta))
    }
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Position of the step in the program
    pub index: usize,
    pub step: Step,
    /// `None` for the first Start
    pub elapsed_before: Option<i64>,
    pub elapsed_after: i64,
    /// Rig location after the step
    pub location: NodeId,
    /// Well inserted by a Drill step
    pub drilled: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Program {
    rig: String,
    steps: Vec<Step>,
    cursor: usize,
    state: Option<ProgramState>,
    history: Vec<StepOutcome>,
    enforce_slot_capacity: bool,
}

impl Program {
    pub fn new(rig: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            rig: rig.into(),
            steps,
            cursor: 0,
            state: None,
            history: Vec::new(),
            enforce_slot_capacity: false,
        }
    }

    /// Parse every step record of a configured program.
    pub fn from_config(config: &ProgramConfig) -> Result<Self> {
        let steps = config
            .steps
            .iter()
            .map(Step::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(config.rig.clone(), steps))
    }

    /// Reject Drill steps onto full platforms.
    pub fn with_slot_capacity(mut self, enforce: bool) -> Self {
        self.enforce_slot_capacity = enforce;
        self
    }

    pub fn rig(&self) -> &str {
        &self.rig
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn state(&self) -> Option<&ProgramState> {
        self.state.as_ref()
    }

    pub fn elapsed_days(&self) -> Option<i64> {
        self.state.map(|s| s.elapsed_days)
    }

    pub fn location(&self) -> Option<NodeId> {
        self.state.map(|s| s.location)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.state.map(|s| s.start_date)
    }

    /// Outcomes of the steps executed so far.
    pub fn history(&self) -> &[StepOutcome] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Execute the next step; `Ok(None)` once the program is exhausted.
    ///
    /// A failed step is not consumed, so the cursor stays on it.
    pub fn step_next(
        &mut self,
        tree: &mut FacilityTree,
        defaults: &WellDefaults,
    ) -> Result<Option<&StepOutcome>> {
        let Some(step) = self.steps.get(self.cursor).cloned() else {
            return Ok(None);
        };
        let elapsed_before = self.elapsed_days();

        let (state, drilled) = match &step {
            Step::Start { date, platform } => {
                let location = resolve(tree, platform)?;
                let state = ProgramState {
                    start_date: *date,
                    elapsed_days: 0,
                    location,
                };
                (state, None)
            }
            Step::Move { destination, .. } => {
                let mut state = self.started(&step)?;
                state.location = resolve(tree, destination)?;
                state.elapsed_days = self.advance(&state, &step)?;
                (state, None)
            }
            Step::Drill { well, well_type, .. } => {
                let mut state = self.started(&step)?;
                let elapsed = self.advance(&state, &step)?;
                let spud = state.current_date().ok_or_else(|| {
                    ForecastError::DateOutOfRange(format!(
                        "program {}: '{}' spuds {} days after {}",
                        self.rig, step, state.elapsed_days, state.start_date
                    ))
                })?;
                let new_well = Well::drilled(well.clone(), *well_type, spud, defaults)?;
                let id = if self.enforce_slot_capacity {
                    tree.add_well_checked(state.location, new_well)?
                } else {
                    tree.add_well(state.location, new_well)?
                };
                if tree.remaining_slots(state.location).is_some_and(|r| r < 0) {
                    debug!(
                        rig = %self.rig,
                        platform = tree.name(state.location).unwrap_or_default(),
                        "Platform drilled beyond its slot capacity"
                    );
                }
                state.elapsed_days = elapsed;
                (state, Some(id))
            }
            Step::Standby { .. } => {
                let mut state = self.started(&step)?;
                state.elapsed_days = self.advance(&state, &step)?;
                (state, None)
            }
        };

        debug!(
            rig = %self.rig,
            action = step.action(),
            step = %step,
            elapsed = state.elapsed_days,
            location = tree.name(state.location).unwrap_or_default(),
            "Program step executed"
        );

        self.state = Some(state);
        self.history.push(StepOutcome {
            index: self.cursor,
            step,
            elapsed_before,
            elapsed_after: state.elapsed_days,
            location: state.location,
            drilled,
        });
        self.cursor += 1;
        Ok(self.history.last())
    }

    /// Check that every remaining Drill step has the defaults its well type
    /// needs, so a missing section fails before the tree is touched.
    pub fn check_defaults(&self, defaults: &WellDefaults) -> Result<()> {
        for step in &self.steps[self.cursor..] {
            if let Step::Drill { well, well_type, .. } = step {
                let context = format!("{well_type} well {well} (program {})", self.rig);
                defaults.active_period(&context)?;
                match well_type {
                    WellType::Oil => defaults.oil(&context).map(|_| ())?,
                    WellType::Gas => defaults.gas(&context).map(|_| ())?,
                }
            }
        }
        Ok(())
    }

    /// Execute every remaining step.
    pub fn run(&mut self, tree: &mut FacilityTree, defaults: &WellDefaults) -> Result<&[StepOutcome]> {
        self.check_defaults(defaults)?;
        while !self.is_finished() {
            self.step_next(tree, defaults)?;
        }

        let drilled = self.history.iter().filter(|o| o.drilled.is_some()).count();
        info!(
            rig = %self.rig,
            steps = self.history.len(),
            wells_drilled = drilled,
            elapsed_days = self.elapsed_days().unwrap_or(0),
            "Program complete"
        );
        Ok(&self.history)
    }

    /// Elapsed days once `step` has run.
    fn advance(&self, state: &ProgramState, step: &Step) -> Result<i64> {
        state
            .elapsed_days
            .checked_add(step.duration())
            .ok_or_else(|| {
                ForecastError::DateOutOfRange(format!(
                    "program {}: '{}' overflows the elapsed day count",
                    self.rig, step
                ))
            })
    }

    fn started(&self, step: &Step) -> Result<ProgramState> {
        self.state.ok_or_else(|| ForecastError::Sequencing {
            rig: self.rig.clone(),
            step: step.to_string(),
        })
    }
}

fn resolve(tree: &FacilityTree, platform: &str) -> Result<NodeId> {
    tree.find_platform(platform)
        .ok_or_else(|| ForecastError::UnknownPlatform(platform.to_string()))
}
