//! Forecast - end-to-end build sequence
//!
//! ```text
//! PHASE 1: Facility tree from configuration (existing wells on the start date)
//! PHASE 2: Rig programs replayed in order (new wells at their spud dates)
//! PHASE 3: Decline curves, one per well, in parallel over the frozen tree
//! PHASE 4: Curves appended to the profile table in tree order
//! ```
//!
//! Phase 3 only starts once every program has finished, since a drilled
//! well's start date depends on all earlier steps. Phase 4 merges in tree
//! order, so the row table is identical however the fan-out is scheduled.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use chrono::NaiveDate;

use crate::config::ForecastConfig;
use crate::decline::{generate_curve, WellCurve};
use crate::error::Result;
use crate::facilities::FacilityTree;
use crate::profile::{LevelProduction, ProfileTable};
use crate::program::Program;
use crate::types::{Level, Rates};

/// A completed forecast run.
#[derive(Debug, Clone)]
pub struct Forecast {
    tree: FacilityTree,
    programs: Vec<Program>,
    curves: Vec<WellCurve>,
    profiles: ProfileTable,
}

impl Forecast {
    /// Build the tree, run every program, then generate and aggregate curves.
    ///
    /// The first failing well aborts the run.
    pub fn build(config: &ForecastConfig) -> Result<Self> {
        let started = Instant::now();

        // PHASE 1
        let mut tree = FacilityTree::from_config(config)?;

        // PHASE 2: every program is parsed and checked before any of them runs
        let mut programs = config
            .programs
            .iter()
            .map(|program_config| -> Result<Program> {
                let program = Program::from_config(program_config)?
                    .with_slot_capacity(config.facilities.enforce_slot_capacity);
                program.check_defaults(&config.defaults.well)?;
                Ok(program)
            })
            .collect::<Result<Vec<_>>>()?;
        for program in &mut programs {
            program.run(&mut tree, &config.defaults.well)?;
        }

        // PHASE 3: tree is read-only from here on
        let wells = tree.wells(tree.root());
        let curves = wells
            .par_iter()
            .map(|&id| generate_curve(&tree, id))
            .collect::<Result<Vec<_>>>()?;

        // PHASE 4
        let mut profiles = ProfileTable::new();
        profiles.extend(&curves);

        info!(
            wells = curves.len(),
            rows = profiles.len(),
            programs = programs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Forecast built"
        );

        Ok(Self {
            tree,
            programs,
            curves,
            profiles,
        })
    }

    pub fn tree(&self) -> &FacilityTree {
        &self.tree
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Per-well curves in tree order.
    pub fn curves(&self) -> &[WellCurve] {
        &self.curves
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn field_production(&self) -> BTreeMap<NaiveDate, Rates> {
        self.profiles.field_production()
    }

    /// Dense rollup at a sub-field level.
    pub fn production(&self, level: Level) -> LevelProduction {
        self.profiles.level_production(level)
    }
}
