//! Profile Aggregator - row store and multi-level rollups
//!
//! The [`ProfileTable`] holds one row per (well, forecast day), labelled with
//! the well's lower-cased lineage. Rollups group rows by date and, below the
//! field level, by one lineage label, summing oil/gas/condensate rates.
//!
//! Adding the same curve twice duplicates its rows; callers add each well
//! once.

mod level;

pub use level::*;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::decline::WellCurve;
use crate::types::{Level, Rates};

/// One well's production on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub date: NaiveDate,
    pub asset: String,
    pub pex: String,
    pub whp: String,
    pub well: String,
    #[serde(flatten)]
    pub rates: Rates,
}

impl ProfileRow {
    /// Grouping label of this row at `level`.
    pub fn label(&self, level: Level) -> &str {
        match level {
            Level::Field => &self.asset,
            Level::Pex => &self.pex,
            Level::Platform => &self.whp,
            Level::Well => &self.well,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileTable {
    rows: Vec<ProfileRow>,
}

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every day of a well's curve.
    pub fn add(&mut self, curve: &WellCurve) {
        let lineage = &curve.lineage;
        self.rows.extend(curve.points.iter().map(|point| ProfileRow {
            date: point.date,
            asset: lineage.asset.clone(),
            pex: lineage.pex.clone(),
            whp: lineage.whp.clone(),
            well: lineage.well.clone(),
            rates: point.rates,
        }));
    }

    pub fn extend<'a>(&mut self, curves: impl IntoIterator<Item = &'a WellCurve>) {
        for curve in curves {
            self.add(curve);
        }
    }

    /// Unaggregated rows, in insertion order.
    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last observed dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.date).min()?;
        let last = self.rows.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Total rates per date.
    pub fn field_production(&self) -> BTreeMap<NaiveDate, Rates> {
        let mut totals: BTreeMap<NaiveDate, Rates> = BTreeMap::new();
        for row in &self.rows {
            *totals.entry(row.date).or_default() += row.rates;
        }
        totals
    }

    pub fn pex_production(&self) -> LevelProduction {
        self.level_production(Level::Pex)
    }

    pub fn platform_production(&self) -> LevelProduction {
        self.level_production(Level::Platform)
    }

    pub fn well_production(&self) -> LevelProduction {
        self.level_production(Level::Well)
    }

    /// Dense (date × label) rollup at `level`.
    ///
    /// Dates are every date observed in the table, labels are sorted, and a
    /// label with no rows on a date reads as zero.
    pub fn level_production(&self, level: Level) -> LevelProduction {
        let dates: BTreeSet<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        let labels: BTreeSet<&str> = self.rows.iter().map(|r| r.label(level)).collect();

        let mut production = LevelProduction::zeroed(
            level,
            dates.into_iter().collect(),
            labels.into_iter().map(str::to_string).collect(),
        );
        for row in &self.rows {
            production.accumulate(row.date, row.label(level), row.rates);
        }
        production
    }
}
