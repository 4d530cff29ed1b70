//! Dense (date × label) rollups and their CSV rendering

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::types::{Level, Rates};

/// Production grouped by date and one hierarchy label.
///
/// Every (date, label) cell is present; cells with no contributing rows are
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProduction {
    level: Level,
    dates: Vec<NaiveDate>,
    labels: Vec<String>,
    /// Row-major: `values[date_index][label_index]`
    values: Vec<Vec<Rates>>,
}

impl LevelProduction {
    /// All-zero table over sorted, de-duplicated `dates` and `labels`.
    pub(crate) fn zeroed(level: Level, dates: Vec<NaiveDate>, labels: Vec<String>) -> Self {
        let values = vec![vec![Rates::ZERO; labels.len()]; dates.len()];
        Self {
            level,
            dates,
            labels,
            values,
        }
    }

    pub(crate) fn accumulate(&mut self, date: NaiveDate, label: &str, rates: Rates) {
        if let Some((d, l)) = self.position(date, label) {
            self.values[d][l] += rates;
        }
    }

    fn position(&self, date: NaiveDate, label: &str) -> Option<(usize, usize)> {
        let d = self.dates.binary_search(&date).ok()?;
        let l = self.labels.binary_search_by(|probe| probe.as_str().cmp(label)).ok()?;
        Some((d, l))
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rates for one cell; `None` if the date or label is not in the table.
    pub fn get(&self, date: NaiveDate, label: &str) -> Option<Rates> {
        let (d, l) = self.position(date, label)?;
        Some(self.values[d][l])
    }

    /// One label's series across every date.
    pub fn column(&self, label: &str) -> Option<BTreeMap<NaiveDate, Rates>> {
        let l = self.labels.binary_search_by(|probe| probe.as_str().cmp(label)).ok()?;
        Some(
            self.dates
                .iter()
                .zip(&self.values)
                .map(|(&date, row)| (date, row[l]))
                .collect(),
        )
    }

    /// Sum over all labels on one date.
    pub fn total(&self, date: NaiveDate) -> Option<Rates> {
        let d = self.dates.binary_search(&date).ok()?;
        Some(self.values[d].iter().copied().sum())
    }

    /// Long-format CSV: `date,<level>,oil,gas,condensate`, one line per cell.
    pub fn to_csv(&self) -> String {
        let mut out = format!("date,{},oil,gas,condensate\n", self.level);
        for (date, row) in self.dates.iter().zip(&self.values) {
            for (label, rates) in self.labels.iter().zip(row) {
                let _ = writeln!(
                    out,
                    "{},{},{},{},{}",
                    date, label, rates.oil, rates.gas, rates.condensate
                );
            }
        }
        out
    }
}

/// CSV for a field-level rollup: `date,oil,gas,condensate`.
pub fn field_csv(field: &BTreeMap<NaiveDate, Rates>) -> String {
    let mut out = String::from("date,oil,gas,condensate\n");
    for (date, rates) in field {
        let _ = writeln!(out, "{},{},{},{}", date, rates.oil, rates.gas, rates.condensate);
    }
    out
}
