//! Well entity: shared fields plus an oil or gas payload
//!
//! Wells come from two places:
//! - the facility definition (existing wells, with observed rate/cumulative)
//! - a rig program's drill step (new wells, known only by type defaults)
//!
//! Both factories take the well defaults explicitly.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{WellDefaults, WellEntry};
use crate::error::{ForecastError, Result};
use crate::types::{FacilityKind, WellType};

/// A producing well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub name: String,
    /// Production choke setting (carried for reporting, not used in calibration)
    pub choke: f64,
    /// Number of forecast days
    pub active_period: u32,
    /// First forecast day
    pub start_date: NaiveDate,
    pub fluid: WellFluid,
}

/// Type-specific decline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WellFluid {
    Oil(OilParams),
    Gas(GasParams),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilParams {
    pub ultimate_oil_recovery: f64,
    pub initial_oil_rate: f64,
    /// GOR at day 0 and at the end of the active period
    pub gas_oil_ratio: [f64; 2],
    pub b_oil: f64,
    /// Observed figures; `None` for a new well
    pub history: Option<OilHistory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OilHistory {
    pub oil_rate: f64,
    pub oil_cumulative: f64,
    pub gas_rate: f64,
    pub gas_cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasParams {
    pub ultimate_gas_recovery: f64,
    pub initial_gas_rate: f64,
    pub gas_condensate_ratio: f64,
    pub b_gas: f64,
    /// Observed figures; `None` for a new well
    pub history: Option<GasHistory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasHistory {
    pub gas_rate: f64,
    pub gas_cumulative: f64,
    pub condensate_rate: f64,
    pub condensate_cumulative: f64,
}

fn missing(well: &str, parameter: &'static str) -> ForecastError {
    ForecastError::MissingDefault {
        context: format!("well {well}"),
        parameter,
    }
}

impl Well {
    /// A new well to be drilled, built entirely from type defaults.
    pub fn drilled(
        name: impl Into<String>,
        well_type: WellType,
        start_date: NaiveDate,
        defaults: &WellDefaults,
    ) -> Result<Self> {
        let name = name.into();
        let context = format!("{well_type} well {name}");
        let active_period = defaults.active_period(&context)?;
        let fluid = match well_type {
            WellType::Oil => {
                let oil = defaults.oil(&context)?;
                WellFluid::Oil(OilParams {
                    ultimate_oil_recovery: oil.ultimate_oil_recovery,
                    initial_oil_rate: oil.initial_oil_rate,
                    gas_oil_ratio: oil.gas_oil_ratio,
                    b_oil: oil.b_oil,
                    history: None,
                })
            }
            WellType::Gas => {
                let gas = defaults.gas(&context)?;
                WellFluid::Gas(GasParams {
                    ultimate_gas_recovery: gas.ultimate_gas_recovery,
                    initial_gas_rate: gas.initial_gas_rate,
                    gas_condensate_ratio: gas.gas_condensate_ratio,
                    b_gas: gas.b_gas,
                    history: None,
                })
            }
        };
        Ok(Self {
            name,
            choke: defaults.choke,
            active_period,
            start_date,
            fluid,
        })
    }

    /// An existing well from the facility definition, with per-well overrides
    /// applied on top of the type defaults.
    pub fn existing(entry: &WellEntry, start_date: NaiveDate, defaults: &WellDefaults) -> Result<Self> {
        let context = format!("{} well {}", entry.well_type, entry.name);
        let active_period = match entry.active_period {
            Some(days) => days,
            None => defaults.active_period(&context)?,
        };
        let fluid = match entry.well_type {
            WellType::Oil => {
                let oil = defaults.oil(&context)?;
                let history = OilHistory {
                    oil_rate: entry.oil_rate.ok_or_else(|| missing(&entry.name, "oil_rate"))?,
                    oil_cumulative: entry
                        .oil_cumulative
                        .ok_or_else(|| missing(&entry.name, "oil_cumulative"))?,
                    gas_rate: entry.gas_rate.unwrap_or(0.0),
                    gas_cumulative: entry.gas_cumulative.unwrap_or(0.0),
                };
                WellFluid::Oil(OilParams {
                    ultimate_oil_recovery: entry.ultimate_recovery.unwrap_or(oil.ultimate_oil_recovery),
                    initial_oil_rate: oil.initial_oil_rate,
                    gas_oil_ratio: entry.gas_oil_ratio.unwrap_or(oil.gas_oil_ratio),
                    b_oil: entry.b.unwrap_or(oil.b_oil),
                    history: Some(history),
                })
            }
            WellType::Gas => {
                let gas = defaults.gas(&context)?;
                let history = GasHistory {
                    gas_rate: entry.gas_rate.ok_or_else(|| missing(&entry.name, "gas_rate"))?,
                    gas_cumulative: entry
                        .gas_cumulative
                        .ok_or_else(|| missing(&entry.name, "gas_cumulative"))?,
                    condensate_rate: entry.condensate_rate.unwrap_or(0.0),
                    condensate_cumulative: entry.condensate_cumulative.unwrap_or(0.0),
                };
                WellFluid::Gas(GasParams {
                    ultimate_gas_recovery: entry.ultimate_recovery.unwrap_or(gas.ultimate_gas_recovery),
                    initial_gas_rate: gas.initial_gas_rate,
                    gas_condensate_ratio: entry.gas_condensate_ratio.unwrap_or(gas.gas_condensate_ratio),
                    b_gas: entry.b.unwrap_or(gas.b_gas),
                    history: Some(history),
                })
            }
        };
        Ok(Self {
            name: entry.name.clone(),
            choke: entry.choke.unwrap_or(defaults.choke),
            active_period,
            start_date,
            fluid,
        })
    }

    pub fn well_type(&self) -> WellType {
        match self.fluid {
            WellFluid::Oil(_) => WellType::Oil,
            WellFluid::Gas(_) => WellType::Gas,
        }
    }

    pub fn kind(&self) -> FacilityKind {
        match self.fluid {
            WellFluid::Oil(_) => FacilityKind::OilWell,
            WellFluid::Gas(_) => FacilityKind::GasWell,
        }
    }

    /// True for wells still to be drilled (no observed production).
    pub fn is_new(&self) -> bool {
        match &self.fluid {
            WellFluid::Oil(oil) => oil.history.is_none(),
            WellFluid::Gas(gas) => gas.history.is_none(),
        }
    }

    /// Last forecast day; `None` when it falls past the calendar range.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let last = u64::from(self.active_period.saturating_sub(1));
        self.start_date.checked_add_days(Days::new(last))
    }
}
