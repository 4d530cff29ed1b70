//! Decline Curve Engine - per-well daily production forecast
//!
//! For every well the engine picks a calibration pair `(qi, target)`:
//!
//! | Well | qi | target |
//! |---|---|---|
//! | new oil | `initial_oil_rate` | `ultimate_oil_recovery` |
//! | existing oil | observed `oil_rate` | `ultimate_oil_recovery − oil_cumulative` |
//! | new gas | `initial_gas_rate` | `ultimate_gas_recovery` |
//! | existing gas | observed `gas_rate` | `ultimate_gas_recovery − gas_cumulative` |
//!
//! solves di with [`arps::calibrate`], then evaluates the primary curve and
//! its companions over days `0..active_period`:
//!
//! - oil wells: `qg = qo · gor(t)` with gor linear between its two endpoints,
//!   `qc = 0`
//! - gas wells: `qc = qg · gas_condensate_ratio`, `qo = 0`

pub mod arps;

pub use arps::CalibrationError;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{ForecastError, Result};
use crate::facilities::{FacilityTree, Lineage, NodeId, WellFluid};
use crate::types::Rates;

/// One forecast day of a well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Days since the well's start date
    pub day: u32,
    pub date: NaiveDate,
    pub rates: Rates,
}

/// A well's generated decline curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellCurve {
    pub well: NodeId,
    /// Lower-cased asset/pex/whp/well labels
    pub lineage: Lineage,
    pub qi: f64,
    pub target: f64,
    pub b: f64,
    /// Calibrated initial decline rate (1/day)
    pub di: f64,
    pub points: Vec<CurvePoint>,
}

impl WellCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rates on day `day` of the well's life.
    pub fn at(&self, day: u32) -> Option<Rates> {
        self.points.get(day as usize).map(|p| p.rates)
    }
}

/// Calibrate and evaluate the curve of the well at `id`.
pub fn generate_curve(tree: &FacilityTree, id: NodeId) -> Result<WellCurve> {
    let well = tree.well(id).ok_or(ForecastError::UnknownNode(id))?;
    let lineage = tree.lineage(id).ok_or(ForecastError::UnknownNode(id))?;
    let days = well.active_period;
    let out_of_range = || {
        ForecastError::DateOutOfRange(format!(
            "well {}: {} forecast days from {} pass the calendar range",
            well.name, days, well.start_date
        ))
    };
    if well.end_date().is_none() {
        return Err(out_of_range());
    }

    let (qi, target, b) = match &well.fluid {
        WellFluid::Oil(oil) => match &oil.history {
            Some(h) => (h.oil_rate, oil.ultimate_oil_recovery - h.oil_cumulative, oil.b_oil),
            None => (oil.initial_oil_rate, oil.ultimate_oil_recovery, oil.b_oil),
        },
        WellFluid::Gas(gas) => match &gas.history {
            Some(h) => (h.gas_rate, gas.ultimate_gas_recovery - h.gas_cumulative, gas.b_gas),
            None => (gas.initial_gas_rate, gas.ultimate_gas_recovery, gas.b_gas),
        },
    };

    let di = arps::calibrate(qi, b, target, days).map_err(|source| ForecastError::RootFinding {
        well: well.name.clone(),
        source,
    })?;
    debug!(well = %well.name, qi, target, b, di, days, "Decline calibrated");

    let points = (0..days)
        .map(|day| -> Result<CurvePoint> {
            let t = f64::from(day);
            let primary = arps::rate(qi, di, b, t);
            let rates = match &well.fluid {
                WellFluid::Oil(oil) => {
                    let [gor_start, gor_end] = oil.gas_oil_ratio;
                    let gor = gor_start + (gor_end - gor_start) * t / f64::from(days);
                    Rates::new(primary, primary * gor, 0.0)
                }
                WellFluid::Gas(gas) => Rates::new(0.0, primary, primary * gas.gas_condensate_ratio),
            };
            let date = well
                .start_date
                .checked_add_days(Days::new(u64::from(day)))
                .ok_or_else(out_of_range)?;
            Ok(CurvePoint { day, date, rates })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WellCurve {
        well: id,
        lineage: lineage.normalized(),
        qi,
        target,
        b,
        di,
        points,
    })
}
