//! Production rate triples and rollup levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Daily oil, gas and condensate rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Oil rate (qo)
    pub oil: f64,
    /// Gas rate (qg)
    pub gas: f64,
    /// Condensate rate (qc)
    pub condensate: f64,
}

impl Rates {
    pub const ZERO: Rates = Rates { oil: 0.0, gas: 0.0, condensate: 0.0 };

    pub fn new(oil: f64, gas: f64, condensate: f64) -> Self {
        Self { oil, gas, condensate }
    }

    /// Largest absolute component difference, used for tolerance comparisons.
    pub fn max_abs_diff(&self, other: &Rates) -> f64 {
        (self.oil - other.oil)
            .abs()
            .max((self.gas - other.gas).abs())
            .max((self.condensate - other.condensate).abs())
    }
}

impl Add for Rates {
    type Output = Rates;

    fn add(self, rhs: Rates) -> Rates {
        Rates {
            oil: self.oil + rhs.oil,
            gas: self.gas + rhs.gas,
            condensate: self.condensate + rhs.condensate,
        }
    }
}

impl AddAssign for Rates {
    fn add_assign(&mut self, rhs: Rates) {
        self.oil += rhs.oil;
        self.gas += rhs.gas;
        self.condensate += rhs.condensate;
    }
}

impl Sum for Rates {
    fn sum<I: Iterator<Item = Rates>>(iter: I) -> Rates {
        iter.fold(Rates::ZERO, Add::add)
    }
}

/// Hierarchy level a rollup is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Field,
    Pex,
    Platform,
    Well,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Field => "field",
            Level::Pex => "pex",
            Level::Platform => "whp",
            Level::Well => "well",
        };
        f.write_str(name)
    }
}
