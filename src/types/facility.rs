//! Well types and facility node kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary fluid a well is forecast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellType {
    Oil,
    Gas,
}

impl WellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellType::Oil => "oil",
            WellType::Gas => "gas",
        }
    }
}

impl fmt::Display for WellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oil" => Ok(WellType::Oil),
            "gas" => Ok(WellType::Gas),
            other => Err(format!("unknown well type '{other}' (expected 'oil' or 'gas')")),
        }
    }
}

/// Kind discriminant of a node in the facility tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    Asset,
    Pex,
    WellHeadPlatform,
    OilWell,
    GasWell,
}

impl FacilityKind {
    pub fn is_well(&self) -> bool {
        matches!(self, FacilityKind::OilWell | FacilityKind::GasWell)
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacilityKind::Asset => "Asset",
            FacilityKind::Pex => "Pex",
            FacilityKind::WellHeadPlatform => "WellHeadPlatform",
            FacilityKind::OilWell => "OilWell",
            FacilityKind::GasWell => "GasWell",
        };
        f.write_str(name)
    }
}
