//! Forecast Configuration - facility tree, well defaults and rig programs
//!
//! The configuration is the single trusted input of a forecast run. Every
//! section maps onto one part of the forecast:
//!
//! - `[description]` fixes the forecast start date
//! - `[defaults.well]` holds the per-type decline defaults used for new wells
//!   and for anything an existing well does not override
//! - `[facilities]` declares the asset, its pexes, platforms and existing wells
//! - `[[programs]]` lists the rig programs replayed to drill new wells

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::{
    DATE_FORMAT, DEFAULT_CHOKE, DEFAULT_WELL_SLOTS, ISO_DATE_FORMAT, MAX_STEP_DAYS,
};
use crate::error::ForecastError;
use crate::program::Step;
use crate::types::WellType;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a forecast run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Forecast identification and start date
    pub description: Description,

    /// Well defaults, shared and per type
    #[serde(default)]
    pub defaults: Defaults,

    /// Facility tree definition
    pub facilities: FacilitiesConfig,

    /// Rig programs, replayed in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub programs: Vec<ProgramConfig>,
}

impl ForecastConfig {
    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::parse(&contents, &path.display().to_string())?;
        info!(
            path = %path.display(),
            asset = %config.facilities.asset,
            programs = config.programs.len(),
            "Loaded forecast config"
        );
        Ok(config)
    }

    /// Parse and validate a TOML document held in memory.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, "<inline>")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(origin.to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Forecast start date; existing wells start producing on this date.
    pub fn start_date(&self) -> NaiveDate {
        self.description.start_date
    }

    /// Validate the whole configuration for internal consistency.
    ///
    /// Rules:
    /// - All figures must be finite and non-negative; rates and recoveries positive
    /// - Active periods and slot counts must be > 0
    /// - Platform names must be unique (programs look platforms up by name)
    /// - Every program step must parse, with a duration of at most `MAX_STEP_DAYS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        let mut platform_names = HashSet::new();
        let mut well_names = HashSet::new();
        for pex in &self.facilities.pexes {
            for whp in &pex.platforms {
                if !platform_names.insert(whp.name.as_str()) {
                    errors.push(format!(
                        "facilities: wellhead platform '{}' is declared more than once",
                        whp.name
                    ));
                }
                for well in &whp.wells {
                    if !well_names.insert(well.name.as_str()) {
                        warn!(well = %well.name, "Well name declared more than once; lookups return the first");
                    }
                }
            }
        }

        for program in &self.programs {
            for record in &program.steps {
                match Step::from_record(record) {
                    Ok(step) if step.duration() > MAX_STEP_DAYS => errors.push(format!(
                        "programs.{}: '{}' exceeds the {} day step limit",
                        program.rig, step, MAX_STEP_DAYS
                    )),
                    Ok(_) => {}
                    Err(e) => errors.push(format!("programs.{}: {}", program.rig, e)),
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(String, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(origin, e) => write!(f, "Config parse error ({}): {}", origin, e),
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Dates
// ============================================================================

/// Parse a configuration date (`dd/mm/YYYY`, or ISO `YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT))
        .ok()
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::super::defaults::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date '{raw}' (expected dd/mm/YYYY)"))
        })
    }
}

// ============================================================================
// Description
// ============================================================================

/// Identification metadata and the forecast start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Description {
    /// Case name, appears in logs only
    #[serde(default)]
    pub name: String,

    /// First forecast day for existing wells
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
}

// ============================================================================
// Well Defaults
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub well: WellDefaults,
}

/// Defaults shared by every well, plus the per-type decline defaults.
///
/// The per-type sections are optional: a configuration with only oil wells
/// need not declare gas defaults. Asking for a missing section is a
/// `MissingDefault` error at the point a well of that type is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellDefaults {
    /// Production choke setting (stored, not used by the decline engine)
    #[serde(default = "default_choke")]
    pub choke: f64,

    /// Number of days each well is forecast for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_period: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil: Option<OilDefaults>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasDefaults>,
}

fn default_choke() -> f64 {
    DEFAULT_CHOKE
}

impl Default for WellDefaults {
    fn default() -> Self {
        Self {
            choke: default_choke(),
            active_period: None,
            oil: None,
            gas: None,
        }
    }
}

impl WellDefaults {
    /// Default active period, or `MissingDefault` naming `context`.
    pub fn active_period(&self, context: &str) -> Result<u32, ForecastError> {
        self.active_period.ok_or_else(|| ForecastError::MissingDefault {
            context: context.to_string(),
            parameter: "defaults.well.active_period",
        })
    }

    /// Oil well defaults, or `MissingDefault` naming `context`.
    pub fn oil(&self, context: &str) -> Result<&OilDefaults, ForecastError> {
        self.oil.as_ref().ok_or_else(|| ForecastError::MissingDefault {
            context: context.to_string(),
            parameter: "defaults.well.oil",
        })
    }

    /// Gas well defaults, or `MissingDefault` naming `context`.
    pub fn gas(&self, context: &str) -> Result<&GasDefaults, ForecastError> {
        self.gas.as_ref().ok_or_else(|| ForecastError::MissingDefault {
            context: context.to_string(),
            parameter: "defaults.well.gas",
        })
    }
}

/// Decline defaults for oil wells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OilDefaults {
    /// Ultimate oil recovery (URR)
    pub ultimate_oil_recovery: f64,

    /// Initial oil rate qi for new wells
    pub initial_oil_rate: f64,

    /// Gas-oil ratio at the start and end of the active period
    pub gas_oil_ratio: [f64; 2],

    /// Arps curvature exponent b
    pub b_oil: f64,
}

/// Decline defaults for gas wells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasDefaults {
    /// Ultimate gas recovery
    pub ultimate_gas_recovery: f64,

    /// Initial gas rate qi for new wells
    pub initial_gas_rate: f64,

    /// Condensate produced per unit of gas
    pub gas_condensate_ratio: f64,

    /// Arps curvature exponent b
    pub b_gas: f64,
}

// ============================================================================
// Facilities
// ============================================================================

/// The asset and everything declared under it, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitiesConfig {
    /// Asset (field) name, root of the facility tree
    pub asset: String,

    /// Reject drilling onto a platform with no free slots
    #[serde(default)]
    pub enforce_slot_capacity: bool,

    #[serde(default)]
    pub pexes: Vec<PexConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexConfig {
    pub name: String,

    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub name: String,

    /// Well slot capacity
    #[serde(default = "default_slots")]
    pub slots: usize,

    /// Existing (pre-drilled) wells
    #[serde(default)]
    pub wells: Vec<WellEntry>,
}

fn default_slots() -> usize {
    DEFAULT_WELL_SLOTS
}

/// An existing well with its last known production figures.
///
/// Oil wells need `oil_rate` and `oil_cumulative`; gas wells need `gas_rate`
/// and `gas_cumulative`. The remaining figures default to zero. The override
/// fields replace the matching type default for this well only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub well_type: WellType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_cumulative: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_cumulative: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condensate_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condensate_cumulative: Option<f64>,

    // Per-well overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choke: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultimate_recovery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_oil_ratio: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_condensate_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

impl WellEntry {
    /// Minimal existing-well entry with no figures or overrides set.
    pub fn new(name: impl Into<String>, well_type: WellType) -> Self {
        Self {
            name: name.into(),
            well_type,
            oil_rate: None,
            oil_cumulative: None,
            gas_rate: None,
            gas_cumulative: None,
            condensate_rate: None,
            condensate_cumulative: None,
            choke: None,
            active_period: None,
            ultimate_recovery: None,
            gas_oil_ratio: None,
            gas_condensate_ratio: None,
            b: None,
        }
    }
}

// ============================================================================
// Programs
// ============================================================================

/// One rig's program: an ordered list of single-key step records.
///
/// ```toml
/// [[programs]]
/// rig = "Rig1"
/// steps = [{ start = "01/01/2018, AEP" }, { drill = "NNM-7, oil, 70" }, { standby = 100 }]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    pub rig: String,

    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

/// `{ action = "arguments" }`
pub type StepRecord = BTreeMap<String, StepArgument>;

/// Step arguments: a comma-separated string, or a bare day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepArgument {
    Days(i64),
    Text(String),
}

impl fmt::Display for StepArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepArgument::Days(days) => write!(f, "{days}"),
            StepArgument::Text(text) => f.write_str(text),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
