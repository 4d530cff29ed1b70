//! Well Forecast: decline-curve production forecasting
//!
//! Forecasts daily oil, gas and condensate production for an
//! Asset → Pex → WellHeadPlatform → Well hierarchy.
//!
//! ## Architecture
//!
//! - **Facilities**: arena-backed containment tree with typed insertion and lookup
//! - **Program**: rig state machine (start / move / drill / standby) that drills new wells
//! - **Decline**: Arps decline law with calibrated initial decline per well
//! - **Profile**: per-day row store with field / pex / platform / well rollups
//! - **Forecast**: orchestration of the above from one [`ForecastConfig`]

pub mod config;
pub mod decline;
pub mod error;
pub mod facilities;
pub mod forecast;
pub mod profile;
pub mod program;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, ForecastConfig};

// Re-export errors
pub use error::{ForecastError, Result};

// Re-export the facility model
pub use facilities::{Facility, FacilityTree, NodeId, Well, WellFluid};

// Re-export engine entry points
pub use decline::{generate_curve, CalibrationError, WellCurve};
pub use forecast::Forecast;
pub use profile::{LevelProduction, ProfileRow, ProfileTable};
pub use program::{Program, Step, StepOutcome};

// Re-export shared value types
pub use types::{FacilityKind, Level, Rates, WellType};
