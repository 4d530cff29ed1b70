//! Forecast Configuration Module
//!
//! Provides the forecast configuration loaded from TOML files: the forecast
//! start date, per-well-type decline defaults, the facility tree definition
//! and the optional rig programs.
//!
//! ## Loading
//!
//! 1. Unknown keys are reported as warnings with "did you mean" suggestions
//! 2. The TOML is deserialized into [`ForecastConfig`]
//! 3. [`ForecastConfig::validate`] rejects impossible values
//!
//! The loaded configuration is passed by reference into every constructor
//! that needs defaults; there is no global configuration state.
//!
//! ```ignore
//! let config = ForecastConfig::load_from_file(Path::new("forecast.toml"))?;
//! let forecast = Forecast::build(&config)?;
//! ```

mod forecast_config;
pub mod defaults;
pub mod validation;

pub use forecast_config::*;
