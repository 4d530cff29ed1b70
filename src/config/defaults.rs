//! System-wide default constants.
//!
//! Centralises magic numbers used by the facility tree, the program
//! executor and the decline engine. Grouped by subsystem for easy discovery.

// ============================================================================
// Configuration
// ============================================================================

/// Environment variable the CLI reads the configuration path from.
pub const CONFIG_ENV_VAR: &str = "WELL_FORECAST_CONFIG";

/// Date format used in configuration files and program steps (dd/mm/YYYY).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Fallback ISO date format accepted wherever `DATE_FORMAT` is.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Facilities
// ============================================================================

/// Well slots on a wellhead platform when the configuration does not say.
pub const DEFAULT_WELL_SLOTS: usize = 6;

/// Choke setting applied when `defaults.well.choke` is absent.
pub const DEFAULT_CHOKE: f64 = 1.0;

// ============================================================================
// Durations
// ============================================================================

/// Longest accepted program step duration (days), about a century.
pub const MAX_STEP_DAYS: i64 = 36_525;

/// Longest accepted well active period (days), about a century.
pub const MAX_ACTIVE_PERIOD: u32 = 36_525;

// ============================================================================
// Decline Calibration
// ============================================================================

/// Initial estimate of the Arps initial decline rate Di (1/day).
///
/// Shared by oil and gas wells.
pub const INITIAL_DECLINE_GUESS: f64 = 0.000_880_626_223_092;

/// Absolute step tolerance on Di for Newton-Raphson convergence.
pub const CALIBRATION_TOLERANCE: f64 = 1.48e-8;

/// Maximum Newton / bisection iterations before calibration gives up.
pub const CALIBRATION_MAX_ITERATIONS: usize = 100;

/// Maximum doublings of the upper Di bound while bracketing the root.
pub const BRACKET_MAX_EXPANSIONS: usize = 64;

/// |b| below this is treated as exponential decline.
pub const EXPONENTIAL_B_EPSILON: f64 = 1e-12;

/// b above this is legal but flagged as super-hyperbolic.
pub const SUPER_HYPERBOLIC_B: f64 = 1.0;
