//! Forecast error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::decline::CalibrationError;
use crate::facilities::NodeId;
use crate::types::FacilityKind;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Type mismatch at {parent}: expected {expected}, found {found}")]
    TypeMismatch {
        parent: String,
        expected: &'static str,
        found: FacilityKind,
    },

    #[error("Unknown wellhead platform: {0}")]
    UnknownPlatform(String),

    #[error("Program {rig}: '{step}' executed before a start step")]
    Sequencing { rig: String, step: String },

    #[error("Wellhead platform {platform} has no free well slots (capacity {capacity})")]
    CapacityExceeded { platform: String, capacity: usize },

    #[error("Decline calibration failed for well {well}: {source}")]
    RootFinding {
        well: String,
        #[source]
        source: CalibrationError,
    },

    #[error("Missing default '{parameter}' for {context}")]
    MissingDefault {
        context: String,
        parameter: &'static str,
    },

    #[error("Invalid program step '{step}': {reason}")]
    InvalidStep { step: String, reason: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Facility node not found: {0}")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
