//! Error types for scenario configuration and geometry construction

use math_aero_wave::Axis;
use thiserror::Error;

/// Errors raised while building geometry or loading a scenario
#[derive(Debug, Error)]
pub enum CommonError {
    /// A physical or discretisation parameter is out of range
    #[error("invalid {name}: {value} ({reason})")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Accepted range
        reason: &'static str,
    },

    /// Mean flow not along the chord
    #[error("mean flow along {0:?} is not supported; the chord lies along x")]
    UnsupportedFlowAxis(Axis),

    /// Scenario file could not be read or written
    #[error("failed to access scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not valid JSON for the expected schema
    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for configuration and geometry
pub type Result<T> = std::result::Result<T, CommonError>;

impl CommonError {
    /// Returns `true` if this is an out-of-range parameter.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            CommonError::InvalidParameter { .. } | CommonError::UnsupportedFlowAxis(_)
        )
    }
}

/// Reject values that are not strictly positive and finite
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CommonError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

/// Reject counts below `min`
pub(crate) fn require_count(name: &'static str, value: usize, min: usize) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(CommonError::InvalidParameter {
            name,
            value: value as f64,
            reason: "too few points",
        })
    }
}
