//! Error types for the gust response and radiation engine

use math_aero_common::{Axis, CommonError, FlowConditions};
use thiserror::Error;

/// Errors raised by the multiple-gusts model
///
/// Three families are kept apart: domain errors (inputs outside the range
/// where the model is defined), numerical errors (NaN/Inf produced from
/// valid inputs) and accumulation errors (an integrator fed inconsistent
/// data).
#[derive(Debug, Error)]
pub enum AmietError {
    /// A physical parameter is outside the model's domain
    #[error("invalid {name}: {value} ({reason})")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Accepted range
        reason: &'static str,
    },

    /// Mach number outside [0, 1)
    #[error("Mach number {0} outside the subsonic range [0, 1)")]
    InvalidMach(f64),

    /// Surface point on or upstream of the leading edge, or past the trailing edge
    #[error("surface point {index} at x/b = {x_star} is outside the chord (-1, 1]")]
    PointOutsideChord {
        /// Index of the offending point
        index: usize,
        /// Non-dimensional chordwise coordinate
        x_star: f64,
    },

    /// Spanwise wavenumber grid cannot be built
    #[error("invalid wavenumber grid: {0}")]
    InvalidWavenumberGrid(String),

    /// NaN or Inf produced from valid inputs
    #[error("non-finite value in {stage} at index {index}")]
    NonFinite {
        /// Pipeline stage that produced the value
        stage: &'static str,
        /// Flattened index of the first bad entry
        index: usize,
    },

    /// Auto-spectrum came out negative beyond round-off
    #[error("negative spectrum {value:e} at observer {observer} (tolerance {tolerance:e})")]
    NegativeSpectrum {
        /// Observer index
        observer: usize,
        /// Real part of the diagonal entry
        value: f64,
        /// Noise floor it was compared against
        tolerance: f64,
    },

    /// Arrays that must agree in size do not
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being combined
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// Geometry or scenario configuration error
    #[error(transparent)]
    Config(#[from] CommonError),
}

/// A specialized `Result` type for the gust engine
pub type Result<T> = std::result::Result<T, AmietError>;

impl AmietError {
    /// Returns `true` if the inputs are outside the model's domain.
    pub fn is_domain_error(&self) -> bool {
        match self {
            AmietError::InvalidParameter { .. }
            | AmietError::InvalidMach(_)
            | AmietError::PointOutsideChord { .. }
            | AmietError::InvalidWavenumberGrid(_) => true,
            AmietError::Config(e) => e.is_parameter_error(),
            _ => false,
        }
    }

    /// Returns `true` if NaN/Inf was produced from valid inputs.
    pub fn is_numerical_error(&self) -> bool {
        matches!(self, AmietError::NonFinite { .. })
    }

    /// Returns `true` if an integrator was fed inconsistent contributions.
    pub fn is_accumulation_error(&self) -> bool {
        matches!(
            self,
            AmietError::NegativeSpectrum { .. } | AmietError::DimensionMismatch { .. }
        )
    }
}

/// Reject values that are not strictly positive and finite
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AmietError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

/// Reject Mach numbers outside [0, 1)
pub(crate) fn require_subsonic(mach: f64) -> Result<()> {
    if mach.is_finite() && (0.0..1.0).contains(&mach) {
        Ok(())
    } else {
        Err(AmietError::InvalidMach(mach))
    }
}

/// Reject mean flows that do not run along the chord (+x)
pub(crate) fn require_chordwise_flow(flow: &FlowConditions) -> Result<()> {
    if flow.flow_axis == Axis::X {
        Ok(())
    } else {
        Err(CommonError::UnsupportedFlowAxis(flow.flow_axis).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AmietError::PointOutsideChord {
            index: 3,
            x_star: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "surface point 3 at x/b = -1 is outside the chord (-1, 1]"
        );

        let err = AmietError::NonFinite {
            stage: "pressure jump",
            index: 7,
        };
        assert_eq!(err.to_string(), "non-finite value in pressure jump at index 7");
    }

    #[test]
    fn test_error_families() {
        assert!(AmietError::InvalidMach(1.2).is_domain_error());
        assert!(!AmietError::InvalidMach(1.2).is_numerical_error());

        let numerical = AmietError::NonFinite {
            stage: "green's function",
            index: 0,
        };
        assert!(numerical.is_numerical_error());
        assert!(!numerical.is_domain_error());

        let accumulation = AmietError::NegativeSpectrum {
            observer: 1,
            value: -1.0,
            tolerance: 1e-12,
        };
        assert!(accumulation.is_accumulation_error());
        assert!(!accumulation.is_domain_error());
    }

    #[test]
    fn test_config_error_is_domain() {
        let err: AmietError = CommonError::InvalidParameter {
            name: "half span",
            value: 0.0,
            reason: "must be positive and finite",
        }
        .into();
        assert!(err.is_domain_error());
        assert_eq!(err.to_string(), "invalid half span: 0 (must be positive and finite)");
    }

    #[test]
    fn test_require_subsonic() {
        assert!(require_subsonic(0.0).is_ok());
        assert!(require_subsonic(0.5).is_ok());
        assert!(require_subsonic(1.0).is_err());
        assert!(require_subsonic(-0.1).is_err());
        assert!(require_subsonic(f64::NAN).is_err());
        assert!(require_positive("b", 0.0).is_err());
    }
}
