//! # Amiet: multiple-gusts aerofoil noise
//!
//! Far-field noise of a flat-plate aerofoil in isotropic inflow turbulence.
//! The turbulence spectrum at one frequency is split into oblique gusts;
//! each gust's unsteady pressure jump follows from Amiet's analytic
//! response, is radiated through a convected dipole Green's function, and
//! the observer auto-spectra are summed incoherently.
//!
//! ## Features
//!
//! - Leading-edge response with trailing-edge back-scattering, continuous
//!   across the critical spanwise wavenumber
//! - Cached Green's matrices, gusts reduced in parallel with Rayon
//! - JSON scenarios and directivity output via `math-aero-common`
//!
//! ## Example
//!
//! ```no_run
//! use math_amiet::core::MultipleGustsModel;
//! use math_amiet::ScenarioConfig;
//!
//! let config = ScenarioConfig::default();
//! let model = MultipleGustsModel::from_config(&config)?;
//! let (chordwise, spanwise) = config.observers.to_arcs()?;
//! let result = model.run(&[&chordwise, &spanwise])?;
//! println!("peak PSD {:e}", result.spectra[0].fold(0.0, |m: f64, v| m.max(*v)));
//! # Ok::<(), math_amiet::AmietError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod error;

// Re-exports
pub use error::{AmietError, Result};
pub use math_aero_common::{
    AerofoilMesh, ArcPlane, DirectivityOutput, FlowConditions, ObserverArc, RunSummary,
    ScenarioConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (set during build)
pub const GIT_HASH: &str = env!("GIT_HASH");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!GIT_HASH.is_empty());
    }
}
