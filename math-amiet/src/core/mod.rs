//! Gust response and radiation engine
//!
//! ## Architecture
//!
//! - `sampler`: adaptive spanwise wavenumber grid
//! - `turbulence`: von Kármán and Liepmann upwash spectra
//! - `pressure`: Amiet/Schwarzschild pressure jump for one gust
//! - `propagator`: convected dipole Green's matrix, surface → observers
//! - `integrator`: incoherent accumulation of observer spectra
//! - `multiple_gusts`: the full pipeline
//! - `parallel`: rayon helpers with sequential fallbacks

pub mod integrator;
pub mod multiple_gusts;
pub mod parallel;
pub mod pressure;
pub mod propagator;
pub mod sampler;
pub mod turbulence;

// Re-exports for convenience
pub use integrator::{SpectralIntegrator, SurfaceCovariance, source_strengths};
pub use multiple_gusts::{Gust, MultipleGustsModel, MultipleGustsResult};
pub use pressure::AmietResponse;
pub use propagator::GreenMatrix;
pub use sampler::{
    SamplerSettings, SamplingRegime, WavenumberGrid, critical_wavenumber, periodicity_wavenumber,
};
pub use turbulence::{Liepmann, TurbulenceSpectrum, VonKarman, spectrum_from_config};
