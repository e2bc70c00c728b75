//! Special functions for gust-aerofoil acoustics
//!
//! - Complex error function erf(z), erfc(z)
//! - Amiet's complex Fresnel integral E*(z)
//! - Free-field Green's functions (monopole and dipole), at rest and in a
//!   uniform mean flow
//!
//! The error function carries the leading-edge/trailing-edge response of
//! the aerofoil; the Green's functions carry the radiation to observers.

pub mod convected;
mod error_function;

pub use convected::*;
pub use error_function::*;
