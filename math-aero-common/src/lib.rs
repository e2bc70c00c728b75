//! Shared types for turbulence-aerofoil noise prediction
//!
//! This crate holds what the gust response engine and its drivers have in
//! common:
//!
//! - Points, flow conditions and frequency helpers
//! - The stretched aerofoil surface mesh and far-field observer arcs
//! - JSON scenario configuration loading/saving
//! - Directivity output (dB normalisation and JSON formatting)

mod config;
mod error;
mod geometry;
mod output;
mod types;

pub use config::*;
pub use error::{CommonError, Result};
pub use geometry::*;
pub use math_aero_wave::{Axis, MeanFlow};
pub use output::*;
pub use types::*;

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
