//! Special functions and Green's functions for aerofoil noise
//!
//! This crate provides the closed-form building blocks used by the gust
//! response and radiation engine.
//!
//! # Features
//!
//! - **Error function**: complex erf/erfc, accurate across the right and
//!   left half-planes
//! - **Fresnel integral**: Amiet's E*(z), including the evanescent branch
//!   reached by subcritical gusts
//! - **Green's functions**: classical and convected monopole/dipole kernels
//!
//! # Example
//!
//! ```rust
//! use math_aero_wave::special::{Axis, MeanFlow, convected_dipole_greens_function};
//!
//! let flow = MeanFlow::new(Axis::X, 0.2);
//! let g = convected_dipole_greens_function(&[0.0, 0.0, -50.0], 3.3, Axis::Z, &flow);
//! assert!(g.norm() > 0.0);
//! ```

pub mod special;

// Re-export main types at crate root
pub use special::{Axis, MeanFlow};
