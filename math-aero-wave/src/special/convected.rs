//! Free-field Green's functions in a uniform mean flow
//!
//! Time dependence is exp(+iωt), so outgoing waves carry exp(-ikr).
//! With the flow along axis `f` at Mach number M (β² = 1 - M²) and the
//! separation Δ = observer - source:
//!
//! ```text
//! σ = √(Δf² + β²Δ⊥²)
//! G = exp(-ik(σ - MΔf)/β²) / (4πσ)
//! ```
//!
//! The dipole kernel is the derivative of G with respect to the observer
//! coordinate along the dipole axis `a`:
//!
//! ```text
//! ∂σ/∂Δa = (β²Δa + M²Δf δaf) / σ
//! ∂G/∂Δa = G · [-ik/β² (∂σ/∂Δa - M δaf) - (1/σ) ∂σ/∂Δa]
//! ```
//!
//! At M = 0 both reduce to the classical free-field kernels.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Cartesian axis, used for mean flow direction and dipole orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x (chordwise)
    #[default]
    X,
    /// y (spanwise)
    Y,
    /// z (normal to the aerofoil plane)
    Z,
}

impl Axis {
    /// Component index into an `[x, y, z]` triple
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{}", name)
    }
}

/// Uniform mean flow: direction and Mach number
///
/// A positive Mach number means flow towards the positive axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanFlow {
    /// Flow direction
    pub axis: Axis,
    /// Signed Mach number
    pub mach: f64,
}

impl MeanFlow {
    /// Create a mean flow along `axis`
    pub fn new(axis: Axis, mach: f64) -> Self {
        Self { axis, mach }
    }

    /// Medium at rest
    pub fn quiescent() -> Self {
        Self::new(Axis::X, 0.0)
    }

    /// β² = 1 - M²
    #[inline]
    pub fn beta2(&self) -> f64 {
        1.0 - self.mach * self.mach
    }

    /// β = √(1 - M²)
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta2().sqrt()
    }
}

impl Default for MeanFlow {
    fn default() -> Self {
        Self::quiescent()
    }
}

/// Classical 3D Green's function G = exp(-ikr)/(4πr)
///
/// # Example
/// ```
/// use math_aero_wave::special::greens_function_3d;
///
/// let g = greens_function_3d(1.0, 2.0);
/// assert!((g.norm() - 1.0 / (4.0 * std::f64::consts::PI)).abs() < 1e-12);
/// ```
#[inline]
pub fn greens_function_3d(r: f64, k: f64) -> Complex64 {
    if r < 1e-15 {
        return Complex64::new(f64::INFINITY, 0.0);
    }

    let kr = k * r;
    Complex64::new(kr.cos(), -kr.sin()) / (4.0 * PI * r)
}

/// Classical dipole kernel ∂G/∂Δa = -(ik + 1/r)(Δa/r) G
pub fn dipole_greens_function_3d(delta: &[f64; 3], k: f64, axis: Axis) -> Complex64 {
    let r = norm(delta);
    if r < 1e-15 {
        return Complex64::new(f64::INFINITY, 0.0);
    }

    let g = greens_function_3d(r, k);
    -Complex64::new(1.0 / r, k) * g * (delta[axis.index()] / r)
}

/// Convected (Lorentz-contracted) distance σ = √(β²|Δ|² + M²Δf²)
#[inline]
pub fn convected_distance(delta: &[f64; 3], flow: &MeanFlow) -> f64 {
    let delta_f = delta[flow.axis.index()];
    let r2 = delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2];
    (flow.beta2() * r2 + flow.mach * flow.mach * delta_f * delta_f).sqrt()
}

/// Convected monopole Green's function
///
/// # Arguments
/// * `delta` - Separation observer - source (m)
/// * `k` - Acoustic wavenumber ω/c₀ (rad/m)
/// * `flow` - Mean flow
pub fn convected_greens_function(delta: &[f64; 3], k: f64, flow: &MeanFlow) -> Complex64 {
    let sigma = convected_distance(delta, flow);
    if sigma < 1e-15 {
        return Complex64::new(f64::INFINITY, 0.0);
    }

    let delta_f = delta[flow.axis.index()];
    let phase = k * (sigma - flow.mach * delta_f) / flow.beta2();
    Complex64::new(phase.cos(), -phase.sin()) / (4.0 * PI * sigma)
}

/// Convected dipole Green's function along `dipole_axis`
pub fn convected_dipole_greens_function(
    delta: &[f64; 3],
    k: f64,
    dipole_axis: Axis,
    flow: &MeanFlow,
) -> Complex64 {
    let sigma = convected_distance(delta, flow);
    if sigma < 1e-15 {
        return Complex64::new(f64::INFINITY, 0.0);
    }

    let f = flow.axis.index();
    let a = dipole_axis.index();
    let mach = flow.mach;
    let beta2 = flow.beta2();
    let along_flow = if a == f { 1.0 } else { 0.0 };

    let delta_f = delta[f];
    let phase = k * (sigma - mach * delta_f) / beta2;
    let g = Complex64::new(phase.cos(), -phase.sin()) / (4.0 * PI * sigma);

    let dsigma = (beta2 * delta[a] + mach * mach * delta_f * along_flow) / sigma;
    let dphase = k * (dsigma - mach * along_flow) / beta2;

    g * Complex64::new(-dsigma / sigma, -dphase)
}

#[inline]
fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
