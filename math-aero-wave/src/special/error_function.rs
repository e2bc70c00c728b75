//! Complex error function and Amiet's Fresnel integral
//!
//! ```text
//! erf(z) = 2/√π ∫₀^z exp(-t²) dt
//! E*(z)  = ∫₀^z exp(-it) / √(2πt) dt = exp(-iπ/4)/√2 · erf(exp(iπ/4)·√z)
//! ```
//!
//! The Maclaurin series is used where its alternating terms do not cancel
//! badly (small real part, moderate modulus); Laplace's continued fraction
//! for erfc covers the rest of the right half-plane. The left half-plane
//! follows from erf(-z) = -erf(z).
//!
//! Series cancellation costs roughly 2·Re(z)²/ln(10) digits, so the switch
//! at Re(z) = 2 keeps about 12 significant digits in the worst case.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, PI};

/// Real part above which the continued fraction takes over
const SERIES_MAX_REAL: f64 = 2.0;

/// Modulus above which the series terms could overflow
const SERIES_MAX_MODULUS: f64 = 8.0;

const MAX_SERIES_TERMS: usize = 500;
const MAX_FRACTION_TERMS: usize = 2000;
const FRACTION_TOLERANCE: f64 = 1e-15;
const TINY: f64 = 1e-300;

/// Complex error function erf(z)
///
/// # Example
/// ```
/// use math_aero_wave::special::erf;
/// use num_complex::Complex64;
///
/// let e = erf(Complex64::new(1.0, 0.0));
/// assert!((e.re - 0.8427007929497149).abs() < 1e-12);
/// assert!(e.im.abs() < 1e-15);
/// ```
pub fn erf(z: Complex64) -> Complex64 {
    if !z.re.is_finite() || !z.im.is_finite() {
        return Complex64::new(f64::NAN, f64::NAN);
    }
    if z.re < 0.0 {
        return -erf(-z);
    }
    if use_series(z) {
        erf_series(z)
    } else {
        Complex64::new(1.0, 0.0) - erfc_continued_fraction(z)
    }
}

/// Complementary error function erfc(z) = 1 - erf(z)
///
/// Evaluated directly from the continued fraction in the right half-plane,
/// so small values keep their relative accuracy.
pub fn erfc(z: Complex64) -> Complex64 {
    if !z.re.is_finite() || !z.im.is_finite() {
        return Complex64::new(f64::NAN, f64::NAN);
    }
    if z.re < 0.0 {
        return Complex64::new(2.0, 0.0) - erfc(-z);
    }
    if use_series(z) {
        Complex64::new(1.0, 0.0) - erf_series(z)
    } else {
        erfc_continued_fraction(z)
    }
}

/// Amiet's complex Fresnel integral E*(z) = ∫₀^z exp(-it)/√(2πt) dt
///
/// The principal square root is used, so for a negative imaginary
/// argument z = -i·r the result reduces to a real error function:
/// (1 + i)·E*(-i·r) = erf(√r). For real positive x, E*(x) = C₂(x) - i·S₂(x)
/// with C₂(∞) = S₂(∞) = 1/2.
pub fn fresnel_e_star(z: Complex64) -> Complex64 {
    let rotation = Complex64::from_polar(1.0, FRAC_PI_4);
    let w = rotation * z.sqrt();
    rotation.conj() * FRAC_1_SQRT_2 * erf(w)
}

#[inline]
fn use_series(z: Complex64) -> bool {
    z.re < SERIES_MAX_REAL && z.norm() < SERIES_MAX_MODULUS
}

/// Maclaurin series: 2/√π Σ (-1)ⁿ z²ⁿ⁺¹ / (n! (2n+1))
fn erf_series(z: Complex64) -> Complex64 {
    let minus_z2 = -z * z;
    let mut term = z;
    let mut sum = z;

    for n in 1..MAX_SERIES_TERMS {
        term *= minus_z2 / n as f64;
        let contribution = term / (2 * n + 1) as f64;
        sum += contribution;
        if contribution.norm() <= f64::EPSILON * sum.norm() {
            break;
        }
    }

    sum * (2.0 / PI.sqrt())
}

/// Laplace continued fraction, modified Lentz evaluation
///
/// ```text
/// erfc(z) = exp(-z²)/√π · 1/(z + (1/2)/(z + 1/(z + (3/2)/(z + ...))))
/// ```
///
/// Valid for Re(z) > 0.
fn erfc_continued_fraction(z: Complex64) -> Complex64 {
    let tiny = Complex64::new(TINY, 0.0);

    let mut f = if z.norm() < TINY { tiny } else { z };
    let mut c = f;
    let mut d = Complex64::new(0.0, 0.0);

    for n in 1..MAX_FRACTION_TERMS {
        let a = n as f64 / 2.0;

        d = z + d * a;
        if d.norm() < TINY {
            d = tiny;
        }
        c = z + c.inv() * a;
        if c.norm() < TINY {
            c = tiny;
        }
        d = d.inv();

        let delta = c * d;
        f *= delta;
        if (delta - 1.0).norm() < FRACTION_TOLERANCE {
            break;
        }
    }

    (-z * z).exp() / (f * PI.sqrt())
}
