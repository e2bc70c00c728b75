//! Unsteady pressure jump induced by a single oblique gust
//!
//! Amiet's flat-plate response with Schwarzschild's trailing-edge
//! back-scattering correction. For a gust of upwash amplitude w₀ and
//! wavenumbers (Kx, ky), at x* = x/b:
//!
//! ```text
//! Δp(x, y) = 2π ρ₀ U w₀ g(x*) exp(-i ky y)
//!
//! g1 = exp(-i[(κ - μa M)(x*+1) + π/4]) / (π √(π (x*+1)(Kx b + β² κ)))
//! g2 = -exp(-i[(κ - μa M)(x*+1) + π/4]) / (π √(2π (Kx b + β² κ)))
//!      · [1 - (1+i) E*(2κ(1-x*))]
//! ```
//!
//! with β² = 1 - M², μh = Kx b/β², μa = μh M and
//! κ² = μa² - (ky b/β)².
//!
//! ## Branches
//!
//! κ² is formed as (μa - |ky|b/β)(μa + |ky|b/β), which stays accurate
//! when |ky| is close to the critical wavenumber. Supercritical gusts
//! (κ² ≥ 0) take κ = +√κ². Subcritical gusts take the evanescent root
//! κ = -i√(-κ²): the phase term then decays along the chord and the
//! bracket reduces to a real complementary error function. Both roots go
//! to zero at the critical wavenumber, so g is continuous in ky.
//!
//! The bracket is evaluated as erfc(e^{iπ/4}√(2κ(1-x*))), which is
//! identical to 1 - (1+i)E*(2κ(1-x*)) and equals 1 at the trailing edge,
//! where g1 + g2 = 0 (Kutta condition).

use crate::error::{
    AmietError, Result, require_chordwise_flow, require_positive, require_subsonic,
};
use math_aero_common::{AerofoilMesh, FlowConditions};
use math_aero_wave::special::erfc;
use ndarray::{Array1, ArrayView2};
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_4, PI};

/// Gust response of a flat plate at one frequency
///
/// Holds everything that does not depend on the spanwise wavenumber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmietResponse {
    density: f64,
    half_chord: f64,
    flow_speed: f64,
    mach: f64,
    kx: f64,
}

/// Per-gust constants of g(x*)
#[derive(Debug, Clone, Copy)]
struct GustTerms {
    kappa: Complex64,
    /// κ - μa·M
    phase_rate: Complex64,
    /// √(Kx b + β² κ)
    root: Complex64,
}

impl AmietResponse {
    /// Create the response for a streamwise wavenumber Kx
    ///
    /// # Arguments
    /// * `density` - Fluid density ρ₀ (kg/m³)
    /// * `half_chord` - Half chord b (m)
    /// * `flow_speed` - Mean flow speed U (m/s)
    /// * `mach` - Mach number, in [0, 1)
    /// * `kx` - Streamwise gust wavenumber Kx = ω/U (rad/m)
    pub fn new(density: f64, half_chord: f64, flow_speed: f64, mach: f64, kx: f64) -> Result<Self> {
        require_positive("half chord", half_chord)?;
        require_positive("density", density)?;
        require_positive("flow speed", flow_speed)?;
        require_positive("streamwise wavenumber", kx)?;
        require_subsonic(mach)?;

        Ok(Self {
            density,
            half_chord,
            flow_speed,
            mach,
            kx,
        })
    }

    /// Create from flow conditions at frequency `frequency` (Hz)
    ///
    /// The mean flow must run along +x, the chordwise direction.
    pub fn at_frequency(flow: &FlowConditions, half_chord: f64, frequency: f64) -> Result<Self> {
        require_chordwise_flow(flow)?;
        require_positive("frequency", frequency)?;
        require_positive("flow speed", flow.flow_speed)?;
        let kx = 2.0 * PI * frequency / flow.flow_speed;
        Self::new(flow.density, half_chord, flow.flow_speed, flow.mach(), kx)
    }

    /// Streamwise wavenumber Kx (rad/m)
    pub fn kx(&self) -> f64 {
        self.kx
    }

    /// Mach number
    pub fn mach(&self) -> f64 {
        self.mach
    }

    /// Critical spanwise wavenumber Kx·M/β
    pub fn critical_wavenumber(&self) -> f64 {
        crate::core::sampler::critical_wavenumber(self.kx, self.mach)
    }

    /// Non-dimensional chordwise wavenumber κ for spanwise wavenumber `ky`
    pub fn kappa(&self, ky: f64) -> Complex64 {
        let beta2 = 1.0 - self.mach * self.mach;
        let beta = beta2.sqrt();
        let mu_a = self.kx * self.half_chord * self.mach / beta2;
        let ky_bar = ky.abs() * self.half_chord / beta;

        let kappa2 = (mu_a - ky_bar) * (mu_a + ky_bar);
        if kappa2 >= 0.0 {
            Complex64::new(kappa2.sqrt(), 0.0)
        } else {
            Complex64::new(0.0, -(-kappa2).sqrt())
        }
    }

    fn gust_terms(&self, ky: f64) -> GustTerms {
        let beta2 = 1.0 - self.mach * self.mach;
        let kx_b = self.kx * self.half_chord;
        let mu_a = kx_b * self.mach / beta2;
        let kappa = self.kappa(ky);

        GustTerms {
            kappa,
            phase_rate: kappa - mu_a * self.mach,
            root: (kappa * beta2 + kx_b).sqrt(),
        }
    }

    fn evaluate(terms: &GustTerms, x_star: f64) -> Complex64 {
        let i = Complex64::i();
        let phase = (-i * (terms.phase_rate * (x_star + 1.0) + FRAC_PI_4)).exp();

        let g1 = phase / (PI * (PI * (x_star + 1.0)).sqrt() * terms.root);

        let w = Complex64::from_polar(1.0, FRAC_PI_4) * (terms.kappa * (2.0 * (1.0 - x_star))).sqrt();
        let g2 = -phase / (PI * (2.0 * PI).sqrt() * terms.root) * erfc(w);

        g1 + g2
    }

    fn check_chord_position(index: usize, x_star: f64) -> Result<()> {
        if x_star.is_finite() && x_star > -1.0 && x_star <= 1.0 {
            Ok(())
        } else {
            Err(AmietError::PointOutsideChord { index, x_star })
        }
    }

    /// Non-dimensional chordwise response g(x*) for spanwise wavenumber `ky`
    ///
    /// Defined for -1 < x* ≤ 1; it is singular as (x*+1)^(-1/2) at the
    /// leading edge and vanishes at the trailing edge.
    pub fn chordwise_response(&self, ky: f64, x_star: f64) -> Result<Complex64> {
        require_finite("spanwise wavenumber", ky)?;
        Self::check_chord_position(0, x_star)?;

        let g = Self::evaluate(&self.gust_terms(ky), x_star);
        if g.re.is_finite() && g.im.is_finite() {
            Ok(g)
        } else {
            Err(AmietError::NonFinite {
                stage: "chordwise response",
                index: 0,
            })
        }
    }

    /// Pressure jump Δp at arbitrary in-plane points
    ///
    /// # Arguments
    /// * `ky` - Spanwise gust wavenumber (rad/m)
    /// * `amplitude` - Upwash amplitude w₀ (m/s)
    /// * `coordinates` - n × 2 array of (x, y) positions (m)
    pub fn pressure_jump(
        &self,
        ky: f64,
        amplitude: f64,
        coordinates: ArrayView2<f64>,
    ) -> Result<Array1<Complex64>> {
        require_finite("spanwise wavenumber", ky)?;
        require_amplitude(amplitude)?;
        if coordinates.ncols() != 2 {
            return Err(AmietError::DimensionMismatch {
                context: "in-plane coordinates",
                expected: 2,
                found: coordinates.ncols(),
            });
        }

        let terms = self.gust_terms(ky);
        let scale = 2.0 * PI * self.density * self.flow_speed * amplitude;

        let mut dp = Array1::zeros(coordinates.nrows());
        for (index, point) in coordinates.outer_iter().enumerate() {
            let x_star = point[0] / self.half_chord;
            Self::check_chord_position(index, x_star)?;

            let span_phase = Complex64::from_polar(1.0, -ky * point[1]);
            let value = Self::evaluate(&terms, x_star) * span_phase * scale;
            if !(value.re.is_finite() && value.im.is_finite()) {
                return Err(AmietError::NonFinite {
                    stage: "pressure jump",
                    index,
                });
            }
            dp[index] = value;
        }

        Ok(dp)
    }

    /// Pressure jump on a structured aerofoil mesh
    ///
    /// Same values as [`pressure_jump`](Self::pressure_jump) on
    /// `mesh.in_plane_coordinates()`, but g is evaluated once per chordwise
    /// station instead of once per point.
    pub fn pressure_jump_on_mesh(
        &self,
        mesh: &AerofoilMesh,
        ky: f64,
        amplitude: f64,
    ) -> Result<Array1<Complex64>> {
        require_finite("spanwise wavenumber", ky)?;
        require_amplitude(amplitude)?;

        let terms = self.gust_terms(ky);
        let scale = 2.0 * PI * self.density * self.flow_speed * amplitude;

        let mut chordwise = Vec::with_capacity(mesh.nx());
        for (i, &x) in mesh.chord.iter().enumerate() {
            let x_star = x / self.half_chord;
            Self::check_chord_position(i, x_star)?;
            chordwise.push(Self::evaluate(&terms, x_star) * scale);
        }

        let mut dp = Array1::zeros(mesh.len());
        for (j, &y) in mesh.span.iter().enumerate() {
            let span_phase = Complex64::from_polar(1.0, -ky * y);
            for (i, g) in chordwise.iter().enumerate() {
                let index = mesh.index(i, j);
                let value = g * span_phase;
                if !(value.re.is_finite() && value.im.is_finite()) {
                    return Err(AmietError::NonFinite {
                        stage: "pressure jump",
                        index,
                    });
                }
                dp[index] = value;
            }
        }

        Ok(dp)
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AmietError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn require_amplitude(amplitude: f64) -> Result<()> {
    if amplitude.is_finite() && amplitude >= 0.0 {
        Ok(())
    } else {
        Err(AmietError::InvalidParameter {
            name: "gust amplitude",
            value: amplitude,
            reason: "must be finite and non-negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use math_aero_wave::Axis;
    use math_aero_wave::special::fresnel_e_star;
    use ndarray::Array2;

    const B: f64 = 0.075;

    /// kc = 0.5 reference case: 15 cm chord at 60 m/s
    fn reference() -> AmietResponse {
        let flow = FlowConditions::new(1.2, 340.0, 60.0);
        AmietResponse::at_frequency(&flow, B, 180.3756).unwrap()
    }

    #[test]
    fn test_kappa_branches() {
        let response = reference();
        let ky_crit = response.critical_wavenumber();

        let supercritical = response.kappa(0.5 * ky_crit);
        assert!(supercritical.re > 0.0);
        assert_eq!(supercritical.im, 0.0);

        let subcritical = response.kappa(2.0 * ky_crit);
        assert_eq!(subcritical.re, 0.0);
        assert!(subcritical.im < 0.0);

        // κ vanishes at the critical wavenumber
        assert!(response.kappa(ky_crit).norm() < 1e-6);
    }

    #[test]
    fn test_kutta_condition() {
        let response = reference();
        let ky_crit = response.critical_wavenumber();
        for ky in [0.0, 0.5 * ky_crit, ky_crit, 3.0 * ky_crit, 20.0 * ky_crit] {
            let g_te = response.chordwise_response(ky, 1.0).unwrap();
            let g_mid = response.chordwise_response(ky, 0.0).unwrap();
            assert!(
                g_te.norm() <= 1e-12 * g_mid.norm(),
                "ky = {}: |g(1)| = {:e}",
                ky,
                g_te.norm()
            );
        }
    }

    #[test]
    fn test_continuity_across_critical_wavenumber() {
        let response = reference();
        let ky_crit = response.critical_wavenumber();

        let jump = |delta: f64| {
            let above = response
                .chordwise_response(ky_crit * (1.0 + delta), 0.0)
                .unwrap();
            let below = response
                .chordwise_response(ky_crit * (1.0 - delta), 0.0)
                .unwrap();
            (above - below).norm() / below.norm()
        };

        let coarse = jump(1e-8);
        let fine = jump(1e-12);
        assert!(fine < 1e-2, "relative jump {:e}", fine);
        assert!(fine < coarse);

        let at = response.chordwise_response(ky_crit, 0.0).unwrap();
        assert!(at.re.is_finite() && at.im.is_finite());
    }

    #[test]
    fn test_even_in_ky() {
        let response = reference();
        for ky in [1.0, 5.0, 40.0] {
            let plus = response.chordwise_response(ky, -0.3).unwrap();
            let minus = response.chordwise_response(-ky, -0.3).unwrap();
            assert_eq!(plus, minus);
        }
    }

    #[test]
    fn test_bracket_matches_fresnel_integral() {
        let response = reference();
        let ky_crit = response.critical_wavenumber();
        let one_plus_i = Complex64::new(1.0, 1.0);

        for ky in [0.3 * ky_crit, 4.0 * ky_crit] {
            let kappa = response.kappa(ky);
            for x_star in [-0.9, 0.0, 0.7] {
                let z = kappa * (2.0 * (1.0 - x_star));
                let via_fresnel = Complex64::new(1.0, 0.0) - one_plus_i * fresnel_e_star(z);
                let w = Complex64::from_polar(1.0, FRAC_PI_4) * z.sqrt();
                let via_erfc = erfc(w);
                assert_relative_eq!(via_fresnel.re, via_erfc.re, epsilon = 1e-12);
                assert_relative_eq!(via_fresnel.im, via_erfc.im, epsilon = 1e-12);
            }
        }

        // evanescent gusts give a real bracket
        let kappa = response.kappa(4.0 * ky_crit);
        let bracket = one_plus_i * fresnel_e_star(kappa * 1.2);
        assert!(bracket.im.abs() < 1e-12);
    }

    #[test]
    fn test_subcritical_response_decays() {
        let response = reference();
        let ky_crit = response.critical_wavenumber();
        let weak = response.chordwise_response(2.0 * ky_crit, 0.0).unwrap();
        let strong = response.chordwise_response(40.0 * ky_crit, 0.0).unwrap();
        assert!(strong.norm() < weak.norm());
    }

    #[test]
    fn test_leading_edge_singularity() {
        let response = reference();
        let near = response.chordwise_response(0.0, -1.0 + 1e-6).unwrap();
        let mid = response.chordwise_response(0.0, 0.0).unwrap();
        assert!(near.norm() > 100.0 * mid.norm());
    }

    #[test]
    fn test_pressure_jump_scaling_and_span_phase() {
        let response = reference();
        let ky = 7.0;
        let coords = Array2::from_shape_vec((2, 2), vec![0.01, 0.0, 0.01, 0.05]).unwrap();
        let dp = response.pressure_jump(ky, 0.5, coords.view()).unwrap();

        let g = response.chordwise_response(ky, 0.01 / B).unwrap();
        let expected = g * (2.0 * PI * 1.2 * 60.0 * 0.5);
        assert_relative_eq!(dp[0].re, expected.re, max_relative = 1e-12);
        assert_relative_eq!(dp[0].im, expected.im, max_relative = 1e-12);

        let shifted = dp[0] * Complex64::from_polar(1.0, -ky * 0.05);
        assert_relative_eq!(dp[1].re, shifted.re, epsilon = 1e-10, max_relative = 1e-12);
        assert_relative_eq!(dp[1].im, shifted.im, epsilon = 1e-10, max_relative = 1e-12);
    }

    #[test]
    fn test_mesh_path_matches_generic_path() {
        let response = reference();
        let mesh = AerofoilMesh::new(B, 0.225, 12, 7).unwrap();
        let coords = mesh.in_plane_coordinates();

        let generic = response.pressure_jump(3.0, 0.2, coords.view()).unwrap();
        let structured = response.pressure_jump_on_mesh(&mesh, 3.0, 0.2).unwrap();
        assert_eq!(generic.len(), structured.len());
        for (a, b) in generic.iter().zip(structured.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_amplitude_gives_zero_pressure() {
        let response = reference();
        let mesh = AerofoilMesh::new(B, 0.225, 4, 3).unwrap();
        let dp = response.pressure_jump_on_mesh(&mesh, 1.0, 0.0).unwrap();
        assert!(dp.iter().all(|v| v.norm() == 0.0));
    }

    #[test]
    fn test_points_outside_chord() {
        let response = reference();
        let on_le = Array2::from_shape_vec((1, 2), vec![-B, 0.0]).unwrap();
        let err = response.pressure_jump(1.0, 1.0, on_le.view()).unwrap_err();
        assert!(matches!(err, AmietError::PointOutsideChord { index: 0, .. }));
        assert!(err.is_domain_error());

        let past_te = Array2::from_shape_vec((2, 2), vec![0.0, 0.0, 1.01 * B, 0.0]).unwrap();
        let err = response.pressure_jump(1.0, 1.0, past_te.view()).unwrap_err();
        assert!(matches!(err, AmietError::PointOutsideChord { index: 1, .. }));

        // the trailing edge itself is allowed
        let on_te = Array2::from_shape_vec((1, 2), vec![B, 0.0]).unwrap();
        let dp = response.pressure_jump(1.0, 1.0, on_te.view()).unwrap();
        assert!(dp[0].norm() < 1e-9);

        let bad_shape = Array2::<f64>::zeros((2, 3));
        assert!(response.pressure_jump(1.0, 1.0, bad_shape.view()).is_err());
    }

    #[test]
    fn test_domain_errors() {
        assert!(AmietResponse::new(1.2, 0.0, 60.0, 0.2, 10.0).is_err());
        assert!(AmietResponse::new(0.0, B, 60.0, 0.2, 10.0).is_err());
        assert!(AmietResponse::new(1.2, B, -60.0, 0.2, 10.0).is_err());
        assert!(AmietResponse::new(1.2, B, 60.0, 0.2, 0.0).is_err());
        assert!(AmietResponse::new(1.2, B, 60.0, 1.0, 10.0).is_err());
        assert!(AmietResponse::new(1.2, B, 60.0, -0.1, 10.0).is_err());

        let err = AmietResponse::new(1.2, B, 60.0, 1.0, 10.0).unwrap_err();
        assert!(matches!(err, AmietError::InvalidMach(_)));

        let response = reference();
        assert!(response.chordwise_response(f64::NAN, 0.0).is_err());
        assert!(response.chordwise_response(1.0, -1.0).is_err());
        let coords = Array2::<f64>::zeros((1, 2));
        assert!(response.pressure_jump(1.0, -1.0, coords.view()).is_err());
    }

    #[test]
    fn test_flow_must_run_along_chord() {
        let mut flow = FlowConditions::new(1.2, 340.0, 60.0);
        assert!(AmietResponse::at_frequency(&flow, B, 180.0).is_ok());

        for axis in [Axis::Y, Axis::Z] {
            flow.flow_axis = axis;
            let err = AmietResponse::at_frequency(&flow, B, 180.0).unwrap_err();
            assert!(err.is_domain_error());
        }
    }

    #[test]
    fn test_no_flow_is_valid() {
        // M = 0: every gust is subcritical except ky = 0
        let response = AmietResponse::new(1.2, B, 1.0, 0.0, 10.0).unwrap();
        assert_eq!(response.critical_wavenumber(), 0.0);
        let g = response.chordwise_response(5.0, 0.2).unwrap();
        assert!(g.norm() > 0.0);
    }
}
