//! Incoherent accumulation of gust contributions into observer spectra
//!
//! For one gust with surface source strengths q = Δp·dx·dy the surface
//! cross-spectral matrix is C = q·qᴴ·U·Δky, and each observer receives
//!
//! ```text
//! S_ii += c · Re[(G C Gᴴ)_ii]
//! ```
//!
//! with c the radiation constant (4π by default). Since C has rank one,
//! (G C Gᴴ)_ii = |(G q)_i|²·U·Δky, so [`SpectralIntegrator::accumulate`]
//! never forms a surface × surface matrix.
//! [`SpectralIntegrator::accumulate_covariance`] takes a general Hermitian
//! matrix instead.

use crate::core::propagator::GreenMatrix;
use crate::error::{AmietError, Result, require_positive};
use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use num_traits::Zero;
use std::f64::consts::PI;

/// Default radiation constant 4π
pub const DEFAULT_RADIATION_CONSTANT: f64 = 4.0 * PI;

/// Relative noise floor under which negative auto-spectra are rounded to zero
pub const DEFAULT_NOISE_TOLERANCE: f64 = 1e-10;

/// Source strengths q = Δp·w from a pressure jump and area weights
pub fn source_strengths(
    pressure: ArrayView1<Complex64>,
    weights: ArrayView1<f64>,
) -> Result<Array1<Complex64>> {
    if pressure.len() != weights.len() {
        return Err(AmietError::DimensionMismatch {
            context: "area weights",
            expected: pressure.len(),
            found: weights.len(),
        });
    }
    Ok(pressure
        .iter()
        .zip(weights.iter())
        .map(|(p, &w)| p * w)
        .collect())
}

/// Hermitian surface cross-spectral matrix
#[derive(Debug, Clone)]
pub struct SurfaceCovariance {
    matrix: Array2<Complex64>,
}

impl SurfaceCovariance {
    /// Wrap an explicit matrix
    pub fn new(matrix: Array2<Complex64>) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(AmietError::DimensionMismatch {
                context: "surface covariance",
                expected: matrix.nrows(),
                found: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }

    /// Single-gust covariance q·qᴴ·U·Δky
    pub fn from_strengths(strengths: ArrayView1<Complex64>, flow_speed: f64, dky: f64) -> Self {
        let n = strengths.len();
        let scale = flow_speed * dky;
        let matrix =
            Array2::from_shape_fn((n, n), |(j, k)| strengths[j] * strengths[k].conj() * scale);
        Self { matrix }
    }

    /// The matrix itself
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Matrix size
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Largest entry modulus
    pub fn max_abs(&self) -> f64 {
        self.matrix.iter().fold(0.0, |m: f64, c| m.max(c.norm()))
    }

    /// Check C = Cᴴ within `tolerance` relative to the largest entry
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        let scale = self.max_abs().max(f64::MIN_POSITIVE);
        let n = self.size();
        (0..n).all(|j| {
            (j..n).all(|k| {
                (self.matrix[[j, k]] - self.matrix[[k, j]].conj()).norm() <= tolerance * scale
            })
        })
    }

    /// Quadratic form vᴴ·C·v
    pub fn quadratic_form(&self, v: ArrayView1<Complex64>) -> Result<Complex64> {
        if v.len() != self.size() {
            return Err(AmietError::DimensionMismatch {
                context: "quadratic form",
                expected: self.size(),
                found: v.len(),
            });
        }
        let cv = self.matrix.dot(&v);
        Ok(v.iter()
            .zip(cv.iter())
            .fold(Complex64::zero(), |acc, (a, b)| acc + a.conj() * b))
    }
}

/// Running observer spectrum for one observer set
#[derive(Debug, Clone)]
pub struct SpectralIntegrator {
    spectrum: Array1<f64>,
    radiation_constant: f64,
    noise_tolerance: f64,
    gusts: usize,
    clamped: usize,
}

impl SpectralIntegrator {
    /// Zero-initialised integrator for `n_observers` observers
    pub fn new(n_observers: usize) -> Self {
        Self {
            spectrum: Array1::zeros(n_observers),
            radiation_constant: DEFAULT_RADIATION_CONSTANT,
            noise_tolerance: DEFAULT_NOISE_TOLERANCE,
            gusts: 0,
            clamped: 0,
        }
    }

    /// Set the radiation constant
    pub fn with_radiation_constant(mut self, constant: f64) -> Self {
        self.radiation_constant = constant;
        self
    }

    /// Set the relative noise floor for negative auto-spectra
    pub fn with_noise_tolerance(mut self, tolerance: f64) -> Self {
        self.noise_tolerance = tolerance;
        self
    }

    /// Number of observers
    pub fn n_observers(&self) -> usize {
        self.spectrum.len()
    }

    /// Gusts accumulated so far
    pub fn gusts(&self) -> usize {
        self.gusts
    }

    /// Negative auto-spectra rounded to zero so far
    ///
    /// Only [`accumulate_covariance`](Self::accumulate_covariance) rounds;
    /// the rank-1 path adds |G·q|² and cannot go negative.
    pub fn clamped(&self) -> usize {
        self.clamped
    }

    /// Current partial sum
    pub fn spectrum(&self) -> ArrayView1<'_, f64> {
        self.spectrum.view()
    }

    fn check_observers(&self, green: &GreenMatrix) -> Result<()> {
        if green.n_observers() != self.n_observers() {
            return Err(AmietError::DimensionMismatch {
                context: "observer count",
                expected: self.n_observers(),
                found: green.n_observers(),
            });
        }
        Ok(())
    }

    /// Add one gust given its source strengths q
    pub fn accumulate(
        &mut self,
        green: &GreenMatrix,
        strengths: ArrayView1<Complex64>,
        flow_speed: f64,
        dky: f64,
    ) -> Result<()> {
        require_positive("flow speed", flow_speed)?;
        require_positive("wavenumber spacing", dky)?;
        self.check_observers(green)?;

        let pressure = green.apply(strengths)?;
        let scale = self.radiation_constant * flow_speed * dky;

        let mut contribution = Array1::zeros(self.n_observers());
        for (i, p) in pressure.iter().enumerate() {
            let value = p.norm_sqr() * scale;
            if !value.is_finite() {
                return Err(AmietError::NonFinite {
                    stage: "spectral integration",
                    index: i,
                });
            }
            contribution[i] = value;
        }

        self.spectrum += &contribution;
        self.gusts += 1;
        Ok(())
    }

    /// Add one gust given an explicit surface covariance matrix
    ///
    /// Negative diagonal entries smaller in magnitude than
    /// `tolerance · (Σₖ|Gᵢₖ|)² · max|C|` are rounding noise and are set to
    /// zero; larger ones are an error.
    pub fn accumulate_covariance(
        &mut self,
        green: &GreenMatrix,
        covariance: &SurfaceCovariance,
    ) -> Result<()> {
        self.check_observers(green)?;
        if covariance.size() != green.n_sources() {
            return Err(AmietError::DimensionMismatch {
                context: "surface covariance",
                expected: green.n_sources(),
                found: covariance.size(),
            });
        }

        let g = green.matrix();
        let gc = g.dot(covariance.matrix());
        let c_max = covariance.max_abs();

        let mut contribution = Array1::zeros(self.n_observers());
        let mut clamped = 0;
        for i in 0..self.n_observers() {
            let diagonal = gc
                .row(i)
                .iter()
                .zip(g.row(i).iter())
                .fold(Complex64::zero(), |acc, (a, b)| acc + a * b.conj());
            let value = diagonal.re;
            if !value.is_finite() {
                return Err(AmietError::NonFinite {
                    stage: "spectral integration",
                    index: i,
                });
            }

            let value = if value < 0.0 {
                let row_sum: f64 = g.row(i).iter().map(|c| c.norm()).sum();
                let floor = self.noise_tolerance * row_sum * row_sum * c_max;
                if -value <= floor {
                    log::warn!(
                        "Rounding negative auto-spectrum {:e} to zero at observer {} (floor {:e})",
                        value,
                        i,
                        floor
                    );
                    clamped += 1;
                    0.0
                } else {
                    return Err(AmietError::NegativeSpectrum {
                        observer: i,
                        value,
                        tolerance: floor,
                    });
                }
            } else {
                value
            };

            contribution[i] = self.radiation_constant * value;
        }

        self.spectrum += &contribution;
        self.gusts += 1;
        self.clamped += clamped;
        Ok(())
    }

    /// Combine two partial sums over disjoint gust sets
    pub fn merge(mut self, other: SpectralIntegrator) -> Result<Self> {
        if other.n_observers() != self.n_observers() {
            return Err(AmietError::DimensionMismatch {
                context: "integrator merge",
                expected: self.n_observers(),
                found: other.n_observers(),
            });
        }
        self.spectrum += &other.spectrum;
        self.gusts += other.gusts;
        self.clamped += other.clamped;
        Ok(self)
    }

    /// Final power spectral density at each observer
    pub fn finalize(self) -> Array1<f64> {
        self.spectrum
    }
}
