//! Surface-to-observer dipole propagation
//!
//! The Green's matrix maps surface source strengths to observer pressures.
//! It depends only on geometry, acoustic wavenumber, mean flow and dipole
//! orientation, so it is built once per observer set and shared read-only
//! by every gust.

use crate::core::parallel::parallel_map_indexed;
use crate::error::{AmietError, Result, require_positive};
use math_aero_common::Point3D;
use math_aero_wave::special::convected_dipole_greens_function;
use math_aero_wave::{Axis, MeanFlow};
use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;

/// Dipole Green's function matrix, observers × surface points
#[derive(Debug, Clone)]
pub struct GreenMatrix {
    matrix: Array2<Complex64>,
    wavenumber: f64,
    dipole_axis: Axis,
}

impl GreenMatrix {
    /// Assemble the matrix
    ///
    /// Entry (i, j) is the convected dipole Green's function for the
    /// separation `observers[i] - sources[j]`. Rows are computed in
    /// parallel.
    ///
    /// # Arguments
    /// * `observers` - Far-field observer positions
    /// * `sources` - Surface point positions
    /// * `wavenumber` - Acoustic wavenumber k₀ = ω/c₀ (rad/m)
    /// * `dipole_axis` - Orientation of the surface dipoles
    /// * `flow` - Mean flow
    pub fn new(
        observers: &[Point3D],
        sources: &[Point3D],
        wavenumber: f64,
        dipole_axis: Axis,
        flow: &MeanFlow,
    ) -> Result<Self> {
        require_positive("acoustic wavenumber", wavenumber)?;
        if !(flow.mach.is_finite() && flow.mach.abs() < 1.0) {
            return Err(AmietError::InvalidMach(flow.mach));
        }

        let n_obs = observers.len();
        let n_src = sources.len();

        let rows: Vec<Vec<Complex64>> = parallel_map_indexed(n_obs, |i| {
            let observer = &observers[i];
            sources
                .iter()
                .map(|source| {
                    let delta = observer.separation_from(source);
                    convected_dipole_greens_function(&delta, wavenumber, dipole_axis, flow)
                })
                .collect()
        });

        let flat: Vec<Complex64> = rows.into_iter().flatten().collect();
        if let Some(index) = flat
            .iter()
            .position(|g| !(g.re.is_finite() && g.im.is_finite()))
        {
            return Err(AmietError::NonFinite {
                stage: "green's function",
                index,
            });
        }

        let found = flat.len();
        let matrix = Array2::from_shape_vec((n_obs, n_src), flat).map_err(|_| {
            AmietError::DimensionMismatch {
                context: "green's matrix",
                expected: n_obs * n_src,
                found,
            }
        })?;

        log::debug!(
            "Green's matrix assembled: {} observers x {} sources, k0 = {:.4} rad/m",
            n_obs,
            n_src,
            wavenumber
        );

        Ok(Self {
            matrix,
            wavenumber,
            dipole_axis,
        })
    }

    /// The matrix itself
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Number of observers (rows)
    pub fn n_observers(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of surface points (columns)
    pub fn n_sources(&self) -> usize {
        self.matrix.ncols()
    }

    /// Acoustic wavenumber used for assembly
    pub fn wavenumber(&self) -> f64 {
        self.wavenumber
    }

    /// Dipole orientation used for assembly
    pub fn dipole_axis(&self) -> Axis {
        self.dipole_axis
    }

    /// Observer pressures G·q for surface source strengths q
    pub fn apply(&self, strengths: ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        if strengths.len() != self.n_sources() {
            return Err(AmietError::DimensionMismatch {
                context: "source strengths",
                expected: self.n_sources(),
                found: strengths.len(),
            });
        }
        Ok(self.matrix.dot(&strengths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use math_aero_wave::special::dipole_greens_function_3d;
    use std::f64::consts::PI;

    fn sources() -> Vec<Point3D> {
        vec![
            Point3D::new(-0.05, 0.0, 0.0),
            Point3D::new(0.02, 0.1, 0.0),
            Point3D::new(0.07, -0.2, 0.0),
        ]
    }

    fn observers() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, -50.0),
            Point3D::new(35.0, 0.0, -35.0),
            Point3D::new(0.0, -20.0, -10.0),
        ]
    }

    #[test]
    fn test_zero_flow_matches_classical_dipole() {
        let k0 = 2.0 * PI * 180.0 / 340.0;
        let green = GreenMatrix::new(&observers(), &sources(), k0, Axis::Z, &MeanFlow::quiescent())
            .unwrap();

        for (i, obs) in observers().iter().enumerate() {
            for (j, src) in sources().iter().enumerate() {
                let delta = obs.separation_from(src);
                let expected = dipole_greens_function_3d(&delta, k0, Axis::Z);
                let g = green.matrix()[[i, j]];
                assert_relative_eq!(g.re, expected.re, epsilon = 1e-15, max_relative = 1e-12);
                assert_relative_eq!(g.im, expected.im, epsilon = 1e-15, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_shape_and_apply() {
        let flow = MeanFlow::new(Axis::X, 0.18);
        let green = GreenMatrix::new(&observers(), &sources(), 3.3, Axis::Z, &flow).unwrap();
        assert_eq!(green.n_observers(), 3);
        assert_eq!(green.n_sources(), 3);
        assert_eq!(green.dipole_axis(), Axis::Z);

        let q = Array1::from(vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]);
        let p = green.apply(q.view()).unwrap();
        for i in 0..3 {
            let g = green.matrix()[[i, 0]];
            assert_relative_eq!(p[i].re, g.re, max_relative = 1e-14);
            assert_relative_eq!(p[i].im, g.im, max_relative = 1e-14);
        }

        let short = Array1::<Complex64>::zeros(2);
        let err = green.apply(short.view()).unwrap_err();
        assert!(err.is_accumulation_error());
    }

    #[test]
    fn test_in_plane_observer_is_silent_for_normal_dipole() {
        let flow = MeanFlow::new(Axis::X, 0.18);
        let observers = [Point3D::new(50.0, 0.0, 0.0)];
        let green = GreenMatrix::new(&observers, &sources(), 3.3, Axis::Z, &flow).unwrap();
        for g in green.matrix().iter() {
            assert_eq!(g.norm(), 0.0);
        }
    }

    #[test]
    fn test_coincident_point_is_numerical_error() {
        let src = sources();
        let observers = [src[1]];
        let err = GreenMatrix::new(&observers, &src, 3.3, Axis::Z, &MeanFlow::quiescent())
            .unwrap_err();
        assert!(err.is_numerical_error());
        assert!(matches!(err, AmietError::NonFinite { index: 1, .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let flow = MeanFlow::new(Axis::X, 1.0);
        assert!(GreenMatrix::new(&observers(), &sources(), 3.3, Axis::Z, &flow).is_err());
        assert!(
            GreenMatrix::new(&observers(), &sources(), 0.0, Axis::Z, &MeanFlow::quiescent())
                .is_err()
        );
    }
}
