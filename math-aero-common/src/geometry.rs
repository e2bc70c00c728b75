//! Aerofoil surface mesh and far-field observer arcs
//!
//! The aerofoil is a flat plate of chord 2b and span 2d lying in the z = 0
//! plane, centred on the origin, with the leading edge at x = -b.

use crate::error::{Result, require_count, require_positive};
use crate::types::{Point3D, lin_space};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Default exponent of the chordwise stretching
pub const DEFAULT_CHORD_STRETCHING: f64 = 2.0;

/// Flat-plate aerofoil sampled on a chordwise × spanwise grid
///
/// Chordwise samples are strip midpoints of an exponentially stretched
/// partition of [-b, b], densest at the leading edge where the pressure
/// jump is singular; no sample ever sits on the edge itself. Spanwise
/// samples are uniform over [-d, d].
///
/// Points are flattened span-row major: index = j·nx + i, with `i` the
/// chordwise and `j` the spanwise index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerofoilMesh {
    /// Half chord b (m)
    pub half_chord: f64,
    /// Half span d (m)
    pub half_span: f64,
    /// Chordwise sample positions (m), length nx
    pub chord: Vec<f64>,
    /// Chordwise strip widths dx (m), length nx, summing to 2b
    pub chord_widths: Vec<f64>,
    /// Spanwise sample positions (m), length ny
    pub span: Vec<f64>,
    /// Uniform spanwise spacing dy (m)
    pub span_width: f64,
}

impl AerofoilMesh {
    /// Create a mesh with the default chordwise stretching
    pub fn new(half_chord: f64, half_span: f64, nx: usize, ny: usize) -> Result<Self> {
        Self::with_stretching(half_chord, half_span, nx, ny, DEFAULT_CHORD_STRETCHING)
    }

    /// Create a mesh with an explicit chordwise stretching exponent
    ///
    /// # Arguments
    /// * `half_chord` - Half chord b (m)
    /// * `half_span` - Half span d (m)
    /// * `nx` - Number of chordwise strips (≥ 1)
    /// * `ny` - Number of spanwise samples (≥ 2)
    /// * `stretching` - Exponent L of the partition exp(L·k/nx); larger is
    ///   denser at the leading edge
    pub fn with_stretching(
        half_chord: f64,
        half_span: f64,
        nx: usize,
        ny: usize,
        stretching: f64,
    ) -> Result<Self> {
        require_positive("half chord", half_chord)?;
        require_positive("half span", half_span)?;
        require_positive("chord stretching", stretching)?;
        require_count("chordwise points", nx, 1)?;
        require_count("spanwise points", ny, 2)?;

        let (chord, chord_widths) = chord_sampling(half_chord, nx, stretching);
        let span = lin_space(-half_span, half_span, ny);
        let span_width = span[1] - span[0];

        Ok(Self {
            half_chord,
            half_span,
            chord,
            chord_widths,
            span,
            span_width,
        })
    }

    /// Number of chordwise samples
    pub fn nx(&self) -> usize {
        self.chord.len()
    }

    /// Number of spanwise samples
    pub fn ny(&self) -> usize {
        self.span.len()
    }

    /// Total number of surface points
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Check if the mesh has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened index of chordwise sample `i` on span row `j`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx() + i
    }

    /// All surface points (z = 0), flattened
    pub fn points(&self) -> Vec<Point3D> {
        let mut points = Vec::with_capacity(self.len());
        for &y in &self.span {
            for &x in &self.chord {
                points.push(Point3D::new(x, y, 0.0));
            }
        }
        points
    }

    /// In-plane (chord, span) coordinates, one row per point
    pub fn in_plane_coordinates(&self) -> Array2<f64> {
        let mut xy = Array2::zeros((self.len(), 2));
        for (j, &y) in self.span.iter().enumerate() {
            for (i, &x) in self.chord.iter().enumerate() {
                let n = self.index(i, j);
                xy[[n, 0]] = x;
                xy[[n, 1]] = y;
            }
        }
        xy
    }

    /// Area element dx·dy of every point, flattened
    pub fn area_weights(&self) -> Array1<f64> {
        let mut weights = Array1::zeros(self.len());
        for j in 0..self.ny() {
            for (i, &dx) in self.chord_widths.iter().enumerate() {
                weights[self.index(i, j)] = dx * self.span_width;
            }
        }
        weights
    }

    /// Planform area 4bd
    pub fn planform_area(&self) -> f64 {
        4.0 * self.half_chord * self.half_span
    }
}

/// Exponentially stretched chord partition, returned as (midpoints, widths)
///
/// Partition edges e_k = b·(2·(exp(L·k/n) - 1)/(exp(L) - 1) - 1), k = 0..=n,
/// run from -b to b.
fn chord_sampling(half_chord: f64, n: usize, stretching: f64) -> (Vec<f64>, Vec<f64>) {
    let scale = stretching.exp_m1();
    let edges: Vec<f64> = (0..=n)
        .map(|k| {
            let u = (stretching * k as f64 / n as f64).exp_m1() / scale;
            half_chord * (2.0 * u - 1.0)
        })
        .collect();

    let midpoints = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    let widths = edges.windows(2).map(|w| w[1] - w[0]).collect();
    (midpoints, widths)
}

/// Plane containing a far-field observer arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcPlane {
    /// y = 0 plane, azimuth φ = 0
    Chordwise,
    /// x = 0 plane, azimuth φ = π/2
    Spanwise,
}

impl std::fmt::Display for ArcPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcPlane::Chordwise => write!(f, "chordwise (y = 0)"),
            ArcPlane::Spanwise => write!(f, "spanwise (x = 0)"),
        }
    }
}

/// Observers on a half circle of constant radius below the aerofoil
///
/// θ runs from -π/2 to π/2; θ = 0 is directly beneath the aerofoil at
/// (0, 0, -R). On the chordwise arc θ = +π/2 is downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverArc {
    /// Arc plane
    pub plane: ArcPlane,
    /// Arc radius R (m)
    pub radius: f64,
    /// Polar angles (rad)
    pub theta: Vec<f64>,
    /// Observer positions
    pub points: Vec<Point3D>,
}

impl ObserverArc {
    /// Create `n` observers evenly spaced in θ
    pub fn new(plane: ArcPlane, radius: f64, n: usize) -> Result<Self> {
        require_positive("observer radius", radius)?;
        require_count("observer points", n, 1)?;

        let theta = if n == 1 {
            vec![0.0]
        } else {
            lin_space(-FRAC_PI_2, FRAC_PI_2, n)
        };

        let points = theta
            .iter()
            .map(|&t| {
                let (s, c) = t.sin_cos();
                match plane {
                    ArcPlane::Chordwise => Point3D::new(radius * s, 0.0, -radius * c),
                    ArcPlane::Spanwise => Point3D::new(0.0, radius * s, -radius * c),
                }
            })
            .collect();

        Ok(Self {
            plane,
            radius,
            theta,
            points,
        })
    }

    /// Chordwise-plane arc
    pub fn chordwise(radius: f64, n: usize) -> Result<Self> {
        Self::new(ArcPlane::Chordwise, radius, n)
    }

    /// Spanwise-plane arc
    pub fn spanwise(radius: f64, n: usize) -> Result<Self> {
        Self::new(ArcPlane::Spanwise, radius, n)
    }

    /// Number of observers
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the arc has no observers
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
