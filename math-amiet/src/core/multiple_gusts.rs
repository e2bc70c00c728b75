//! Multiple-gusts model
//!
//! The turbulence spectrum at one frequency is represented by a set of
//! oblique gusts with fixed Kx = ω/U and spanwise wavenumbers from the
//! [`WavenumberGrid`]. Each gust is solved independently and its
//! far-field auto-spectrum is added incoherently:
//!
//! ```text
//! for ky in grid:
//!     w0 = √Φ(Kx, ky)
//!     q  = Δp(ky, w0) · dx · dy
//!     S += c · |G q|² · U · Δky      (per observer set)
//! ```
//!
//! Green's matrices are built once per observer set and shared by every
//! gust; gusts are folded into per-thread integrators and reduced.

use crate::core::integrator::{DEFAULT_RADIATION_CONSTANT, SpectralIntegrator, source_strengths};
use crate::core::parallel::{is_parallel_available, parallel_try_fold_reduce, worker_threads};
use crate::core::pressure::AmietResponse;
use crate::core::propagator::GreenMatrix;
use crate::core::sampler::{SamplerSettings, SamplingRegime, WavenumberGrid};
use crate::core::turbulence::{TurbulenceSpectrum, spectrum_from_config};
use crate::error::{AmietError, Result, require_chordwise_flow, require_positive};
use math_aero_common::{AerofoilMesh, FlowConditions, ObserverArc, Point3D, ScenarioConfig};
use math_aero_wave::Axis;
use ndarray::Array1;
use std::f64::consts::PI;

/// One gust of the decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gust {
    /// Spanwise wavenumber (rad/m)
    pub ky: f64,
    /// Turbulence spectrum Φ(Kx, ky)
    pub spectrum: f64,
}

impl Gust {
    /// Upwash amplitude w₀ = √Φ
    pub fn amplitude(&self) -> f64 {
        self.spectrum.sqrt()
    }
}

/// Spectra produced by one run
#[derive(Debug, Clone)]
pub struct MultipleGustsResult {
    /// Frequency (Hz)
    pub frequency: f64,
    /// Streamwise gust wavenumber Kx (rad/m)
    pub kx: f64,
    /// Acoustic wavenumber k₀ (rad/m)
    pub k0: f64,
    /// Spanwise wavenumber grid
    pub grid: WavenumberGrid,
    /// Gusts that passed the significance threshold
    pub gusts_integrated: usize,
    /// Power spectral density per observer set, in input order
    pub spectra: Vec<Array1<f64>>,
}

impl MultipleGustsResult {
    /// Regime of the wavenumber grid
    pub fn regime(&self) -> SamplingRegime {
        self.grid.regime
    }
}

/// Far-field noise of an aerofoil in isotropic turbulence
pub struct MultipleGustsModel {
    mesh: AerofoilMesh,
    flow: FlowConditions,
    frequency: f64,
    turbulence: Box<dyn TurbulenceSpectrum>,
    sampler: SamplerSettings,
    dipole_axis: Axis,
    radiation_constant: f64,
    significance_threshold: Option<f64>,
}

impl MultipleGustsModel {
    /// Create a model with default sampling and a z-oriented dipole
    pub fn new(
        mesh: AerofoilMesh,
        flow: FlowConditions,
        frequency: f64,
        turbulence: Box<dyn TurbulenceSpectrum>,
    ) -> Self {
        Self {
            mesh,
            flow,
            frequency,
            turbulence,
            sampler: SamplerSettings::default(),
            dipole_axis: Axis::Z,
            radiation_constant: DEFAULT_RADIATION_CONSTANT,
            significance_threshold: None,
        }
    }

    /// Build the model described by a scenario
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        config.validate()?;
        let mesh = config.aerofoil.to_mesh()?;
        let flow = config.flow.to_conditions();
        let frequency = config.frequency_hz()?;
        let turbulence = spectrum_from_config(&config.turbulence, flow.flow_speed);

        Ok(Self::new(mesh, flow, frequency, turbulence)
            .with_sampling(SamplerSettings::from(&config.sampling))
            .with_dipole_axis(config.radiation.dipole_axis)
            .with_radiation_constant(config.radiation.radiation_constant)
            .with_significance_threshold(config.sampling.significance_threshold))
    }

    /// Set the wavenumber sampler
    pub fn with_sampling(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    /// Set the dipole orientation
    pub fn with_dipole_axis(mut self, axis: Axis) -> Self {
        self.dipole_axis = axis;
        self
    }

    /// Set the radiation constant
    pub fn with_radiation_constant(mut self, constant: f64) -> Self {
        self.radiation_constant = constant;
        self
    }

    /// Skip gusts with Φ below `threshold · max Φ`
    pub fn with_significance_threshold(mut self, threshold: Option<f64>) -> Self {
        self.significance_threshold = threshold;
        self
    }

    /// Surface mesh
    pub fn mesh(&self) -> &AerofoilMesh {
        &self.mesh
    }

    /// Flow conditions
    pub fn flow(&self) -> &FlowConditions {
        &self.flow
    }

    /// Frequency (Hz)
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Acoustic wavenumber k₀ = ω/c₀
    pub fn acoustic_wavenumber(&self) -> f64 {
        2.0 * PI * self.frequency / self.flow.speed_of_sound
    }

    /// Chord-based reduced frequency k₀·2b
    pub fn reduced_frequency(&self) -> f64 {
        self.acoustic_wavenumber() * 2.0 * self.mesh.half_chord
    }

    /// Gust response at this frequency
    pub fn response(&self) -> Result<AmietResponse> {
        require_positive("speed of sound", self.flow.speed_of_sound)?;
        AmietResponse::at_frequency(&self.flow, self.mesh.half_chord, self.frequency)
    }

    /// Spanwise wavenumber grid at this frequency
    pub fn wavenumber_grid(&self) -> Result<WavenumberGrid> {
        let response = self.response()?;
        WavenumberGrid::sample(
            response.critical_wavenumber(),
            self.mesh.half_span,
            &self.sampler,
        )
    }

    /// Gusts on `grid`, after the significance threshold
    pub fn gusts(&self, grid: &WavenumberGrid) -> Result<Vec<Gust>> {
        let kx = self.response()?.kx();

        let mut gusts = Vec::with_capacity(grid.len());
        for (index, &ky) in grid.values.iter().enumerate() {
            let spectrum = self.turbulence.spectrum(kx, ky);
            if !spectrum.is_finite() {
                return Err(AmietError::NonFinite {
                    stage: "turbulence spectrum",
                    index,
                });
            }
            if spectrum < 0.0 {
                return Err(AmietError::InvalidParameter {
                    name: "turbulence spectrum",
                    value: spectrum,
                    reason: "must be non-negative",
                });
            }
            gusts.push(Gust { ky, spectrum });
        }

        if let Some(threshold) = self.significance_threshold {
            let peak = gusts.iter().fold(0.0, |m: f64, g| m.max(g.spectrum));
            let cutoff = threshold * peak;
            let before = gusts.len();
            gusts.retain(|g| g.spectrum >= cutoff);
            log::debug!(
                "Significance threshold {:.1e} kept {} of {} gusts",
                threshold,
                gusts.len(),
                before
            );
        }

        Ok(gusts)
    }

    /// Green's matrix from the mesh to `observers`
    pub fn green_matrix(&self, observers: &[Point3D]) -> Result<GreenMatrix> {
        require_chordwise_flow(&self.flow)?;
        GreenMatrix::new(
            observers,
            &self.mesh.points(),
            self.acoustic_wavenumber(),
            self.dipole_axis,
            &self.flow.mean_flow(),
        )
    }

    /// Run for a list of observer arcs
    pub fn run(&self, arcs: &[&ObserverArc]) -> Result<MultipleGustsResult> {
        let greens = arcs
            .iter()
            .map(|arc| self.green_matrix(&arc.points))
            .collect::<Result<Vec<_>>>()?;
        self.run_with_greens(&greens)
    }

    /// Run with Green's matrices that were already assembled
    pub fn run_with_greens(&self, greens: &[GreenMatrix]) -> Result<MultipleGustsResult> {
        for green in greens {
            if green.n_sources() != self.mesh.len() {
                return Err(AmietError::DimensionMismatch {
                    context: "green's matrix sources",
                    expected: self.mesh.len(),
                    found: green.n_sources(),
                });
            }
        }

        let response = self.response()?;
        let grid = WavenumberGrid::sample(
            response.critical_wavenumber(),
            self.mesh.half_span,
            &self.sampler,
        )?;
        let gusts = self.gusts(&grid)?;

        log::info!(
            "Multiple gusts: f = {:.2} Hz (kc = {:.3}), Kx = {:.3} rad/m, ky_crit = {:.3} rad/m, {:?} grid",
            self.frequency,
            self.reduced_frequency(),
            response.kx(),
            response.critical_wavenumber(),
            grid.regime
        );
        log::info!(
            "Integrating {} of {} gusts over {} surface points on {} thread(s){}",
            gusts.len(),
            grid.len(),
            self.mesh.len(),
            worker_threads(),
            if is_parallel_available() { "" } else { " (sequential build)" }
        );

        let weights = self.mesh.area_weights();
        let flow_speed = self.flow.flow_speed;
        let dky = grid.spacing;
        let radiation_constant = self.radiation_constant;

        let identity = || {
            greens
                .iter()
                .map(|g| {
                    SpectralIntegrator::new(g.n_observers())
                        .with_radiation_constant(radiation_constant)
                })
                .collect::<Vec<_>>()
        };

        let integrators = parallel_try_fold_reduce(
            &gusts,
            identity,
            |mut integrators: Vec<SpectralIntegrator>, gust: &Gust| {
                let dp = response.pressure_jump_on_mesh(&self.mesh, gust.ky, gust.amplitude())?;
                let q = source_strengths(dp.view(), weights.view())?;
                for (integrator, green) in integrators.iter_mut().zip(greens) {
                    integrator.accumulate(green, q.view(), flow_speed, dky)?;
                }
                log::debug!("Gust ky = {:.4} rad/m, Phi = {:.4e}", gust.ky, gust.spectrum);
                Ok(integrators)
            },
            |left: Vec<SpectralIntegrator>, right: Vec<SpectralIntegrator>| {
                left.into_iter()
                    .zip(right)
                    .map(|(a, b)| a.merge(b))
                    .collect::<Result<Vec<_>>>()
            },
        )?;

        let spectra: Vec<Array1<f64>> = integrators
            .into_iter()
            .map(SpectralIntegrator::finalize)
            .collect();

        Ok(MultipleGustsResult {
            frequency: self.frequency,
            kx: response.kx(),
            k0: self.acoustic_wavenumber(),
            grid,
            gusts_integrated: gusts.len(),
            spectra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::turbulence::{Liepmann, VonKarman};

    fn small_model() -> MultipleGustsModel {
        let mesh = AerofoilMesh::new(0.075, 0.225, 16, 17).unwrap();
        let flow = FlowConditions::new(1.2, 340.0, 60.0);
        let turbulence = Box::new(VonKarman::new(2.25, 0.007));
        MultipleGustsModel::new(mesh, flow, 180.3756, turbulence)
    }

    #[test]
    fn test_reduced_frequency() {
        let model = small_model();
        assert!((model.reduced_frequency() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_grid_regime_at_low_frequency() {
        let grid = small_model().wavenumber_grid().unwrap();
        assert_eq!(grid.regime, SamplingRegime::LowFrequency);
        assert_eq!(grid.len(), 41);
    }

    #[test]
    fn test_significance_threshold_drops_gusts() {
        let model = small_model();
        let grid = model.wavenumber_grid().unwrap();
        let all = model.gusts(&grid).unwrap();
        assert_eq!(all.len(), grid.len());

        let model = model.with_significance_threshold(Some(0.999));
        let kept = model.gusts(&grid).unwrap();
        assert!(!kept.is_empty());
        assert!(kept.len() < all.len());
    }

    #[test]
    fn test_run_shapes_and_sign() {
        let model = small_model();
        let arc = ObserverArc::chordwise(50.0, 7).unwrap();
        let result = model.run(&[&arc]).unwrap();

        assert_eq!(result.spectra.len(), 1);
        assert_eq!(result.spectra[0].len(), 7);
        assert_eq!(result.gusts_integrated, 41);
        assert!(result.spectra[0].iter().all(|&v| v >= 0.0 && v.is_finite()));
        assert!(result.spectra[0][3] > 0.0);
    }

    #[test]
    fn test_run_with_no_observer_sets() {
        let result = small_model().run(&[]).unwrap();
        assert!(result.spectra.is_empty());
    }

    #[test]
    fn test_liepmann_model_runs() {
        let mesh = AerofoilMesh::new(0.075, 0.225, 8, 9).unwrap();
        let flow = FlowConditions::new(1.2, 340.0, 60.0);
        let model =
            MultipleGustsModel::new(mesh, flow, 500.0, Box::new(Liepmann::new(2.25, 0.007)));
        let arc = ObserverArc::spanwise(50.0, 5).unwrap();
        let result = model.run(&[&arc]).unwrap();
        assert!(result.spectra[0][2] > 0.0);
    }

    #[test]
    fn test_mismatched_green_matrix() {
        let model = small_model();
        let other = AerofoilMesh::new(0.075, 0.225, 4, 5).unwrap();
        let arc = ObserverArc::chordwise(50.0, 3).unwrap();
        let green = GreenMatrix::new(
            &arc.points,
            &other.points(),
            model.acoustic_wavenumber(),
            Axis::Z,
            &model.flow().mean_flow(),
        )
        .unwrap();
        let err = model.run_with_greens(&[green]).unwrap_err();
        assert!(err.is_accumulation_error());
    }

    #[test]
    fn test_invalid_frequency() {
        let mesh = AerofoilMesh::new(0.075, 0.225, 4, 5).unwrap();
        let flow = FlowConditions::new(1.2, 340.0, 60.0);
        let model = MultipleGustsModel::new(mesh, flow, 0.0, Box::new(VonKarman::new(1.0, 0.01)));
        let err = model.wavenumber_grid().unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_cross_chord_flow_is_rejected() {
        let mesh = AerofoilMesh::new(0.075, 0.225, 4, 5).unwrap();
        let mut flow = FlowConditions::new(1.2, 340.0, 60.0);
        flow.flow_axis = Axis::Z;
        let model =
            MultipleGustsModel::new(mesh, flow, 180.3756, Box::new(VonKarman::new(2.25, 0.007)));
        let arc = ObserverArc::chordwise(50.0, 3).unwrap();

        assert!(model.run(&[&arc]).unwrap_err().is_domain_error());
        assert!(model.green_matrix(&arc.points).unwrap_err().is_domain_error());

        let mut config = ScenarioConfig::default();
        config.flow.flow_axis = Axis::Y;
        let err = MultipleGustsModel::from_config(&config).err().unwrap();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_from_default_config() {
        let config = ScenarioConfig::default();
        let model = MultipleGustsModel::from_config(&config).unwrap();
        assert_eq!(model.mesh().len(), 100 * 101);
        assert!((model.frequency() - 180.3756).abs() < 1e-3);
    }
}
