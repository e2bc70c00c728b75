//! JSON scenario configuration for multiple-gust runs
//!
//! Every section has defaults matching the reference test case (15 cm chord,
//! 45 cm span, 60 m/s, kc = 0.5), so an empty JSON object is a valid
//! scenario.

use crate::error::{CommonError, Result, require_count, require_positive};
use crate::geometry::{AerofoilMesh, ObserverArc};
use crate::types::{FlowConditions, constants, frequency_from_kc};
use math_aero_wave::Axis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete scenario loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Aerofoil geometry and discretisation
    #[serde(default)]
    pub aerofoil: AerofoilConfig,
    /// Mean flow and medium
    #[serde(default)]
    pub flow: FlowConfig,
    /// Inflow turbulence statistics
    #[serde(default)]
    pub turbulence: TurbulenceConfig,
    /// Frequency of operation
    #[serde(default)]
    pub frequency: FrequencyConfig,
    /// Far-field observer arcs
    #[serde(default)]
    pub observers: ObserverConfig,
    /// Spanwise wavenumber integration
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Source orientation
    #[serde(default)]
    pub radiation: RadiationConfig,
    /// Presentation of the results
    #[serde(default)]
    pub output: OutputConfig,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Aerofoil geometry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerofoilConfig {
    /// Half chord b (m)
    #[serde(default = "default_half_chord")]
    pub half_chord: f64,
    /// Half span d (m)
    #[serde(default = "default_half_span")]
    pub half_span: f64,
    /// Chordwise strips
    #[serde(default = "default_chord_points")]
    pub chord_points: usize,
    /// Spanwise samples
    #[serde(default = "default_span_points")]
    pub span_points: usize,
    /// Exponent of the chordwise stretching
    #[serde(default = "default_chord_stretching")]
    pub chord_stretching: f64,
}

impl Default for AerofoilConfig {
    fn default() -> Self {
        Self {
            half_chord: default_half_chord(),
            half_span: default_half_span(),
            chord_points: default_chord_points(),
            span_points: default_span_points(),
            chord_stretching: default_chord_stretching(),
        }
    }
}

fn default_half_chord() -> f64 {
    0.075
}

fn default_half_span() -> f64 {
    0.225
}

fn default_chord_points() -> usize {
    100
}

fn default_span_points() -> usize {
    101
}

fn default_chord_stretching() -> f64 {
    crate::geometry::DEFAULT_CHORD_STRETCHING
}

impl AerofoilConfig {
    /// Build the surface mesh
    pub fn to_mesh(&self) -> Result<AerofoilMesh> {
        AerofoilMesh::with_stretching(
            self.half_chord,
            self.half_span,
            self.chord_points,
            self.span_points,
            self.chord_stretching,
        )
    }
}

/// Mean flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Mean flow speed U (m/s)
    #[serde(default = "default_flow_speed")]
    pub flow_speed: f64,
    /// Speed of sound c₀ (m/s)
    #[serde(default = "default_speed_of_sound")]
    pub speed_of_sound: f64,
    /// Density ρ₀ (kg/m³)
    #[serde(default = "default_density")]
    pub density: f64,
    /// Direction of the mean flow; only x (along the chord) is accepted
    #[serde(default)]
    pub flow_axis: Axis,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            flow_speed: default_flow_speed(),
            speed_of_sound: default_speed_of_sound(),
            density: default_density(),
            flow_axis: Axis::X,
        }
    }
}

fn default_flow_speed() -> f64 {
    60.0
}

fn default_speed_of_sound() -> f64 {
    constants::SPEED_OF_SOUND
}

fn default_density() -> f64 {
    constants::AIR_DENSITY
}

impl FlowConfig {
    /// Convert to FlowConditions
    pub fn to_conditions(&self) -> FlowConditions {
        FlowConditions {
            density: self.density,
            speed_of_sound: self.speed_of_sound,
            flow_speed: self.flow_speed,
            flow_axis: self.flow_axis,
        }
    }
}

/// Turbulence spectrum family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbulenceModel {
    /// von Kármán isotropic spectrum
    #[default]
    VonKarman,
    /// Liepmann isotropic spectrum
    Liepmann,
}

/// Inflow turbulence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbulenceConfig {
    /// Turbulence intensity u_rms/U
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    /// Integral length scale (m)
    #[serde(default = "default_length_scale")]
    pub length_scale: f64,
    /// Spectrum family
    #[serde(default)]
    pub model: TurbulenceModel,
}

impl Default for TurbulenceConfig {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            length_scale: default_length_scale(),
            model: TurbulenceModel::VonKarman,
        }
    }
}

fn default_intensity() -> f64 {
    0.025
}

fn default_length_scale() -> f64 {
    0.007
}

impl TurbulenceConfig {
    /// Mean-square velocity fluctuation u² = (U·I)²
    pub fn mean_square_velocity(&self, flow_speed: f64) -> f64 {
        let u_rms = flow_speed * self.intensity;
        u_rms * u_rms
    }
}

/// Frequency of operation, given as reduced frequency or in Hz
///
/// `frequency` wins over `kc` when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// Chord-based reduced frequency k₀·(2b)
    #[serde(default)]
    pub kc: Option<f64>,
    /// Frequency (Hz)
    #[serde(default)]
    pub frequency: Option<f64>,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            kc: Some(0.5),
            frequency: None,
        }
    }
}

impl FrequencyConfig {
    /// Resolve to Hz
    pub fn resolve(&self, speed_of_sound: f64, half_chord: f64) -> Result<f64> {
        let f = match (self.frequency, self.kc) {
            (Some(f), _) => f,
            (None, Some(kc)) => {
                require_positive("kc", kc)?;
                frequency_from_kc(kc, speed_of_sound, half_chord)
            }
            (None, None) => {
                return Err(CommonError::InvalidParameter {
                    name: "frequency",
                    value: f64::NAN,
                    reason: "either kc or frequency is required",
                });
            }
        };
        require_positive("frequency", f)?;
        Ok(f)
    }
}

/// Far-field observer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Arc radius (m)
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Observers per arc
    #[serde(default = "default_observer_points")]
    pub points: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            points: default_observer_points(),
        }
    }
}

fn default_radius() -> f64 {
    50.0
}

fn default_observer_points() -> usize {
    181
}

impl ObserverConfig {
    /// Build the chordwise and spanwise arcs
    pub fn to_arcs(&self) -> Result<(ObserverArc, ObserverArc)> {
        Ok((
            ObserverArc::chordwise(self.radius, self.points)?,
            ObserverArc::spanwise(self.radius, self.points)?,
        ))
    }
}

/// Spanwise wavenumber integration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Gusts used when the critical wavenumber is below the span periodicity
    #[serde(default = "default_low_frequency_points")]
    pub low_frequency_points: usize,
    /// Samples per period of the span sinc kernel at high frequency
    #[serde(default = "default_points_per_period")]
    pub points_per_period: usize,
    /// Skip gusts whose spectrum is below this fraction of the largest one
    #[serde(default)]
    pub significance_threshold: Option<f64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            low_frequency_points: default_low_frequency_points(),
            points_per_period: default_points_per_period(),
            significance_threshold: None,
        }
    }
}

fn default_low_frequency_points() -> usize {
    41
}

fn default_points_per_period() -> usize {
    20
}

/// Dipole orientation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiationConfig {
    /// Dipole axis, normal to the aerofoil by default
    #[serde(default = "default_dipole_axis")]
    pub dipole_axis: Axis,
    /// Factor applied to each gust's auto-spectrum
    #[serde(default = "default_radiation_constant")]
    pub radiation_constant: f64,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            dipole_axis: default_dipole_axis(),
            radiation_constant: default_radiation_constant(),
        }
    }
}

fn default_dipole_axis() -> Axis {
    Axis::Z
}

fn default_radiation_constant() -> f64 {
    4.0 * std::f64::consts::PI
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// PSD used as 0 dB; the largest computed value when absent
    #[serde(default)]
    pub reference_psd: Option<f64>,
    /// Lowest level reported, in dB below the reference
    #[serde(default = "default_dynamic_range")]
    pub dynamic_range_db: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reference_psd: None,
            dynamic_range_db: default_dynamic_range(),
        }
    }
}

fn default_dynamic_range() -> f64 {
    40.0
}

/// Scenario metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Scenario description
    #[serde(default)]
    pub description: String,
    /// Author name
    #[serde(default)]
    pub author: String,
}

impl ScenarioConfig {
    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: ScenarioConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        log::debug!("Loaded scenario from {}", path.display());
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        require_positive("half chord", self.aerofoil.half_chord)?;
        require_positive("half span", self.aerofoil.half_span)?;
        require_count("chordwise points", self.aerofoil.chord_points, 1)?;
        require_count("spanwise points", self.aerofoil.span_points, 2)?;
        require_positive("chord stretching", self.aerofoil.chord_stretching)?;

        require_positive("flow speed", self.flow.flow_speed)?;
        require_positive("speed of sound", self.flow.speed_of_sound)?;
        require_positive("density", self.flow.density)?;
        if self.flow.flow_axis != Axis::X {
            return Err(CommonError::UnsupportedFlowAxis(self.flow.flow_axis));
        }
        let mach = self.flow.flow_speed / self.flow.speed_of_sound;
        if mach >= 1.0 {
            return Err(CommonError::InvalidParameter {
                name: "Mach number",
                value: mach,
                reason: "flow must be subsonic",
            });
        }

        require_positive("turbulence intensity", self.turbulence.intensity)?;
        require_positive("turbulence length scale", self.turbulence.length_scale)?;

        self.frequency
            .resolve(self.flow.speed_of_sound, self.aerofoil.half_chord)?;

        require_positive("observer radius", self.observers.radius)?;
        require_count("observer points", self.observers.points, 1)?;

        require_count("low-frequency gusts", self.sampling.low_frequency_points, 2)?;
        require_count("points per period", self.sampling.points_per_period, 1)?;
        if let Some(threshold) = self.sampling.significance_threshold {
            if !(0.0..1.0).contains(&threshold) {
                return Err(CommonError::InvalidParameter {
                    name: "significance threshold",
                    value: threshold,
                    reason: "must lie in [0, 1)",
                });
            }
        }

        require_positive("radiation constant", self.radiation.radiation_constant)?;

        if let Some(reference) = self.output.reference_psd {
            require_positive("reference PSD", reference)?;
        }
        require_positive("dynamic range", self.output.dynamic_range_db)?;

        Ok(())
    }

    /// Frequency of operation (Hz)
    pub fn frequency_hz(&self) -> Result<f64> {
        self.frequency
            .resolve(self.flow.speed_of_sound, self.aerofoil.half_chord)
    }
}
