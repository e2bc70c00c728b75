//! Directivity output: normalisation, dB conversion and JSON formatting

use crate::config::{MetadataConfig, ScenarioConfig};
use crate::error::Result;
use crate::geometry::{ArcPlane, ObserverArc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Convert a PSD to dB relative to `reference`, clipped at `-dynamic_range_db`
///
/// Zero, negative or non-finite ratios map to the floor.
pub fn psd_to_db(psd: f64, reference: f64, dynamic_range_db: f64) -> f64 {
    let floor = -dynamic_range_db.abs();
    let ratio = psd / reference;
    if !(ratio.is_finite() && ratio > 0.0) {
        return floor;
    }
    (10.0 * ratio.log10()).max(floor)
}

/// Largest finite value of a spectrum, if any value is positive
pub fn peak_psd(psd: &[f64]) -> Option<f64> {
    psd.iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

/// Normalise a whole spectrum to dB
pub fn normalize_db(psd: &[f64], reference: f64, dynamic_range_db: f64) -> Vec<f64> {
    psd.iter()
        .map(|&p| psd_to_db(p, reference, dynamic_range_db))
        .collect()
}

/// PSD along one observer arc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectivityCurve {
    /// Arc plane
    pub plane: ArcPlane,
    /// Observer polar angles (degrees)
    pub theta_deg: Vec<f64>,
    /// Mean-square pressure spectral density (Pa²/Hz)
    pub psd: Vec<f64>,
    /// Level relative to the reference (dB)
    pub level_db: Vec<f64>,
}

impl DirectivityCurve {
    /// Pair an arc with its spectrum and normalise
    pub fn new(arc: &ObserverArc, psd: Vec<f64>, reference: f64, dynamic_range_db: f64) -> Self {
        let level_db = normalize_db(&psd, reference, dynamic_range_db);
        Self {
            plane: arc.plane,
            theta_deg: arc.theta.iter().map(|t| t.to_degrees()).collect(),
            psd,
            level_db,
        }
    }

    /// Angle (degrees) of the loudest observer
    pub fn peak_angle(&self) -> Option<f64> {
        self.psd
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.theta_deg[i])
    }
}

/// Run summary written next to the curves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Frequency (Hz)
    pub frequency: f64,
    /// Chord-based reduced frequency k₀·2b
    pub kc: f64,
    /// Mach number
    pub mach: f64,
    /// Whether the low-frequency wavenumber grid was used
    pub low_frequency_regime: bool,
    /// Gusts in the wavenumber grid
    pub gusts: usize,
    /// Gusts actually integrated after thresholding
    pub gusts_integrated: usize,
}

/// Complete directivity output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectivityOutput {
    /// Run summary
    pub run: RunSummary,
    /// PSD used as 0 dB
    pub reference_psd: f64,
    /// True when the reference was taken from this run's own peak
    pub reference_from_run: bool,
    /// Chordwise arc
    pub chordwise: DirectivityCurve,
    /// Spanwise arc
    pub spanwise: DirectivityCurve,
    /// Solver identifier
    pub solver: String,
    /// Scenario metadata and timestamp
    pub metadata: OutputMetadata,
}

/// Metadata stamped into output files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Scenario description
    pub description: String,
    /// Author name
    pub author: String,
    /// Creation time
    pub date: String,
}

impl OutputMetadata {
    /// Stamp scenario metadata with the current local time
    pub fn now(metadata: &MetadataConfig) -> Self {
        Self {
            description: metadata.description.clone(),
            author: metadata.author.clone(),
            date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Choose the 0 dB reference: the configured one, or the peak over both arcs
///
/// Returns the reference and whether it came from the run itself. Falls back
/// to 1.0 when the run is silent everywhere.
pub fn resolve_reference(configured: Option<f64>, spectra: &[&[f64]]) -> (f64, bool) {
    match configured {
        Some(reference) => (reference, false),
        None => {
            let peak = spectra
                .iter()
                .filter_map(|s| peak_psd(s))
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
            (peak.unwrap_or(1.0), true)
        }
    }
}

impl DirectivityOutput {
    /// Assemble output from both arcs and the scenario
    pub fn from_spectra(
        config: &ScenarioConfig,
        run: RunSummary,
        chordwise: (&ObserverArc, Vec<f64>),
        spanwise: (&ObserverArc, Vec<f64>),
        solver: &str,
    ) -> Self {
        let (reference, from_run) = resolve_reference(
            config.output.reference_psd,
            &[chordwise.1.as_slice(), spanwise.1.as_slice()],
        );
        let range = config.output.dynamic_range_db;
        Self {
            run,
            reference_psd: reference,
            reference_from_run: from_run,
            chordwise: DirectivityCurve::new(chordwise.0, chordwise.1, reference, range),
            spanwise: DirectivityCurve::new(spanwise.0, spanwise.1, reference, range),
            solver: solver.to_string(),
            metadata: OutputMetadata::now(&config.metadata),
        }
    }

    /// Write pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Print a human-readable scenario summary
pub fn print_config_summary(config: &ScenarioConfig) {
    println!("=== Scenario Configuration ===");
    println!(
        "Aerofoil: chord {:.3} m, span {:.3} m ({} x {} points)",
        2.0 * config.aerofoil.half_chord,
        2.0 * config.aerofoil.half_span,
        config.aerofoil.chord_points,
        config.aerofoil.span_points,
    );
    println!(
        "Flow: U = {:.1} m/s, c0 = {:.1} m/s, rho0 = {:.3} kg/m^3, axis {}",
        config.flow.flow_speed,
        config.flow.speed_of_sound,
        config.flow.density,
        config.flow.flow_axis,
    );
    println!(
        "Turbulence: {:?}, intensity {:.3}, length scale {:.4} m",
        config.turbulence.model, config.turbulence.intensity, config.turbulence.length_scale,
    );
    match config.frequency_hz() {
        Ok(f) => println!("Frequency: {:.2} Hz", f),
        Err(e) => println!("Frequency: {}", e),
    }
    println!(
        "Observers: {} per arc at R = {:.1} m, dipole axis {}",
        config.observers.points, config.observers.radius, config.radiation.dipole_axis,
    );
    match config.output.reference_psd {
        Some(r) => println!("Reference PSD: {:.4e}", r),
        None => println!("Reference PSD: run peak"),
    }
    if !config.metadata.description.is_empty() {
        println!("Description: {}", config.metadata.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_psd_to_db() {
        assert_relative_eq!(psd_to_db(1.0, 1.0, 40.0), 0.0);
        assert_relative_eq!(psd_to_db(0.1, 1.0, 40.0), -10.0, epsilon = 1e-12);
        assert_relative_eq!(psd_to_db(1e-9, 1.0, 40.0), -40.0);
        assert_relative_eq!(psd_to_db(0.0, 1.0, 40.0), -40.0);
        assert_relative_eq!(psd_to_db(f64::NAN, 1.0, 40.0), -40.0);
        // values above the reference are kept
        assert_relative_eq!(psd_to_db(10.0, 1.0, 40.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_psd() {
        assert_eq!(peak_psd(&[0.0, 2.0, f64::NAN, 1.0]), Some(2.0));
        assert_eq!(peak_psd(&[0.0, 0.0]), None);
        assert_eq!(peak_psd(&[]), None);
    }

    #[test]
    fn test_resolve_reference() {
        let a = [1.0, 4.0];
        let b = [3.0, 5.0];
        assert_eq!(resolve_reference(None, &[&a[..], &b[..]]), (5.0, true));
        assert_eq!(resolve_reference(Some(4.296e-8), &[&a[..], &b[..]]), (4.296e-8, false));
        assert_eq!(resolve_reference(None, &[&[0.0][..]]), (1.0, true));
    }

    #[test]
    fn test_curve_peak_angle() {
        let arc = ObserverArc::chordwise(50.0, 5).unwrap();
        let curve = DirectivityCurve::new(&arc, vec![0.0, 1.0, 4.0, 1.0, 0.0], 4.0, 40.0);
        assert_relative_eq!(curve.peak_angle().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(curve.theta_deg[0], -90.0, epsilon = 1e-12);
        assert_relative_eq!(curve.level_db[2], 0.0);
        assert_relative_eq!(curve.level_db[0], -40.0);
    }

    #[test]
    fn test_output_json_fields() {
        let config = ScenarioConfig::default();
        let arc = ObserverArc::chordwise(50.0, 3).unwrap();
        let span = ObserverArc::spanwise(50.0, 3).unwrap();
        let run = RunSummary {
            frequency: 180.4,
            kc: 0.5,
            mach: 60.0 / 340.0,
            low_frequency_regime: true,
            gusts: 41,
            gusts_integrated: 41,
        };
        let output = DirectivityOutput::from_spectra(
            &config,
            run,
            (&arc, vec![0.0, 2.0, 0.0]),
            (&span, vec![0.0, 1.0, 0.0]),
            "multiple-gusts",
        );
        assert!(output.reference_from_run);
        assert_eq!(output.reference_psd, 2.0);

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["chordwise"]["plane"], "chordwise");
        assert_eq!(value["run"]["gusts"], 41);
        assert_eq!(value["solver"], "multiple-gusts");
        assert!(value["metadata"]["date"].is_string());
    }
}
