//! Spanwise wavenumber sampling
//!
//! The sum over gusts approximates an integral over the spanwise wavenumber
//! ky. Two scales matter: the critical wavenumber ky_crit = Kx·M/β, beyond
//! which gusts stop radiating efficiently, and the span periodicity
//! ky_T = 2π/d of the sinc-like span kernel.
//!
//! - ky_crit < ky_T: a fixed number of gusts over ±ky_T
//! - otherwise: N_T = 2·ky_crit/ky_T periods over ±ky_crit, with a fixed
//!   number of gusts per period
//!
//! At ky_crit == ky_T the high-frequency branch is taken. With the default
//! settings it produces the same 41 points over ±ky_T as the low-frequency
//! branch.

use crate::error::{AmietError, Result};
use math_aero_common::{SamplingConfig, lin_space};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which branch of the sampler produced a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingRegime {
    /// ky_crit < ky_T: grid over ±ky_T
    LowFrequency,
    /// ky_crit ≥ ky_T: grid over ±ky_crit
    HighFrequency,
}

/// Gust counts used by the sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    /// Gusts in the low-frequency regime
    pub low_frequency_points: usize,
    /// Gusts per span period in the high-frequency regime
    pub points_per_period: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            low_frequency_points: 41,
            points_per_period: 20,
        }
    }
}

impl From<&SamplingConfig> for SamplerSettings {
    fn from(config: &SamplingConfig) -> Self {
        Self {
            low_frequency_points: config.low_frequency_points,
            points_per_period: config.points_per_period,
        }
    }
}

/// Critical spanwise wavenumber ky_crit = Kx·M/β
pub fn critical_wavenumber(kx: f64, mach: f64) -> f64 {
    let beta = (1.0 - mach * mach).sqrt();
    kx * mach / beta
}

/// Span periodicity wavenumber ky_T = 2π/d
pub fn periodicity_wavenumber(half_span: f64) -> f64 {
    2.0 * PI / half_span
}

/// Uniform spanwise wavenumber grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavenumberGrid {
    /// Spanwise wavenumbers (rad/m), ascending
    pub values: Array1<f64>,
    /// Bin width Δky taken from the grid itself
    pub spacing: f64,
    /// Branch that produced the grid
    pub regime: SamplingRegime,
}

impl WavenumberGrid {
    /// Build the grid for a given critical wavenumber and half span
    pub fn sample(ky_crit: f64, half_span: f64, settings: &SamplerSettings) -> Result<Self> {
        if !(half_span.is_finite() && half_span > 0.0) {
            return Err(AmietError::InvalidWavenumberGrid(format!(
                "half span must be positive, got {}",
                half_span
            )));
        }
        if !ky_crit.is_finite() || ky_crit < 0.0 {
            return Err(AmietError::InvalidWavenumberGrid(format!(
                "critical wavenumber must be finite and non-negative, got {}",
                ky_crit
            )));
        }

        let ky_t = periodicity_wavenumber(half_span);
        let (regime, extent, count) = if ky_crit < ky_t {
            (
                SamplingRegime::LowFrequency,
                ky_t,
                settings.low_frequency_points,
            )
        } else {
            let periods = 2.0 * ky_crit / ky_t;
            let count = (periods * settings.points_per_period as f64).ceil() as usize + 1;
            (SamplingRegime::HighFrequency, ky_crit, count)
        };

        if count < 2 {
            return Err(AmietError::InvalidWavenumberGrid(format!(
                "at least 2 gusts are needed, got {}",
                count
            )));
        }

        let values = Array1::from(lin_space(-extent, extent, count));
        let spacing = values[1] - values[0];

        Ok(Self {
            values,
            spacing,
            regime,
        })
    }

    /// Number of gusts
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the grid is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest |ky| on the grid
    pub fn extent(&self) -> f64 {
        self.values.iter().fold(0.0, |m: f64, v| m.max(v.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const HALF_SPAN: f64 = 0.225;

    #[test]
    fn test_critical_wavenumber() {
        let kx = 2.0 * PI * 180.3756 / 60.0;
        let mach: f64 = 60.0 / 340.0;
        let beta = (1.0 - mach * mach).sqrt();
        assert_relative_eq!(critical_wavenumber(kx, mach), kx * mach / beta);
        assert_eq!(critical_wavenumber(kx, 0.0), 0.0);
    }

    #[test]
    fn test_low_frequency_grid() {
        let ky_t = periodicity_wavenumber(HALF_SPAN);
        let grid = WavenumberGrid::sample(3.4, HALF_SPAN, &SamplerSettings::default()).unwrap();

        assert_eq!(grid.regime, SamplingRegime::LowFrequency);
        assert_eq!(grid.len(), 41);
        assert_relative_eq!(grid.values[0], -ky_t, epsilon = 1e-12);
        assert_relative_eq!(grid.values[40], ky_t, epsilon = 1e-12);
        assert_relative_eq!(grid.spacing, 2.0 * ky_t / 40.0, epsilon = 1e-12);
        assert_relative_eq!(grid.values[20], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_high_frequency_grid() {
        let ky_t = periodicity_wavenumber(HALF_SPAN);
        let ky_crit = 3.31 * ky_t;
        let grid = WavenumberGrid::sample(ky_crit, HALF_SPAN, &SamplerSettings::default()).unwrap();

        // 6.62 periods at 20 points each
        assert_eq!(grid.regime, SamplingRegime::HighFrequency);
        assert_eq!(grid.len(), 134);
        assert_relative_eq!(grid.extent(), ky_crit, epsilon = 1e-12);
        assert_relative_eq!(
            grid.spacing,
            grid.values[grid.len() - 1] - grid.values[grid.len() - 2],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_boundary_takes_high_frequency_branch() {
        let ky_t = periodicity_wavenumber(HALF_SPAN);
        let settings = SamplerSettings::default();
        let at = WavenumberGrid::sample(ky_t, HALF_SPAN, &settings).unwrap();
        let below = WavenumberGrid::sample(ky_t * (1.0 - 1e-12), HALF_SPAN, &settings).unwrap();

        assert_eq!(at.regime, SamplingRegime::HighFrequency);
        assert_eq!(below.regime, SamplingRegime::LowFrequency);
        assert_eq!(at.len(), 41);
        assert_eq!(below.len(), 41);
        for (a, b) in at.values.iter().zip(below.values.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_critical_wavenumber() {
        // no flow: still a valid low-frequency grid
        let grid = WavenumberGrid::sample(0.0, HALF_SPAN, &SamplerSettings::default()).unwrap();
        assert_eq!(grid.regime, SamplingRegime::LowFrequency);
        assert_eq!(grid.len(), 41);
    }

    #[test]
    fn test_invalid_inputs() {
        let settings = SamplerSettings::default();
        assert!(WavenumberGrid::sample(1.0, 0.0, &settings).is_err());
        assert!(WavenumberGrid::sample(-1.0, HALF_SPAN, &settings).is_err());
        assert!(WavenumberGrid::sample(f64::NAN, HALF_SPAN, &settings).is_err());

        let too_few = SamplerSettings {
            low_frequency_points: 1,
            points_per_period: 20,
        };
        let err = WavenumberGrid::sample(1.0, HALF_SPAN, &too_few).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_from_sampling_config() {
        let config = SamplingConfig {
            low_frequency_points: 21,
            points_per_period: 10,
            significance_threshold: None,
        };
        let settings = SamplerSettings::from(&config);
        assert_eq!(settings.low_frequency_points, 21);
        assert_eq!(settings.points_per_period, 10);
    }
}
