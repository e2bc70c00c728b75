//! Two-dimensional wavenumber spectra of isotropic inflow turbulence
//!
//! Both models give the spectrum Φ_ww(kx, ky) of the upwash velocity and
//! integrate to the mean-square velocity u² over the whole (kx, ky) plane.

use math_aero_common::{TurbulenceConfig, TurbulenceModel};
use std::f64::consts::PI;

/// Γ(5/6)
const GAMMA_5_6: f64 = 1.128_787_029_908_126;
/// Γ(1/3)
const GAMMA_1_3: f64 = 2.678_938_534_707_747_6;

/// Upwash wavenumber spectrum Φ_ww(kx, ky) (m⁴/s² per (rad/m)²)
pub trait TurbulenceSpectrum: Send + Sync {
    /// Spectrum at one wavenumber pair
    fn spectrum(&self, kx: f64, ky: f64) -> f64;

    /// Model name
    fn name(&self) -> &'static str;

    /// Spectrum along a line of constant kx
    fn spectrum_at(&self, kx: f64, ky: &[f64]) -> Vec<f64> {
        ky.iter().map(|&k| self.spectrum(kx, k)).collect()
    }
}

/// von Kármán spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VonKarman {
    /// Mean-square velocity u² (m²/s²)
    pub mean_square: f64,
    /// Integral length scale L (m)
    pub length_scale: f64,
}

impl VonKarman {
    /// Create from u² and L
    pub fn new(mean_square: f64, length_scale: f64) -> Self {
        Self {
            mean_square,
            length_scale,
        }
    }

    /// Wavenumber of the energy-containing eddies kₑ = √π/L · Γ(5/6)/Γ(1/3)
    pub fn energy_wavenumber(&self) -> f64 {
        PI.sqrt() / self.length_scale * GAMMA_5_6 / GAMMA_1_3
    }
}

impl TurbulenceSpectrum for VonKarman {
    fn spectrum(&self, kx: f64, ky: f64) -> f64 {
        let ke = self.energy_wavenumber();
        let kx_hat2 = (kx / ke).powi(2);
        let ky_hat2 = (ky / ke).powi(2);
        let k_hat2 = kx_hat2 + ky_hat2;
        4.0 / (9.0 * PI) * self.mean_square / (ke * ke) * k_hat2
            / (1.0 + k_hat2).powf(7.0 / 3.0)
    }

    fn name(&self) -> &'static str {
        "von Karman"
    }
}

/// Liepmann spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Liepmann {
    /// Mean-square velocity u² (m²/s²)
    pub mean_square: f64,
    /// Integral length scale L (m)
    pub length_scale: f64,
}

impl Liepmann {
    /// Create from u² and L
    pub fn new(mean_square: f64, length_scale: f64) -> Self {
        Self {
            mean_square,
            length_scale,
        }
    }
}

impl TurbulenceSpectrum for Liepmann {
    fn spectrum(&self, kx: f64, ky: f64) -> f64 {
        let l2 = self.length_scale * self.length_scale;
        let lk2 = l2 * (kx * kx + ky * ky);
        3.0 * self.mean_square * l2 / (4.0 * PI) * lk2 / (1.0 + lk2).powf(2.5)
    }

    fn name(&self) -> &'static str {
        "Liepmann"
    }
}

/// Build the configured spectrum for a given mean flow speed
pub fn spectrum_from_config(
    config: &TurbulenceConfig,
    flow_speed: f64,
) -> Box<dyn TurbulenceSpectrum> {
    let mean_square = config.mean_square_velocity(flow_speed);
    match config.model {
        TurbulenceModel::VonKarman => Box::new(VonKarman::new(mean_square, config.length_scale)),
        TurbulenceModel::Liepmann => Box::new(Liepmann::new(mean_square, config.length_scale)),
    }
}
