//! Basic types for aerofoil noise computations

use math_aero_wave::{Axis, MeanFlow};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 3D point in space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point3D {
    /// X coordinate (chordwise, along the mean flow)
    pub x: f64,
    /// Y coordinate (spanwise)
    pub y: f64,
    /// Z coordinate (normal to the aerofoil plane)
    pub z: f64,
}

impl Point3D {
    /// Create a new 3D point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Separation vector `self - origin` as an `[x, y, z]` triple
    #[inline]
    pub fn separation_from(&self, origin: &Point3D) -> [f64; 3] {
        [self.x - origin.x, self.y - origin.y, self.z - origin.z]
    }
}

/// Physical constants
pub mod constants {
    /// Speed of sound used by the reference scenarios (m/s)
    pub const SPEED_OF_SOUND: f64 = 340.0;

    /// Air density used by the reference scenarios (kg/m³)
    pub const AIR_DENSITY: f64 = 1.2;
}

/// Mean flow and medium properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowConditions {
    /// Fluid density ρ₀ (kg/m³)
    pub density: f64,
    /// Speed of sound c₀ (m/s)
    pub speed_of_sound: f64,
    /// Mean flow speed U (m/s)
    pub flow_speed: f64,
    /// Mean flow direction
    pub flow_axis: Axis,
}

impl FlowConditions {
    /// Flow along +x
    pub fn new(density: f64, speed_of_sound: f64, flow_speed: f64) -> Self {
        Self {
            density,
            speed_of_sound,
            flow_speed,
            flow_axis: Axis::X,
        }
    }

    /// Mach number M = U/c₀
    pub fn mach(&self) -> f64 {
        self.flow_speed / self.speed_of_sound
    }

    /// β = √(1 - M²)
    pub fn beta(&self) -> f64 {
        let m = self.mach();
        (1.0 - m * m).sqrt()
    }

    /// Mean flow seen by the propagator
    pub fn mean_flow(&self) -> MeanFlow {
        MeanFlow::new(self.flow_axis, self.mach())
    }
}

impl Default for FlowConditions {
    fn default() -> Self {
        Self::new(constants::AIR_DENSITY, constants::SPEED_OF_SOUND, 60.0)
    }
}

/// Frequency for a chord-based reduced frequency kc = k₀·(2b)
pub fn frequency_from_kc(kc: f64, speed_of_sound: f64, half_chord: f64) -> f64 {
    kc * speed_of_sound / (2.0 * PI * (2.0 * half_chord))
}

/// Calculate wavenumber k = 2πf/c
pub fn wavenumber(frequency: f64, speed: f64) -> f64 {
    2.0 * PI * frequency / speed
}

/// Generate linearly spaced values, endpoints included
pub fn lin_space(start: f64, end: f64, num: usize) -> Vec<f64> {
    if num < 2 {
        return vec![start];
    }
    (0..num)
        .map(|i| start + (end - start) * i as f64 / (num - 1) as f64)
        .collect()
}
