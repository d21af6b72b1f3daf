use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration for one weighted Perlin layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Share of this layer in the final height
    /// Range: 0.0 - 1.0
    pub weight: f32,

    /// Divides both frequencies, smaller = more detail
    /// Range: 0.0 - 1.0, zero is rejected
    pub frequency_scale: f32,

    /// Sampling step along the grid's x axis
    pub x_frequency: f32,

    /// Sampling step along the grid's z axis
    pub z_frequency: f32,
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            weight: 1.0,
            frequency_scale: 1.0,
            x_frequency: 0.3,
            z_frequency: 0.3,
        }
    }
}

impl NoiseLayerConfig {
    pub fn new(weight: f32, frequency_scale: f32, x_frequency: f32, z_frequency: f32) -> Self {
        Self {
            weight,
            frequency_scale,
            x_frequency,
            z_frequency,
        }
    }

    /// Broad, gentle hills
    pub fn rolling() -> Self {
        Self::new(0.7, 1.0, 0.08, 0.08)
    }

    /// Small bumps layered on top of larger shapes
    pub fn detail() -> Self {
        Self::new(0.15, 0.5, 0.3, 0.3)
    }

    /// Check that sampling this layer cannot divide by zero
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.frequency_scale == 0.0 {
            return Err(ConfigError::ZeroFrequencyScale { index });
        }
        Ok(())
    }
}

/// Something that contributes a height value at a grid coordinate
///
/// Implementations must be pure: the same coordinate always yields the same value.
pub trait HeightSource {
    fn sample(&self, x: f64, z: f64) -> f64;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// A single noise layer ready for sampling
pub struct NoiseLayer {
    perlin: Perlin,
    weight: f64,
    frequency_scale: f64,
    x_frequency: f64,
    z_frequency: f64,
}

impl NoiseLayer {
    /// Create the layer at position `index` of the stack.
    ///
    /// Fails if the configured frequency scale is zero.
    pub fn new(index: usize, config: &NoiseLayerConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate(index)?;

        Ok(Self {
            perlin: Perlin::new(seed),
            weight: config.weight as f64,
            frequency_scale: config.frequency_scale as f64,
            x_frequency: config.x_frequency as f64,
            z_frequency: config.z_frequency as f64,
        })
    }

    /// Raw Perlin value remapped to roughly [0.0, 1.0], before weighting
    fn coherent(&self, x: f64, z: f64) -> f64 {
        let nx = x * self.x_frequency / self.frequency_scale;
        let nz = z * self.z_frequency / self.frequency_scale;

        (self.perlin.get([nx, nz]) + 1.0) * 0.5
    }
}

impl HeightSource for NoiseLayer {
    fn sample(&self, x: f64, z: f64) -> f64 {
        self.coherent(x, z) * self.weight
    }

    fn name(&self) -> &'static str {
        "Perlin"
    }
}
