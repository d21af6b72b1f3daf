// 高度场采样

use super::error::ConfigError;
use super::mesh::MeshData;
use super::noise::{HeightSource, NoiseLayer};
use super::params::GenerationParameters;

/// Result of sampling every grid node once
#[derive(Debug, Clone, PartialEq)]
pub struct SampledHeights {
    /// Row-major elevations, `x + z * (width + 1)`
    pub heights: Vec<f32>,
    pub min_height: f32,
    pub max_height: f32,
    /// Nodes whose elevation was NaN or infinite and kept an earlier height instead
    pub numeric_faults: usize,
}

/// Stack of height sources summed into one elevation per grid node
pub struct HeightField {
    sources: Vec<Box<dyn HeightSource>>,
    height_scale: f64,
}

impl HeightField {
    /// Create an empty field. At least one source must be added before sampling.
    pub fn new(height_scale: f32) -> Self {
        Self {
            sources: Vec::new(),
            height_scale: height_scale as f64,
        }
    }

    /// One Perlin layer per configured noise layer, in order
    pub fn from_params(params: &GenerationParameters) -> Result<Self, ConfigError> {
        if params.noise_layers.is_empty() {
            return Err(ConfigError::NoNoiseLayers);
        }

        let mut field = Self::new(params.height_scale);
        for (index, config) in params.noise_layers.iter().enumerate() {
            field.sources.push(Box::new(NoiseLayer::new(index, config, params.seed)?));
        }
        Ok(field)
    }

    pub fn with_source<S: HeightSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Unscaled sum of every source at `(x, z)`
    pub fn aggregate(&self, x: f64, z: f64) -> f64 {
        self.sources.iter().map(|source| source.sample(x, z)).sum()
    }

    /// Scaled elevation, `None` when the result is NaN or does not fit a finite `f32`
    pub fn elevation(&self, x: f64, z: f64) -> Option<f32> {
        let height = (self.aggregate(x, z) * self.height_scale) as f32;
        if height.is_finite() {
            Some(height)
        } else {
            None
        }
    }

    /// Sample all `(width + 1) * (depth + 1)` nodes, z outer, x inner.
    ///
    /// A non-finite node keeps its height from `previous`, or 0 when `previous` has no
    /// node at that coordinate.
    pub fn sample_grid(&self, width: u32, depth: u32, previous: Option<&MeshData>) -> SampledHeights {
        let mut heights = Vec::with_capacity((width as usize + 1) * (depth as usize + 1));
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        let mut numeric_faults = 0;

        for z in 0..=depth {
            for x in 0..=width {
                let height = match self.elevation(x as f64, z as f64) {
                    Some(height) => height,
                    None => {
                        numeric_faults += 1;
                        let kept = previous.and_then(|mesh| mesh.height_at(x, z)).unwrap_or(0.0);
                        log::warn!(
                            "Non-finite height at node ({}, {}), keeping {}",
                            x,
                            z,
                            kept
                        );
                        kept
                    }
                };

                min_height = min_height.min(height);
                max_height = max_height.max(height);
                heights.push(height);
            }
        }

        SampledHeights {
            heights,
            min_height,
            max_height,
            numeric_faults,
        }
    }
}
