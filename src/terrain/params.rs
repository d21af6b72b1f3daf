//! Generation parameters and preset loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::color_map::ColorRamp;
use super::error::{ConfigError, GenerationError};
use super::noise::NoiseLayerConfig;

pub const DEFAULT_GRID_SIZE: u32 = 20;

/// Everything a mesh build reads. Owned by whoever edits it; the generator
/// only ever takes it by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Number of cells along x, the grid has `grid_width + 1` columns of vertices
    pub grid_width: u32,
    /// Number of cells along z
    pub grid_depth: u32,
    /// Multiplier applied to the aggregated noise
    pub height_scale: f32,
    /// Seed shared by every noise layer
    pub seed: u32,
    pub color_ramp: ColorRamp,
    /// Summed in order
    pub noise_layers: Vec<NoiseLayerConfig>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_SIZE,
            grid_depth: DEFAULT_GRID_SIZE,
            height_scale: 2.0,
            seed: 0,
            color_ramp: ColorRamp::default(),
            noise_layers: vec![NoiseLayerConfig::default()],
        }
    }
}

impl GenerationParameters {
    /// Two-layer setup with an Earth-like ramp
    pub fn terrain() -> Self {
        Self {
            grid_width: 64,
            grid_depth: 64,
            height_scale: 12.0,
            color_ramp: ColorRamp::earth_style(),
            noise_layers: vec![NoiseLayerConfig::rolling(), NoiseLayerConfig::detail()],
            ..Default::default()
        }
    }

    pub fn with_grid(mut self, width: u32, depth: u32) -> Self {
        self.grid_width = width;
        self.grid_depth = depth;
        self
    }

    /// Number of vertices a build with these parameters produces
    pub fn vertex_count(&self) -> usize {
        (self.grid_width as usize + 1) * (self.grid_depth as usize + 1)
    }

    /// Number of triangles a build with these parameters produces
    pub fn triangle_count(&self) -> usize {
        self.grid_width as usize * self.grid_depth as usize * 2
    }

    /// Reject anything that would make a build fail or divide by zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_depth == 0 {
            return Err(ConfigError::InvalidGridSize {
                width: self.grid_width,
                depth: self.grid_depth,
            });
        }
        if self.noise_layers.is_empty() {
            return Err(ConfigError::NoNoiseLayers);
        }
        for (index, layer) in self.noise_layers.iter().enumerate() {
            layer.validate(index)?;
        }
        self.color_ramp.validate()
    }

    /// Parse a JSON preset. Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GenerationError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load a JSON preset from disk
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let content = std::fs::read_to_string(path).map_err(|source| GenerationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, GenerationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GenerationParameters::default().validate().is_ok());
        assert!(GenerationParameters::terrain().validate().is_ok());
    }

    #[test]
    fn test_counts() {
        let params = GenerationParameters::default().with_grid(3, 2);
        assert_eq!(params.vertex_count(), 12);
        assert_eq!(params.triangle_count(), 12);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let params = GenerationParameters::default().with_grid(0, 5);
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidGridSize { width: 0, depth: 5 })
        );
    }

    #[test]
    fn test_empty_layer_stack_is_rejected() {
        let params = GenerationParameters {
            noise_layers: vec![],
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::NoNoiseLayers));
    }

    #[test]
    fn test_zero_scale_reports_layer_index() {
        let params = GenerationParameters {
            noise_layers: vec![
                NoiseLayerConfig::default(),
                NoiseLayerConfig::new(0.5, 0.0, 0.3, 0.3),
            ],
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::ZeroFrequencyScale { index: 1 })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = GenerationParameters::from_json_str(
            r#"{ "grid_width": 8, "noise_layers": [ { "weight": 0.5 } ] }"#,
        )
        .unwrap();

        assert_eq!(params.grid_width, 8);
        assert_eq!(params.grid_depth, DEFAULT_GRID_SIZE);
        assert_eq!(params.noise_layers.len(), 1);
        assert_eq!(params.noise_layers[0].weight, 0.5);
        assert_eq!(params.noise_layers[0].frequency_scale, 1.0);
        assert_eq!(params.color_ramp, ColorRamp::default());
    }

    #[test]
    fn test_invalid_json_preset_is_rejected() {
        let result = GenerationParameters::from_json_str(r#"{ "grid_depth": 0 }"#);
        assert!(matches!(
            result,
            Err(GenerationError::Config(ConfigError::InvalidGridSize { .. }))
        ));

        let result = GenerationParameters::from_json_str("not json");
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_preserves_everything() {
        let params = GenerationParameters::terrain();
        let json = params.to_json_string().unwrap();
        assert_eq!(GenerationParameters::from_json_str(&json).unwrap(), params);
    }

    #[test]
    fn test_missing_preset_file() {
        let result = GenerationParameters::load(Path::new("/nonexistent/preset.json"));
        assert!(matches!(result, Err(GenerationError::Io { .. })));
    }
}
