//! Errors raised while validating parameters or loading presets.

use thiserror::Error;

/// A parameter set that cannot produce a mesh.
///
/// Always detected before any buffer is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be at least 1x1, got {width}x{depth}")]
    InvalidGridSize { width: u32, depth: u32 },

    #[error("at least one noise layer is required")]
    NoNoiseLayers,

    #[error("noise layer {index} has a frequency scale of zero")]
    ZeroFrequencyScale { index: usize },

    #[error("color ramp has no color stops")]
    EmptyColorRamp,

    #[error("color ramp has no alpha stops")]
    EmptyAlphaRamp,

    #[error("color stop {index} has a non-finite position")]
    InvalidColorStop { index: usize },

    #[error("alpha stop {index} has a non-finite position")]
    InvalidAlphaStop { index: usize },
}

/// Anything that can stop a mesh from being (re)generated.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read preset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preset: {0}")]
    Parse(#[from] serde_json::Error),
}
