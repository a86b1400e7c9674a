// Configuration errors. Queries and runtime carving never fail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("terrain width must be positive, got {0}")]
    InvalidWidth(usize),

    #[error("world height must be positive and finite, got {0}")]
    InvalidWorldHeight(f32),

    /// `min_bound` must sit above `max_bound` (y grows downwards), and
    /// `max_bound` may not pass the world floor.
    #[error("invalid height bounds: min {min}, max {max}, world height {world_height}")]
    InvalidBounds {
        min: f32,
        max: f32,
        world_height: f32,
    },

    #[error("roughness must lie strictly between 0 and 1, got {0}")]
    InvalidRoughness(f32),

    #[error("variation must be finite and non-negative, got {0}")]
    InvalidVariation(f32),

    #[error("crater radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("unknown terrain preset `{0}`")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
