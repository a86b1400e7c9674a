use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::carver::CraterRequest;
use crate::error::{Result, TerrainError};
use crate::preset::TerrainPreset;

pub const DEFAULT_WIDTH: usize = 800;
pub const DEFAULT_WORLD_HEIGHT: f32 = 600.0;
pub const DEFAULT_MIN_BOUND: f32 = 60.0;
pub const DEFAULT_MAX_BOUND: f32 = 580.0;
pub const DEFAULT_EDGE_MARGIN: usize = 60;
pub const DEFAULT_EDGE_BLEND: usize = 40;

/// Everything needed to build a terrain. Validated once, up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of columns.
    pub width: usize,
    /// y of the world's bottom edge. Carving never digs past it.
    pub world_height: f32,
    /// Highest ground allowed (smallest y).
    pub min_bound: f32,
    /// Lowest ground generation may produce (largest y).
    pub max_bound: f32,
    /// Flat landing zone width on each side.
    pub edge_margin: usize,
    /// Eased transition width between a landing zone and the generated shape.
    pub edge_blend: usize,
    pub preset: TerrainPreset,
    /// `None` draws a fresh seed from wall clock and process entropy.
    pub seed: Option<u32>,
    /// Craters stamped after every generation, e.g. for scripted maps.
    pub pre_carves: Vec<CraterRequest>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            width: DEFAULT_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            min_bound: DEFAULT_MIN_BOUND,
            max_bound: DEFAULT_MAX_BOUND,
            edge_margin: DEFAULT_EDGE_MARGIN,
            edge_blend: DEFAULT_EDGE_BLEND,
            preset: TerrainPreset::default(),
            seed: None,
            pre_carves: Vec::new(),
        }
    }
}

impl TerrainConfig {
    pub fn new(width: usize, preset: TerrainPreset) -> Self {
        TerrainConfig {
            width,
            preset,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the world floor; `max_bound` follows it if it would otherwise overshoot.
    pub fn with_world_height(mut self, world_height: f32) -> Self {
        self.world_height = world_height;
        if self.max_bound > world_height {
            self.max_bound = world_height;
        }
        self
    }

    pub fn with_bounds(mut self, min_bound: f32, max_bound: f32) -> Self {
        self.min_bound = min_bound;
        self.max_bound = max_bound;
        self
    }

    pub fn with_edge_margin(mut self, margin: usize, blend: usize) -> Self {
        self.edge_margin = margin;
        self.edge_blend = blend;
        self
    }

    pub fn with_pre_carve(mut self, request: CraterRequest) -> Self {
        self.pre_carves.push(request);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(ref e) = result {
            warn!(error = %e, "rejected terrain configuration");
        }
        result
    }

    fn check(&self) -> Result<()> {
        if self.width == 0 {
            return Err(TerrainError::InvalidWidth(self.width));
        }
        if !(self.world_height.is_finite() && self.world_height > 0.0) {
            return Err(TerrainError::InvalidWorldHeight(self.world_height));
        }
        let bounds_ok = self.min_bound.is_finite()
            && self.max_bound.is_finite()
            && self.min_bound >= 0.0
            && self.min_bound < self.max_bound
            && self.max_bound <= self.world_height;
        if !bounds_ok {
            return Err(TerrainError::InvalidBounds {
                min: self.min_bound,
                max: self.max_bound,
                world_height: self.world_height,
            });
        }
        for req in &self.pre_carves {
            req.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let cfg = TerrainConfig::new(0, TerrainPreset::FlatPlains);
        assert_eq!(cfg.validate(), Err(TerrainError::InvalidWidth(0)));
    }

    #[test]
    fn test_bad_world_height_rejected() {
        let cfg = TerrainConfig::default().with_world_height(0.0);
        assert_eq!(cfg.validate(), Err(TerrainError::InvalidWorldHeight(0.0)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cfg = TerrainConfig::default().with_bounds(500.0, 100.0);
        assert!(matches!(cfg.validate(), Err(TerrainError::InvalidBounds { .. })));
    }

    #[test]
    fn test_max_bound_below_floor_rejected() {
        let mut cfg = TerrainConfig::default();
        cfg.max_bound = cfg.world_height + 1.0;
        assert!(matches!(cfg.validate(), Err(TerrainError::InvalidBounds { .. })));
    }

    #[test]
    fn test_world_height_pulls_max_bound() {
        let cfg = TerrainConfig::default().with_world_height(400.0);
        assert_eq!(cfg.max_bound, 400.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_pre_carve_radius_rejected() {
        let cfg = TerrainConfig::default().with_pre_carve(CraterRequest::new(100.0, 400.0, 0.0));
        assert_eq!(cfg.validate(), Err(TerrainError::InvalidRadius(0.0)));
    }

    #[test]
    fn test_json_round_trip_keeps_defaults() {
        let cfg: TerrainConfig =
            serde_json::from_str(r#"{"width": 640, "preset": "Mountains", "seed": 9}"#).unwrap();
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.preset, TerrainPreset::Mountains);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.world_height, DEFAULT_WORLD_HEIGHT);
        assert_eq!(cfg.edge_margin, DEFAULT_EDGE_MARGIN);
    }
}
