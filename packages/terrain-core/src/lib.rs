//! Deterministic destructible terrain for a 2D artillery duel, usable from WASM.
//! Generates a seeded heightmap, answers collision queries every tick and
//! carves craters that can only ever remove ground.

mod carver;
mod config;
mod error;
mod generator;
mod heightmap;
mod preset;
mod rng;
mod surface;
mod terrain;

pub use carver::{CarveRegion, CraterCarver, CraterRequest};
pub use config::{
    TerrainConfig, DEFAULT_EDGE_BLEND, DEFAULT_EDGE_MARGIN, DEFAULT_MAX_BOUND, DEFAULT_MIN_BOUND,
    DEFAULT_WIDTH, DEFAULT_WORLD_HEIGHT,
};
pub use error::{Result, TerrainError};
pub use generator::HeightmapGenerator;
pub use heightmap::Heightmap;
pub use preset::{PresetParams, TerrainPreset};
pub use rng::{entropy_seed, SeededRandomStream};
pub use surface::{CollisionSurface, Point};
pub use terrain::{Side, Terrain, TerrainEvent};

use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct TerrainHandle {
    terrain: Terrain,
}

#[wasm_bindgen]
impl TerrainHandle {
    /// `preset` accepts names like "rolling_hills" or "Flat Plains".
    /// Omit `seed` to draw one from the clock and `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        world_height: f32,
        preset: &str,
        seed: Option<u32>,
    ) -> std::result::Result<TerrainHandle, JsValue> {
        let preset: TerrainPreset = preset.parse().map_err(js_error)?;
        let mut config = TerrainConfig::new(width, preset).with_world_height(world_height);
        config.seed = seed;
        let terrain = Terrain::new(config).map_err(js_error)?;
        Ok(TerrainHandle { terrain })
    }

    /// Build from a JSON-encoded `TerrainConfig`; missing fields take defaults.
    #[wasm_bindgen]
    pub fn from_config_json(json: &str) -> std::result::Result<TerrainHandle, JsValue> {
        let config: TerrainConfig = serde_json::from_str(json).map_err(js_error)?;
        let terrain = Terrain::new(config).map_err(js_error)?;
        Ok(TerrainHandle { terrain })
    }

    #[wasm_bindgen]
    pub fn reset(&mut self, seed: Option<u32>) {
        self.terrain.reset(seed);
    }

    #[wasm_bindgen]
    pub fn seed(&self) -> u32 {
        self.terrain.seed()
    }

    #[wasm_bindgen]
    pub fn preset_label(&self) -> String {
        self.terrain.preset().label().to_string()
    }

    #[wasm_bindgen]
    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    #[wasm_bindgen]
    pub fn world_height(&self) -> f32 {
        self.terrain.world_height()
    }

    #[wasm_bindgen]
    pub fn ground_height(&self, x: f32) -> f32 {
        self.terrain.ground_height(x)
    }

    #[wasm_bindgen]
    pub fn point_is_solid(&self, x: f32, y: f32) -> bool {
        self.terrain.point_is_solid(x, y)
    }

    /// `[x, y]` of the first solid sample, or `undefined`.
    #[wasm_bindgen]
    pub fn cast_ray(
        &self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    ) -> std::result::Result<JsValue, JsValue> {
        let hit = self
            .terrain
            .cast_ray(Point::new(x0, y0), Point::new(x1, y1))
            .map(|p| [p.x, p.y]);
        serde_wasm_bindgen::to_value(&hit).map_err(js_error)
    }

    /// Returns whether the crater touched the map.
    #[wasm_bindgen]
    pub fn carve(&mut self, center_x: f32, center_y: f32, radius: f32) -> bool {
        self.terrain.carve_at(center_x, center_y, radius).is_some()
    }

    /// Heightmap snapshot as a Float32Array, one entry per column.
    #[wasm_bindgen]
    pub fn heights(&self) -> Vec<f32> {
        self.terrain.heightmap().as_slice().to_vec()
    }

    #[wasm_bindgen]
    pub fn damage_log_json(&self) -> String {
        serde_json::to_string(self.terrain.damage_log()).unwrap_or_default()
    }

    /// Apply a damage log produced by `damage_log_json` (reconnect sync).
    #[wasm_bindgen]
    pub fn replay_damage_json(&mut self, json: &str) -> std::result::Result<u32, JsValue> {
        let log: Vec<CraterRequest> = serde_json::from_str(json).map_err(js_error)?;
        Ok(self.terrain.replay_damage(&log) as u32)
    }

    /// Drain pending generated/carved events as an array of plain objects.
    #[wasm_bindgen]
    pub fn take_events(&mut self) -> std::result::Result<JsValue, JsValue> {
        let events = self.terrain.drain_events();
        serde_wasm_bindgen::to_value(&events).map_err(js_error)
    }
}
