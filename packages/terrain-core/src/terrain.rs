// Destructible 2D terrain: a generated heightmap with crater damage.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::carver::{CarveRegion, CraterCarver, CraterRequest};
use crate::config::TerrainConfig;
use crate::error::Result;
use crate::generator::HeightmapGenerator;
use crate::heightmap::Heightmap;
use crate::preset::TerrainPreset;
use crate::rng::entropy_seed;
use crate::surface::{CollisionSurface, Point};

/// Notifications for renderers and decoration owners, drained by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerrainEvent {
    Generated { seed: u32, preset: TerrainPreset },
    Carved(CarveRegion),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Owns the heightmap. Reads go through [`CollisionSurface`], writes through
/// [`Terrain::carve`]; nothing else gets a mutable handle.
#[derive(Clone, Debug)]
pub struct Terrain {
    config: TerrainConfig,
    generator: HeightmapGenerator,
    carver: CraterCarver,
    seed: u32,
    heights: Heightmap,
    /// Every runtime crater since the last reset, in order. Replaying it on a
    /// terrain with the same seed and config reproduces this one exactly.
    damage_log: Vec<CraterRequest>,
    events: Vec<TerrainEvent>,
}

impl Terrain {
    pub fn new(config: TerrainConfig) -> Result<Self> {
        let generator = HeightmapGenerator::from_config(&config)?;
        let carver = CraterCarver::new(config.world_height);
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let mut terrain = Terrain {
            heights: Heightmap::flat(config.width, config.max_bound),
            config,
            generator,
            carver,
            seed,
            damage_log: Vec::new(),
            events: Vec::new(),
        };
        terrain.regenerate();
        Ok(terrain)
    }

    pub fn with_preset(width: usize, preset: TerrainPreset, seed: Option<u32>) -> Result<Self> {
        let mut config = TerrainConfig::new(width, preset);
        config.seed = seed;
        Terrain::new(config)
    }

    /// Throw away the current ground and generate again. `None` draws a fresh seed.
    pub fn reset(&mut self, seed: Option<u32>) {
        self.seed = seed.unwrap_or_else(entropy_seed);
        self.damage_log.clear();
        self.regenerate();
    }

    fn regenerate(&mut self) {
        self.heights = self.generator.generate_nonempty(self.config.width, self.seed);
        for req in &self.config.pre_carves {
            self.carver.carve(&mut self.heights, req);
        }
        info!(
            seed = self.seed,
            preset = %self.config.preset,
            width = self.config.width,
            "terrain generated"
        );
        self.events.push(TerrainEvent::Generated {
            seed: self.seed,
            preset: self.config.preset,
        });
    }

    /// Seed actually used for the current ground, for replay and debugging.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn preset(&self) -> TerrainPreset {
        self.config.preset
    }

    pub fn width(&self) -> usize {
        self.heights.width()
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heights
    }

    pub fn surface(&self) -> CollisionSurface<'_> {
        CollisionSurface::new(&self.heights, self.config.world_height)
    }

    pub fn point_is_solid(&self, x: f32, y: f32) -> bool {
        self.surface().point_is_solid(x, y)
    }

    pub fn ground_height(&self, x: f32) -> f32 {
        self.surface().ground_height(x)
    }

    pub fn cast_ray(&self, start: Point, end: Point) -> Option<Point> {
        self.surface().cast_ray(start, end)
    }

    /// Blow a crater into the ground. No-op (and not logged) for `radius <= 0`.
    pub fn carve(&mut self, request: CraterRequest) -> Option<CarveRegion> {
        if !(request.radius > 0.0) {
            return None;
        }
        self.damage_log.push(request);
        let region = self.carver.carve(&mut self.heights, &request)?;
        debug!(
            cx = request.center_x,
            cy = request.center_y,
            r = request.radius,
            changed = region.changed_columns,
            "crater"
        );
        self.events.push(TerrainEvent::Carved(region));
        Some(region)
    }

    pub fn carve_at(&mut self, center_x: f32, center_y: f32, radius: f32) -> Option<CarveRegion> {
        self.carve(CraterRequest::new(center_x, center_y, radius))
    }

    pub fn damage_log(&self) -> &[CraterRequest] {
        &self.damage_log
    }

    /// Re-apply a damage log received on reconnect. Returns how many entries
    /// touched the map.
    pub fn replay_damage(&mut self, log: &[CraterRequest]) -> usize {
        let applied = log.iter().filter(|req| self.carve(**req).is_some()).count();
        info!(entries = log.len(), applied, "replayed terrain damage");
        applied
    }

    /// Hand queued events to the host and clear the queue.
    pub fn drain_events(&mut self) -> Vec<TerrainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Column and y of the tallest ground.
    pub fn highest_point(&self) -> Option<(usize, f32)> {
        self.heights.highest()
    }

    /// Ground under the middle of a landing zone.
    pub fn spawn_height(&self, side: Side) -> f32 {
        self.ground_height(self.spawn_x(side))
    }

    pub fn spawn_x(&self, side: Side) -> f32 {
        let width = self.width();
        let margin = self.config.edge_margin.min(width.saturating_sub(1) / 2);
        let offset = margin / 2;
        match side {
            Side::Left => offset as f32,
            Side::Right => (width - 1 - offset) as f32,
        }
    }
}
