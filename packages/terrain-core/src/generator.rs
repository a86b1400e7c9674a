//! Initial ground profile: midpoint displacement, preset shaping, flat
//! landing zones at both edges, then a clamp into the allowed band.

use tracing::debug;

use crate::carver::{CraterCarver, CraterRequest};
use crate::config::{
    TerrainConfig, DEFAULT_EDGE_BLEND, DEFAULT_EDGE_MARGIN, DEFAULT_MAX_BOUND, DEFAULT_MIN_BOUND,
};
use crate::error::{Result, TerrainError};
use crate::heightmap::Heightmap;
use crate::preset::{PresetParams, TerrainPreset};
use crate::rng::SeededRandomStream;

/// Endpoint jitter as a fraction of `variation`.
const ENDPOINT_JITTER: f32 = 0.25;
const MIN_PREGEN_CRATERS: i32 = 3;
const MAX_PREGEN_CRATERS: i32 = 6;
const PREGEN_RADIUS: (f64, f64) = (25.0, 55.0);
/// How far above the surface a pregenerated crater's centre sits, in radii.
const PREGEN_LIFT: (f64, f64) = (0.2, 0.6);

#[derive(Clone, Debug)]
pub struct HeightmapGenerator {
    params: PresetParams,
    pregenerated_craters: bool,
    min_bound: f32,
    max_bound: f32,
    edge_margin: usize,
    edge_blend: usize,
}

impl HeightmapGenerator {
    /// Generator for custom shape parameters with default bounds and margins.
    pub fn new(params: PresetParams) -> Result<Self> {
        params.validate()?;
        Ok(HeightmapGenerator {
            params,
            pregenerated_craters: false,
            min_bound: DEFAULT_MIN_BOUND,
            max_bound: DEFAULT_MAX_BOUND,
            edge_margin: DEFAULT_EDGE_MARGIN,
            edge_blend: DEFAULT_EDGE_BLEND,
        })
    }

    pub fn for_preset(preset: TerrainPreset) -> Result<Self> {
        let generator = HeightmapGenerator::new(preset.params())?;
        Ok(generator.with_pregenerated_craters(preset.has_pregenerated_craters()))
    }

    pub fn from_config(config: &TerrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(HeightmapGenerator::for_preset(config.preset)?
            .with_bounds(config.min_bound, config.max_bound)
            .with_edges(config.edge_margin, config.edge_blend))
    }

    pub fn with_bounds(mut self, min_bound: f32, max_bound: f32) -> Self {
        self.min_bound = min_bound;
        self.max_bound = max_bound;
        self
    }

    pub fn with_edges(mut self, margin: usize, blend: usize) -> Self {
        self.edge_margin = margin;
        self.edge_blend = blend;
        self
    }

    pub fn with_pregenerated_craters(mut self, enabled: bool) -> Self {
        self.pregenerated_craters = enabled;
        self
    }

    /// Same `(seed, params, width)` always gives a bit-identical heightmap.
    pub fn generate(&self, width: usize, seed: u32) -> Result<Heightmap> {
        if width == 0 {
            return Err(TerrainError::InvalidWidth(width));
        }
        Ok(self.generate_nonempty(width, seed))
    }

    /// `width` must be non-zero; callers validate it up front.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn generate_nonempty(&self, width: usize, seed: u32) -> Heightmap {
        let mut rng = SeededRandomStream::new(seed);

        let mut map = Heightmap::from_vec(midpoint_displacement(width, &self.params, &mut rng));
        if self.pregenerated_craters {
            self.stamp_craters(&mut map, &mut rng);
        }
        flatten_edges(map.as_mut_slice(), self.edge_margin, self.edge_blend);
        map.clamp_all(self.min_bound, self.max_bound);

        debug!(
            width,
            seed,
            highest = ?map.highest(),
            "generated heightmap"
        );
        map
    }

    /// Placement keeps craters clear of the landing zones where the width allows it.
    fn stamp_craters(&self, map: &mut Heightmap, rng: &mut SeededRandomStream) {
        let width = map.width();
        let carver = CraterCarver::new(self.max_bound);
        let reserved = (self.edge_margin + self.edge_blend) as f64;
        let count = rng.int_range(MIN_PREGEN_CRATERS, MAX_PREGEN_CRATERS);

        for _ in 0..count {
            let radius = rng.range(PREGEN_RADIUS.0, PREGEN_RADIUS.1);
            let lo = reserved + radius;
            let hi = (width - 1) as f64 - reserved - radius;
            let cx = if lo < hi {
                rng.range(lo, hi)
            } else {
                (width / 2) as f64
            };
            let surface = map.clamped(cx.round() as i64) as f64;
            let cy = surface - radius * rng.range(PREGEN_LIFT.0, PREGEN_LIFT.1);
            carver.carve(map, &CraterRequest::new(cx as f32, cy as f32, radius as f32));
        }
    }
}

/// Midpoint displacement over `[0, width)` using an explicit stack. Spans are
/// visited in the same order a left-first recursion would visit them, so the
/// random stream is consumed identically.
fn midpoint_displacement(
    width: usize,
    params: &PresetParams,
    rng: &mut SeededRandomStream,
) -> Vec<f32> {
    let base = params.base_height;
    let jitter = (params.variation * ENDPOINT_JITTER) as f64;
    let mut heights = vec![base; width];

    let last = width - 1;
    heights[0] = base + rng.range(-jitter, jitter) as f32;
    if last == 0 {
        return heights;
    }
    heights[last] = base + rng.range(-jitter, jitter) as f32;

    let mut work: Vec<(usize, usize, f32)> = vec![(0, last, params.variation)];
    while let Some((left, right, variation)) = work.pop() {
        if right - left < 2 {
            continue;
        }
        let mid = left + (right - left) / 2;
        let v = variation as f64;
        heights[mid] = (heights[left] + heights[right]) * 0.5 + rng.range(-v, v) as f32;

        let next = variation * params.roughness;
        work.push((mid, right, next));
        work.push((left, mid, next));
    }
    heights
}

/// Flattens `margin` columns at each edge to a shared landing height and eases
/// the next `blend` columns back into the generated shape.
fn flatten_edges(heights: &mut [f32], margin: usize, blend: usize) {
    let width = heights.len();
    let margin = margin.min(width.saturating_sub(1) / 2);
    if margin == 0 {
        return;
    }
    let blend = blend.min((width / 2).saturating_sub(margin));

    let left_inner = margin;
    let right_inner = width - 1 - margin;
    let target = (heights[left_inner] + heights[right_inner]) * 0.5;

    for h in &mut heights[..margin] {
        *h = target;
    }
    for h in &mut heights[width - margin..] {
        *h = target;
    }

    if blend == 0 {
        heights[left_inner] = target;
        heights[right_inner] = target;
        return;
    }

    // Left side eases in (t²): stays near the landing height, then catches up.
    for i in 0..blend {
        let x = left_inner + i;
        let t = i as f32 / blend as f32;
        heights[x] = target + (heights[x] - target) * t * t;
    }
    // Right side eases out toward the landing height (1 - (1 - s)²).
    for i in 0..blend {
        let x = right_inner - i;
        let s = 1.0 - i as f32 / blend as f32;
        let w = 1.0 - (1.0 - s) * (1.0 - s);
        heights[x] = target + (heights[x] - target) * (1.0 - w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_spread(values: &[f32]) -> f32 {
        let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        max - min
    }

    #[test]
    fn test_generate_determinism() {
        for preset in TerrainPreset::ALL {
            let generator = HeightmapGenerator::for_preset(preset).unwrap();
            let a = generator.generate(800, 42).unwrap();
            let b = generator.generate(800, 42).unwrap();
            assert_eq!(a, b, "{preset} not deterministic");
        }
    }

    #[test]
    fn test_seeds_differ() {
        let generator = HeightmapGenerator::for_preset(TerrainPreset::RollingHills).unwrap();
        let a = generator.generate(800, 1).unwrap();
        let b = generator.generate(800, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_width_preserved() {
        let generator = HeightmapGenerator::for_preset(TerrainPreset::Mountains).unwrap();
        for width in [1, 2, 3, 17, 128, 801] {
            assert_eq!(generator.generate(width, 3).unwrap().width(), width);
        }
    }

    #[test]
    fn test_zero_width_rejected() {
        let generator = HeightmapGenerator::for_preset(TerrainPreset::FlatPlains).unwrap();
        assert_eq!(generator.generate(0, 1), Err(TerrainError::InvalidWidth(0)));
    }

    #[test]
    fn test_invalid_roughness_rejected() {
        let params = PresetParams {
            base_height: 400.0,
            variation: 50.0,
            roughness: 1.5,
        };
        assert!(matches!(
            HeightmapGenerator::new(params),
            Err(TerrainError::InvalidRoughness(_))
        ));
    }

    #[test]
    fn test_midpoint_fills_every_column() {
        let params = TerrainPreset::Mountains.params();
        let mut rng = SeededRandomStream::new(9);
        let heights = midpoint_displacement(257, &params, &mut rng);
        assert_eq!(heights.len(), 257);
        assert!(heights.iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_zero_variation_is_flat() {
        let params = PresetParams {
            base_height: 400.0,
            variation: 0.0,
            roughness: 0.5,
        };
        let map = HeightmapGenerator::new(params).unwrap().generate(300, 5).unwrap();
        assert!(map.iter().all(|h| h == 400.0));
    }

    #[test]
    fn test_low_roughness_is_smoother() {
        let total_slope = |roughness: f32| {
            let params = PresetParams {
                base_height: 350.0,
                variation: 120.0,
                roughness,
            };
            let map = HeightmapGenerator::new(params)
                .unwrap()
                .with_edges(0, 0)
                .with_bounds(0.0, 10_000.0)
                .generate(1025, 77)
                .unwrap();
            map.as_slice()
                .windows(2)
                .map(|w| (w[1] - w[0]).abs())
                .sum::<f32>()
        };
        assert!(total_slope(0.3) < total_slope(0.8));
    }

    #[test]
    fn test_edges_flat() {
        for preset in TerrainPreset::ALL {
            let generator = HeightmapGenerator::for_preset(preset).unwrap();
            for seed in 0..20 {
                let map = generator.generate(800, seed).unwrap();
                let s = map.as_slice();
                assert!(max_spread(&s[..DEFAULT_EDGE_MARGIN]) < 1e-3);
                assert!(max_spread(&s[800 - DEFAULT_EDGE_MARGIN..]) < 1e-3);
                assert!((s[0] - s[799]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_flatten_edges_small_widths() {
        for width in 1..12 {
            let mut heights: Vec<f32> = (0..width).map(|i| i as f32 * 10.0).collect();
            flatten_edges(&mut heights, 60, 40);
            assert_eq!(heights.len(), width);
            assert!(heights.iter().all(|h| h.is_finite()));
        }
    }

    #[test]
    fn test_flatten_edges_blend_is_continuous() {
        let mut heights: Vec<f32> = (0..400).map(|i| 300.0 + (i % 7) as f32 * 5.0).collect();
        flatten_edges(&mut heights, 60, 40);
        assert_eq!(heights[0], heights[60]);
        assert_eq!(heights[399], heights[339]);
        // First blend step moves only a small fraction toward the raw profile.
        assert!((heights[61] - heights[60]).abs() <= 35.0 / 1600.0 + 1e-4);
    }

    #[test]
    fn test_clamped_into_bounds() {
        let params = PresetParams {
            base_height: 300.0,
            variation: 2_000.0,
            roughness: 0.9,
        };
        let map = HeightmapGenerator::new(params)
            .unwrap()
            .with_bounds(100.0, 500.0)
            .generate(600, 13)
            .unwrap();
        assert!(map.iter().all(|h| (100.0..=500.0).contains(&h)));
    }

    #[test]
    fn test_cratered_differs_from_plain_shape() {
        let params = TerrainPreset::Cratered.params();
        let plain = HeightmapGenerator::new(params).unwrap().generate(800, 21).unwrap();
        let cratered = HeightmapGenerator::new(params)
            .unwrap()
            .with_pregenerated_craters(true)
            .generate(800, 21)
            .unwrap();
        assert_ne!(plain, cratered);
        // Both consume the same midpoint stream; craters can only push ground down.
        for i in 100..700 {
            assert!(cratered.as_slice()[i] >= plain.as_slice()[i]);
        }
    }

    #[test]
    fn test_from_config_uses_bounds() {
        let cfg = TerrainConfig::new(400, TerrainPreset::Mountains).with_bounds(200.0, 300.0);
        let map = HeightmapGenerator::from_config(&cfg).unwrap().generate(400, 8).unwrap();
        assert!(map.iter().all(|h| (200.0..=300.0).contains(&h)));
    }
}
