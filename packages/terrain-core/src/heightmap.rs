// Per-column ground profile. Fixed width, y grows downwards.

use serde::Serialize;

/// Ground height per column, `0..width`.
///
/// Length is fixed at construction. Readers get slices and copies only;
/// writes go through the crate's generator and carver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Heightmap {
    heights: Vec<f32>,
}

impl Heightmap {
    /// A level profile, mostly useful for tests and tooling.
    pub fn flat(width: usize, height: f32) -> Self {
        Heightmap {
            heights: vec![height; width],
        }
    }

    pub(crate) fn from_vec(heights: Vec<f32>) -> Self {
        Heightmap { heights }
    }

    pub fn width(&self) -> usize {
        self.heights.len()
    }

    pub fn get(&self, column: usize) -> Option<f32> {
        self.heights.get(column).copied()
    }

    /// Height at the nearest valid column; out-of-range indices clamp to the edges.
    pub fn clamped(&self, column: i64) -> f32 {
        let last = self.heights.len().saturating_sub(1) as i64;
        let idx = column.clamp(0, last) as usize;
        self.heights.get(idx).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.heights.iter().copied()
    }

    /// Smallest y (tallest ground) and the column it sits at; first wins on ties.
    pub fn highest(&self) -> Option<(usize, f32)> {
        self.heights
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, h)| match best {
                Some((_, bh)) if bh <= h => best,
                _ => Some((i, h)),
            })
    }

    pub(crate) fn set(&mut self, column: usize, height: f32) {
        if let Some(slot) = self.heights.get_mut(column) {
            *slot = height;
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    pub(crate) fn clamp_all(&mut self, min: f32, max: f32) {
        for h in &mut self.heights {
            *h = h.clamp(min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let map = Heightmap::flat(10, 300.0);
        assert_eq!(map.width(), 10);
        assert!(map.iter().all(|h| h == 300.0));
    }

    #[test]
    fn test_clamped_lookup() {
        let map = Heightmap::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(map.clamped(-5), 1.0);
        assert_eq!(map.clamped(1), 2.0);
        assert_eq!(map.clamped(99), 3.0);
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn test_highest_is_smallest_y() {
        let map = Heightmap::from_vec(vec![400.0, 250.0, 300.0, 250.0]);
        assert_eq!(map.highest(), Some((1, 250.0)));
        assert_eq!(Heightmap::flat(0, 1.0).highest(), None);
    }

    #[test]
    fn test_set_out_of_range_ignored() {
        let mut map = Heightmap::flat(4, 10.0);
        map.set(4, 99.0);
        map.set(2, 20.0);
        assert_eq!(map.as_slice(), &[10.0, 10.0, 20.0, 10.0]);
    }

    #[test]
    fn test_clamp_all() {
        let mut map = Heightmap::from_vec(vec![-5.0, 50.0, 900.0]);
        map.clamp_all(0.0, 600.0);
        assert_eq!(map.as_slice(), &[0.0, 50.0, 600.0]);
    }
}
