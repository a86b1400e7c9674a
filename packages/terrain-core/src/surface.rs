// Read-only collision queries over a heightmap. Out-of-range input is never
// an error: it is open sky, or clamps to the nearest edge column.

use serde::{Deserialize, Serialize};

use crate::heightmap::Heightmap;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Borrowed view used by physics and AI every tick. Holding one blocks carving,
/// so a query never sees a half-applied crater.
#[derive(Clone, Copy, Debug)]
pub struct CollisionSurface<'a> {
    heights: &'a Heightmap,
    world_height: f32,
}

impl<'a> CollisionSurface<'a> {
    pub fn new(heights: &'a Heightmap, world_height: f32) -> Self {
        CollisionSurface {
            heights,
            world_height,
        }
    }

    pub fn width(&self) -> usize {
        self.heights.width()
    }

    pub fn world_height(&self) -> f32 {
        self.world_height
    }

    /// Column under `x`, or `None` beyond the play area.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        if !(x >= 0.0) || x >= self.heights.width() as f32 {
            return None;
        }
        Some(x.floor() as usize)
    }

    /// Solid when at or below the ground (or the world floor) inside `[0, width)`.
    pub fn point_is_solid(&self, x: f32, y: f32) -> bool {
        let Some(col) = self.column_at(x) else {
            return false;
        };
        if y >= self.world_height {
            return true;
        }
        match self.heights.get(col) {
            Some(ground) => y >= ground,
            None => false,
        }
    }

    /// Ground y at `floor(x)`, clamped to the edge columns.
    pub fn ground_height(&self, x: f32) -> f32 {
        self.heights.clamped(x.floor() as i64)
    }

    /// First solid sample along `start -> end`, or `None`. Samples are at most one
    /// column-width apart so a one-column-wide spike cannot be skipped.
    ///
    /// The segment is first clipped to the columns and to the band at or below the
    /// highest ground, since nothing outside it is solid; stepping runs in `f64` so
    /// far-off endpoints neither lose precision nor cost more than the clipped part.
    pub fn cast_ray(&self, start: Point, end: Point) -> Option<Point> {
        let finite = [start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite());
        if !finite {
            return if self.point_is_solid(start.x, start.y) {
                Some(start)
            } else {
                None
            };
        }

        let (x0, y0) = (start.x as f64, start.y as f64);
        let (dx, dy) = (end.x as f64 - x0, end.y as f64 - y0);
        let top = self
            .heights
            .highest()
            .map_or(self.world_height, |(_, h)| h.min(self.world_height)) as f64;

        let (t0, t1) = clip_segment(
            &[
                (-dx, x0),
                (dx, self.heights.width() as f64 - x0),
                (-dy, y0 - top),
            ],
            0.0,
            1.0,
        )?;

        let length = dx.hypot(dy) * (t1 - t0);
        let steps = length.ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let t = t0 + (t1 - t0) * (i / steps);
            let p = Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
            if self.point_is_solid(p.x, p.y) {
                return Some(p);
            }
            i += 1.0;
        }
        None
    }
}

/// Liang-Barsky clip of the parameter range `[t0, t1]` against half-planes
/// `p * t <= q`. `None` when nothing of the segment survives.
fn clip_segment(planes: &[(f64, f64)], mut t0: f64, mut t1: f64) -> Option<(f64, f64)> {
    for &(p, q) in planes {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}
