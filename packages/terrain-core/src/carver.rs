// Explosion craters: lower ground inside a circle, never raise it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, TerrainError};
use crate::heightmap::Heightmap;

/// A one-off destructive event. Applied once, then discarded (or logged).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraterRequest {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl CraterRequest {
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Self {
        CraterRequest {
            center_x,
            center_y,
            radius,
        }
    }

    /// Like `new`, but rejects non-positive or non-finite radii.
    pub fn validated(center_x: f32, center_y: f32, radius: f32) -> Result<Self> {
        let req = CraterRequest::new(center_x, center_y, radius);
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(TerrainError::InvalidRadius(self.radius));
        }
        Ok(())
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Integer columns inside `[cx - r, cx + r] ∩ [0, width)`.
    pub fn column_span(&self, width: usize) -> Option<(usize, usize)> {
        if width == 0 || !(self.radius > 0.0) || !self.center_x.is_finite() {
            return None;
        }
        let first = (self.center_x - self.radius).ceil().max(0.0);
        let last = (self.center_x + self.radius).floor().min((width - 1) as f32);
        if first > last {
            return None;
        }
        Some((first as usize, last as usize))
    }
}

/// What a carve touched. Emitted so decoration owners can prune.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarveRegion {
    pub request: CraterRequest,
    pub first_column: usize,
    pub last_column: usize,
    /// Columns whose height actually moved.
    pub changed_columns: usize,
}

impl CarveRegion {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.request.contains(x, y)
    }
}

/// Applies craters to a heightmap, clamped to the world floor.
#[derive(Clone, Copy, Debug)]
pub struct CraterCarver {
    floor: f32,
}

impl CraterCarver {
    pub fn new(floor: f32) -> Self {
        CraterCarver { floor }
    }

    /// Lower every column under the circle's bottom edge. Columns whose crater
    /// bottom is above the current ground are left alone, so heights only grow.
    /// Returns `None` for a zero/negative radius or a circle fully off the map.
    pub fn carve(&self, heights: &mut Heightmap, request: &CraterRequest) -> Option<CarveRegion> {
        let (first, last) = request.column_span(heights.width())?;
        let r2 = request.radius * request.radius;
        let mut changed = 0;

        for col in first..=last {
            let dx = col as f32 - request.center_x;
            let half_chord = (r2 - dx * dx).max(0.0).sqrt();
            let crater_bottom = request.center_y + half_chord;
            let Some(current) = heights.get(col) else {
                continue;
            };
            if crater_bottom >= current {
                let next = crater_bottom.min(self.floor).max(current);
                if next != current {
                    heights.set(col, next);
                    changed += 1;
                }
            }
        }

        trace!(
            cx = request.center_x,
            cy = request.center_y,
            r = request.radius,
            first,
            last,
            changed,
            "carved crater"
        );

        Some(CarveRegion {
            request: *request,
            first_column: first,
            last_column: last,
            changed_columns: changed,
        })
    }
}
