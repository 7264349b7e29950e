//! Grid-line marching.
//!
//! Each ray family only ever lands on its own grid lines: vertical rays on
//! `x = k·cell`, horizontal rays on `y = k·cell`. A ray is first stretched
//! to the nearest such line, then grown one cell-width (measured along
//! the family's axis) at a time until its end point falls in a wall cell
//! or leaves the grid.

use glam::{IVec2, Vec2};

use crate::{
    engine::types::{Family, Hit, Ray, RayPair, TileEpsilon},
    math::reproject_scale,
    world::{EMPTY, GridWorld},
};

/// Marches rays cast from one origin through one grid.
///
/// Holds only shared borrows, so one marcher can serve every column
/// concurrently.
#[derive(Clone, Copy)]
pub struct Marcher<'a> {
    grid: &'a GridWorld,
    origin: Vec2,
    /// Tile nudges in world units.
    eps: TileEpsilon,
    min_denom: f32,
    max_steps: usize,
}

#[inline]
fn signed(eps: f32, component: f32) -> f32 {
    if component < 0.0 { -eps } else { eps }
}

impl<'a> Marcher<'a> {
    /// `eps` is given in cell fractions and resolved against the grid's
    /// cell size here.
    pub fn new(grid: &'a GridWorld, origin: Vec2, eps: TileEpsilon, min_denom: f32) -> Self {
        Self {
            grid,
            origin,
            eps: eps.to_world(grid.cell_size()),
            min_denom,
            // one family crosses at most one line per step
            max_steps: grid.width().max(grid.height()) + 2,
        }
    }

    /// Tile holding the end point of `ray`.
    ///
    /// The coordinate on the family's own axis sits on a grid line, so it
    /// is pushed by `eps.crossing` towards the cell being entered; the
    /// other coordinate gets the larger `eps.lateral` push.
    pub fn tile_for(&self, ray: &Ray) -> IVec2 {
        let p = self.origin + ray.v();
        let (ex, ey) = match ray.family {
            Family::Vertical => (self.eps.crossing, self.eps.lateral),
            Family::Horizontal => (self.eps.lateral, self.eps.crossing),
        };
        let nudged = Vec2::new(p.x + signed(ex, ray.dir.x), p.y + signed(ey, ray.dir.y));
        self.grid.tile_at(nudged)
    }

    /// Axis vector from the origin to the nearest line of the ray's family
    /// in its direction of travel.
    fn first_line_axis(&self, ray: &Ray) -> Vec2 {
        let cell = self.grid.cell_size();
        let gap = |o: f32, d: f32| {
            let line = (o / cell).floor() * cell - o;
            if d < 0.0 { line } else { line + cell }
        };
        match ray.family {
            Family::Vertical => Vec2::new(gap(self.origin.x, ray.dir.x), 0.0),
            Family::Horizontal => Vec2::new(0.0, gap(self.origin.y, ray.dir.y)),
        }
    }

    /// Stretch a unit ray so it ends on its family's nearest grid line.
    pub fn extend_to_first_line(&self, ray: Ray) -> Ray {
        let axis = self.first_line_axis(&ray);
        Ray {
            len: reproject_scale(ray.dir, axis, self.min_denom),
            ..ray
        }
    }

    /// Length added per step so the end point advances exactly one cell
    /// along the family's axis.
    pub fn step_len(&self, ray: &Ray) -> f32 {
        let cell = self.grid.cell_size();
        let axis = match ray.family {
            Family::Vertical => Vec2::new(signed(cell, ray.dir.x), 0.0),
            Family::Horizontal => Vec2::new(0.0, signed(cell, ray.dir.y)),
        };
        reproject_scale(ray.dir, axis, self.min_denom)
    }

    /// Grow an already-extended ray until it enters a wall or leaves the
    /// grid. Bounds are checked before every cell read.
    pub fn march(&self, mut ray: Ray) -> Ray {
        let step = self.step_len(&ray);
        let mut tile = self.tile_for(&ray);
        let mut steps = 0;
        while self.grid.cell(tile) == Some(EMPTY) && steps < self.max_steps {
            ray.len += step;
            tile = self.tile_for(&ray);
            steps += 1;
        }
        ray
    }

    pub fn extend_pair(&self, pair: RayPair) -> RayPair {
        RayPair {
            vertical: self.extend_to_first_line(pair.vertical),
            horizontal: self.extend_to_first_line(pair.horizontal),
        }
    }

    pub fn march_pair(&self, pair: RayPair) -> RayPair {
        RayPair {
            vertical: self.march(pair.vertical),
            horizontal: self.march(pair.horizontal),
        }
    }

    /// Pick the nearer terminal ray of `pair` and describe where it ended.
    pub fn resolve(&self, pair: &RayPair) -> Hit {
        let ray = pair.nearest();
        let tile = self.tile_for(&ray);
        Hit {
            ray,
            point: self.origin + ray.v(),
            tile,
            code: self.grid.cell(tile),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
