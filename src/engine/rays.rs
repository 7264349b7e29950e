//! Per-column ray directions.
//!
//! Column `i` of an `n`-column screen aims at the viewplane point
//!
//! ```text
//! pos + dir * dist − plane * (n/2 − (i + ½))
//! ```
//!
//! i.e. through the centre of its pixel column, so columns `i` and
//! `n-1-i` are mirror images about the facing direction.

use glam::Vec2;

use crate::{
    engine::types::{CastMode, RayPair},
    world::Viewer,
};

/// Unit direction for column `col` of `cols`.
#[inline]
pub fn column_dir(viewer: &Viewer, dist: f32, cols: usize, col: usize) -> Vec2 {
    let offset = cols as f32 * 0.5 - (col as f32 + 0.5);
    (viewer.dir * dist - viewer.plane * offset).normalize_or(viewer.dir)
}

/// Overwrite `rays` with fresh unit directions, one pair per column.
///
/// In [`CastMode::RaysOnly`] the rays are stretched to `debug_len` so an
/// overlay can draw them; otherwise they stay unit length for the
/// intersector.
pub fn generate(rays: &mut [RayPair], viewer: &Viewer, dist: f32, mode: CastMode, debug_len: f32) {
    let cols = rays.len();
    let len = if mode == CastMode::RaysOnly { debug_len } else { 1.0 };
    for (col, pair) in rays.iter_mut().enumerate() {
        *pair = RayPair::splat(column_dir(viewer, dist, cols, col), len);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
