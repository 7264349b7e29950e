use glam::Vec2;

use crate::{
    engine::types::{Family, Hit, Projection, Screen, Shade},
    math::reject,
};

/// Per-frame constants that turn a [`Hit`] into a wall span.
#[derive(Clone, Copy, Debug)]
pub struct Lens {
    pub dist_from_viewplane: f32,
    pub cell_size: f32,
    pub half_h: f32,
    pub tex_size: usize,
    /// Viewplane direction of the current viewer.
    pub plane: Vec2,
    /// Keep the radial (fisheye) length instead of correcting it.
    pub distortion: bool,
    /// Floor for hit lengths, avoids dividing by zero.
    pub min_len: f32,
}

impl Lens {
    pub fn new(
        screen: &Screen,
        dist_from_viewplane: f32,
        cell_size: f32,
        tex_size: usize,
        plane: Vec2,
    ) -> Self {
        Self {
            dist_from_viewplane,
            cell_size,
            half_h: screen.half_h,
            tex_size: tex_size.max(1),
            plane,
            distortion: false,
            min_len: crate::math::MIN_DENOM,
        }
    }

    /// On-screen wall height for a hit `len` world units away.
    #[inline]
    pub fn draw_height(&self, len: f32) -> f32 {
        self.dist_from_viewplane * self.cell_size / len.max(self.min_len)
    }

    /// Length used for projection: radial, or perpendicular to the
    /// viewplane when distortion is off.
    pub fn effective_length(&self, v: Vec2) -> f32 {
        if self.distortion {
            v.length()
        } else {
            undistorted_length(v, self.plane)
        }
    }

    /// Column of the wall texture the hit point falls on.
    ///
    /// Horizontal faces read along x, vertical faces along y; the column
    /// is mirrored for one approach side so textures never appear flipped.
    pub fn texture_column(&self, hit: &Hit) -> i32 {
        let (along, mirrored) = match hit.ray.family {
            Family::Horizontal => (hit.point.x, hit.ray.dir.y >= 0.0),
            Family::Vertical => (hit.point.y, hit.ray.dir.x <= 0.0),
        };
        let size = self.tex_size as i32;
        let frac = along.rem_euclid(self.cell_size) / self.cell_size;
        let u = ((frac * size as f32) as i32).clamp(0, size - 1);
        if mirrored { size - 1 - u } else { u }
    }

    pub fn project(&self, hit: &Hit) -> Projection {
        let height = self.draw_height(self.effective_length(hit.ray.v()));
        Projection {
            top: (self.half_h - height * 0.5).max(0.0),
            height,
            tex_x: self.texture_column(hit),
            code: hit.code,
            shade: Shade::from(hit.ray.family),
        }
    }
}

/// Length of `v` with its viewplane component removed.
#[inline]
pub fn undistorted_length(v: Vec2, plane: Vec2) -> f32 {
    reject(v, plane).length()
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
