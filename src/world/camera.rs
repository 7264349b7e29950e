use glam::Vec2;

use crate::math::RotationBlock;

/// Player view-point in world space.
///
/// * `dir` is the unit facing direction.
/// * `plane` is the unit viewplane direction, perpendicular to `dir` and
///   pointing towards the right edge of the screen.
///
/// The caster only reads a snapshot of this per frame; input handling
/// owns the mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewer {
    pub pos: Vec2,
    pub dir: Vec2,
    pub plane: Vec2,
}

impl Viewer {
    /// Viewer at `pos` looking along `dir` (normalised here).
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        let dir = dir.normalize_or(Vec2::X);
        Self {
            pos,
            dir,
            plane: dir.perp(),
        }
    }

    /// Turn by a precomputed rotation; facing and viewplane stay
    /// perpendicular.
    pub fn rotate(&mut self, rot: &RotationBlock) {
        self.dir = rot.apply(self.dir).normalize_or(self.dir);
        self.plane = rot.apply(self.plane).normalize_or(self.plane);
    }

    /// Position after moving `dist` units along the facing direction.
    #[inline]
    pub fn ahead(&self, dist: f32) -> Vec2 {
        self.pos + self.dir * dist
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
