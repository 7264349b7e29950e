use bitflags::bitflags;
use glam::{IVec2, Vec2};

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // pre-derived for speed
    pub half_w: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// How far the per-frame pipeline runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CastMode {
    /// Unit directions only, stretched to the debug length.
    RaysOnly,
    /// Directions extended to the nearest grid line of their family.
    FirstHit,
    /// Full grid traversal, projection and strip fill.
    #[default]
    Full,
}

impl CastMode {
    /// Next mode in `RaysOnly → FirstHit → Full → RaysOnly` order.
    pub fn cycle(self) -> Self {
        match self {
            CastMode::RaysOnly => CastMode::FirstHit,
            CastMode::FirstHit => CastMode::Full,
            CastMode::Full => CastMode::RaysOnly,
        }
    }
}

/// Stage the frame driver stopped at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CastStage {
    RaysOnly,
    RaysWithFirstHit,
    FullCast,
}

impl From<CastMode> for CastStage {
    fn from(mode: CastMode) -> Self {
        match mode {
            CastMode::RaysOnly => CastStage::RaysOnly,
            CastMode::FirstHit => CastStage::RaysWithFirstHit,
            CastMode::Full => CastStage::FullCast,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Use radial ray length (fisheye) instead of viewplane distance.
        const DISTORTION = 0x01;
        /// Sample wall textures instead of flat colours.
        const TEXTURED   = 0x02;
        /// Present after every column; cleared after one frame.
        const SLOW       = 0x04;
        /// Cast and project columns on the rayon pool.
        const PARALLEL   = 0x08;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::TEXTURED
    }
}

/// Nudges applied before truncating a hit point to a tile index, as
/// fractions of the cell side.
///
/// `crossing` acts on the axis whose grid line the ray family lands on,
/// `lateral` on the other axis. Both push in the direction of travel.
/// The defaults are 0.01 and 0.1 world units on a 64-unit cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileEpsilon {
    pub crossing: f32,
    pub lateral: f32,
}

impl TileEpsilon {
    /// Same nudges in world units for cells of side `cell`.
    #[inline]
    pub fn to_world(self, cell: f32) -> Self {
        Self {
            crossing: self.crossing * cell,
            lateral: self.lateral * cell,
        }
    }
}

impl Default for TileEpsilon {
    fn default() -> Self {
        Self {
            crossing: 0.01 / 64.0,
            lateral: 0.1 / 64.0,
        }
    }
}

/// Everything the caster needs to know that is not map or viewer state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastConfig {
    pub screen: Screen,
    /// Horizontal field of view, radians.
    pub fov: f32,
    pub mode: CastMode,
    pub flags: RenderFlags,
    /// Length of rays drawn in `RaysOnly` mode, world units.
    pub debug_ray_len: f32,
    pub eps: TileEpsilon,
    /// Floor for projection denominators.
    pub min_denom: f32,
    /// Turn speed used to build the rotation blocks, radians per tick.
    pub rot_speed: f32,
    /// Pause between partial presents in slow mode, milliseconds.
    pub slow_pause_ms: u64,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            fov: 60_f32.to_radians(),
            mode: CastMode::Full,
            flags: RenderFlags::default(),
            debug_ray_len: 40.0,
            eps: TileEpsilon::default(),
            min_denom: crate::math::MIN_DENOM,
            rot_speed: 0.05,
            slow_pause_ms: 2,
        }
    }
}

/// Which family of grid lines a ray is marched across.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    /// Lands on `x = k * cell` lines.
    Vertical,
    /// Lands on `y = k * cell` lines.
    Horizontal,
}

/// A ray from the viewer, tagged with its family.
///
/// Stored as a unit direction and a length so a zero-length ray still
/// knows which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub family: Family,
    pub dir: Vec2,
    pub len: f32,
}

impl Ray {
    /// Vector from the viewer to the ray's end point.
    #[inline]
    pub fn v(&self) -> Vec2 {
        self.dir * self.len
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.len.abs()
    }
}

/// Both candidates for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayPair {
    pub vertical: Ray,
    pub horizontal: Ray,
}

impl RayPair {
    /// Both families starting from the same direction and length.
    pub fn splat(dir: Vec2, len: f32) -> Self {
        Self {
            vertical: Ray {
                family: Family::Vertical,
                dir,
                len,
            },
            horizontal: Ray {
                family: Family::Horizontal,
                dir,
                len,
            },
        }
    }

    /// The shorter of the two; ties go to the vertical ray.
    pub fn nearest(&self) -> Ray {
        if self.horizontal.length() < self.vertical.length() {
            self.horizontal
        } else {
            self.vertical
        }
    }
}

impl Default for RayPair {
    fn default() -> Self {
        Self::splat(Vec2::X, 0.0)
    }
}

/// Light level chosen by hit family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    Lit,
    Dark,
}

impl From<Family> for Shade {
    fn from(f: Family) -> Self {
        match f {
            Family::Horizontal => Shade::Lit,
            Family::Vertical => Shade::Dark,
        }
    }
}

/// Terminal state of one column's authoritative ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub ray: Ray,
    /// World-space end point.
    pub point: Vec2,
    /// Tile the end point was assigned to (may be outside the grid).
    pub tile: IVec2,
    /// Cell code at `tile`, `None` if the ray left the grid.
    pub code: Option<u8>,
}

/// Wall span for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// First wall row, clamped to ≥ 0.
    pub top: f32,
    /// Unclamped on-screen wall height in pixels.
    pub height: f32,
    /// Texture column, already mirrored for the approach side.
    pub tex_x: i32,
    pub code: Option<u8>,
    pub shade: Shade,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn nearest_prefers_shorter_then_vertical() {
        let mut p = RayPair::splat(vec2(0.6, 0.8), 5.0);
        assert_eq!(p.nearest().family, Family::Vertical);
        p.horizontal.len = 1.5;
        assert_eq!(p.nearest().family, Family::Horizontal);
    }

    #[test]
    fn mode_cycles_through_all_stages() {
        let m = CastMode::RaysOnly;
        assert_eq!(m.cycle(), CastMode::FirstHit);
        assert_eq!(m.cycle().cycle(), CastMode::Full);
        assert_eq!(m.cycle().cycle().cycle(), CastMode::RaysOnly);
        assert!(CastStage::from(CastMode::Full) > CastStage::from(CastMode::FirstHit));
    }

    #[test]
    fn horizontal_hits_are_lit() {
        assert_eq!(Shade::from(Family::Horizontal), Shade::Lit);
        assert_eq!(Shade::from(Family::Vertical), Shade::Dark);
    }
}
