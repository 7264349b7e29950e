//! Small vector helpers shared by every stage.
//!
//! Positions and directions are plain [`glam::Vec2`]; the homogeneous
//! `w` component is always 1 and never divides, so it is left implicit.

use glam::{Mat2, Vec2};

/// Smallest magnitude a projection denominator may take.
pub const MIN_DENOM: f32 = 1e-4;

/// Push `x` away from zero so it can be used as a divisor.
///
/// Exact zero (of either sign) floors to `+floor`.
#[inline]
pub fn nonzero(x: f32, floor: f32) -> f32 {
    if x.abs() >= floor {
        x
    } else if x < 0.0 {
        -floor
    } else {
        floor
    }
}

/// Multiple of `ray` whose projection on `axis` equals `axis`.
///
/// ```text
/// scale = (axis · axis) / (axis · ray)
/// ```
///
/// `axis` lies purely along one grid axis, so `ray * scale` ends exactly
/// on the grid line `axis` points at.
#[inline]
pub fn reproject_scale(ray: Vec2, axis: Vec2, floor: f32) -> f32 {
    axis.dot(axis) / nonzero(axis.dot(ray), floor)
}

/// Part of `v` perpendicular to `onto`.
#[inline]
pub fn reject(v: Vec2, onto: Vec2) -> Vec2 {
    v - v.project_onto(onto)
}

/// Fixed 2×2 rotation applied to the facing direction when turning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationBlock(Mat2);

impl RotationBlock {
    /// Rotation by `angle` radians (positive = counter-clockwise in a
    /// y-up frame).
    pub fn new(angle: f32) -> Self {
        Self(Mat2::from_angle(angle))
    }

    #[inline]
    pub fn apply(&self, v: Vec2) -> Vec2 {
        self.0 * v
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn nonzero_floors_small_values() {
        assert_eq!(nonzero(0.0, MIN_DENOM), MIN_DENOM);
        assert_eq!(nonzero(-0.0, MIN_DENOM), MIN_DENOM);
        assert_eq!(nonzero(-1e-7, MIN_DENOM), -MIN_DENOM);
        assert_eq!(nonzero(3.0, MIN_DENOM), 3.0);
    }

    #[test]
    fn reproject_lands_on_line() {
        // diagonal ray, target the vertical line x = 10
        let d = vec2(1.0, 1.0).normalize();
        let r = d * reproject_scale(d, vec2(10.0, 0.0), MIN_DENOM);
        assert!((r.x - 10.0).abs() < 1e-4);
        assert!((r.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn reproject_parallel_ray_stays_finite() {
        let s = reproject_scale(vec2(1.0, 0.0), vec2(0.0, 32.0), MIN_DENOM);
        assert!(s.is_finite());
        assert!(s > 1e6);
    }

    #[test]
    fn reject_removes_parallel_part() {
        let r = reject(vec2(3.0, 4.0), vec2(1.0, 0.0));
        assert!((r - vec2(0.0, 4.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_quarter_turn() {
        let r = RotationBlock::new(FRAC_PI_2).apply(vec2(1.0, 0.0));
        assert!((r - vec2(0.0, 1.0)).length() < 1e-5);
        let back = RotationBlock::new(-FRAC_PI_2).apply(r);
        assert!((back - vec2(1.0, 0.0)).length() < 1e-5);
    }
}
