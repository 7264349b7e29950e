//! Per-frame ray-casting pipeline.
//!
//! [`RaycastContext`] owns the state that survives between frames and
//! drives the stages below in order, once per frame:
//!
//! * [`rays`] – one unit direction pair per screen column
//! * [`intersect`] – march each pair across its grid-line family
//! * [`projection`] – nearer hit → wall height, texture column, shade
//! * [`strips`] – paint the column into the frame buffer

#[allow(clippy::module_inception)]
mod engine;
pub mod intersect;
pub mod projection;
pub mod rays;
pub mod strips;
pub mod types;

pub use engine::{RaycastContext, Turn};
pub use types::{
    CastConfig, CastMode, CastStage, Family, Hit, Projection, Ray, RayPair, RenderFlags, Screen,
    Shade, TileEpsilon,
};
