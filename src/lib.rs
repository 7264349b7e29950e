//! Grid-world ray caster.
//!
//! One ray per screen column is generated from the viewer's facing
//! direction, marched across vertical and horizontal grid lines until it
//! enters a wall cell, and the nearer of the two hits is projected into a
//! vertical pixel strip.
//!
//! ```text
//! rays ──► intersect ──► project ──► strips ──► Renderer
//! ```

pub mod engine;
pub mod math;
pub mod renderer;
pub mod world;
