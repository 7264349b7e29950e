mod camera;
mod grid;
mod texture;

pub use camera::Viewer;

pub use grid::{CellCode, DEFAULT_MAP, EMPTY, GridError, GridWorld};

pub use texture::{Palette, Texture, TextureError};
