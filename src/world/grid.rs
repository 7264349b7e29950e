//! Fixed-size tile map the rays are cast into.
//!
//! Cells are addressed `(col, row)` with row 0 at the top; world units
//! map to cells through `cell_size`. The grid is immutable once built.

use glam::{IVec2, Vec2};
use thiserror::Error;

/// Raw cell value: `0` is open floor, anything else a wall material.
pub type CellCode = u8;

/// Open (passable) cell.
pub const EMPTY: CellCode = 0;

/// Built-in 10×10 room used when no map file is supplied.
pub const DEFAULT_MAP: &str = "\
1111111111
1000000002
1000000002
1003300002
1000300002
1000000002
1000040002
1000040002
1000000002
1444444442";

/// Things that can go wrong when building a grid.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// No rows at all.
    #[error("map is empty")]
    Empty,

    /// A row does not have as many cells as the first one.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Character that is neither a digit nor an empty marker.
    #[error("invalid cell `{ch}` at row {row}, column {col}")]
    BadCell { row: usize, col: usize, ch: char },

    /// `cells.len()` disagrees with `width * height`.
    #[error("expected {expected} cells, got {found}")]
    Size { expected: usize, found: usize },

    /// Cell side must be a positive, finite length.
    #[error("cell size {0} must be positive")]
    CellSize(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridWorld {
    width: usize,
    height: usize,
    cell_size: f32,
    cells: Vec<CellCode>,
}

impl GridWorld {
    /// Build a grid from row-major `cells`.
    pub fn new(
        width: usize,
        height: usize,
        cell_size: f32,
        cells: Vec<CellCode>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::CellSize(cell_size));
        }
        if cells.len() != width * height {
            return Err(GridError::Size {
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            cells,
        })
    }

    /// Parse a text map: one line per row, `0`/`.`/space open, `1`..`9`
    /// wall materials. Blank trailing lines are ignored.
    pub fn parse(src: &str, cell_size: f32) -> Result<Self, GridError> {
        let rows: Vec<&str> = src
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();

        let width = rows.first().ok_or(GridError::Empty)?.chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '.' | ' ' => EMPTY,
                    d if d.is_ascii_digit() => d as u8 - b'0',
                    ch => return Err(GridError::BadCell { row, col, ch }),
                });
            }
        }

        Self::new(width, rows.len(), cell_size, cells)
    }

    /// Square room of `w × h` cells whose border is `wall` and interior
    /// is empty.
    pub fn bordered_room(w: usize, h: usize, cell_size: f32, wall: CellCode) -> Result<Self, GridError> {
        let cells = (0..w * h)
            .map(|i| {
                let (x, y) = (i % w, i / w);
                if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                    wall
                } else {
                    EMPTY
                }
            })
            .collect();
        Self::new(w, h, cell_size, cells)
    }

    /*──────────────────────── queries ───────────────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space extent of the whole map.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    #[inline]
    pub fn contains(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as usize) < self.width && (tile.y as usize) < self.height
    }

    /// Cell code at `tile`, or `None` outside the grid.
    #[inline]
    pub fn cell(&self, tile: IVec2) -> Option<CellCode> {
        if self.contains(tile) {
            Some(self.cells[tile.y as usize * self.width + tile.x as usize])
        } else {
            None
        }
    }

    /// Tile containing the world point `p`.
    #[inline]
    pub fn tile_at(&self, p: Vec2) -> IVec2 {
        (p / self.cell_size).floor().as_ivec2()
    }

    /// True if `p` lies in an open cell inside the grid.
    pub fn is_open(&self, p: Vec2) -> bool {
        self.cell(self.tile_at(p)) == Some(EMPTY)
    }

    /// World-space centre of `tile`.
    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        (tile.as_vec2() + 0.5) * self.cell_size
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
