// Wall materials: flat colours and square textures, both indexed by the
// grid cell code. Asset decoding lives elsewhere; the renderer only sees
// `Palette`.

use crate::renderer::Rgba;

/// Square texture, 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    size: usize,
    pixels: Vec<Rgba>,
}

/// Things that can go wrong when building textures or a palette.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Side length of zero.
    #[error("texture size must be non-zero")]
    ZeroSize,

    /// Pixel count is not `size * size`.
    #[error("texture of size {size} needs {expected} pixels, got {found}")]
    PixelCount {
        size: usize,
        expected: usize,
        found: usize,
    },

    /// Textures of one palette must share a side length.
    #[error("texture {index} is {found}px, palette uses {expected}px")]
    SizeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Palette without any flat colour or texture.
    #[error("palette needs at least one colour and one texture")]
    EmptyPalette,
}

impl Texture {
    pub fn new(size: usize, pixels: Vec<Rgba>) -> Result<Self, TextureError> {
        if size == 0 {
            return Err(TextureError::ZeroSize);
        }
        if pixels.len() != size * size {
            return Err(TextureError::PixelCount {
                size,
                expected: size * size,
                found: pixels.len(),
            });
        }
        Ok(Self { size, pixels })
    }

    /// Two-colour checkerboard with 8×8 squares.
    pub fn checker(size: usize, light: Rgba, dark: Rgba) -> Self {
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if ((x / 8) ^ (y / 8)) & 1 == 0 { light } else { dark }
            })
            .collect();
        Self {
            size: size.max(1),
            pixels,
        }
        .or_blank()
    }

    /// Running-bond brick pattern: `size/4` tall courses, bricks half the
    /// texture wide, one-pixel mortar joints.
    pub fn bricks(size: usize, brick: Rgba, mortar: Rgba) -> Self {
        let course = (size / 4).max(2);
        let brick_w = (size / 2).max(2);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let row = y / course;
                let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
                if y % course == 0 || (x + shift) % brick_w == 0 {
                    mortar
                } else {
                    brick
                }
            })
            .collect();
        Self {
            size: size.max(1),
            pixels,
        }
        .or_blank()
    }

    // zero-sized requests collapse to a single black texel
    fn or_blank(self) -> Self {
        if self.pixels.is_empty() {
            Self {
                size: 1,
                pixels: vec![0xFF_000000],
            }
        } else {
            self
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Texel at column `u`, row `v`; both are clamped into range.
    #[inline]
    pub fn texel(&self, u: i32, v: i32) -> Rgba {
        let max = self.size as i32 - 1;
        let (u, v) = (u.clamp(0, max) as usize, v.clamp(0, max) as usize);
        self.pixels[v * self.size + u]
    }
}

/// Materials for walls plus the constant ceiling/floor colours.
///
/// * Cell code `c` in `1..=n` selects entry `c - 1`.
/// * Any other code falls back to the **last** entry.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Rgba>,
    textures: Vec<Texture>,
    pub ceiling: Rgba,
    pub floor: Rgba,
}

impl Palette {
    pub const RED: Rgba = 0xFF_FF0000;
    pub const GREEN: Rgba = 0xFF_00FF00;
    pub const BLUE: Rgba = 0xFF_0000FF;
    pub const GREY: Rgba = 0xFF_808080;

    pub fn new(
        colors: Vec<Rgba>,
        textures: Vec<Texture>,
        ceiling: Rgba,
        floor: Rgba,
    ) -> Result<Self, TextureError> {
        let first = textures.first().ok_or(TextureError::EmptyPalette)?;
        if colors.is_empty() {
            return Err(TextureError::EmptyPalette);
        }
        let expected = first.size();
        if let Some((index, t)) = textures.iter().enumerate().find(|(_, t)| t.size() != expected) {
            return Err(TextureError::SizeMismatch {
                index,
                expected,
                found: t.size(),
            });
        }
        Ok(Self {
            colors,
            textures,
            ceiling,
            floor,
        })
    }

    /// Red/green/blue/grey walls with matching brick textures of side
    /// `texture_size`.
    pub fn procedural(texture_size: usize) -> Self {
        let colors = vec![Self::RED, Self::GREEN, Self::BLUE, Self::GREY];
        let mortar = 0xFF_C8C8C8;
        let mut textures: Vec<Texture> = colors[..3]
            .iter()
            .map(|&c| Texture::bricks(texture_size, c, mortar))
            .collect();
        textures.push(Texture::checker(texture_size, Self::GREY, 0xFF_404040));
        Self {
            colors,
            textures,
            ceiling: 0xFF_383838,
            floor: 0xFF_707070,
        }
    }

    /// Slot for `code` in a table of `len` entries.
    #[inline]
    fn slot(code: u8, len: usize) -> usize {
        let c = code as usize;
        if (1..=len).contains(&c) { c - 1 } else { len - 1 }
    }

    pub fn color(&self, code: u8) -> Rgba {
        self.colors[Self::slot(code, self.colors.len())]
    }

    pub fn texture(&self, code: u8) -> &Texture {
        &self.textures[Self::slot(code, self.textures.len())]
    }

    /// Side length shared by all textures.
    pub fn texture_size(&self) -> usize {
        self.textures[0].size()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::procedural(64)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
