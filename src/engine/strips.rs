//! Single-column painter: ceiling above the wall span, floor below it,
//! flat colour or a texture column inside.

use crate::{
    engine::types::{Projection, Shade},
    renderer::{FrameBuffer, Rgba, darken},
    world::{Palette, Texture},
};

/// Keeps the last texture row reachable without wrapping.
const TEX_ROW_EPS: f32 = 0.01;

/// What goes between the ceiling and the floor.
#[derive(Clone, Copy, Debug)]
pub enum Fill<'a> {
    Flat(Rgba),
    Textured { tex: &'a Texture, tex_x: i32 },
}

impl<'a> Fill<'a> {
    /// Flat colour or texture column for `proj` from `palette`.
    pub fn for_projection(proj: &Projection, palette: &'a Palette, textured: bool) -> Self {
        let code = proj.code.unwrap_or(0);
        if textured {
            Fill::Textured {
                tex: palette.texture(code),
                tex_x: proj.tex_x,
            }
        } else {
            Fill::Flat(palette.color(code))
        }
    }
}

/// Paint column `x` of `fb`.
///
/// * rows `< top` get `ceiling`
/// * rows `> top + height` get `floor`
/// * rows in between get the wall, darkened for [`Shade::Dark`]
///
/// Texture rows are interpolated over the *unclamped* span, which stays
/// centred on the screen, so a span taller than the screen shows only
/// its middle part of the texture.
pub fn draw_strip(
    fb: &mut FrameBuffer,
    x: usize,
    proj: &Projection,
    fill: Fill,
    ceiling: Rgba,
    floor: Rgba,
) {
    let h = fb.height();
    let half_h = h as f32 * 0.5;
    let bottom = proj.top + proj.height;
    let span_start = half_h - proj.height * 0.5;

    for y in 0..h {
        let yf = y as f32;
        let color = if yf < proj.top {
            ceiling
        } else if yf > bottom {
            floor
        } else {
            let wall = match fill {
                Fill::Flat(c) => c,
                Fill::Textured { tex, tex_x } => {
                    let rows = tex.size() as f32 - TEX_ROW_EPS;
                    let ty = (yf - span_start) * rows / proj.height.max(f32::EPSILON);
                    tex.texel(tex_x, ty as i32)
                }
            };
            match proj.shade {
                Shade::Lit => wall,
                Shade::Dark => darken(wall),
            }
        };
        fb.set(x, y, color);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    const CEIL: Rgba = 0xFF_111111;
    const FLOOR: Rgba = 0xFF_222222;

    fn proj(top: f32, height: f32, shade: Shade) -> Projection {
        Projection {
            top,
            height,
            tex_x: 0,
            code: Some(1),
            shade,
        }
    }

    #[test]
    fn flat_strip_splits_ceiling_wall_floor() {
        let mut fb = FrameBuffer::new(3, 10);
        draw_strip(&mut fb, 1, &proj(3.0, 4.0, Shade::Lit), Fill::Flat(0xFF_FF0000), CEIL, FLOOR);
        let col = fb.column(1);
        assert_eq!(&col[..3], &[CEIL; 3]);
        assert_eq!(&col[3..8], &[0xFF_FF0000; 5]);
        assert_eq!(&col[8..], &[FLOOR; 2]);
        // neighbours untouched
        assert!(fb.column(0).iter().all(|&c| c == 0));
    }

    #[test]
    fn dark_shade_darkens_wall_only() {
        let mut fb = FrameBuffer::new(1, 10);
        draw_strip(&mut fb, 0, &proj(3.0, 4.0, Shade::Dark), Fill::Flat(0xFF_FF0000), CEIL, FLOOR);
        assert_eq!(fb.get(0, 0), CEIL);
        assert_eq!(fb.get(0, 5), darken(0xFF_FF0000));
        assert_eq!(fb.get(0, 9), FLOOR);
    }

    #[test]
    fn textured_strip_walks_texture_rows() {
        // 4×4 texture whose rows are 0,1,2,3
        let tex = Texture::new(4, (0..16).map(|i| i / 4).collect()).unwrap();
        let mut fb = FrameBuffer::new(1, 8);
        // span covers the whole screen; rows scale by (size - ε) / height
        draw_strip(
            &mut fb,
            0,
            &proj(0.0, 8.0, Shade::Lit),
            Fill::Textured { tex: &tex, tex_x: 2 },
            CEIL,
            FLOOR,
        );
        assert_eq!(fb.column(0), vec![0, 0, 0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn tall_span_samples_middle_of_texture() {
        let tex = Texture::new(4, (0..16).map(|i| i / 4).collect()).unwrap();
        let mut fb = FrameBuffer::new(1, 4);
        // twice the screen height, top clamped to 0
        draw_strip(
            &mut fb,
            0,
            &proj(0.0, 8.0, Shade::Lit),
            Fill::Textured { tex: &tex, tex_x: 0 },
            CEIL,
            FLOOR,
        );
        // screen rows sit at span offsets 2..6 of 8
        assert_eq!(fb.column(0), vec![0, 1, 1, 2]);
    }

    #[test]
    fn missing_code_uses_fallback_material() {
        let palette = Palette::default();
        let p = Projection { code: None, ..proj(0.0, 1.0, Shade::Lit) };
        match Fill::for_projection(&p, &palette, false) {
            Fill::Flat(c) => assert_eq!(c, Palette::GREY),
            other => panic!("unexpected {other:?}"),
        }
    }
}
