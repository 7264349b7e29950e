use std::time::Duration;

use rayon::prelude::*;

use crate::{
    engine::{
        intersect::Marcher,
        projection::Lens,
        rays,
        strips::{Fill, draw_strip},
        types::{CastConfig, CastMode, CastStage, Projection, RayPair, RenderFlags, Screen},
    },
    math::RotationBlock,
    renderer::{FrameBuffer, Renderer, RendererExt},
    world::{GridWorld, Palette, Viewer},
};

/// Background shown behind partially painted frames in slow mode.
const SLOW_BACKGROUND: u32 = 0xFF_FFFFFF;

/// Turning direction for [`RaycastContext::rotation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// Everything the caster keeps between frames.
///
/// * `dist_from_viewplane` and the rotation blocks are derived once from
///   the configuration.
/// * `rays`, `projections` and `frame` are overwritten every frame, never
///   reallocated unless the screen size changes.
pub struct RaycastContext {
    config: CastConfig,
    dist_from_viewplane: f32,
    turn_left: RotationBlock,
    turn_right: RotationBlock,
    rays: Vec<RayPair>,
    projections: Vec<Projection>,
    frame: FrameBuffer,
}

impl RaycastContext {
    pub fn new(config: CastConfig) -> Self {
        let screen = config.screen;
        let mut ctx = Self {
            config,
            dist_from_viewplane: 0.0,
            turn_left: RotationBlock::new(-config.rot_speed),
            turn_right: RotationBlock::new(config.rot_speed),
            rays: vec![RayPair::default(); screen.w],
            projections: Vec::with_capacity(screen.w),
            frame: FrameBuffer::new(screen.w, screen.h),
        };
        ctx.update_viewplane();
        log::info!(
            "raycaster ready: {}x{} columns, fov {:.1}°, viewplane at {:.2}",
            screen.w,
            screen.h,
            config.fov.to_degrees(),
            ctx.dist_from_viewplane
        );
        ctx
    }

    /// ```text
    /// dist = (w / 2) / tan(fov / 2)
    /// ```
    fn update_viewplane(&mut self) {
        self.dist_from_viewplane = self.config.screen.half_w / (self.config.fov * 0.5).tan();
    }

    /*──────────────────────── accessors ─────────────────────────────*/

    #[inline]
    pub fn config(&self) -> &CastConfig {
        &self.config
    }

    #[inline]
    pub fn dist_from_viewplane(&self) -> f32 {
        self.dist_from_viewplane
    }

    /// Per-column rays of the last frame, left to right.
    #[inline]
    pub fn rays(&self) -> &[RayPair] {
        &self.rays
    }

    /// Per-column wall spans of the last full cast.
    #[inline]
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Rotation applied for one tick of turning. `y` grows downward on
    /// the map, so a positive angle turns right.
    pub fn rotation(&self, turn: Turn) -> &RotationBlock {
        match turn {
            Turn::Left => &self.turn_left,
            Turn::Right => &self.turn_right,
        }
    }

    /*──────────────────────── configuration ─────────────────────────*/

    pub fn set_mode(&mut self, mode: CastMode) {
        if mode != self.config.mode {
            log::debug!("cast mode {:?} -> {:?}", self.config.mode, mode);
            self.config.mode = mode;
        }
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.config.fov = fov;
        self.update_viewplane();
        log::debug!(
            "fov {:.1}°, viewplane at {:.2}",
            fov.to_degrees(),
            self.dist_from_viewplane
        );
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if screen == self.config.screen {
            return;
        }
        self.config.screen = screen;
        self.rays.resize(screen.w, RayPair::default());
        self.frame.resize(screen.w, screen.h);
        self.update_viewplane();
        log::debug!("screen resized to {}x{}", screen.w, screen.h);
    }

    pub fn toggle(&mut self, flag: RenderFlags) {
        self.config.flags.toggle(flag);
        log::debug!("render flags now {:?}", self.config.flags);
    }

    /// Present the next full frame column by column. One-shot.
    pub fn request_slow_frame(&mut self) {
        self.config.flags.insert(RenderFlags::SLOW);
    }

    #[inline]
    fn parallel(&self) -> bool {
        let f = self.config.flags;
        f.contains(RenderFlags::PARALLEL) && !f.contains(RenderFlags::SLOW)
    }

    /*──────────────────────── pipeline ──────────────────────────────*/

    /// Run the ray stages for the configured mode and return the stage
    /// reached. Overwrites [`rays`](Self::rays).
    ///
    /// * `RaysOnly` – unit directions stretched to the debug length.
    /// * `FirstHit` – plus extension to the nearest grid line.
    /// * `Full` – plus grid traversal to the first wall.
    pub fn cast(&mut self, viewer: &Viewer, grid: &GridWorld) -> CastStage {
        let cfg = self.config;
        rays::generate(
            &mut self.rays,
            viewer,
            self.dist_from_viewplane,
            cfg.mode,
            cfg.debug_ray_len,
        );
        if cfg.mode == CastMode::RaysOnly {
            return CastStage::RaysOnly;
        }

        let marcher = Marcher::new(grid, viewer.pos, cfg.eps, cfg.min_denom);
        for pair in self.rays.iter_mut() {
            *pair = marcher.extend_pair(*pair);
        }
        if cfg.mode == CastMode::FirstHit {
            return CastStage::RaysWithFirstHit;
        }

        if self.parallel() {
            self.rays
                .par_iter_mut()
                .for_each(|pair| *pair = marcher.march_pair(*pair));
        } else {
            for pair in self.rays.iter_mut() {
                *pair = marcher.march_pair(*pair);
            }
        }
        CastStage::FullCast
    }

    /// Turn the cast rays into one wall span per column.
    fn project(&mut self, viewer: &Viewer, grid: &GridWorld, tex_size: usize) {
        let cfg = self.config;
        let marcher = Marcher::new(grid, viewer.pos, cfg.eps, cfg.min_denom);
        let mut lens = Lens::new(
            &cfg.screen,
            self.dist_from_viewplane,
            grid.cell_size(),
            tex_size,
            viewer.plane,
        );
        lens.distortion = cfg.flags.contains(RenderFlags::DISTORTION);
        lens.min_len = cfg.min_denom;

        if self.parallel() {
            self.rays
                .par_iter()
                .map(|pair| lens.project(&marcher.resolve(pair)))
                .collect_into_vec(&mut self.projections);
        } else {
            self.projections.clear();
            self.projections
                .extend(self.rays.iter().map(|pair| lens.project(&marcher.resolve(pair))));
        }
    }

    /// Cast, project and paint one frame, then hand it to `renderer`.
    ///
    /// Stops after the ray stage in `RaysOnly`/`FirstHit` modes, leaving
    /// the frame buffer untouched. With [`RenderFlags::SLOW`] set, every
    /// column is presented as soon as it is painted and the flag is
    /// cleared afterwards.
    pub fn render_frame<R: Renderer + ?Sized>(
        &mut self,
        viewer: &Viewer,
        grid: &GridWorld,
        palette: &Palette,
        renderer: &mut R,
    ) -> CastStage {
        let stage = self.cast(viewer, grid);
        log::trace!("cast stopped at {stage:?}");
        if stage != CastStage::FullCast {
            return stage;
        }

        self.project(viewer, grid, palette.texture_size());

        let slow = self.config.flags.contains(RenderFlags::SLOW);
        let textured = self.config.flags.contains(RenderFlags::TEXTURED);
        let pause = Duration::from_millis(self.config.slow_pause_ms);

        if slow {
            self.frame.fill(SLOW_BACKGROUND);
        }

        for (x, proj) in self.projections.iter().enumerate() {
            let fill = Fill::for_projection(proj, palette, textured);
            draw_strip(&mut self.frame, x, proj, fill, palette.ceiling, palette.floor);
            if slow {
                renderer.show(&self.frame);
                renderer.pause(pause);
            }
        }

        if slow {
            self.config.flags.remove(RenderFlags::SLOW);
            log::debug!("slow frame finished");
        }

        renderer.show(&self.frame);
        stage
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Family, Shade};
    use glam::{Vec2, vec2};

    /// Counts calls instead of drawing.
    #[derive(Default)]
    struct Recorder {
        clears: usize,
        blits: usize,
        presents: usize,
        pauses: Vec<Duration>,
    }

    impl Renderer for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn blit(&mut self, _frame: &FrameBuffer) {
            self.blits += 1;
        }
        fn present(&mut self) {
            self.presents += 1;
        }
        fn pause(&mut self, dur: Duration) {
            self.pauses.push(dur);
        }
    }

    const CELL: f32 = 64.0;

    fn setup(w: usize, h: usize) -> (RaycastContext, GridWorld, Palette) {
        let cfg = CastConfig {
            screen: Screen::new(w, h),
            fov: 90_f32.to_radians(),
            ..CastConfig::default()
        };
        (
            RaycastContext::new(cfg),
            GridWorld::bordered_room(8, 8, CELL, 1).unwrap(),
            Palette::default(),
        )
    }

    #[test]
    fn viewplane_distance_from_fov() {
        let (ctx, ..) = setup(640, 480);
        assert!((ctx.dist_from_viewplane() - 320.0).abs() < 1e-2);
    }

    #[test]
    fn fov_change_moves_viewplane() {
        let (mut ctx, grid, palette) = setup(640, 480);
        ctx.set_fov(60_f32.to_radians());
        assert!((ctx.dist_from_viewplane() - 320.0 / 30_f32.to_radians().tan()).abs() < 1e-2);

        // narrower view, walls drawn taller
        let viewer = Viewer::new(vec2(224.0, 224.0), Vec2::X);
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        let wide = ctx.projections()[320].height;
        ctx.set_fov(30_f32.to_radians());
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        assert!(ctx.projections()[320].height > wide);
    }

    #[test]
    fn room_centre_facing_wall() {
        let (mut ctx, grid, palette) = setup(101, 80);
        // interior spans 64..448; centre of tile (3,3) is 224 from the east wall
        let viewer = Viewer::new(vec2(224.0, 224.0), Vec2::X);
        let stage = ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        assert_eq!(stage, CastStage::FullCast);

        let centre = ctx.rays()[50].nearest();
        assert_eq!(centre.family, Family::Vertical);
        assert!((centre.length() - 224.0).abs() < 1e-2);

        let proj = ctx.projections()[50];
        let expected = ctx.dist_from_viewplane() * CELL / 224.0;
        assert!((proj.height - expected).abs() < 1e-2);
        assert_eq!(proj.shade, Shade::Dark);
    }

    #[test]
    fn facing_along_grid_line_still_hits() {
        let (mut ctx, grid, palette) = setup(101, 80);
        let viewer = Viewer::new(vec2(256.0, 256.0), Vec2::X);
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        let p = ctx.projections()[50];
        assert_eq!(p.code, Some(1));
        assert!(p.height.is_finite() && p.height > 0.0);
    }

    #[test]
    fn straight_wall_renders_straight_without_fisheye() {
        let (mut ctx, grid, palette) = setup(61, 80);
        let viewer = Viewer::new(vec2(224.0, 224.0), Vec2::X);
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        // centre columns all see the flat east wall at the same depth
        let hs: Vec<f32> = ctx.projections()[25..36].iter().map(|p| p.height).collect();
        for h in &hs {
            assert!((h - hs[5]).abs() < 0.5, "{hs:?}");
        }

        ctx.toggle(RenderFlags::DISTORTION);
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        let bowed = ctx.projections();
        assert!(bowed[25].height < bowed[30].height);
    }

    #[test]
    fn early_modes_leave_frame_untouched() {
        let (mut ctx, grid, palette) = setup(32, 24);
        let viewer = Viewer::new(vec2(200.0, 200.0), vec2(0.3, 0.7));
        let mut rec = Recorder::default();

        ctx.set_mode(CastMode::RaysOnly);
        assert_eq!(ctx.render_frame(&viewer, &grid, &palette, &mut rec), CastStage::RaysOnly);
        assert!(ctx.rays().iter().all(|p| (p.vertical.length() - 40.0).abs() < 1e-3));

        ctx.set_mode(CastMode::FirstHit);
        assert_eq!(
            ctx.render_frame(&viewer, &grid, &palette, &mut rec),
            CastStage::RaysWithFirstHit
        );
        // vertical rays now end on an x grid line
        for p in ctx.rays() {
            let x = (viewer.pos + p.vertical.v()).x.rem_euclid(CELL);
            assert!(x.min(CELL - x) < 1e-2, "{x}");
        }

        assert!(ctx.frame().pixels().iter().all(|&c| c == 0));
        assert_eq!(rec.presents, 0);
    }

    #[test]
    fn slow_mode_presents_every_column_once() {
        let (mut ctx, grid, palette) = setup(16, 12);
        let viewer = Viewer::new(vec2(224.0, 224.0), Vec2::Y);
        let mut rec = Recorder::default();

        ctx.request_slow_frame();
        ctx.render_frame(&viewer, &grid, &palette, &mut rec);
        assert_eq!(rec.presents, 16 + 1);
        assert_eq!(rec.blits, 16 + 1);
        assert_eq!(rec.pauses, vec![Duration::from_millis(2); 16]);
        assert!(!ctx.config().flags.contains(RenderFlags::SLOW));

        let mut rec = Recorder::default();
        ctx.render_frame(&viewer, &grid, &palette, &mut rec);
        assert_eq!((rec.clears, rec.presents), (1, 1));
        assert!(rec.pauses.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let (mut seq, _, palette) = setup(97, 60);
        let grid = GridWorld::parse(crate::world::DEFAULT_MAP, CELL).unwrap();
        let viewer = Viewer::new(vec2(150.0, 140.0), vec2(0.9, 0.35));
        seq.render_frame(&viewer, &grid, &palette, &mut Recorder::default());

        let (mut par, ..) = setup(97, 60);
        par.toggle(RenderFlags::PARALLEL);
        par.render_frame(&viewer, &grid, &palette, &mut Recorder::default());

        assert_eq!(seq.rays(), par.rays());
        assert_eq!(seq.projections(), par.projections());
        assert_eq!(seq.frame().pixels(), par.frame().pixels());
    }

    #[test]
    fn every_pixel_is_painted() {
        let (mut ctx, grid, palette) = setup(40, 30);
        let viewer = Viewer::new(vec2(100.0, 300.0), vec2(1.0, -0.4));
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        assert!(ctx.frame().pixels().iter().all(|&c| c != 0));
        assert_eq!(ctx.frame().get(0, 0), palette.ceiling);
        assert_eq!(ctx.frame().get(0, 29), palette.floor);
    }

    #[test]
    fn resize_reuses_buffers() {
        let (mut ctx, grid, palette) = setup(20, 10);
        ctx.set_screen(Screen::new(30, 12));
        assert_eq!(ctx.rays().len(), 30);
        let viewer = Viewer::new(vec2(224.0, 224.0), Vec2::X);
        ctx.render_frame(&viewer, &grid, &palette, &mut Recorder::default());
        assert_eq!(ctx.projections().len(), 30);
        assert_eq!(ctx.frame().width(), 30);
    }

    #[test]
    fn rotation_blocks_are_inverse() {
        let (ctx, ..) = setup(8, 8);
        let v = vec2(0.6, 0.8);
        let back = ctx.rotation(Turn::Left).apply(ctx.rotation(Turn::Right).apply(v));
        assert!((back - v).length() < 1e-5);
        // positive angle on a y-down map: east turns towards south
        assert!(ctx.rotation(Turn::Right).apply(Vec2::X).y > 0.0);
    }
}
