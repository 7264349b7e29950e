//! Interactive first-person viewer for grid maps.
//!
//! Controls  W/S ↑/↓ = move  A/D ←/→ = turn  M = cycle cast mode
//!           T = textures  F = fisheye  V = slow frame  P = parallel  Esc = quit
//!
//! ```bash
//! GRIDCASTER_LOG=debug cargo run --release -- --map maps/room.txt
//! ```

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gridcaster::{
    engine::{
        CastConfig, CastMode, CastStage, Family, RayPair, RaycastContext, RenderFlags, Screen,
        Turn,
    },
    renderer::{FrameBuffer, Renderer, RendererExt, Rgba, darken},
    world::{DEFAULT_MAP, EMPTY, GridWorld, Palette, Viewer},
};

const MOVE_SPEED: f32 = 4.0;

const OVERHEAD_BG: Rgba = 0xFF_000000;
const VERTICAL_RAY: Rgba = 0xFF_FFD040;
const HORIZONTAL_RAY: Rgba = 0xFF_40D0FF;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Text map (one row per line, `0`/`.` open, `1`-`9` walls)
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Horizontal field of view in degrees, strictly between 0 and 180
    #[arg(long, default_value_t = 60.0, value_parser = parse_fov)]
    fov: f32,

    /// Side of one grid cell in world units
    #[arg(long, default_value_t = 64.0)]
    cell: f32,

    /// Side of the generated wall textures in pixels
    #[arg(long, default_value_t = 64)]
    texture_size: usize,

    #[arg(long, value_enum, default_value_t = ModeArg::Full)]
    mode: ModeArg,

    /// Flat-coloured walls instead of textures
    #[arg(long)]
    flat: bool,

    /// Keep the fisheye distortion
    #[arg(long)]
    distortion: bool,

    /// Cast columns on all cores
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Rays,
    FirstHit,
    Full,
}

impl From<ModeArg> for CastMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Rays => CastMode::RaysOnly,
            ModeArg::FirstHit => CastMode::FirstHit,
            ModeArg::Full => CastMode::Full,
        }
    }
}

fn parse_fov(s: &str) -> Result<f32, String> {
    let deg: f32 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if deg > 0.0 && deg < 180.0 {
        Ok(deg)
    } else {
        Err(format!("{deg} is outside (0, 180)"))
    }
}

impl Opts {
    fn cast_config(&self) -> CastConfig {
        let mut flags = RenderFlags::empty();
        flags.set(RenderFlags::TEXTURED, !self.flat);
        flags.set(RenderFlags::DISTORTION, self.distortion);
        flags.set(RenderFlags::PARALLEL, self.parallel);
        CastConfig {
            screen: Screen::new(self.width, self.height),
            fov: self.fov.to_radians(),
            mode: self.mode.into(),
            flags,
            ..CastConfig::default()
        }
    }
}

/// `Renderer` backed by a minifb window.
struct WindowRenderer {
    win: Window,
    staging: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Renderer for WindowRenderer {
    fn clear(&mut self) {
        self.staging.fill(0);
    }

    fn blit(&mut self, frame: &FrameBuffer) {
        self.width = frame.width();
        self.height = frame.height();
        self.staging.clear();
        self.staging.extend_from_slice(frame.pixels());
    }

    fn present(&mut self) {
        if let Err(err) = self
            .win
            .update_with_buffer(&self.staging, self.width, self.height)
        {
            log::warn!("present failed: {err}");
        }
    }
}

/// Centre of the first open cell in reading order.
fn spawn_point(grid: &GridWorld) -> Option<Vec2> {
    (0..grid.height() as i32)
        .flat_map(|y| (0..grid.width() as i32).map(move |x| glam::ivec2(x, y)))
        .find(|&t| grid.cell(t) == Some(EMPTY))
        .map(|t| grid.tile_center(t))
}

/// Top-down map with the current ray buffer on top, for the modes that
/// stop before any wall is projected.
fn draw_overhead(
    fb: &mut FrameBuffer,
    grid: &GridWorld,
    palette: &Palette,
    viewer: &Viewer,
    rays: &[RayPair],
) {
    let (w, h) = (fb.width(), fb.height());
    let extent = grid.extent();
    let scale = (w as f32 / extent.x).min(h as f32 / extent.y);

    fb.fill(OVERHEAD_BG);
    for py in 0..h {
        for px in 0..w {
            let world = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) / scale;
            if let Some(code) = grid.cell(grid.tile_at(world)).filter(|&c| c != EMPTY) {
                fb.set(px, py, darken(palette.color(code)));
            }
        }
    }

    // rays that never meet a grid line are clipped to the map diagonal
    let max_len = extent.length();
    for pair in rays {
        for ray in [pair.vertical, pair.horizontal] {
            let color = match ray.family {
                Family::Vertical => VERTICAL_RAY,
                Family::Horizontal => HORIZONTAL_RAY,
            };
            let end = ray.dir * ray.len.min(max_len);
            let samples = (end.length() * scale).ceil().max(1.0) as usize;
            for i in 0..=samples {
                let p = (viewer.pos + end * (i as f32 / samples as f32)) * scale;
                if p.x >= 0.0 && p.y >= 0.0 && (p.x as usize) < w && (p.y as usize) < h {
                    fb.set(p.x as usize, p.y as usize, color);
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCASTER_LOG");
    let opts = Opts::parse();

    // ─────────── load map ───────────
    let src = match &opts.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?,
        None => DEFAULT_MAP.to_owned(),
    };
    let grid = GridWorld::parse(&src, opts.cell).context("parsing map")?;
    log::info!("map {}x{} cells of {}", grid.width(), grid.height(), grid.cell_size());

    let start = spawn_point(&grid).context("map has no open cell to start in")?;
    let mut viewer = Viewer::new(start, Vec2::X);

    let palette = Palette::procedural(opts.texture_size);
    let mut ctx = RaycastContext::new(opts.cast_config());
    let mut overhead = FrameBuffer::new(opts.width, opts.height);
    let mut last_stage = None;

    // ─────────── window ───────────
    let mut win = Window::new(
        "gridcaster",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);
    let mut out = WindowRenderer {
        win,
        staging: vec![0; opts.width * opts.height],
        width: opts.width,
        height: opts.height,
    };

    while out.win.is_open() && !out.win.is_key_down(Key::Escape) {
        /* turning & movement -------------------------------------------- */
        let win = &out.win;
        if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
            viewer.rotate(ctx.rotation(Turn::Left));
        }
        if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
            viewer.rotate(ctx.rotation(Turn::Right));
        }
        let mut forward = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += MOVE_SPEED;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= MOVE_SPEED;
        }
        if forward != 0.0 {
            let next = viewer.ahead(forward);
            if grid.is_open(next) {
                viewer.pos = next;
            }
        }

        /* toggles -------------------------------------------------------- */
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            ctx.set_mode(ctx.config().mode.cycle());
        }
        if win.is_key_pressed(Key::T, KeyRepeat::No) {
            ctx.toggle(RenderFlags::TEXTURED);
        }
        if win.is_key_pressed(Key::F, KeyRepeat::No) {
            ctx.toggle(RenderFlags::DISTORTION);
        }
        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            ctx.toggle(RenderFlags::PARALLEL);
        }
        if win.is_key_pressed(Key::V, KeyRepeat::No) {
            ctx.request_slow_frame();
        }

        /* draw ----------------------------------------------------------- */
        let stage = ctx.render_frame(&viewer, &grid, &palette, &mut out);
        if last_stage != Some(stage) {
            log::info!("showing {stage:?}");
            last_stage = Some(stage);
        }
        if stage != CastStage::FullCast {
            draw_overhead(&mut overhead, &grid, &palette, &viewer, ctx.rays());
            out.show(&overhead);
        }
    }
    Ok(())
}

/*──────────────────────────────── Tests ───────────────────────────────*/
