//! Presentation abstraction layer.
//!
//! *The caster never talks to a window.* It paints a [`FrameBuffer`] and
//! hands it to a type implementing [`Renderer`], which owns the device.
//!
//! * Window back-ends (minifb, SDL, …) live with the application.
//! * Tests plug in a recording double to observe presentation order.

mod framebuffer;

pub use framebuffer::FrameBuffer;

use std::time::Duration;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Halve every colour channel, keep alpha.
#[inline]
pub fn darken(c: Rgba) -> Rgba {
    (c & 0xFF_000000) | ((c >> 1) & 0x00_7F7F7F)
}

/// Drawing collaborator supplied by the application.
pub trait Renderer {
    /// Wipe whatever is currently on the output surface.
    fn clear(&mut self);

    /// Copy a full-screen buffer onto the output surface.
    fn blit(&mut self, frame: &FrameBuffer);

    /// Make everything drawn so far visible.
    fn present(&mut self);

    /// Visualisation pacing between partial presents.
    fn pause(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Convenience blanket-impl: clear, blit and present in one call.
pub trait RendererExt: Renderer {
    fn show(&mut self, frame: &FrameBuffer) {
        self.clear();
        self.blit(frame);
        self.present();
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darken_halves_channels() {
        assert_eq!(darken(0xFF_FF8040), 0xFF_7F4020);
        assert_eq!(darken(0x00_000001), 0);
    }
}
