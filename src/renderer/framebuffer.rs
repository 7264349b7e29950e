use super::Rgba;

/// Row-major full-frame pixel buffer.
///
/// Allocated once per resolution and overwritten every frame.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// (Re)allocate only when the resolution changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, 0);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn fill(&mut self, c: Rgba) {
        self.pixels.fill(c);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: Rgba) {
        self.pixels[y * self.width + x] = c;
    }

    /// Copy of column `x`, top to bottom.
    pub fn column(&self, x: usize) -> Vec<Rgba> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_allocation_for_same_size() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set(3, 2, 7);
        fb.resize(4, 3);
        assert_eq!(fb.get(3, 2), 7);
        fb.resize(2, 2);
        assert_eq!(fb.pixels().len(), 4);
    }

    #[test]
    fn column_reads_top_to_bottom() {
        let mut fb = FrameBuffer::new(2, 3);
        for y in 0..3 {
            fb.set(1, y, y as Rgba);
        }
        assert_eq!(fb.column(1), vec![0, 1, 2]);
    }
}
