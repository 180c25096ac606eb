use crate::core::color::ColorSample;
use nalgebra::Vector3;

/// The color and depth targets the rasterizer writes into.
///
/// Both buffers are row-major, one cell per pixel. Contents are frame-scoped:
/// [`FrameBuffer::clear`] must run before every frame.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub color_buffer: Vec<ColorSample>,
    /// Cleared to `f32::INFINITY`; only ever decreases within a frame.
    pub depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Vector3::zeros(); size],
            depth_buffer: vec![f32::INFINITY; size],
        }
    }

    /// Fills the color buffer with `color` and resets every depth cell.
    pub fn clear(&mut self, color: ColorSample) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(f32::INFINITY);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update.
    ///
    /// Returns true and stores `new_depth` only if it is strictly nearer than
    /// the stored value, so the first fragment at a given depth wins ties.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        if new_depth.is_nan() || new_depth >= self.depth_buffer[idx] {
            return false;
        }
        self.depth_buffer[idx] = new_depth;
        true
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: ColorSample) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<ColorSample> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_has_unreachable_depth() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.depth_buffer.len(), 12);
        assert!(fb.depth_buffer.iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn depth_test_accepts_only_strictly_nearer() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(1, 1, 0.8));
        assert!(!fb.depth_test_and_update(1, 1, 0.8));
        assert!(!fb.depth_test_and_update(1, 1, 0.9));
        assert!(fb.depth_test_and_update(1, 1, 0.5));
        assert_eq!(fb.get_depth(1, 1), Some(0.5));
        assert!(!fb.depth_test_and_update(1, 1, f32::NAN));
    }

    #[test]
    fn clear_resets_both_targets() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.depth_test_and_update(0, 0, 0.3);
        fb.set_pixel(0, 0, Vector3::new(1.0, 0.0, 0.0));
        fb.clear(Vector3::repeat(0.1));
        assert_eq!(fb.get_pixel(0, 0), Some(Vector3::repeat(0.1)));
        assert_eq!(fb.get_depth(0, 0), Some(f32::INFINITY));
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(5, 0, Vector3::repeat(1.0));
        assert!(!fb.depth_test_and_update(0, 9, 0.1));
        assert_eq!(fb.get_pixel(2, 0), None);
    }
}
