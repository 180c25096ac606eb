use crate::core::color::to_argb;
use crate::core::framebuffer::FrameBuffer;
use rayon::prelude::*;

/// Packs the color buffer into `0xAARRGGBB` words, one row per rayon task.
///
/// `buffer` must hold exactly `width * height` pixels.
pub fn pack_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32]) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .zip(framebuffer.color_buffer.par_chunks(framebuffer.width))
        .for_each(|(row, colors)| {
            for (pixel, color) in row.iter_mut().zip(colors) {
                *pixel = to_argb(*color);
            }
        });
}

/// Allocating variant of [`pack_to_buffer`].
pub fn pack_framebuffer(framebuffer: &FrameBuffer) -> Vec<u32> {
    let mut buffer = vec![0; framebuffer.width * framebuffer.height];
    pack_to_buffer(framebuffer, &mut buffer);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn packs_every_pixel_in_row_major_order() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.clear(Vector3::zeros());
        fb.set_pixel(2, 0, Vector3::new(1.0, 0.0, 0.0));
        fb.set_pixel(0, 1, Vector3::new(0.0, 0.5, 1.0));

        let packed = pack_framebuffer(&fb);
        assert_eq!(packed.len(), 6);
        assert_eq!(packed[0], 0xFF00_0000);
        assert_eq!(packed[2], 0xFFFF_0000);
        assert_eq!(packed[3], 0xFF00_7FFF);
    }
}
