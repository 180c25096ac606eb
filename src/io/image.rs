use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Saves a packed `0xAARRGGBB` buffer as an RGB image; the format follows the
/// file extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), String> {
    let path = path.as_ref();
    if buffer.len() != width * height {
        return Err(format!(
            "Buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let color = buffer[y as usize * width + x as usize];
        Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
    });

    img_buf
        .save(path)
        .map_err(|e| format!("Failed to save image to '{}': {}", path.display(), e))?;
    info!("Saved {}x{} frame to '{}'", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_png_matches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let buffer = [0xFFFF_0000, 0xFF00_FF00, 0xFF00_00FF, 0xFF63_6363];

        save_buffer_to_image(&buffer, 2, 2, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(1, 1).0, [0x63, 0x63, 0x63]);
    }

    #[test]
    fn mismatched_buffer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_buffer_to_image(&[0; 3], 2, 2, dir.path().join("bad.png"));
        assert!(result.is_err());
    }
}
