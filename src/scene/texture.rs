use crate::core::color::ColorSample;
use image::RgbaImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// A decoded 2D texture map, stored as row-major RGBA8.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?
            .to_rgba8();

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref,
            img.width(),
            img.height()
        );

        Ok(Self::from_image(img))
    }

    /// Wraps an already-decoded RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        let img = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            format!(
                "Texture buffer of {} bytes does not match {}x{} RGBA ({} bytes)",
                actual, width, height, expected
            )
        })?;
        Ok(Self::from_image(img))
    }

    fn from_image(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Nearest-neighbor lookup: texel `(floor(u * width), floor(v * height))`.
    ///
    /// No wrapping or clamping. `uv` must lie in [0, 1]; `u == 1.0` reads the
    /// first texel of the next row, and anything that lands past the end of the
    /// buffer panics.
    pub fn sample(&self, uv: Vector2<f32>) -> ColorSample {
        let x = (uv.x * self.width as f32).floor() as usize;
        let y = (uv.y * self.height as f32).floor() as usize;
        let idx = (x + y * self.width as usize) * 4;

        let texel = &self.image.as_raw()[idx..idx + 3];
        Vector3::new(
            texel[0] as f32 / 255.0,
            texel[1] as f32 / 255.0,
            texel[2] as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 texture with a distinct red value per texel: (0,0)=0, (1,0)=85, (0,1)=170, (1,1)=255.
    fn quadrant_texture() -> Texture {
        let pixels = vec![
            0, 0, 0, 255, 85, 0, 0, 255, //
            170, 0, 0, 255, 255, 0, 0, 255,
        ];
        Texture::from_rgba(2, 2, pixels).unwrap()
    }

    #[test]
    fn nearest_texel_is_selected() {
        let tex = quadrant_texture();
        assert_eq!(tex.sample(Vector2::new(0.1, 0.1)), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(0.9, 0.9)), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(
            tex.sample(Vector2::new(0.9, 0.1)),
            Vector3::new(85.0 / 255.0, 0.0, 0.0)
        );
    }

    #[test]
    fn channels_are_normalized_by_255() {
        let tex = Texture::from_rgba(1, 1, vec![255, 51, 102, 255]).unwrap();
        let c = tex.sample(Vector2::new(0.5, 0.5));
        assert!((c - Vector3::new(1.0, 0.2, 0.4)).amax() < 1e-6);
    }

    #[test]
    fn u_of_one_spills_into_next_row() {
        // Not clamped: u == 1.0 on row 0 lands on texel (0, 1).
        let tex = quadrant_texture();
        assert_eq!(
            tex.sample(Vector2::new(1.0, 0.0)),
            Vector3::new(170.0 / 255.0, 0.0, 0.0)
        );
    }

    #[test]
    #[should_panic]
    fn sampling_past_the_buffer_is_a_precondition_violation() {
        let tex = quadrant_texture();
        tex.sample(Vector2::new(1.0, 1.0));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        assert!(Texture::from_rgba(2, 2, vec![0; 15]).is_err());
    }
}
