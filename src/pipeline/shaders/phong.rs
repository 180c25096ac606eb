use crate::core::color::{ColorSample, max_to_one};
use crate::core::geometry::Fragment;
use crate::core::pipeline::{FrameConfig, PixelShader, ShadingMode};
use crate::scene::material::Material;
use crate::scene::texture::Texture;
use nalgebra::{Matrix3, Vector2, Vector3};
use std::f32::consts::PI;

/// Radiant intensity of the single directional light.
pub const LIGHT_INTENSITY: f32 = 7.0;
/// Base Phong exponent, scaled per pixel by the glossiness map's red channel.
pub const SPECULAR_SHININESS: f32 = 25.0;
/// Constant term added to every shading mode.
pub const AMBIENT: f32 = 0.025;

/// Direction the light travels in world space. Intentionally left unnormalized.
pub fn light_direction() -> Vector3<f32> {
    Vector3::new(0.577, -0.577, 0.577)
}

/// Mirrors `direction` about `normal`.
#[inline]
fn reflect(direction: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    direction - normal * (2.0 * direction.dot(&normal))
}

#[inline]
fn sample_or(texture: Option<&Texture>, uv: Vector2<f32>, fallback: ColorSample) -> ColorSample {
    texture.map_or(fallback, |t| t.sample(uv))
}

/// Textured Phong shading for one mesh under the fixed directional light.
///
/// Missing maps fall back to white diffuse, black specular and a glossiness of
/// one; a missing normal map leaves the interpolated normal untouched.
pub struct PhongShader<'a> {
    pub material: &'a Material,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
}

impl<'a> PhongShader<'a> {
    pub fn new(material: &'a Material, config: &FrameConfig) -> Self {
        Self {
            material,
            shading_mode: config.shading_mode,
            use_normal_map: config.use_normal_map,
        }
    }

    /// Replaces the geometric normal with the tangent-space normal map sample.
    fn surface_normal(&self, fragment: &Fragment) -> Vector3<f32> {
        let normal_map = match (self.use_normal_map, self.material.normal.as_ref()) {
            (true, Some(map)) => map,
            _ => return fragment.normal,
        };

        let bitangent = fragment.normal.cross(&fragment.tangent);
        let tangent_space = Matrix3::from_columns(&[fragment.tangent, bitangent, fragment.normal]);

        let sampled = normal_map.sample(fragment.uv) * 2.0 - Vector3::repeat(1.0);
        let mapped = tangent_space * sampled;
        mapped.try_normalize(f32::EPSILON).unwrap_or(fragment.normal)
    }
}

impl PixelShader for PhongShader<'_> {
    fn shade(&self, fragment: &Fragment) -> ColorSample {
        let uv = fragment.uv;
        let light = light_direction();
        let normal = self.surface_normal(fragment);

        let observed_area = normal.dot(&-light).max(0.0);

        let diffuse = sample_or(self.material.diffuse.as_ref(), uv, Vector3::repeat(1.0)) / PI;

        let cos_alpha = reflect(-light, normal)
            .dot(&fragment.view_direction)
            .max(0.0);
        let gloss = sample_or(self.material.glossiness.as_ref(), uv, Vector3::repeat(1.0));
        let specular_color = sample_or(self.material.specular.as_ref(), uv, Vector3::zeros());
        let specular = specular_color * cos_alpha.powf(SPECULAR_SHININESS * gloss.x);

        let color = match self.shading_mode {
            ShadingMode::ObservedArea => Vector3::repeat(observed_area),
            ShadingMode::Diffuse => diffuse * LIGHT_INTENSITY,
            ShadingMode::Specular => specular,
            ShadingMode::Combined => (diffuse * LIGHT_INTENSITY + specular) * observed_area,
        };

        max_to_one(color + Vector3::repeat(AMBIENT))
    }
}
