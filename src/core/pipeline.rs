use crate::core::color::ColorSample;
use crate::core::geometry::Fragment;
use crate::core::rasterizer::{CullMode, Visualize};
use nalgebra::Vector3;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage.
/// - Add + Mul<f32>: support the weighted sum used by barycentric interpolation.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Interpolatable for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// Pixel stage of the pipeline.
///
/// The rasterizer is generic over this trait, so shading is statically
/// dispatched per draw call.
pub trait PixelShader {
    /// Computes the color of one covered, depth-accepted pixel.
    fn shade(&self, fragment: &Fragment) -> ColorSample;
}

/// Lighting term the pixel shader outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Grayscale cosine between normal and light.
    ObservedArea,
    /// Lambert diffuse scaled by light intensity.
    Diffuse,
    /// Phong specular only.
    Specular,
    /// Everything, weighted by the observed area.
    Combined,
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        }
    }
}

impl FromStr for ShadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "observed_area" => Ok(ShadingMode::ObservedArea),
            "diffuse" => Ok(ShadingMode::Diffuse),
            "specular" => Ok(ShadingMode::Specular),
            "combined" => Ok(ShadingMode::Combined),
            other => Err(format!("Unknown shading mode '{}'", other)),
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShadingMode::ObservedArea => "observed area",
            ShadingMode::Diffuse => "diffuse",
            ShadingMode::Specular => "specular",
            ShadingMode::Combined => "combined",
        };
        f.write_str(name)
    }
}

/// Immutable per-frame snapshot of every switch the rasterizer and pixel
/// shader read. Built once before a frame and never changed during it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub cull_mode: CullMode,
    pub shading_mode: ShadingMode,
    pub visualize: Visualize,
    pub use_normal_map: bool,
    /// Fraction of the depth range (counted back from 1.0) stretched over the
    /// full gray ramp in depth-buffer visualization.
    pub depth_remap_percentile: f32,
    pub clear_color: ColorSample,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            shading_mode: ShadingMode::Combined,
            visualize: Visualize::FinalColor,
            use_normal_map: true,
            depth_remap_percentile: 0.005,
            clear_color: Vector3::repeat(0.39),
        }
    }
}
