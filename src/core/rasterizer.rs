use crate::core::color::max_to_one;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{Fragment, TransformedVertex};
use crate::core::math::interpolation::{
    EdgeValues, FaceHit, interpolate_reciprocal, perspective_interpolate, signed_area_x2,
};
use crate::core::math::transform::ndc_to_screen;
use crate::core::pipeline::{FrameConfig, PixelShader};
use nalgebra::{Point2, Vector3};
use std::fmt;
use std::str::FromStr;

/// Triangles whose doubled screen area is at or below this are skipped.
const AREA_EPSILON: f32 = 0.01;

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum CullMode {
    None,
    Back,
    Front,
}

impl CullMode {
    pub fn next(self) -> Self {
        match self {
            CullMode::None => CullMode::Back,
            CullMode::Back => CullMode::Front,
            CullMode::Front => CullMode::None,
        }
    }

    /// `Back` and `None` keep front-face hits, `Front` keeps back-face hits.
    /// Back-face hits are therefore never drawn with `None`.
    #[inline]
    pub fn accepts(self, hit: FaceHit) -> bool {
        match self {
            CullMode::Back | CullMode::None => hit == FaceHit::Front,
            CullMode::Front => hit == FaceHit::Back,
        }
    }
}

impl FromStr for CullMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CullMode::None),
            "back" => Ok(CullMode::Back),
            "front" => Ok(CullMode::Front),
            other => Err(format!("Unknown cull mode '{}'", other)),
        }
    }
}

impl fmt::Display for CullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CullMode::None => "no culling",
            CullMode::Back => "back-face culling",
            CullMode::Front => "front-face culling",
        };
        f.write_str(name)
    }
}

/// What the rasterizer writes for each accepted pixel.
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Visualize {
    FinalColor,
    /// Grayscale remapped depth, still depth tested.
    DepthBuffer,
    /// Every pixel of each triangle's bounding box in flat white.
    BoundingBox,
}

impl FromStr for Visualize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final_color" => Ok(Visualize::FinalColor),
            "depth_buffer" => Ok(Visualize::DepthBuffer),
            "bounding_box" => Ok(Visualize::BoundingBox),
            other => Err(format!("Unknown visualize mode '{}'", other)),
        }
    }
}

/// Stretches the last `percentile` of the depth range over [0, 1].
#[inline]
pub fn depth_remap(depth: f32, percentile: f32) -> f32 {
    ((depth - (1.0 - percentile)) / percentile).clamp(0.0, 1.0)
}

/// A vertex is inside when its NDC x and y lie in [-1, 1] and z in [0, 1].
#[inline]
pub fn is_in_frustum(vertex: &TransformedVertex) -> bool {
    let p = vertex.position;
    (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y) && (0.0..=1.0).contains(&p.z)
}

/// The Rasterizer fills triangles into a [`FrameBuffer`] using one frame's
/// [`FrameConfig`]. It is rebuilt every frame, so the configuration cannot
/// change mid-pass.
pub struct Rasterizer {
    pub config: FrameConfig,
}

impl Rasterizer {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Walks a triangle list and rasterizes every triangle in index order.
    ///
    /// Indices must be valid for `vertices`. Returns the number of triangles that
    /// survived the rejection tests and were filled.
    pub fn draw_mesh<S: PixelShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        vertices: &[TransformedVertex],
        indices: &[u32],
        shader: &S,
    ) -> usize {
        let mut drawn = 0;
        for chunk in indices.chunks_exact(3) {
            let (i0, i1, i2) = (chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);

            // Zero-area by construction.
            if i0 == i1 || i1 == i2 || i0 == i2 {
                continue;
            }

            let triangle = [vertices[i0], vertices[i1], vertices[i2]];
            if self.rasterize_triangle(framebuffer, &triangle, shader) {
                drawn += 1;
            }
        }
        drawn
    }

    /// Rasterizes one triangle given in NDC.
    ///
    /// The whole triangle is dropped when any vertex lies outside the frustum;
    /// there is no clipping.
    pub fn rasterize_triangle<S: PixelShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        triangle: &[TransformedVertex; 3],
        shader: &S,
    ) -> bool {
        if !triangle.iter().all(is_in_frustum) {
            return false;
        }

        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;
        let screen = triangle.map(|mut vertex| {
            let p = ndc_to_screen(vertex.position.x, vertex.position.y, width, height);
            vertex.position.x = p.x;
            vertex.position.y = p.y;
            vertex
        });

        self.fill_triangle(framebuffer, &screen, shader)
    }

    /// Fills a triangle whose x/y are already in screen space; z is the depth
    /// value and w the camera-space depth.
    pub fn fill_triangle<S: PixelShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        screen: &[TransformedVertex; 3],
        shader: &S,
    ) -> bool {
        let points = screen.map(|v| Point2::new(v.position.x, v.position.y));

        let area = signed_area_x2(&points);
        if area.abs() <= AREA_EPSILON {
            return false;
        }

        let Some((min_x, min_y, max_x, max_y)) =
            self.compute_bounding_box(&points, framebuffer.width, framebuffer.height)
        else {
            return false;
        };

        let depths = screen.map(|v| v.position.z);

        for px in min_x..=max_x {
            for py in min_y..=max_y {
                let (x, y) = (px as usize, py as usize);

                if self.config.visualize == Visualize::BoundingBox {
                    framebuffer.set_pixel(x, y, Vector3::repeat(1.0));
                    continue;
                }

                let pixel = Point2::new(px as f32, py as f32);
                let edges = EdgeValues::at(pixel, &points);
                if !self.config.cull_mode.accepts(edges.classify()) {
                    continue;
                }

                let weights = edges.weights(area);
                let depth = interpolate_reciprocal(weights, depths);

                // Commits the pixel before shading.
                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                let color = match self.config.visualize {
                    Visualize::DepthBuffer => {
                        Vector3::repeat(depth_remap(depth, self.config.depth_remap_percentile))
                    }
                    _ => shader.shade(&interpolate_fragment(screen, weights, depth)),
                };

                framebuffer.set_pixel(x, y, max_to_one(color));
            }
        }

        true
    }

    /// Inclusive pixel bounds, padded by one pixel on every side.
    ///
    /// Returns `None` when the unpadded box touches or crosses the outermost
    /// pixel ring of the target.
    fn compute_bounding_box(
        &self,
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> Option<(i32, i32, i32, i32)> {
        let left = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
        let top = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
        let right = points[0].x.max(points[1].x).max(points[2].x).floor() as i32 + 1;
        let bottom = points[0].y.max(points[1].y).max(points[2].y).floor() as i32 + 1;

        if left <= 0 || right >= width as i32 - 1 || top <= 0 || bottom >= height as i32 - 1 {
            return None;
        }

        Some((left - 1, top - 1, right, bottom))
    }
}

/// Perspective-correct interpolation of every shading attribute at one pixel.
fn interpolate_fragment(
    screen: &[TransformedVertex; 3],
    weights: Vector3<f32>,
    depth: f32,
) -> Fragment {
    let w = screen.map(|v| v.position.w);
    let interpolated_w = interpolate_reciprocal(weights, w);

    let uv = perspective_interpolate(weights, screen.map(|v| v.uv), w, interpolated_w);
    let normal = perspective_interpolate(weights, screen.map(|v| v.normal), w, interpolated_w);
    let tangent = perspective_interpolate(weights, screen.map(|v| v.tangent), w, interpolated_w);
    let view_direction =
        perspective_interpolate(weights, screen.map(|v| v.view_direction), w, interpolated_w);

    Fragment {
        depth,
        w: interpolated_w,
        uv,
        normal: normalize_or_zero(normal),
        tangent: normalize_or_zero(tangent),
        view_direction: normalize_or_zero(view_direction),
    }
}

#[inline]
fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}
