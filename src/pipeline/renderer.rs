use crate::core::color::ColorSample;
use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::{FrameConfig, ShadingMode};
use crate::core::rasterizer::{CullMode, Rasterizer, Visualize};
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::vertex::transform_vertices;
use crate::scene::context::RenderContext;
use log::{debug, info};
use nalgebra::Vector3;

const CLEAR_GRAY: f32 = 0.39;
const UNIFORM_CLEAR_GRAY: f32 = 0.1;

/// User-facing switches that persist between frames.
///
/// Toggles only touch this struct; the rasterizer sees them through the
/// [`FrameConfig`] snapshot taken at the start of each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub cull_mode: CullMode,
    pub shading_mode: ShadingMode,
    pub visualize: Visualize,
    pub use_normal_map: bool,
    pub uniform_clear_color: bool,
    pub depth_remap_percentile: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let frame = FrameConfig::default();
        Self {
            cull_mode: frame.cull_mode,
            shading_mode: frame.shading_mode,
            visualize: frame.visualize,
            use_normal_map: frame.use_normal_map,
            uniform_clear_color: false,
            depth_remap_percentile: frame.depth_remap_percentile,
        }
    }
}

impl RenderSettings {
    pub fn cycle_cull_mode(&mut self) {
        self.cull_mode = self.cull_mode.next();
        info!("Using {}", self.cull_mode);
    }

    pub fn cycle_shading_mode(&mut self) {
        self.shading_mode = self.shading_mode.next();
        info!("Using {} shading mode", self.shading_mode);
    }

    pub fn toggle_normal_map(&mut self) {
        self.use_normal_map = !self.use_normal_map;
        info!("Normal map {}", on_off(self.use_normal_map));
    }

    pub fn toggle_depth_visualization(&mut self) {
        self.toggle_visualize(Visualize::DepthBuffer);
        info!(
            "Depth buffer visualization {}",
            on_off(self.visualize == Visualize::DepthBuffer)
        );
    }

    pub fn toggle_bounding_box_visualization(&mut self) {
        self.toggle_visualize(Visualize::BoundingBox);
        info!(
            "Bounding box visualization {}",
            on_off(self.visualize == Visualize::BoundingBox)
        );
    }

    pub fn toggle_uniform_clear_color(&mut self) {
        self.uniform_clear_color = !self.uniform_clear_color;
        info!("Uniform clear color {}", on_off(self.uniform_clear_color));
    }

    pub fn clear_color(&self) -> ColorSample {
        if self.uniform_clear_color {
            Vector3::repeat(UNIFORM_CLEAR_GRAY)
        } else {
            Vector3::repeat(CLEAR_GRAY)
        }
    }

    /// Freezes the current switches for one frame.
    pub fn snapshot(&self) -> FrameConfig {
        FrameConfig {
            cull_mode: self.cull_mode,
            shading_mode: self.shading_mode,
            visualize: self.visualize,
            use_normal_map: self.use_normal_map,
            depth_remap_percentile: self.depth_remap_percentile,
            clear_color: self.clear_color(),
        }
    }

    fn toggle_visualize(&mut self, mode: Visualize) {
        self.visualize = if self.visualize == mode {
            Visualize::FinalColor
        } else {
            mode
        };
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

/// Per-frame counters, reported at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles_submitted: usize,
    pub triangles_rasterized: usize,
}

/// Owns the frame target and drives the vertex, raster and pixel stages over a scene.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
    pub settings: RenderSettings,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            settings,
        }
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height
    }

    /// Renders one complete frame of `context` into the framebuffer.
    pub fn render_frame(&mut self, context: &RenderContext) -> FrameStats {
        let frame = self.settings.snapshot();
        self.framebuffer.clear(frame.clear_color);

        let rasterizer = Rasterizer::new(frame);
        let view_projection = context.camera.view_projection();
        let mut stats = FrameStats::default();

        for mesh in &context.meshes {
            let transformed =
                transform_vertices(&mesh.vertices, &mesh.world_matrix(), &view_projection);
            let shader = PhongShader::new(&mesh.material, &frame);

            stats.triangles_submitted += mesh.triangle_count();
            stats.triangles_rasterized +=
                rasterizer.draw_mesh(&mut self.framebuffer, &transformed, &mesh.indices, &shader);
        }

        debug!(
            "Frame: {} / {} triangles rasterized",
            stats.triangles_rasterized, stats.triangles_submitted
        );
        stats
    }
}
