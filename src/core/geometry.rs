use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A single mesh vertex in object space. Immutable once the mesh is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates, expected in [0, 1].
    pub uv: Vector2<f32>,
    /// Unit normal.
    pub normal: Vector3<f32>,
    /// Unit tangent, used to build the tangent-space basis for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(
        position: Point3<f32>,
        uv: Vector2<f32>,
        normal: Vector3<f32>,
        tangent: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent,
        }
    }
}

/// Output of the vertex stage.
///
/// `position.xyz` holds NDC after the perspective divide (screen space once the
/// rasterizer has mapped it), while `position.w` keeps the camera-space depth
/// for perspective-correct interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedVertex {
    pub position: Vector4<f32>,
    pub uv: Vector2<f32>,
    /// World-space normal, not renormalized.
    pub normal: Vector3<f32>,
    /// World-space tangent, not renormalized.
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}

impl Default for TransformedVertex {
    fn default() -> Self {
        Self {
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
        }
    }
}

/// Per-pixel attributes handed to the pixel shader.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Interpolated depth-buffer value.
    pub depth: f32,
    /// Interpolated camera-space depth.
    pub w: f32,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}
