use crate::core::geometry::Vertex;
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use log::info;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// Vertices, triangle-list indices and the textures they are shaded with,
/// placed in the world by a translation plus an optional spin around Y.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    /// Triangle list, 3 indices per triangle.
    pub indices: Vec<u32>,
    pub material: Material,

    pub position: Vector3<f32>,
    /// Current spin around the local Y axis, radians.
    pub rotation: f32,
    /// Degrees per second while rotating.
    pub rotation_speed: f32,
    pub rotating: bool,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            material: Material::default(),
            position: Vector3::zeros(),
            rotation: 0.0,
            rotation_speed: 45.0,
            rotating: false,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        TransformFactory::translation(&self.position) * TransformFactory::rotation_y(self.rotation)
    }

    /// Advances the spin animation.
    pub fn update(&mut self, dt: f32) {
        if self.rotating {
            self.rotation += (dt * self.rotation_speed).to_radians();
        }
    }

    pub fn toggle_rotation(&mut self) {
        self.rotating = !self.rotating;
        info!(
            "Rotation of '{}' {}",
            self.name,
            if self.rotating { "enabled" } else { "disabled" }
        );
    }

    /// A unit quad facing -Z (towards a camera looking down +Z), wound so both
    /// triangles are front faces on screen.
    pub fn create_test_quad() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let tangent = Vector3::new(1.0, 0.0, 0.0);
        let vertices = vec![
            Vertex::new(Point3::new(-0.5, 0.5, 0.0), Vector2::new(0.0, 0.0), normal, tangent),
            Vertex::new(Point3::new(0.5, 0.5, 0.0), Vector2::new(1.0, 0.0), normal, tangent),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), Vector2::new(1.0, 1.0), normal, tangent),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), Vector2::new(0.0, 1.0), normal, tangent),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Self::new("test_quad", vertices, indices)
    }
}
