use crate::scene::camera::{Camera, CameraInput};
use crate::scene::mesh::Mesh;

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub meshes: Vec<Mesh>,
}

impl RenderContext {
    /// Refreshes the camera from this frame's input, then advances mesh animation.
    pub fn update(&mut self, input: &CameraInput, dt: f32) {
        self.camera.update(input, dt);
        for mesh in &mut self.meshes {
            mesh.update(dt);
        }
    }

    pub fn toggle_rotation(&mut self) {
        for mesh in &mut self.meshes {
            mesh.toggle_rotation();
        }
    }
}
