use crate::io::config::{CameraConfig, Config, MeshConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};

/// Where the fallback quad goes when the config lists no meshes at all.
const EMPTY_SCENE_QUAD_DISTANCE: f32 = 2.0;

/// Builds the camera described by `[camera]` for a target of the given size.
pub fn build_camera(config: &CameraConfig, width: usize, height: usize) -> Camera {
    let aspect_ratio = width as f32 / height as f32;
    let mut camera = Camera::new(
        Point3::from(config.position),
        config.fov,
        aspect_ratio,
        config.near,
        config.far,
    );
    camera.motion = config.motion();
    camera.set_orientation(config.pitch.to_radians(), config.yaw.to_radians());
    camera
}

/// Loads one texture slot; a failure only drops that slot.
fn load_texture(slot: &str, path: Option<&String>) -> Option<Texture> {
    let path = path?;
    match Texture::load(path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("Failed to load {} texture '{}': {}", slot, path, e);
            None
        }
    }
}

fn load_material(mesh_conf: &MeshConfig) -> Material {
    Material {
        diffuse: load_texture("diffuse", mesh_conf.diffuse.as_ref()),
        normal: load_texture("normal", mesh_conf.normal.as_ref()),
        specular: load_texture("specular", mesh_conf.specular.as_ref()),
        glossiness: load_texture("glossiness", mesh_conf.glossiness.as_ref()),
    }
}

/// Loads one `[[meshes]]` entry, substituting the test quad when the model
/// cannot be read.
pub fn load_mesh(mesh_conf: &MeshConfig) -> Mesh {
    let mut mesh = match load_obj(&mesh_conf.path, mesh_conf.flip_axis_and_winding) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!(
                "Error loading model '{}': {}. Using fallback mesh.",
                mesh_conf.path, e
            );
            Mesh::create_test_quad()
        }
    };

    mesh.material = load_material(mesh_conf);
    mesh.position = Vector3::from(mesh_conf.position);
    mesh.rotating = mesh_conf.rotate;
    mesh.rotation_speed = mesh_conf.rotation_speed;

    let caps = mesh.material.capabilities();
    info!(
        "Mesh '{}': {} triangles, diffuse: {}, normal: {}, specular: {}, glossiness: {}",
        mesh.name,
        mesh.triangle_count(),
        caps.has_diffuse,
        caps.has_normal,
        caps.has_specular,
        caps.has_glossiness
    );
    mesh
}

/// Initial resource loading (heavy I/O). Returns the complete scene.
pub fn init_scene_resources(config: &Config) -> RenderContext {
    let camera = build_camera(&config.camera, config.render.width, config.render.height);

    let mut meshes: Vec<Mesh> = config.meshes.iter().map(load_mesh).collect();
    if meshes.is_empty() {
        warn!("No meshes configured, showing the test quad");
        let mut quad = Mesh::create_test_quad();
        quad.position = Vector3::new(0.0, 0.0, EMPTY_SCENE_QUAD_DISTANCE);
        meshes.push(quad);
    }

    info!("Scene initialized with {} meshes.", meshes.len());
    RenderContext { camera, meshes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn empty_config_yields_visible_test_quad() {
        let context = init_scene_resources(&Config::default());
        assert_eq!(context.meshes.len(), 1);
        assert_eq!(context.meshes[0].triangle_count(), 2);
        assert_eq!(context.meshes[0].position.z, EMPTY_SCENE_QUAD_DISTANCE);
    }

    #[test]
    fn unreadable_model_and_textures_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
        let mesh_conf = MeshConfig {
            path: missing("vehicle.obj"),
            diffuse: Some(missing("vehicle_diffuse.png")),
            normal: None,
            specular: None,
            glossiness: None,
            position: [0.0, 0.0, 50.0],
            rotate: true,
            rotation_speed: 90.0,
            flip_axis_and_winding: true,
        };

        let mesh = load_mesh(&mesh_conf);
        assert_eq!(mesh.name, "test_quad");
        assert!(mesh.material.diffuse.is_none());
        assert!(mesh.rotating);
        assert_eq!(mesh.rotation_speed, 90.0);
        assert_eq!(mesh.position, Vector3::new(0.0, 0.0, 50.0));
    }

    #[test]
    fn camera_uses_configured_orientation_and_motion() {
        let conf = CameraConfig {
            yaw: 90.0,
            speed: 5.0,
            ..Default::default()
        };
        let camera = build_camera(&conf, 640, 480);
        assert!((camera.yaw - FRAC_PI_2).abs() < 1e-6);
        assert!((camera.forward - Vector3::x()).amax() < 1e-5);
        assert_eq!(camera.motion.speed, 5.0);
        assert!((camera.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
    }
}
