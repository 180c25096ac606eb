use crate::core::pipeline::ShadingMode;
use crate::core::rasterizer::{CullMode, Visualize};
use crate::pipeline::renderer::RenderSettings;
use crate::scene::camera::CameraMotion;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    // --- Output ---
    pub width: usize,
    pub height: usize,
    pub output: String,
    /// Frames rendered in headless mode.
    pub frames: usize,
    /// Fixed frame delta in seconds for headless mode.
    pub frame_time: f32,

    // --- Pipeline & Debug ---
    pub cull_mode: String,
    pub shading_mode: String,
    pub visualize: String,
    pub normal_map: bool,
    pub uniform_clear_color: bool,
    pub depth_remap_percentile: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            output: "output.png".to_string(),
            frames: 1,
            frame_time: 1.0 / 60.0,
            cull_mode: "back".to_string(),
            shading_mode: "combined".to_string(),
            visualize: "final_color".to_string(),
            normal_map: true,
            uniform_clear_color: false,
            depth_remap_percentile: 0.005,
        }
    }
}

impl RenderConfig {
    /// Parses the mode strings into the initial toggle state.
    pub fn settings(&self) -> Result<RenderSettings, String> {
        if !(self.depth_remap_percentile > 0.0 && self.depth_remap_percentile <= 1.0) {
            return Err(format!(
                "depth_remap_percentile must be in (0, 1], got {}",
                self.depth_remap_percentile
            ));
        }

        Ok(RenderSettings {
            cull_mode: self.cull_mode.parse::<CullMode>()?,
            shading_mode: self.shading_mode.parse::<ShadingMode>()?,
            visualize: self.visualize.parse::<Visualize>()?,
            use_normal_map: self.normal_map,
            uniform_clear_color: self.uniform_clear_color,
            depth_remap_percentile: self.depth_remap_percentile,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Degrees.
    pub pitch: f32,
    /// Degrees.
    pub yaw: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub boost: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let motion = CameraMotion::default();
        Self {
            position: [0.0, 0.0, 0.0],
            fov: 45.0,
            pitch: 0.0,
            yaw: 0.0,
            near: 0.1,
            far: 100.0,
            speed: motion.speed,
            boost: motion.boost,
            sensitivity: motion.sensitivity,
        }
    }
}

impl CameraConfig {
    pub fn motion(&self) -> CameraMotion {
        CameraMotion {
            speed: self.speed,
            boost: self.boost,
            sensitivity: self.sensitivity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfig {
    pub path: String,

    // --- Textures ---
    pub diffuse: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub glossiness: Option<String>,

    // --- Transform & Animation ---
    #[serde(default = "default_mesh_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotate: bool,
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_true")]
    pub flip_axis_and_winding: bool,
}

fn default_mesh_position() -> [f32; 3] {
    [0.0, 0.0, 50.0]
}
fn default_rotation_speed() -> f32 {
    45.0
}
fn default_true() -> bool {
    true
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        if config.render.width == 0 || config.render.height == 0 {
            return Err("Render width and height must be non-zero".to_string());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 480);
        assert_eq!(config.render.frames, 1);
        assert!(config.meshes.is_empty());

        let settings = config.render.settings().unwrap();
        assert_eq!(settings, RenderSettings::default());
        assert_eq!(config.camera.motion().speed, 13.0);
    }

    #[test]
    fn full_file_round_trips_into_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[render]
width = 320
height = 200
cull_mode = "none"
shading_mode = "specular"
visualize = "depth_buffer"
normal_map = false

[camera]
position = [0.0, 5.0, -10.0]
fov = 60.0
speed = 20.0

[[meshes]]
path = "vehicle.obj"
diffuse = "vehicle_diffuse.png"
rotate = true

[[meshes]]
path = "crate.obj"
position = [1.0, 2.0, 3.0]
flip_axis_and_winding = false
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        let settings = config.render.settings().unwrap();
        assert_eq!(settings.cull_mode, CullMode::None);
        assert_eq!(settings.shading_mode, ShadingMode::Specular);
        assert_eq!(settings.visualize, Visualize::DepthBuffer);
        assert!(!settings.use_normal_map);

        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.motion().speed, 20.0);
        assert_eq!(config.camera.near, 0.1);

        assert_eq!(config.meshes.len(), 2);
        assert_eq!(config.meshes[0].position, [0.0, 0.0, 50.0]);
        assert!(config.meshes[0].rotate);
        assert!(config.meshes[0].flip_axis_and_winding);
        assert_eq!(config.meshes[0].normal, None);
        assert_eq!(config.meshes[1].position, [1.0, 2.0, 3.0]);
        assert!(!config.meshes[1].flip_axis_and_winding);
    }

    #[test]
    fn unknown_mode_is_reported() {
        let config = Config::parse("[render]\ncull_mode = \"sideways\"").unwrap();
        let err = config.render.settings().unwrap_err();
        assert!(err.contains("sideways"));
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        assert!(Config::parse("[render]\nwidth = 0").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path().join("missing.toml")).is_err());
    }
}
