use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;

/// Pitch is snapped to `±PI / PITCH_LIMIT_DIVISOR` once it reaches a right angle.
const PITCH_LIMIT_DIVISOR: f32 = 2.001;

/// How the mouse is currently dragging the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseDrag {
    #[default]
    None,
    /// Turn in place: horizontal motion yaws, vertical motion pitches.
    Look,
    /// Horizontal motion yaws, vertical motion moves along the view direction.
    Dolly,
    /// Vertical motion moves the camera along world Y.
    Lift,
}

/// Raw movement signals for one frame, already decoupled from the windowing layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
    /// Relative mouse motion in pixels since the previous frame.
    pub mouse_delta: (f32, f32),
    pub drag: MouseDrag,
}

/// Movement tuning: keyboard speed, boost multiplier and mouse sensitivity.
#[derive(Debug, Clone, Copy)]
pub struct CameraMotion {
    /// Keyboard speed in world units per second.
    pub speed: f32,
    pub boost: f32,
    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for CameraMotion {
    fn default() -> Self {
        Self {
            speed: 13.0,
            boost: 3.0,
            sensitivity: 0.006,
        }
    }
}

/// First-person camera that owns its orientation and derives the view and
/// projection matrices from it.
///
/// `forward`, `up` and `right` are rebuilt from pitch/yaw on every update and are
/// always an orthonormal basis.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,

    /// Vertical field of view in degrees.
    pub fov_angle: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub pitch: f32,
    pub yaw: f32,

    pub motion: CameraMotion,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(
        origin: Point3<f32>,
        fov_angle: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            origin,
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            fov_angle,
            aspect_ratio,
            near,
            far,
            pitch: 0.0,
            yaw: 0.0,
            motion: CameraMotion::default(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Overrides the accumulated orientation (radians) and rebuilds the basis.
    pub fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = clamp_pitch(pitch);
        self.yaw = yaw;
        self.update_matrices();
    }

    /// Tangent of half the vertical field of view.
    pub fn fov_tan(&self) -> f32 {
        (self.fov_angle.to_radians() / 2.0).tan()
    }

    /// Applies one frame of movement input, then rebuilds the basis and matrices.
    pub fn update(&mut self, input: &CameraInput, dt: f32) {
        self.apply_keyboard(input, dt);
        self.apply_mouse(input);
        self.update_matrices();
    }

    fn apply_keyboard(&mut self, input: &CameraInput, dt: f32) {
        let mut speed = self.motion.speed;
        if input.boost {
            speed *= self.motion.boost;
        }
        let step = speed * dt;

        if input.forward {
            self.origin += self.forward * step;
        }
        if input.back {
            self.origin -= self.forward * step;
        }
        if input.left {
            self.origin -= self.right * step;
        }
        if input.right {
            self.origin += self.right * step;
        }
        if input.down {
            self.origin.y -= step;
        }
        if input.up {
            self.origin.y += step;
        }
    }

    fn apply_mouse(&mut self, input: &CameraInput) {
        let (dx, dy) = input.mouse_delta;
        let sensitivity = self.motion.sensitivity;
        let mouse_speed = self.motion.speed / 300.0;

        match input.drag {
            MouseDrag::None => {}
            MouseDrag::Lift => {
                self.origin.y -= mouse_speed * dy;
            }
            MouseDrag::Look => {
                self.yaw += sensitivity * dx;
                self.pitch = clamp_pitch(self.pitch - sensitivity * dy);
            }
            MouseDrag::Dolly => {
                self.yaw += sensitivity * dx;
                self.origin -= self.forward * (mouse_speed * dy);
            }
        }
    }

    /// Rebuilds the basis from pitch/yaw, then the view and projection matrices.
    pub fn update_matrices(&mut self) {
        let rotation = TransformFactory::rotation_pitch_yaw(self.pitch, self.yaw);
        self.forward = rotation.transform_vector(&Vector3::z()).normalize();
        self.right = Vector3::y().cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right);

        self.view_matrix =
            TransformFactory::view(&self.right, &self.up, &self.forward, &self.origin);
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov_tan(), self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.abs() >= PI / 2.0 {
        PI.copysign(pitch) / PITCH_LIMIT_DIVISOR
    } else {
        pitch
    }
}
