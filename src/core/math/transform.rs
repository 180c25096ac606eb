use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by the software path.
/// Left-handed: the camera looks down +Z and clip-space `w` carries view depth.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Camera orientation from accumulated pitch and yaw (no roll).
    /// Positive pitch tilts +Z towards +Y, positive yaw turns +Z towards +X.
    pub fn rotation_pitch_yaw(pitch_rad: f32, yaw_rad: f32) -> Matrix4<f32> {
        Self::rotation_y(yaw_rad) * Self::rotation_x(-pitch_rad)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// World-to-camera (view) matrix. The basis must be orthonormal, so the
    /// inverse of the camera's placement is the transposed rotation with the
    /// origin projected onto each axis.
    pub fn view(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        let o = origin.coords;
        Matrix4::new(
            right.x,   right.y,   right.z,   -right.dot(&o),
            up.x,      up.y,      up.z,      -up.dot(&o),
            forward.x, forward.y, forward.z, -forward.dot(&o),
            0.0,       0.0,       0.0,       1.0,
        )
    }

    /// Perspective projection parameterized by the tangent of half the vertical
    /// field of view. Maps view depth `near..far` to NDC z `0..1` and copies view
    /// depth into clip `w`.
    pub fn perspective(aspect_ratio: f32, fov_tan: f32, near: f32, far: f32) -> Matrix4<f32> {
        let depth_range = far - near;

        Matrix4::new(
            1.0 / (aspect_ratio * fov_tan), 0.0,           0.0,                 0.0,
            0.0,                            1.0 / fov_tan, 0.0,                 0.0,
            0.0,                            0.0,           far / depth_range,  -(far * near) / depth_range,
            0.0,                            0.0,           1.0,                 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs the perspective divide on x, y and z. `w` is kept untouched so later
/// stages can interpolate perspective-correctly.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector4<f32> {
    Vector4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w)
}

/// Converts NDC coordinates to screen coordinates (viewport transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn perspective_keeps_view_depth_in_w() {
        let proj = TransformFactory::perspective(4.0 / 3.0, 1.0, 0.1, 100.0);
        let clip = proj * Vector4::new(1.0, 2.0, 7.5, 1.0);
        assert_close(clip.w, 7.5);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let proj = TransformFactory::perspective(1.0, 0.5, 0.1, 100.0);
        let near = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, 0.1, 1.0)));
        let far = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, 100.0, 1.0)));
        assert_close(near.z, 0.0);
        assert_close(far.z, 1.0);
    }

    #[test]
    fn view_inverse_places_the_camera_basis() {
        let rotation = TransformFactory::rotation_pitch_yaw(0.3, -1.1);
        let forward = rotation.transform_vector(&Vector3::z());
        let right = Vector3::y().cross(&forward).normalize();
        let up = forward.cross(&right);
        let origin = Point3::new(3.0, -2.0, 10.0);

        let placement = TransformFactory::view(&right, &up, &forward, &origin)
            .try_inverse()
            .unwrap();
        assert!((placement.fixed_view::<3, 1>(0, 0) - right).amax() < 1e-5);
        assert!((placement.fixed_view::<3, 1>(0, 1) - up).amax() < 1e-5);
        assert!((placement.fixed_view::<3, 1>(0, 2) - forward).amax() < 1e-5);
        assert!((placement.fixed_view::<3, 1>(0, 3) - origin.coords).amax() < 1e-5);
    }

    #[test]
    fn pitch_yaw_rotation_matches_spherical_forward() {
        let (pitch, yaw) = (0.4_f32, 1.2_f32);
        let forward =
            TransformFactory::rotation_pitch_yaw(pitch, yaw).transform_vector(&Vector3::z());
        assert_close(forward.x, yaw.sin() * pitch.cos());
        assert_close(forward.y, pitch.sin());
        assert_close(forward.z, yaw.cos() * pitch.cos());
    }

    #[test]
    fn perspective_division_keeps_w() {
        let ndc = apply_perspective_division(&Vector4::new(2.0, -4.0, 1.0, 4.0));
        assert_eq!(ndc, Vector4::new(0.5, -1.0, 0.25, 4.0));
    }

    #[test]
    fn ndc_corners_map_to_screen_corners() {
        let top_left = ndc_to_screen(-1.0, 1.0, 640.0, 480.0);
        let bottom_right = ndc_to_screen(1.0, -1.0, 640.0, 480.0);
        assert_eq!(top_left, Point2::new(0.0, 0.0));
        assert_eq!(bottom_right, Point2::new(640.0, 480.0));
    }
}
