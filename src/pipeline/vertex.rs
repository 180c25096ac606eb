use crate::core::geometry::{TransformedVertex, Vertex};
use crate::core::math::transform::apply_perspective_division;
use nalgebra::{Matrix4, Vector3};
use rayon::prelude::*;

/// Vertex stage: object space -> NDC, carrying the shading attributes along.
///
/// Output order matches input order. The function is pure, so calling it again
/// with the same inputs yields bit-identical results.
pub fn transform_vertices(
    vertices: &[Vertex],
    world: &Matrix4<f32>,
    view_projection: &Matrix4<f32>,
) -> Vec<TransformedVertex> {
    let world_view_projection = view_projection * world;

    vertices
        .par_iter()
        .map(|vertex| transform_vertex(vertex, world, &world_view_projection))
        .collect()
}

#[inline]
fn transform_vertex(
    vertex: &Vertex,
    world: &Matrix4<f32>,
    world_view_projection: &Matrix4<f32>,
) -> TransformedVertex {
    let clip = world_view_projection * vertex.position.to_homogeneous();

    // Direction of the clip-space position, taken before the divide.
    let view_direction = clip
        .xyz()
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);

    TransformedVertex {
        position: apply_perspective_division(&clip),
        uv: vertex.uv,
        normal: world.transform_vector(&vertex.normal),
        tangent: world.transform_vector(&vertex.tangent),
        view_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;
    use crate::scene::camera::Camera;
    use crate::scene::mesh::Mesh;
    use nalgebra::{Point3, Vector2};

    fn setup() -> (Mesh, Matrix4<f32>, Matrix4<f32>) {
        let mut mesh = Mesh::create_test_quad();
        mesh.position = Vector3::new(0.0, 0.0, 10.0);
        mesh.rotation = 0.3;
        let camera = Camera::new(Point3::origin(), 45.0, 4.0 / 3.0, 0.1, 100.0);
        let world = mesh.world_matrix();
        (mesh, world, camera.view_projection())
    }

    #[test]
    fn output_matches_input_length_and_order() {
        let (mesh, world, vp) = setup();
        let out = transform_vertices(&mesh.vertices, &world, &vp);
        assert_eq!(out.len(), mesh.vertices.len());
        for (v, t) in mesh.vertices.iter().zip(&out) {
            assert_eq!(v.uv, t.uv);
        }
    }

    #[test]
    fn repeated_transform_is_bit_identical() {
        let (mesh, world, vp) = setup();
        let a = transform_vertices(&mesh.vertices, &world, &vp);
        let b = transform_vertices(&mesh.vertices, &world, &vp);
        assert_eq!(a, b);
    }

    #[test]
    fn divide_keeps_w_as_view_depth() {
        let (mesh, world, vp) = setup();
        let out = transform_vertices(&mesh.vertices, &world, &vp);
        for (v, t) in mesh.vertices.iter().zip(&out) {
            let world_pos = world.transform_point(&v.position);
            assert!((t.position.w - world_pos.z).abs() < 1e-4);
            assert!((0.0..=1.0).contains(&t.position.z));
        }
    }

    #[test]
    fn view_direction_is_normalized_clip_position() {
        let (mesh, world, vp) = setup();
        let out = transform_vertices(&mesh.vertices, &world, &vp);
        let clip = vp * world * mesh.vertices[2].position.to_homogeneous();
        let expected = clip.xyz().normalize();
        assert!((out[2].view_direction - expected).amax() < 1e-6);
    }

    #[test]
    fn normals_use_world_rotation_without_renormalizing() {
        let scaled = TransformFactory::translation(&Vector3::new(0.0, 0.0, 5.0))
            * Matrix4::new_scaling(2.0);
        let vertex = Vertex::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector2::new(0.25, 0.75),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::x(),
        );
        let out = transform_vertices(&[vertex], &scaled, &Matrix4::identity());
        assert!((out[0].normal - Vector3::new(0.0, 0.0, -2.0)).amax() < 1e-6);
        assert!((out[0].tangent - Vector3::new(2.0, 0.0, 0.0)).amax() < 1e-6);
        assert_eq!(out[0].uv, Vector2::new(0.25, 0.75));
    }
}
