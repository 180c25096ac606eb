use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

/// Twice the signed area of triangle (a, b, p): the 2D cross product of
/// `b - a` and `p - a`. Positive when `p` lies clockwise of the edge on a
/// y-down screen.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let edge = b - a;
    let to_p = p - a;
    edge.x * to_p.y - edge.y * to_p.x
}

/// Which side of the triangle a pixel sample hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceHit {
    Front,
    Back,
    Outside,
}

/// Raw edge values for a sample point, one per vertex (the edge opposite it).
///
/// Edge values are unnormalized barycentrics: dividing by the triangle's signed
/// double area turns them into weights that sum to 1.
#[derive(Debug, Clone, Copy)]
pub struct EdgeValues(pub Vector3<f32>);

impl EdgeValues {
    pub fn at(p: Point2<f32>, v: &[Point2<f32>; 3]) -> Self {
        Self(Vector3::new(
            edge_function(v[1], v[2], p),
            edge_function(v[2], v[0], p),
            edge_function(v[0], v[1], p),
        ))
    }

    /// Front when all three values are positive, back when all are negative.
    /// Samples exactly on an edge count as outside.
    pub fn classify(&self) -> FaceHit {
        let e = self.0;
        if e.x > 0.0 && e.y > 0.0 && e.z > 0.0 {
            FaceHit::Front
        } else if e.x < 0.0 && e.y < 0.0 && e.z < 0.0 {
            FaceHit::Back
        } else {
            FaceHit::Outside
        }
    }

    /// Barycentric weights given the triangle's signed double area.
    #[inline]
    pub fn weights(&self, signed_area_x2: f32) -> Vector3<f32> {
        self.0 / signed_area_x2
    }
}

/// Twice the signed area of the triangle (v0, v1, v2).
#[inline]
pub fn signed_area_x2(v: &[Point2<f32>; 3]) -> f32 {
    edge_function(v[0], v[1], v[2])
}

/// Interpolates a per-vertex depth perspective-correctly:
/// `1 / Σ(weight_i / depth_i)`.
#[inline]
pub fn interpolate_reciprocal(weights: Vector3<f32>, depths: [f32; 3]) -> f32 {
    1.0 / (weights.x / depths[0] + weights.y / depths[1] + weights.z / depths[2])
}

/// Interpolates an attribute perspective-correctly:
/// `Σ(weight_i * attribute_i / w_i) * interpolated_w`.
#[inline]
pub fn perspective_interpolate<T: Interpolatable>(
    weights: Vector3<f32>,
    attributes: [T; 3],
    w: [f32; 3],
    interpolated_w: f32,
) -> T {
    (attributes[0] * (weights.x / w[0])
        + attributes[1] * (weights.y / w[1])
        + attributes[2] * (weights.z / w[2]))
        * interpolated_w
}
