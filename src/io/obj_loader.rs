use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Flat attribute streams of one triangle list, as tobj hands them out.
#[derive(Debug, Default)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Loads an OBJ file into a single [`Mesh`], merging every object it contains.
///
/// With `flip_axis_and_winding` the model is mirrored along Z and each
/// triangle's winding is reversed, which converts right-handed assets into the
/// renderer's left-handed space.
pub fn load_obj<P: AsRef<Path>>(path: P, flip_axis_and_winding: bool) -> Result<Mesh, String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }

    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // Materials come from the config, not the .mtl file.
    let (models, _materials) = tobj::load_obj(path, &load_options)
        .map_err(|e| format!("Failed to load OBJ '{}': {}", path.display(), e))?;

    if models.is_empty() {
        return Err(format!("OBJ '{}' contains no geometry", path.display()));
    }

    let mut data = MeshData::default();
    for model in &models {
        let mesh = &model.mesh;
        let offset = (data.positions.len() / 3) as u32;
        let vertex_count = mesh.positions.len() / 3;

        if mesh.normals.is_empty() {
            warn!("Mesh '{}' has no normals, using face normals", model.name);
        }

        data.positions.extend_from_slice(&mesh.positions);
        data.normals.extend(padded(&mesh.normals, vertex_count * 3));
        data.texcoords.extend(padded(&mesh.texcoords, vertex_count * 2));
        data.indices.extend(mesh.indices.iter().map(|i| i + offset));
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());

    let mesh = build_mesh(name, data, flip_axis_and_winding)?;
    info!(
        "OBJ loaded successfully. Vertices: {}, triangles: {}",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Streams that are missing entirely are filled with NaN so that
/// [`build_mesh`] can tell them apart from real zeros.
fn padded(values: &[f32], len: usize) -> impl Iterator<Item = f32> + '_ {
    let fill = if values.is_empty() { f32::NAN } else { 0.0 };
    values.iter().copied().chain(std::iter::repeat(fill)).take(len)
}

/// Assembles a mesh from raw streams: validates indices, fills in missing
/// normals, generates tangents and applies the optional handedness flip.
pub fn build_mesh(
    name: impl Into<String>,
    data: MeshData,
    flip_axis_and_winding: bool,
) -> Result<Mesh, String> {
    let name = name.into();
    let vertex_count = data.positions.len() / 3;

    if data.indices.len() % 3 != 0 {
        return Err(format!(
            "Mesh '{}' has {} indices, not a multiple of 3",
            name,
            data.indices.len()
        ));
    }
    if let Some(bad) = data.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(format!(
            "Mesh '{}' references vertex {} but only has {}",
            name, bad, vertex_count
        ));
    }

    let positions: Vec<Point3<f32>> = data
        .positions
        .chunks_exact(3)
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    let uvs: Vec<Vector2<f32>> = (0..vertex_count)
        .map(|i| match data.texcoords.get(i * 2..i * 2 + 2) {
            Some(t) if !t[0].is_nan() => Vector2::new(t[0], t[1]),
            _ => Vector2::zeros(),
        })
        .collect();

    let face_normals = accumulate_face_normals(&positions, &data.indices);
    let normals: Vec<Vector3<f32>> = (0..vertex_count)
        .map(|i| match data.normals.get(i * 3..i * 3 + 3) {
            Some(n) if !n[0].is_nan() => Vector3::new(n[0], n[1], n[2]),
            _ => face_normals[i].try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y),
        })
        .collect();

    let tangents = generate_tangents(&positions, &uvs, &normals, &data.indices);

    let mut vertices: Vec<Vertex> = (0..vertex_count)
        .map(|i| Vertex::new(positions[i], uvs[i], normals[i], tangents[i]))
        .collect();
    let mut indices = data.indices;

    if flip_axis_and_winding {
        for vertex in &mut vertices {
            vertex.position.z = -vertex.position.z;
            vertex.normal.z = -vertex.normal.z;
            vertex.tangent.z = -vertex.tangent.z;
        }
        for triangle in indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
    }

    // Image rows run top to bottom, OBJ v runs bottom to top.
    for vertex in &mut vertices {
        vertex.uv.y = 1.0 - vertex.uv.y;
    }

    Ok(Mesh::new(name, vertices, indices))
}

fn accumulate_face_normals(positions: &[Point3<f32>], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
        for i in [a, b, c] {
            normals[i] += face;
        }
    }
    normals
}

/// Per-vertex tangents along increasing u, orthogonalized against the normal.
fn generate_tangents(
    positions: &[Point3<f32>],
    uvs: &[Vector2<f32>],
    normals: &[Vector3<f32>],
    indices: &[u32],
) -> Vec<Vector3<f32>> {
    let mut accumulated = vec![Vector3::zeros(); positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);

        let edge0 = positions[b] - positions[a];
        let edge1 = positions[c] - positions[a];
        let duv0 = uvs[b] - uvs[a];
        let duv1 = uvs[c] - uvs[a];

        let det = duv0.x * duv1.y - duv1.x * duv0.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let tangent = (edge0 * duv1.y - edge1 * duv0.y) / det;

        for i in [a, b, c] {
            accumulated[i] += tangent;
        }
    }

    accumulated
        .iter()
        .zip(normals)
        .map(|(tangent, normal)| orthogonal_unit(*tangent, *normal))
        .collect()
}

/// Gram-Schmidt step; falls back to an arbitrary perpendicular when `tangent`
/// is zero or parallel to `normal`.
fn orthogonal_unit(tangent: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    let reject = |v: Vector3<f32>| (v - normal * normal.dot(&v)).try_normalize(1e-6);

    reject(tangent)
        .or_else(|| reject(Vector3::x()))
        .or_else(|| reject(Vector3::y()))
        .unwrap_or_else(Vector3::x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE_OBJ: &str = "\
v 0 0 1
v 1 0 1
v 0 1 1
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    fn write_obj(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn flip_mirrors_z_and_reverses_winding() {
        let file = write_obj(TRIANGLE_OBJ);
        let mesh = load_obj(file.path(), true).unwrap();

        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 2, 1]);
        assert_eq!(mesh.vertices[1].position, Point3::new(1.0, 0.0, -1.0));
        assert_eq!(mesh.vertices[0].normal, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn without_flip_geometry_is_untouched() {
        let file = write_obj(TRIANGLE_OBJ);
        let mesh = load_obj(file.path(), false).unwrap();

        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, Point3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn v_coordinate_is_flipped() {
        let file = write_obj(TRIANGLE_OBJ);
        let mesh = load_obj(file.path(), true).unwrap();

        assert_eq!(mesh.vertices[0].uv, Vector2::new(0.0, 1.0));
        assert_eq!(mesh.vertices[1].uv, Vector2::new(1.0, 1.0));
        assert_eq!(mesh.vertices[2].uv, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn tangents_follow_u_and_are_orthonormal() {
        let file = write_obj(TRIANGLE_OBJ);
        let mesh = load_obj(file.path(), true).unwrap();

        for vertex in &mesh.vertices {
            assert!((vertex.tangent - Vector3::x()).amax() < 1e-6);
            assert!(vertex.tangent.dot(&vertex.normal).abs() < 1e-6);
        }
    }

    #[test]
    fn missing_normals_fall_back_to_face_normals() {
        let data = MeshData {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let mesh = build_mesh("plain", data, false).unwrap();
        for vertex in &mesh.vertices {
            assert!((vertex.normal - Vector3::z()).amax() < 1e-6);
            assert!(vertex.tangent.dot(&vertex.normal).abs() < 1e-6);
            assert!((vertex.tangent.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let data = MeshData {
            positions: vec![0.0; 9],
            indices: vec![0, 1, 3],
            ..Default::default()
        };
        let err = build_mesh("broken", data, false).unwrap_err();
        assert!(err.contains("vertex 3"));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let data = MeshData {
            positions: vec![0.0; 9],
            indices: vec![0, 1],
            ..Default::default()
        };
        assert!(build_mesh("broken", data, false).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_obj(dir.path().join("nope.obj"), true).is_err());
    }
}
