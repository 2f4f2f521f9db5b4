//! Vertex normal derivation

use glam::Vec3;

/// Area-weighted vertex normals.
///
/// Each face contributes its unnormalized cross product (twice its area) to
/// its three corners. Vertices that no face touches get a zero normal.
pub fn compute_vertex_normals(positions: &[[f32; 3]], faces: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        let [a, b, c] = face.map(|i| i as usize);
        let (Some(&pa), Some(&pb), Some(&pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };

        let (pa, pb, pc) = (Vec3::from(pa), Vec3::from(pb), Vec3::from(pc));
        let face_normal = (pb - pa).cross(pc - pa);

        accum[a] += face_normal;
        accum[b] += face_normal;
        accum[c] += face_normal;
    }

    accum
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}
