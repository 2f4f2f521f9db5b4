//! In-memory triangle mesh shared by the loaders and the OBJ exporter

use super::normals::compute_vertex_normals;

/// Merged triangle mesh
///
/// Every optional attribute holds exactly one entry per position, and every
/// face index is below `positions.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals
    pub normals: Option<Vec<[f32; 3]>>,
    /// Texture coordinates (OBJ convention, V points up)
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Linear RGBA vertex colors
    pub colors: Option<Vec<[f32; 4]>>,
    /// Zero-based triangle indices
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no triangles to export
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Stored normals, or normals derived from the faces when none are stored
    pub fn vertex_normals(&self) -> Vec<[f32; 3]> {
        match &self.normals {
            Some(normals) => normals.clone(),
            None => compute_vertex_normals(&self.positions, &self.faces),
        }
    }

    /// Append another mesh, re-basing its face indices.
    ///
    /// Normals missing on either side are derived so the result keeps them.
    /// UVs and colors survive only if both sides carry them.
    pub fn append(&mut self, other: Mesh) {
        if other.positions.is_empty() {
            return;
        }
        if self.positions.is_empty() {
            *self = other;
            return;
        }

        let base = self.positions.len() as u32;

        self.normals = match (self.normals.take(), other.normals.as_ref()) {
            (None, None) => None,
            (ours, theirs) => {
                let mut merged =
                    ours.unwrap_or_else(|| compute_vertex_normals(&self.positions, &self.faces));
                match theirs {
                    Some(n) => merged.extend_from_slice(n),
                    None => merged.extend(compute_vertex_normals(&other.positions, &other.faces)),
                }
                Some(merged)
            }
        };

        self.uvs = match (self.uvs.take(), other.uvs) {
            (Some(mut ours), Some(theirs)) => {
                ours.extend(theirs);
                Some(ours)
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::debug!("Dropping texture coordinates: not every part has them");
                None
            }
            (None, None) => None,
        };

        self.colors = match (self.colors.take(), other.colors) {
            (Some(mut ours), Some(theirs)) => {
                ours.extend(theirs);
                Some(ours)
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::debug!("Dropping vertex colors: not every part has them");
                None
            }
            (None, None) => None,
        };

        self.positions.extend(other.positions);
        self.faces.extend(
            other
                .faces
                .into_iter()
                .map(|[a, b, c]| [a + base, b + base, c + base]),
        );
    }

    /// Drop vertices that no face references, compacting every attribute.
    ///
    /// Surviving vertices keep their relative order.
    pub fn remove_unreferenced_vertices(&mut self) {
        let mut used = vec![false; self.positions.len()];
        for &index in self.faces.iter().flatten() {
            used[index as usize] = true;
        }
        if used.iter().all(|&u| u) {
            return;
        }

        let kept: Vec<usize> = (0..used.len()).filter(|&i| used[i]).collect();
        let mut remap = vec![0u32; used.len()];
        for (new, &old) in kept.iter().enumerate() {
            remap[old] = new as u32;
        }
        tracing::debug!(
            "Removing {} unreferenced vertices",
            self.positions.len() - kept.len()
        );

        for index in self.faces.iter_mut().flatten() {
            *index = remap[*index as usize];
        }

        fn compact<T: Copy>(values: &[T], kept: &[usize]) -> Vec<T> {
            kept.iter().map(|&k| values[k]).collect()
        }

        self.positions = compact(&self.positions, &kept);
        self.normals = self.normals.as_deref().map(|n| compact(n, &kept));
        self.uvs = self.uvs.as_deref().map(|t| compact(t, &kept));
        self.colors = self.colors.as_deref().map(|c| compact(c, &kept));
    }
}
