use std::slice;

use crate::attributes::VertexIndices;

/// Smoothing group id of faces outside of any smoothing group (`s off`)
pub const NO_SMOOTHING_GROUP: i32 = -1;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FaceError {
    #[error("The face has less than three vertices: {0}")]
    TooFewVertices(usize),
}

/// A polygon of the model, referencing its vertices by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub smoothing_group: i32,
    /// `true` only if every vertex of the face references a normal
    pub has_normals: bool,
    /// `true` only if every vertex of the face references texture coordinates
    pub has_texture_coords: bool,
    pub indices: Vec<VertexIndices>,
}

impl Face {
    /// Splits the polygon into triangles.
    ///
    /// Every triangle starts with the last two corners of its predecessor, so a face
    /// `[v0, v1, v2, v3]` yields `(v0, v1, v2)` and `(v1, v2, v3)`. The triangles are
    /// computed on demand; call again to restart.
    pub fn triangles(&self) -> Result<Triangles<'_>, FaceError> {
        if self.indices.len() < 3 {
            return Err(FaceError::TooFewVertices(self.indices.len()));
        }

        Ok(Triangles {
            windows: self.indices.windows(3),
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len().saturating_sub(2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub v1: VertexIndices,
    pub v2: VertexIndices,
    pub v3: VertexIndices,
}

impl Triangle {
    pub const fn new(v1: VertexIndices, v2: VertexIndices, v3: VertexIndices) -> Self {
        Self { v1, v2, v3 }
    }
}

/// Lazy triangulation of a [`Face`], see [`Face::triangles`]
#[derive(Debug, Clone)]
pub struct Triangles<'a> {
    windows: slice::Windows<'a, VertexIndices>,
}

impl Iterator for Triangles<'_> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Self::Item> {
        self.windows
            .next()
            .map(|corners| Triangle::new(corners[0], corners[1], corners[2]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl ExactSizeIterator for Triangles<'_> {}

#[cfg(test)]
mod test {
    use super::*;

    fn vi(i: usize) -> VertexIndices {
        VertexIndices::new(i, i, i)
    }

    fn face(n: usize) -> Face {
        Face {
            smoothing_group: NO_SMOOTHING_GROUP,
            has_normals: true,
            has_texture_coords: true,
            indices: (1..=n).map(vi).collect(),
        }
    }

    #[test]
    fn test_single_triangle() -> Result<(), FaceError> {
        let face = face(3);
        let triangles: Vec<Triangle> = face.triangles()?.collect();
        assert_eq!(triangles, vec![Triangle::new(vi(1), vi(2), vi(3))]);
        Ok(())
    }

    #[test]
    fn test_polygon() -> Result<(), FaceError> {
        let face = face(5);
        let triangles = face.triangles()?;
        assert_eq!(triangles.len(), 3);
        assert_eq!(face.triangle_count(), 3);
        assert_eq!(
            triangles.collect::<Vec<_>>(),
            vec![
                Triangle::new(vi(1), vi(2), vi(3)),
                Triangle::new(vi(2), vi(3), vi(4)),
                Triangle::new(vi(3), vi(4), vi(5)),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_restartable() -> Result<(), FaceError> {
        let face = face(4);
        let first: Vec<_> = face.triangles()?.collect();
        let second: Vec<_> = face.triangles()?.collect();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_too_few_vertices() {
        assert_eq!(face(2).triangles().err(), Some(FaceError::TooFewVertices(2)));
        assert_eq!(face(0).triangle_count(), 0);
    }
}
