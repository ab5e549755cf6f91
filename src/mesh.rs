//! Triangle output of the subdivision: the [`MeshSink`] trait and the owned [`Mesh`] buffers.

use std::ops::Range;

use log::warn;
use nalgebra::{RealField, Scalar, Vector2, Vector3, Vector4};

use crate::grid::{Patch, TexturePatch};
use crate::subdivide::{subdivide, SubdivisionOptions, SubdivisionReport};

/// Receives the vertices of generated triangles.
///
/// Vertices arrive in order; every three consecutive calls describe one triangle.
pub trait MeshSink<T> {
    /// Append one vertex.
    fn push_vertex(&mut self, position: Vector4<T>, normal: Vector3<T>, uv: Vector2<T>);

    /// Hint that `additional` vertices are about to be pushed.
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }
}

impl<T, F> MeshSink<T> for F
where
    F: FnMut(Vector4<T>, Vector3<T>, Vector2<T>),
{
    fn push_vertex(&mut self, position: Vector4<T>, normal: Vector3<T>, uv: Vector2<T>) {
        self(position, normal, uv)
    }
}

/// Three parallel vertex buffers: positions, normals and texture coordinates.
///
/// The buffers always have the same length and every three consecutive entries form one
/// triangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh<T: Scalar> {
    /// Homogeneous vertex positions
    pub positions: Vec<Vector4<T>>,
    /// Unit normals (zero where a leaf patch had no defined normal)
    pub normals: Vec<Vector3<T>>,
    /// Texture coordinates
    pub tex_coords: Vec<Vector2<T>>,
}

/// Slice of a [`Mesh`] produced by one call to [`Mesh::subdivide_into`].
///
/// Counted in vertices, so a renderer can draw `count` vertices starting at `start`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshRange {
    /// Index of the first vertex
    pub start: usize,
    /// Number of vertices
    pub count: usize,
}

impl MeshRange {
    /// The vertex indices covered by this range.
    pub fn vertices(&self) -> Range<usize> {
        self.start..self.start + self.count
    }

    /// Number of triangles covered by this range.
    pub fn triangle_count(&self) -> usize {
        self.count / 3
    }
}

impl<T: Scalar> Mesh<T> {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Mesh {
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no vertex was pushed yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of complete triangles.
    pub fn triangle_count(&self) -> usize {
        self.len() / 3
    }

    /// Iterates over the triangles' vertex indices.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> {
        (0..self.triangle_count()).map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
    }
}

impl<T: Scalar> Default for Mesh<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField> Mesh<T> {
    /// Subdivides `patch` and appends its triangles to the buffers.
    ///
    /// Returns the range of vertices the patch occupies and the subdivision's report.
    pub fn subdivide_into(
        &mut self,
        patch: &Patch<T>,
        tex_patch: &TexturePatch<T>,
        options: SubdivisionOptions,
    ) -> (MeshRange, SubdivisionReport) {
        let start = self.len();
        let report = subdivide(patch, tex_patch, options, self);
        let range = MeshRange {
            start,
            count: self.len() - start,
        };
        (range, report)
    }
}

impl<T: Scalar> MeshSink<T> for Mesh<T> {
    fn push_vertex(&mut self, position: Vector4<T>, normal: Vector3<T>, uv: Vector2<T>) {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
    }

    fn reserve(&mut self, additional: usize) {
        let reserved = self
            .positions
            .try_reserve(additional)
            .and_then(|_| self.normals.try_reserve(additional))
            .and_then(|_| self.tex_coords.try_reserve(additional));
        if let Err(err) = reserved {
            warn!("could not reserve space for {} vertices: {}", additional, err);
        }
    }
}
