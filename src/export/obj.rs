//! Write a mesh as Wavefront OBJ text

use crate::export::ExportMesh;
use crate::mesh::{Mesh, MeshRange};
use log::warn;
use std::fmt::Write;
use std::marker::PhantomData;

/// Helper trait implemented by [`Textured`] and [`Untextured`] to choose
/// whether texture coordinates end up in the file.
///
/// This effectively toggles between `f a/a/a` and `f a//a` faces.
pub trait FaceRepr {
    /// Whether `vt` lines are written and referenced by faces
    const TEXTURED: bool;
}

/// Write positions, texture coordinates and normals.
pub struct Textured;
impl FaceRepr for Textured {
    const TEXTURED: bool = true;
}

/// Write positions and normals only.
pub struct Untextured;
impl FaceRepr for Untextured {
    const TEXTURED: bool = false;
}

/// This type wraps a mutable String reference and implements [`ExportMesh`] on it.
/// Every [`ExportMesh::add_group`] appends a `g` group with its own vertices and faces.
/// Indices keep counting across groups, so one writer produces one consistent file.
///
/// ```
/// use npatch::export::obj::ObjTexturedWriter;
/// use npatch::export::ExportMesh;
/// use npatch::TerrainConfig;
///
/// let terrain = TerrainConfig::default().tessellate().unwrap();
/// let mut obj = String::new();
/// ObjTexturedWriter::from(&mut obj).add_mesh(&terrain.mesh);
/// assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 512);
/// ```
pub struct ObjWriter<'s, R: FaceRepr> {
    out: &'s mut String,
    written: usize,
    repr: PhantomData<R>,
}

/// Wrapper for writing meshes including texture coordinates
pub type ObjTexturedWriter<'s> = ObjWriter<'s, Textured>;

/// Wrapper for writing meshes without texture coordinates
pub type ObjUntexturedWriter<'s> = ObjWriter<'s, Untextured>;

impl<'s, R: FaceRepr> From<&'s mut String> for ObjWriter<'s, R> {
    fn from(out: &'s mut String) -> Self {
        ObjWriter {
            out,
            written: 0,
            repr: PhantomData,
        }
    }
}

impl<'s, R: FaceRepr> ObjWriter<'s, R> {
    /// Number of vertices written so far.
    pub fn vertices_written(&self) -> usize {
        self.written
    }
}

impl<'s, R: FaceRepr> ExportMesh for ObjWriter<'s, R> {
    fn add_group(&mut self, name: &str, mesh: &Mesh<f64>, range: MeshRange) {
        let vertices = range.vertices();
        let (Some(positions), Some(normals), Some(tex_coords)) = (
            mesh.positions.get(vertices.clone()),
            mesh.normals.get(vertices.clone()),
            mesh.tex_coords.get(vertices),
        ) else {
            warn!(
                "skipping group {}: vertices {:?} are out of bounds",
                name,
                range.vertices()
            );
            return;
        };

        let _ = writeln!(self.out, "g {}", name);
        for p in positions {
            let _ = writeln!(self.out, "v {} {} {} {}", p.x, p.y, p.z, p.w);
        }
        if R::TEXTURED {
            for uv in tex_coords {
                let _ = writeln!(self.out, "vt {} {}", uv.x, uv.y);
            }
        }
        for n in normals {
            let _ = writeln!(self.out, "vn {} {} {}", n.x, n.y, n.z);
        }

        // obj indices start at 1
        let first = self.written + 1;
        for triangle in 0..range.triangle_count() {
            let a = first + 3 * triangle;
            let (b, c) = (a + 1, a + 2);
            let _ = if R::TEXTURED {
                writeln!(self.out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")
            } else {
                writeln!(self.out, "f {a}//{a} {b}//{b} {c}//{c}")
            };
        }
        self.written += range.count;
    }
}
