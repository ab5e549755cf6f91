//! Defines and implements the helper method [`ExportMesh::add_mesh`] on various output formats.
//!
//! Getting the buffers into a file is never the hard part, but viewing a tessellation in a
//! regular model viewer is the quickest way to check it.
use crate::mesh::{Mesh, MeshRange};

/// Write meshes into different output formats.
///
/// Use different crate features to implement different formats:
/// - `export-obj` to write Wavefront OBJ text
pub trait ExportMesh {
    /// Add the vertices in `range` as a named group.
    fn add_group(&mut self, name: &str, mesh: &Mesh<f64>, range: MeshRange);

    /// Add a whole mesh.
    fn add_mesh(&mut self, mesh: &Mesh<f64>) {
        let range = MeshRange {
            start: 0,
            count: mesh.len(),
        };
        self.add_group("mesh", mesh, range);
    }
}

#[cfg(feature = "export-obj")]
pub mod obj;
