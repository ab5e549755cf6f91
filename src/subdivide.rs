//! Recursive subdivision of a bicubic patch into a triangle list.
//!
//! Each level splits a patch into four children of equal parametric size using de Casteljau
//! bisection along both directions. Once the requested depth is reached every leaf patch is
//! replaced by the two triangles spanned by its corner points:
//!
//! ```text
//!  (0,0) ---- (0,3)
//!    |  \   A   |
//!    | B  \     |
//!  (3,0) ---- (3,3)
//! ```

use log::{debug, trace, warn};
use nalgebra::{RealField, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::{Patch, TexturePatch};
use crate::mesh::MeshSink;

/// How a patch is subdivided and shaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdivisionOptions {
    /// Levels of four way splitting; every level quadruples the triangle count
    pub depth: u32,

    /// One normal per corner (`true`) or one flat normal per leaf patch (`false`)
    pub smooth: bool,

    /// Negate every normal to shade the patch's other side
    pub flipped: bool,
}

impl Default for SubdivisionOptions {
    fn default() -> Self {
        SubdivisionOptions {
            depth: 3,
            smooth: true,
            flipped: false,
        }
    }
}

/// Counters collected during one call to [`subdivide`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubdivisionReport {
    /// Patches visited, leaves included
    pub patches: usize,

    /// Triangles handed to the sink
    pub triangles: usize,

    /// Corners which got a zero normal because neither their smooth nor their flat normal was
    /// defined
    pub degenerate_normals: usize,
}

/// A patch corner and the control points its smooth normal is built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CornerStencil {
    /// `(row, column)` of the corner point
    pub corner: (usize, usize),

    /// Endpoint of the first edge leaving the corner
    pub first: (usize, usize),

    /// Endpoint of the second edge leaving the corner
    pub second: (usize, usize),

    /// `(row, column)` of the corner's texture coordinate
    pub texture: (usize, usize),
}

/// The four corners of a leaf patch.
///
/// The edge pairs are not symmetric across corners; shading depends on exactly these pairs.
pub(crate) const CORNERS: [CornerStencil; 4] = [
    CornerStencil {
        corner: (0, 0),
        first: (0, 1),
        second: (1, 0),
        texture: (0, 0),
    },
    CornerStencil {
        corner: (0, 3),
        first: (1, 3),
        second: (0, 2),
        texture: (0, 1),
    },
    CornerStencil {
        corner: (3, 3),
        first: (3, 2),
        second: (2, 3),
        texture: (1, 1),
    },
    CornerStencil {
        corner: (3, 0),
        first: (2, 0),
        second: (3, 1),
        texture: (1, 0),
    },
];

const C00: usize = 0;
const C03: usize = 1;
const C33: usize = 2;
const C30: usize = 3;

/// Indices into [`CORNERS`] for the two triangles of a leaf, split along `(0,0)`-`(3,3)`.
pub(crate) const TRIANGLES: [[usize; 3]; 2] = [[C00, C03, C33], [C00, C33, C30]];

impl CornerStencil {
    fn smooth_normal<T: RealField>(&self, patch: &Patch<T>) -> Option<Vector3<T>> {
        triangle_normal(
            &point(patch, self.corner),
            &point(patch, self.first),
            &point(patch, self.second),
        )
    }
}

fn point<T: RealField>(patch: &Patch<T>, (row, column): (usize, usize)) -> Vector4<T> {
    patch.point(row, column)
}

/// Unit normal of the triangle `a b c`, `None` if the triangle has no area.
///
/// Only the `x y z` components of the homogeneous points are used.
pub fn triangle_normal<T: RealField>(
    a: &Vector4<T>,
    b: &Vector4<T>,
    c: &Vector4<T>,
) -> Option<Vector3<T>> {
    let origin = a.xyz();
    let ab = b.xyz() - &origin;
    let ac = c.xyz() - origin;
    ab.cross(&ac).try_normalize(T::zero())
}

/// Normalized average of the two face normals of the quad spanned by the patch's corners.
///
/// A face without area is left out of the average.
fn flat_normal<T: RealField>(patch: &Patch<T>) -> Option<Vector3<T>> {
    let p00 = patch.point(0, 0);
    let p03 = patch.point(0, 3);
    let p30 = patch.point(3, 0);
    let p33 = patch.point(3, 3);

    let faces = [
        triangle_normal(&p00, &p03, &p30),
        triangle_normal(&p33, &p30, &p03),
    ];
    faces
        .into_iter()
        .flatten()
        .fold(Vector3::zeros(), |sum, normal| sum + normal)
        .try_normalize(T::zero())
}

/// Number of triangles a subdivision of `depth` emits: `2 * 4^depth`.
///
/// Returns `None` if the count doesn't fit into a `usize`.
pub fn expected_triangles(depth: u32) -> Option<usize> {
    let depth = usize::try_from(depth).ok()?;
    num::checked_pow(4usize, depth)?.checked_mul(2)
}

/// Subdivides `patch` `options.depth` times and passes the resulting triangles to `sink`.
///
/// Emits exactly `2 * 4^depth` triangles. Children are visited depth first in the order
/// returned by [`Patch::quarter`], so the output is fully determined by the input.
pub fn subdivide<T, S>(
    patch: &Patch<T>,
    tex_patch: &TexturePatch<T>,
    options: SubdivisionOptions,
    sink: &mut S,
) -> SubdivisionReport
where
    T: RealField,
    S: MeshSink<T> + ?Sized,
{
    match expected_triangles(options.depth).and_then(|triangles| triangles.checked_mul(3)) {
        Some(vertices) => sink.reserve(vertices),
        None => warn!(
            "triangle count for subdivision depth {} overflows",
            options.depth
        ),
    }

    let mut report = SubdivisionReport::default();

    // Holds at most 3 siblings per level plus the current patch
    let mut stack: SmallVec<[(Patch<T>, TexturePatch<T>, u32); 16]> = SmallVec::new();
    stack.push((patch.clone(), tex_patch.clone(), options.depth));

    while let Some((patch, tex_patch, depth)) = stack.pop() {
        report.patches += 1;
        if depth == 0 {
            emit_leaf(&patch, &tex_patch, options, sink, &mut report);
            continue;
        }

        let children = patch.quarter().into_iter().zip(tex_patch.quarter());
        for (child, tex_child) in children.rev() {
            stack.push((child, tex_child, depth - 1));
        }
    }

    debug!(
        "subdivided patch at depth {}: {} patches, {} triangles",
        options.depth, report.patches, report.triangles
    );
    report
}

/// Emits the two triangles of a leaf patch.
fn emit_leaf<T, S>(
    patch: &Patch<T>,
    tex_patch: &TexturePatch<T>,
    options: SubdivisionOptions,
    sink: &mut S,
    report: &mut SubdivisionReport,
) where
    T: RealField,
    S: MeshSink<T> + ?Sized,
{
    let flat = flat_normal(patch);
    let normals = CORNERS.map(|stencil| {
        let normal = if options.smooth {
            stencil.smooth_normal(patch).or_else(|| flat.clone())
        } else {
            flat.clone()
        };
        match normal {
            Some(normal) if options.flipped => -normal,
            Some(normal) => normal,
            None => {
                trace!("no normal for corner {:?}", stencil.corner);
                report.degenerate_normals += 1;
                Vector3::zeros()
            }
        }
    });

    for triangle in TRIANGLES {
        for corner in triangle {
            let stencil = &CORNERS[corner];
            let (tex_row, tex_column) = stencil.texture;
            sink.push_vertex(
                point(patch, stencil.corner),
                normals[corner].clone(),
                tex_patch.point(tex_row, tex_column),
            );
        }
    }
    report.triangles += TRIANGLES.len();
}
