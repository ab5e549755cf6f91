#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod curve;
pub mod export;
pub mod grid;
pub mod mesh;
pub mod subdivide;
pub mod terrain;

pub use crate::curve::{bisect_curve, bisect_texture_curve, BezierCurve, Curve, TextureCurve};
pub use crate::grid::{ControlGrid, Patch, ShapeError, TexturePatch};
pub use crate::mesh::{Mesh, MeshRange, MeshSink};
pub use crate::subdivide::{expected_triangles, subdivide, SubdivisionOptions, SubdivisionReport};
pub use crate::terrain::{PatchConfig, Terrain, TerrainConfig, TerrainError};

#[cfg(test)]
mod tests {
    use crate::{
        bisect_curve, bisect_texture_curve, subdivide, BezierCurve, Curve, Mesh, Patch,
        SubdivisionOptions, TextureCurve, TexturePatch,
    };
    use nalgebra::{Matrix2, Vector2, Vector3, Vector4};

    const EPSILON: f64 = 1e-12;

    /// Patch over `[0, 3] × [0, 3]` with columns along x, rows along y and the given heights.
    fn height_grid(heights: [[f64; 4]; 4]) -> Patch<f64> {
        Patch::from_points(std::array::from_fn(|row| {
            std::array::from_fn(|column| {
                Vector4::new(column as f64, row as f64, heights[row][column], 1.0)
            })
        }))
    }

    fn bumpy() -> Patch<f64> {
        height_grid([
            [0.0, 2.0, 4.0, 0.0],
            [0.0, 8.0, 8.0, 0.0],
            [0.0, 8.0, 8.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    fn sample_curve() -> Curve<f64> {
        Curve::from_points([
            Vector4::new(50.0, 0.0, 1.0, 1.0),
            Vector4::new(200.0, 33.0, -4.0, 1.0),
            Vector4::new(0.0, 66.0, 7.5, 1.0),
            Vector4::new(50.0, 100.0, 2.0, 1.0),
        ])
    }

    fn tessellate(patch: &Patch<f64>, options: SubdivisionOptions) -> Mesh<f64> {
        let mut mesh = Mesh::new();
        subdivide(patch, &TexturePatch::unit_square(), options, &mut mesh);
        mesh
    }

    fn options(depth: u32, smooth: bool, flipped: bool) -> SubdivisionOptions {
        SubdivisionOptions {
            depth,
            smooth,
            flipped,
        }
    }

    #[test]
    fn bezier_split() {
        let line = BezierCurve(Matrix2::from_columns(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
        ]));
        let [l, u] = line.split(0.5);
        assert_eq!(
            l.0,
            Matrix2::from_columns(&[Vector2::new(0.0, 0.0), Vector2::new(0.5, 0.5)])
        );
        assert_eq!(
            u.0,
            Matrix2::from_columns(&[Vector2::new(0.5, 0.5), Vector2::new(1.0, 1.0)])
        );
    }

    #[test]
    fn bisect_continuity() {
        let curve = sample_curve();
        let [left, right] = bisect_curve(&curve);

        assert_eq!(left.point(3), right.point(0));
        assert_eq!(left.point(0), curve.point(0));
        assert_eq!(right.point(3), curve.point(3));

        // Bernstein weights at t = 0.5
        let [c0, c1, c2, c3] = curve.points();
        let expected = (c0 + c1 * 3.0 + c2 * 3.0 + c3) / 8.0;
        assert!((left.point(3) - &expected).norm() < EPSILON);
        assert!((curve.castlejau_eval(0.5) - expected).norm() < EPSILON);
    }

    #[test]
    fn bisect_midpoints() {
        let curve = sample_curve();
        let [c0, c1, c2, c3] = curve.points();
        let [left, right] = bisect_curve(&curve);

        let m01 = (&c0 + &c1) / 2.0;
        let m12 = (&c1 + &c2) / 2.0;
        let m23 = (&c2 + &c3) / 2.0;
        let m012 = (&m01 + &m12) / 2.0;
        let m123 = (&m12 + &m23) / 2.0;
        let joint = (&m012 + &m123) / 2.0;

        assert_eq!(left.points(), [c0, m01, m012, joint.clone()]);
        assert_eq!(right.points(), [joint, m123, m23, c3]);
    }

    #[test]
    fn bisect_traces_curve() {
        let curve = sample_curve();
        let [left, right] = curve.bisect();
        for i in 0..=10 {
            let s = i as f64 / 10.0;
            let on_left = left.castlejau_eval(s) - curve.castlejau_eval(s / 2.0);
            let on_right = right.castlejau_eval(s) - curve.castlejau_eval((1.0 + s) / 2.0);
            assert!(on_left.norm() < 1e-9, "left half is off at {}", s);
            assert!(on_right.norm() < 1e-9, "right half is off at {}", s);
        }
    }

    #[test]
    fn bisect_texture() {
        let segment = TextureCurve::from_points([Vector2::new(0.0, 0.25), Vector2::new(1.0, 0.75)]);
        let [left, right] = bisect_texture_curve(&segment);
        assert_eq!(left.points(), [Vector2::new(0.0, 0.25), Vector2::new(0.5, 0.5)]);
        assert_eq!(right.points(), [Vector2::new(0.5, 0.5), Vector2::new(1.0, 0.75)]);
    }

    #[test]
    fn transpose_twice() {
        let patch = bumpy();
        let transposed = patch.transpose();
        assert_eq!(transposed.point(1, 2), patch.point(2, 1));
        assert_eq!(transposed.transpose(), patch);
    }

    #[test]
    fn triangle_count() {
        let patch = bumpy();
        for depth in 0..=3 {
            let mut vertices = 0;
            let report = subdivide(
                &patch,
                &TexturePatch::unit_square(),
                options(depth, true, false),
                &mut |_: Vector4<f64>, _: Vector3<f64>, _: Vector2<f64>| vertices += 1,
            );
            assert_eq!(vertices, 6 * 4usize.pow(depth));
            assert_eq!(report.triangles, 2 * 4usize.pow(depth));
            assert_eq!(report.patches, (4usize.pow(depth + 1) - 1) / 3);
            assert_eq!(report.degenerate_normals, 0);
        }
    }

    #[test]
    fn unit_normals() {
        for smooth in [true, false] {
            let mesh = tessellate(&bumpy(), options(2, smooth, false));
            assert_eq!(mesh.normals.len(), mesh.positions.len());
            assert_eq!(mesh.tex_coords.len(), mesh.positions.len());
            for normal in mesh.normals.iter() {
                assert!((normal.norm() - 1.0).abs() < EPSILON, "{:?}", normal);
            }
        }
    }

    #[test]
    fn flip_symmetry() {
        for smooth in [true, false] {
            let front = tessellate(&bumpy(), options(2, smooth, false));
            let back = tessellate(&bumpy(), options(2, smooth, true));
            assert_eq!(front.positions, back.positions);
            assert_eq!(front.tex_coords, back.tex_coords);
            for (f, b) in front.normals.iter().zip(back.normals.iter()) {
                assert_eq!(-f, *b);
            }
        }
    }

    #[test]
    fn corner_coverage() {
        let patch = bumpy();
        let mesh = tessellate(&patch, options(0, true, false));
        assert_eq!(mesh.len(), 6);

        // Both triangles share the (0,0)-(3,3) diagonal
        for ((row, column), expected) in [((0, 0), 2), ((0, 3), 1), ((3, 0), 1), ((3, 3), 2)] {
            let corner = patch.point(row, column);
            let uses = mesh.positions.iter().filter(|p| **p == corner).count();
            assert_eq!(uses, expected, "corner ({}, {})", row, column);
        }
        assert_eq!(
            mesh.tex_coords,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(1.0, 0.0),
            ]
        );
    }

    #[test]
    fn flat_square() {
        let patch = height_grid([[0.0; 4]; 4]);
        for depth in 0..=3 {
            for smooth in [false, true] {
                let front = tessellate(&patch, options(depth, smooth, false));
                assert!(front.normals.iter().all(|n| *n == Vector3::new(0.0, 0.0, 1.0)));

                let back = tessellate(&patch, options(depth, smooth, true));
                assert!(back.normals.iter().all(|n| *n == Vector3::new(0.0, 0.0, -1.0)));
            }
        }
    }

    #[test]
    fn one_level() {
        let mesh = tessellate(&bumpy(), options(1, false, false));
        assert_eq!(mesh.triangle_count(), 8);

        // Corners of the bisected surface, computed by hand with weights (1, 3, 3, 1) / 8
        let p00 = Vector4::new(0.0, 0.0, 0.0, 1.0);
        let p03 = Vector4::new(3.0, 0.0, 0.0, 1.0);
        let p30 = Vector4::new(0.0, 3.0, 0.0, 1.0);
        let p33 = Vector4::new(3.0, 3.0, 0.0, 1.0);
        let top = Vector4::new(1.5, 0.0, 2.25, 1.0);
        let left = Vector4::new(0.0, 1.5, 0.0, 1.0);
        let right = Vector4::new(3.0, 1.5, 0.0, 1.0);
        let bottom = Vector4::new(1.5, 3.0, 0.0, 1.0);
        let center = Vector4::new(1.5, 1.5, 4.78125, 1.0);

        // Corners (0,0), (0,3), (3,3), (3,0) of each quarter
        let quarters = [
            [&p00, &top, &center, &left],
            [&left, &center, &bottom, &p30],
            [&top, &p03, &right, &center],
            [&center, &right, &p33, &bottom],
        ];
        for (i, [c00, c03, c33, c30]) in quarters.into_iter().enumerate() {
            let leaf = &mesh.positions[6 * i..6 * i + 6];
            assert_eq!(leaf, [c00, c03, c33, c00, c33, c30].map(Clone::clone), "quarter {}", i);
        }
    }

    #[test]
    fn append_ranges() {
        let tex = TexturePatch::unit_square();
        let mut mesh = Mesh::new();
        let (first, _) = mesh.subdivide_into(&bumpy(), &tex, options(1, true, false));
        let (second, report) = mesh.subdivide_into(&bumpy(), &tex, options(0, false, true));

        assert_eq!((first.start, first.count), (0, 24));
        assert_eq!((second.start, second.count), (24, 6));
        assert_eq!(second.triangle_count(), report.triangles);
        assert_eq!(mesh.triangles().last(), Some([27, 28, 29]));
        assert_eq!(mesh.triangles().count(), mesh.triangle_count());
    }

    #[test]
    fn degenerate_patch() {
        let patch = Patch::from_points([[Vector4::new(1.0, 1.0, 1.0, 1.0); 4]; 4]);
        let mut mesh = Mesh::new();
        let report = subdivide(
            &patch,
            &TexturePatch::unit_square(),
            options(1, true, false),
            &mut mesh,
        );
        assert_eq!(report.triangles, 8);
        assert_eq!(report.degenerate_normals, 16);
        assert!(mesh.normals.iter().all(|n| *n == Vector3::zeros()));
    }
}
