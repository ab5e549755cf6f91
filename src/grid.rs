//! Square grids of control points: bicubic patches and the texture coordinates at their corners.

use nalgebra::dimension::Const;
use nalgebra::{ArrayStorage, RealField, SMatrix, SVector, Scalar, Vector2};
use thiserror::Error;

use crate::curve::BezierCurve;

/// A grid row: curve through `N` control points of dimension `D`.
pub type GridCurve<T, const D: usize, const N: usize> =
    BezierCurve<T, Const<D>, Const<N>, ArrayStorage<T, D, N>>;

/// Row major grid of `N × N` control points of dimension `D`.
///
/// Row `i` is the curve along `u` through the points `(i, 0..N)`.
/// Column `j` is the curve along `v` through the points `(0..N, j)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlGrid<T: Scalar, const D: usize, const N: usize> {
    /// The grid's rows, each one a curve along `u`
    pub rows: [GridCurve<T, D, N>; N],
}

/// Bicubic bezier patch: 4 × 4 homogeneous control points.
pub type Patch<T> = ControlGrid<T, 4, 4>;

/// Texture coordinates at the four corners of a [`Patch`].
///
/// Entry `(0, 0)` belongs to the patch's point `(0, 0)`, `(0, 1)` to `(0, 3)`,
/// `(1, 0)` to `(3, 0)` and `(1, 1)` to `(3, 3)`.
pub type TexturePatch<T> = ControlGrid<T, 2, 2>;

/// Returned when a grid is built from rows of the wrong shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The grid has too many or too few rows
    #[error("grid needs {expected} rows, got {found}")]
    RowCount {
        /// Rows the grid requires
        expected: usize,
        /// Rows that were supplied
        found: usize,
    },

    /// A single row has too many or too few points
    #[error("row {row} needs {expected} points, got {found}")]
    ColumnCount {
        /// Index of the offending row
        row: usize,
        /// Points each row requires
        expected: usize,
        /// Points that were supplied
        found: usize,
    },
}

impl<T: RealField, const D: usize, const N: usize> ControlGrid<T, D, N> {
    /// Builds a grid from its points, indexed `[row][column]`.
    pub fn from_points(points: [[SVector<T, D>; N]; N]) -> Self {
        ControlGrid {
            rows: points.map(GridCurve::<T, D, N>::from_points),
        }
    }

    /// Builds a grid from dynamically sized rows of raw coordinates.
    ///
    /// Fails unless there are exactly `N` rows of exactly `N` points each.
    pub fn from_rows<Row: AsRef<[[T; D]]>>(rows: &[Row]) -> Result<Self, ShapeError> {
        if rows.len() != N {
            return Err(ShapeError::RowCount {
                expected: N,
                found: rows.len(),
            });
        }
        for (row, points) in rows.iter().enumerate() {
            let found = points.as_ref().len();
            if found != N {
                return Err(ShapeError::ColumnCount {
                    row,
                    expected: N,
                    found,
                });
            }
        }

        Ok(Self::from_points(std::array::from_fn(|i| {
            std::array::from_fn(|j| SVector::from(rows[i].as_ref()[j].clone()))
        })))
    }

    /// Get the point in `row` and `column`.
    pub fn point(&self, row: usize, column: usize) -> SVector<T, D> {
        self.rows[row].point(column)
    }

    /// Swaps the roles of rows and columns.
    pub fn transpose(&self) -> Self {
        let rows = std::array::from_fn(|j| {
            BezierCurve(SMatrix::from_fn(|component, i| {
                self.rows[i].0[(component, j)].clone()
            }))
        });
        ControlGrid { rows }
    }

    /// Splits every row at `u = 0.5`.
    ///
    /// Returns the grid covering the first half of `u` followed by the one covering the second.
    pub fn bisect_u(&self) -> [Self; 2] {
        let halves: [[GridCurve<T, D, N>; 2]; N] = std::array::from_fn(|k| self.rows[k].bisect());
        [
            ControlGrid {
                rows: std::array::from_fn(|k| halves[k][0].clone()),
            },
            ControlGrid {
                rows: std::array::from_fn(|k| halves[k][1].clone()),
            },
        ]
    }

    /// Splits every column at `v = 0.5`.
    ///
    /// The columns are split as rows of the transposed grid, the halves are transposed back so
    /// they keep this grid's orientation.
    pub fn bisect_v(&self) -> [Self; 2] {
        let [first, second] = self.transpose().bisect_u();
        [first.transpose(), second.transpose()]
    }

    /// Splits the grid into four grids of equal parametric size.
    ///
    /// Order: first `u` / first `v`, first `u` / second `v`,
    /// second `u` / first `v`, second `u` / second `v`.
    pub fn quarter(&self) -> [Self; 4] {
        let [first_u, second_u] = self.bisect_u();
        let [a, b] = first_u.bisect_v();
        let [c, d] = second_u.bisect_v();
        [a, b, c, d]
    }
}

impl<T: RealField> TexturePatch<T> {
    /// Maps the whole texture onto the patch, `(0, 0)` to `(1, 1)`.
    pub fn unit_square() -> Self {
        let (zero, one) = (T::zero(), T::one());
        Self::from_points([
            [
                Vector2::new(zero.clone(), zero.clone()),
                Vector2::new(zero.clone(), one.clone()),
            ],
            [Vector2::new(one.clone(), zero), Vector2::new(one.clone(), one)],
        ])
    }
}
