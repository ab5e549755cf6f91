//! A wrapper around [`nalgebra::Matrix`] interpreting it as a bezier curve.
//!
//! Patches only ever need two shapes of curve: cubic curves through homogeneous points
//! ([`Curve`]) and straight segments between texture coordinates ([`TextureCurve`]).
//! Both are split by the same de Casteljau construction.

use std::fmt;

use nalgebra::allocator::Allocator;
use nalgebra::dimension::{Const, Dim, U1, U2, U4};
use nalgebra::{
    ArrayStorage, DefaultAllocator, Matrix, OMatrix, OVector, Owned, RealField, SMatrix, SVector,
    Storage,
};

/// Wrapper around [`nalgebra::Matrix`] interpreting it as a bezier curve.
///
/// The curve's control points are stored as the matrix' columns.
#[derive(Clone)]
pub struct BezierCurve<T, R, C, S>(pub Matrix<T, R, C, S>);

/// Wrapper around [`nalgebra::OMatrix`] interpreting it as a bezier curve.
pub type OBezierCurve<T, R, C> = BezierCurve<T, R, C, Owned<T, R, C>>;

/// Cubic curve through four homogeneous control points `(x, y, z, w)`.
pub type Curve<T> = BezierCurve<T, U4, U4, ArrayStorage<T, 4, 4>>;

/// Linear "curve" between two texture coordinates.
pub type TextureCurve<T> = BezierCurve<T, U2, U2, ArrayStorage<T, 2, 2>>;

impl<T, R, C, S> fmt::Debug for BezierCurve<T, R, C, S>
where
    Matrix<T, R, C, S>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BezierCurve").field(&self.0).finish()
    }
}

impl<T, R, C, S> PartialEq for BezierCurve<T, R, C, S>
where
    Matrix<T, R, C, S>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: RealField, R: Dim, C: Dim, S: Storage<T, R, C>> BezierCurve<T, R, C, S> {
    /// Get the curves degree
    ///
    /// For example a cubic curve has degree 3 and 4 control points
    pub fn degree(&self) -> usize {
        self.0.ncols() - 1
    }
}

impl<T: RealField, R: Dim, C: Dim, S: Storage<T, R, C>> BezierCurve<T, R, C, S>
where
    // Column arithemtic required in each step
    DefaultAllocator: Allocator<T, R, U1>,

    // Buffer to store intermediate steps in
    DefaultAllocator: Allocator<T, R, C>,
{
    /// Splits a curve into two parts
    ///
    /// The first part is the same shape as the original curve between 0 and t and the second
    /// part as the curve between t and 1.
    /// This method assumes `t` to between 0 and 1 but doesn't check it.
    pub fn split(&self, t: T) -> [OBezierCurve<T, R, C>; 2] {
        let (rows, cols) = self.0.shape_generic();
        let ncols = cols.value();
        let mut lower: OMatrix<T, R, C> = Matrix::zeros_generic(rows, cols);
        let mut upper: OMatrix<T, R, C> = Matrix::zeros_generic(rows, cols);

        lower.set_column(0, &self.0.column(0));
        upper.set_column(ncols - 1, &self.0.column(ncols - 1));

        let t_inv = T::one() - t.clone();
        let mut points = self.0.clone_owned();
        for level in 1..ncols {
            castlejau_step(&mut points, ncols - level, &t, &t_inv);

            // The triangle's left edge is the lower curve, its right edge the upper one
            lower.set_column(level, &points.column(0));
            upper.set_column(ncols - 1 - level, &points.column(ncols - 1 - level));
        }

        [BezierCurve(lower), BezierCurve(upper)]
    }

    /// Splits a curve at its parameter midpoint.
    ///
    /// Every new point is a midpoint of two older ones, so for a cubic curve `[c0, c1, c2, c3]`
    /// the halves are `[c0, m01, m012, joint]` and `[joint, m123, m23, c3]`.
    /// The endpoints are copied, never recomputed, and both halves share the exact same joint.
    pub fn bisect(&self) -> [OBezierCurve<T, R, C>; 2] {
        let two = T::one() + T::one();
        self.split(T::one() / two)
    }

    /// Get the point on the curve at position `t`.
    ///
    /// This method uses de castlejau's algorithm.
    pub fn castlejau_eval(&self, t: T) -> OVector<T, R> {
        let ncols = self.0.ncols();
        let t_inv = T::one() - t.clone();

        let mut points = self.0.clone_owned();
        for level in 1..ncols {
            castlejau_step(&mut points, ncols - level, &t, &t_inv);
        }

        points.column(0).clone_owned()
    }
}

/// Collapses one level of de Casteljau's triangle in place.
///
/// Afterwards the first `count` columns hold the interpolated points of the next level.
fn castlejau_step<T: RealField, R: Dim, C: Dim>(
    points: &mut OMatrix<T, R, C>,
    count: usize,
    t: &T,
    t_inv: &T,
) where
    DefaultAllocator: Allocator<T, R, U1>,
    DefaultAllocator: Allocator<T, R, C>,
{
    for i in 0..count {
        let column = points.column(i) * t_inv.clone() + points.column(i + 1) * t.clone();
        points.set_column(i, &column);
    }
}

impl<T: RealField, const D: usize, const N: usize>
    BezierCurve<T, Const<D>, Const<N>, ArrayStorage<T, D, N>>
{
    /// Builds a curve from its control points in order.
    pub fn from_points(points: [SVector<T, D>; N]) -> Self {
        BezierCurve(SMatrix::from_columns(&points))
    }

    /// Get the `i`-th control point.
    pub fn point(&self, i: usize) -> SVector<T, D> {
        self.0.column(i).clone_owned()
    }

    /// Get all control points in order.
    pub fn points(&self) -> [SVector<T, D>; N] {
        std::array::from_fn(|i| self.point(i))
    }
}

/// Splits a cubic curve at `t = 0.5` into its left and right half.
pub fn bisect_curve<T: RealField>(curve: &Curve<T>) -> [Curve<T>; 2] {
    curve.bisect()
}

/// Splits a pair of texture coordinates at their midpoint.
pub fn bisect_texture_curve<T: RealField>(curve: &TextureCurve<T>) -> [TextureCurve<T>; 2] {
    curve.bisect()
}
