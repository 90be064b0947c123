mod euclidean;

pub use euclidean::{Euclidean2, Euclidean3};

use std::fmt::Debug;

use crate::math::Length;

/// The numeric vocabulary every spline algorithm is generic over.
///
/// An implementation relates four types: a position, a displacement (the
/// difference of two positions), a time, and a velocity. All algorithms in
/// this crate consume positions only through these operations and never
/// assume a concrete representation, so the same code runs over 2D, 3D,
/// N-D, or domain-specific position types.
///
/// Implementations must be stateless pure functions; the ops value itself
/// is a zero-cost `Copy` token stored alongside each spline.
pub trait SplineOps: Copy {
    /// A point on a curve.
    type Pos: Copy + Debug + PartialEq;
    /// The difference between two positions.
    type Diff: Copy + Debug;
    /// A span of time; a raw `f64` for ordinary scalar-time splines.
    type Time: Copy + Debug;
    /// Displacement per unit time.
    type Vel: Copy + Debug;

    /// `position + displacement`.
    fn add(&self, pos: Self::Pos, diff: Self::Diff) -> Self::Pos;

    /// `a - b` as a displacement.
    fn sub(&self, a: Self::Pos, b: Self::Pos) -> Self::Diff;

    /// `a + b` over displacements.
    fn combine(&self, a: Self::Diff, b: Self::Diff) -> Self::Diff;

    /// Scales a displacement by a dimensionless factor.
    fn scale(&self, diff: Self::Diff, factor: f64) -> Self::Diff;

    /// Inner product of two displacements.
    fn dot(&self, a: Self::Diff, b: Self::Diff) -> f64;

    /// `velocity * time`.
    fn displacement(&self, vel: Self::Vel, time: Self::Time) -> Self::Diff;

    /// `displacement / time`.
    fn velocity(&self, diff: Self::Diff, time: Self::Time) -> Self::Vel;

    /// Scales a velocity by a dimensionless factor.
    fn scale_velocity(&self, vel: Self::Vel, factor: f64) -> Self::Vel;

    /// Converts a raw scalar into a time span.
    fn time_from_raw(&self, raw: f64) -> Self::Time;

    /// Converts a time span back into a raw scalar.
    fn time_to_raw(&self, time: Self::Time) -> f64;

    /// `-diff`.
    fn negate(&self, diff: Self::Diff) -> Self::Diff {
        self.scale(diff, -1.0)
    }

    /// `a - b` over displacements.
    fn diff_between(&self, a: Self::Diff, b: Self::Diff) -> Self::Diff {
        self.combine(a, self.negate(b))
    }

    /// Squared Euclidean magnitude of a displacement.
    fn squared_magnitude(&self, diff: Self::Diff) -> f64 {
        self.dot(diff, diff)
    }

    /// Euclidean magnitude of a displacement.
    fn magnitude(&self, diff: Self::Diff) -> f64 {
        self.squared_magnitude(diff).sqrt()
    }

    /// Euclidean distance between two positions.
    fn distance(&self, a: Self::Pos, b: Self::Pos) -> Length {
        Length::new(self.magnitude(self.sub(a, b)))
    }

    /// Linear interpolation between two positions.
    fn lerp(&self, a: Self::Pos, b: Self::Pos, t: f64) -> Self::Pos {
        self.add(a, self.scale(self.sub(b, a), t))
    }
}
