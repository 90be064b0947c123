use crate::math::{Point2, Point3, Vector2, Vector3};

use super::SplineOps;

/// Geometric operations over 3D Euclidean space.
///
/// The canonical scalar-time backend: time is a raw `f64` and velocity
/// coincides with displacement per unit of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean3;

impl SplineOps for Euclidean3 {
    type Pos = Point3;
    type Diff = Vector3;
    type Time = f64;
    type Vel = Vector3;

    fn add(&self, pos: Point3, diff: Vector3) -> Point3 {
        pos + diff
    }

    fn sub(&self, a: Point3, b: Point3) -> Vector3 {
        a - b
    }

    fn combine(&self, a: Vector3, b: Vector3) -> Vector3 {
        a + b
    }

    fn scale(&self, diff: Vector3, factor: f64) -> Vector3 {
        diff * factor
    }

    fn dot(&self, a: Vector3, b: Vector3) -> f64 {
        a.dot(&b)
    }

    fn displacement(&self, vel: Vector3, time: f64) -> Vector3 {
        vel * time
    }

    fn velocity(&self, diff: Vector3, time: f64) -> Vector3 {
        diff / time
    }

    fn scale_velocity(&self, vel: Vector3, factor: f64) -> Vector3 {
        vel * factor
    }

    fn time_from_raw(&self, raw: f64) -> f64 {
        raw
    }

    fn time_to_raw(&self, time: f64) -> f64 {
        time
    }
}

/// Geometric operations over the 2D Euclidean plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean2;

impl SplineOps for Euclidean2 {
    type Pos = Point2;
    type Diff = Vector2;
    type Time = f64;
    type Vel = Vector2;

    fn add(&self, pos: Point2, diff: Vector2) -> Point2 {
        pos + diff
    }

    fn sub(&self, a: Point2, b: Point2) -> Vector2 {
        a - b
    }

    fn combine(&self, a: Vector2, b: Vector2) -> Vector2 {
        a + b
    }

    fn scale(&self, diff: Vector2, factor: f64) -> Vector2 {
        diff * factor
    }

    fn dot(&self, a: Vector2, b: Vector2) -> f64 {
        a.dot(&b)
    }

    fn displacement(&self, vel: Vector2, time: f64) -> Vector2 {
        vel * time
    }

    fn velocity(&self, diff: Vector2, time: f64) -> Vector2 {
        diff / time
    }

    fn scale_velocity(&self, vel: Vector2, factor: f64) -> Vector2 {
        vel * factor
    }

    fn time_from_raw(&self, raw: f64) -> f64 {
        raw
    }

    fn time_to_raw(&self, time: f64) -> f64 {
        time
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Length;
    use approx::assert_relative_eq;

    #[test]
    fn derived_distance_3_4_5() {
        let ops = Euclidean3;
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!(ops.distance(a, b).nearly_equals(Length::new(5.0)));
    }

    #[test]
    fn derived_lerp_midpoint() {
        let ops = Euclidean2;
        let mid = ops.lerp(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0), 0.5);
        assert_relative_eq!(mid.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn negate_and_diff_between() {
        let ops = Euclidean3;
        let d = ops.diff_between(Vector3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(d.x, 2.0, epsilon = 1e-12);
        let n = ops.negate(d);
        assert_relative_eq!(n.x, -2.0, epsilon = 1e-12);
    }
}
